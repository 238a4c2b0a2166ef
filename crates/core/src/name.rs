//! Canonical disease and region names.
//!
//! Names arrive from several independent sources (the relation catalog, region tables, patient
//! rows, uploaded report text) with inconsistent casing, padding and quoting. Every lookup in the
//! engine goes through [`DiseaseName`], so two spellings that normalise to the same text always
//! hit the same catalog entry.
//!
//! Normalisation:
//! - trim surrounding whitespace
//! - strip surrounding `"` and `'` characters
//! - title-case: a letter is uppercased when the preceding output character is not a letter,
//!   and lowercased otherwise (so `covid-19` becomes `Covid-19` and `o'neil` becomes `O'Neil`)
//!
//! Stripping repeats until no surrounding whitespace or quote remains, which keeps
//! `normalize(normalize(x)) == normalize(x)` for every input.

use std::fmt;

/// A disease (or region) name in canonical form.
///
/// The empty name is valid and simply never matches a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiseaseName(String);

impl DiseaseName {
    /// Normalises free text into a canonical name.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(normalize(raw.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DiseaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DiseaseName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DiseaseName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for DiseaseName {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl serde::Serialize for DiseaseName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for DiseaseName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(DiseaseName::new(s))
    }
}

/// Canonicalises a free-text name. See the module documentation for the rules.
pub fn normalize(raw: &str) -> String {
    let stripped = raw.trim_matches(|c: char| c.is_whitespace() || c == '"' || c == '\'');
    title_case(stripped)
}

fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        let prev_is_letter = out.chars().next_back().is_some_and(char::is_alphabetic);
        if !c.is_alphabetic() {
            out.push(c);
        } else if prev_is_letter {
            out.extend(c.to_lowercase());
        } else {
            // Multi-char uppercase expansions (e.g. 'ß') keep only their first char upper.
            let mut upper = c.to_uppercase();
            if let Some(first) = upper.next() {
                out.push(first);
            }
            for rest in upper {
                out.extend(rest.to_lowercase());
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn trims_whitespace() {
        assert_eq!(normalize(" fever "), "Fever");
    }

    #[test]
    fn strips_quotes() {
        assert_eq!(normalize("\"Flu\""), "Flu");
        assert_eq!(normalize("'dengue'"), "Dengue");
        assert_eq!(normalize("  \"'malaria'\"  "), "Malaria");
    }

    #[test]
    fn title_cases_each_word() {
        assert_eq!(normalize("type 2 DIABETES"), "Type 2 Diabetes");
        assert_eq!(normalize("covid-19"), "Covid-19");
        assert_eq!(normalize("chronic kidney disease"), "Chronic Kidney Disease");
    }

    #[test]
    fn empty_and_blank_inputs_normalise_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("\"\""), "");
        assert!(DiseaseName::new("  ").is_empty());
    }

    #[test]
    fn equality_follows_canonical_form() {
        assert_eq!(DiseaseName::new("TYPHOID"), DiseaseName::new(" typhoid"));
        assert_ne!(DiseaseName::new("Typhoid"), DiseaseName::new("Typhus"));
    }

    #[test]
    fn deserialises_through_normalisation() {
        let name: DiseaseName = serde_json::from_str("\" tuberculosis \"").unwrap();
        assert_eq!(name.as_str(), "Tuberculosis");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"Tuberculosis\"");
    }

    proptest! {
        #[test]
        fn normalisation_is_idempotent(raw in "[a-zA-Z0-9 \t'\"àéîõüßÀÉ-]{0,24}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalisation_is_idempotent_for_quoted_words(
            words in proptest::collection::vec("[a-zA-Z0-9'\"-]{0,8}", 0..4),
            pad in "[ \"']{0,3}",
        ) {
            let raw = format!("{pad}{}{pad}", words.join(" "));
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }
    }
}
