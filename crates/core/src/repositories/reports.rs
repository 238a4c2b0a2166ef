//! Document-derived patient history.
//!
//! Text extraction from PDFs and images happens outside this crate. What arrives here is plain
//! text; diagnoses are found by scanning it for known disease names and stored per patient in
//! `patient_history.json`:
//!
//! ```json
//! { "42": [ { "disease": "Typhoid", "diagnosed_on": "2024-06-01" } ] }
//! ```

use crate::context::HistoryEntry;
use crate::error::{NhlError, NhlResult};
use crate::name::DiseaseName;
use crate::repositories::shared::{read_store, write_store};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

type HistoryStore = BTreeMap<String, Vec<HistoryEntry>>;

/// Per-patient report history store.
#[derive(Debug)]
pub struct ReportHistoryRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ReportHistoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// History entries recorded for a patient, oldest upload first.
    ///
    /// An unreadable store is logged and treated as empty.
    pub fn history_for(&self, patient_id: &str) -> Vec<HistoryEntry> {
        match read_store::<HistoryStore>(&self.path) {
            Ok(mut store) => store.remove(patient_id.trim()).unwrap_or_default(),
            Err(e) => {
                tracing::warn!("report history unavailable: {e}");
                Vec::new()
            }
        }
    }

    /// Appends entries to a patient's report history.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing store cannot be parsed or the update cannot be written.
    /// A malformed store is never overwritten.
    pub fn append(&self, patient_id: &str, entries: &[HistoryEntry]) -> NhlResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let _guard = self.write_lock.lock().map_err(|_| NhlError::LockPoisoned)?;

        let mut store: HistoryStore = read_store(&self.path)?;
        store
            .entry(patient_id.trim().to_string())
            .or_default()
            .extend_from_slice(entries);
        write_store(&self.path, &store)
    }
}

/// Finds known disease names in report text.
///
/// Matching is case-insensitive and on word boundaries, so `Flu` does not match inside
/// `Influenza`. Each disease is reported once, ordered by its first mention, and dated
/// `reported_on`.
pub fn extract_report_history(
    text: &str,
    known_diseases: &[DiseaseName],
    reported_on: Option<&str>,
) -> Vec<HistoryEntry> {
    let haystack = text.to_lowercase();
    let reported_on = reported_on
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    let mut found: Vec<(usize, &DiseaseName)> = Vec::new();
    for name in known_diseases {
        if name.is_empty() || found.iter().any(|(_, n)| *n == name) {
            continue;
        }
        if let Some(pos) = find_word(&haystack, &name.as_str().to_lowercase()) {
            found.push((pos, name));
        }
    }

    found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    found
        .into_iter()
        .map(|(_, name)| HistoryEntry {
            disease: name.as_str().to_string(),
            diagnosed_on: reported_on.clone(),
        })
        .collect()
}

fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }

    let mut start = 0;
    while let Some(offset) = haystack[start..].find(needle) {
        let pos = start + offset;
        let end = pos + needle.len();
        let before_ok = !haystack[..pos]
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric);
        let after_ok = !haystack[end..]
            .chars()
            .next()
            .is_some_and(char::is_alphanumeric);
        if before_ok && after_ok {
            return Some(pos);
        }
        // Advance past the first char of this match.
        start = pos + haystack[pos..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn known(names: &[&str]) -> Vec<DiseaseName> {
        names.iter().map(DiseaseName::new).collect()
    }

    #[test]
    fn extracts_in_order_of_first_mention() {
        let text = "Discharge summary: treated for TYPHOID in 2021. History of malaria. \
                    Typhoid relapse ruled out.";
        let found = extract_report_history(
            text,
            &known(&["Malaria", "Typhoid", "Dengue"]),
            Some("2024-06-01"),
        );

        assert_eq!(
            found,
            vec![
                HistoryEntry::new("Typhoid", "2024-06-01"),
                HistoryEntry::new("Malaria", "2024-06-01"),
            ]
        );
    }

    #[test]
    fn requires_word_boundaries() {
        let found = extract_report_history("Influenza A positive", &known(&["Flu"]), None);
        assert!(found.is_empty());

        let found = extract_report_history("flu-like illness", &known(&["Flu"]), None);
        assert_eq!(found, vec![HistoryEntry::undated("Flu")]);
    }

    #[test]
    fn matches_multi_word_names() {
        let found = extract_report_history(
            "Known case of chronic kidney disease stage 3",
            &known(&["Chronic Kidney Disease", "Kidney Stones"]),
            Some("  "),
        );
        assert_eq!(found, vec![HistoryEntry::undated("Chronic Kidney Disease")]);
    }

    #[test]
    fn empty_text_or_names_find_nothing() {
        assert!(extract_report_history("", &known(&["Flu"]), None).is_empty());
        assert!(extract_report_history("flu", &[], None).is_empty());
        assert!(extract_report_history("flu", &[DiseaseName::default()], None).is_empty());
    }

    #[test]
    fn append_and_read_back_per_patient() {
        let temp = TempDir::new().unwrap();
        let repo = ReportHistoryRepository::new(temp.path().join("patient_history.json"));

        assert!(repo.history_for("42").is_empty());

        repo.append("42", &[HistoryEntry::new("Typhoid", "2024-06-01")])
            .unwrap();
        repo.append(" 42 ", &[HistoryEntry::new("Malaria", "2024-07-01")])
            .unwrap();
        repo.append("7", &[HistoryEntry::undated("Flu")]).unwrap();

        assert_eq!(
            repo.history_for("42"),
            vec![
                HistoryEntry::new("Typhoid", "2024-06-01"),
                HistoryEntry::new("Malaria", "2024-07-01"),
            ]
        );
        assert_eq!(repo.history_for("7"), vec![HistoryEntry::undated("Flu")]);
    }

    #[test]
    fn malformed_store_reads_empty_and_is_not_overwritten() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("patient_history.json");
        std::fs::write(&path, "[not, a, map").unwrap();
        let repo = ReportHistoryRepository::new(path.clone());

        assert!(repo.history_for("1").is_empty());
        assert!(repo.append("1", &[HistoryEntry::undated("Flu")]).is_err());
        assert_eq!(std::fs::read_to_string(path).unwrap(), "[not, a, map");
    }
}
