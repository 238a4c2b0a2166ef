//! Immutable reference data loaded once at startup.
//!
//! Every file is loaded independently. A missing or malformed file is logged and replaced by an
//! empty table so a broken reference file can never take the engine down; the synthesis code
//! simply sees fewer catalog hits.

use crate::catalog::RelationCatalog;
use crate::config::CoreConfig;
use crate::name::DiseaseName;
use api_shared::Disease;
use serde::de::DeserializeOwned;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::Path;

/// Region → ordered list of prevalent diseases.
///
/// Keys are kept as written for exact lookups. A second index maps each normalised key to one
/// raw key; when several raw keys normalise to the same name, the smallest raw key (byte order)
/// wins, so a lookup never depends on hash order.
#[derive(Debug, Clone, Default)]
pub struct RegionDiseases {
    regions: BTreeMap<String, Vec<String>>,
    by_name: BTreeMap<DiseaseName, String>,
}

impl RegionDiseases {
    pub fn new(regions: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        let regions: BTreeMap<String, Vec<String>> = regions.into_iter().collect();

        let mut by_name: BTreeMap<DiseaseName, String> = BTreeMap::new();
        for raw in regions.keys() {
            let name = DiseaseName::new(raw);
            if name.is_empty() {
                continue;
            }
            match by_name.entry(name) {
                Entry::Occupied(kept) => {
                    let kept = kept.get();
                    tracing::warn!(
                        "region {raw:?} normalises like {kept:?}; keeping {kept:?} for lookups"
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(raw.clone());
                }
            }
        }

        Self { regions, by_name }
    }

    /// Disease list for a region. Tries the region as given, then a title-cased match.
    pub fn diseases_for(&self, region: &str) -> &[String] {
        let region = region.trim();
        if let Some(list) = self.regions.get(region) {
            return list;
        }

        let wanted = DiseaseName::new(region);
        if wanted.is_empty() {
            return &[];
        }
        self.by_name
            .get(&wanted)
            .and_then(|raw| self.regions.get(raw))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// All read-only lookup tables used by the engine and the API.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub catalog: RelationCatalog,
    pub regions: RegionDiseases,
    pub history_pool: Vec<DiseaseName>,
    pub diseases: Vec<Disease>,
}

impl ReferenceData {
    /// Loads every reference file from the configured data directory.
    pub fn load(cfg: &CoreConfig) -> Self {
        let catalog = match read_optional(&cfg.relations_path()) {
            Some(text) => RelationCatalog::from_json_str(&text).unwrap_or_else(|e| {
                tracing::warn!("invalid relation catalog, using empty catalog: {e}");
                RelationCatalog::empty()
            }),
            None => RelationCatalog::empty(),
        };

        let regions = RegionDiseases::new(load_json_or_default::<BTreeMap<String, Vec<String>>>(
            &cfg.state_diseases_path(),
        ));

        let history_pool = load_json_or_default::<Vec<String>>(&cfg.mock_history_diseases_path())
            .into_iter()
            .map(DiseaseName::new)
            .filter(|name| !name.is_empty())
            .collect();

        let diseases = load_json_or_default(&cfg.diseases_path());

        let data = Self {
            catalog,
            regions,
            history_pool,
            diseases,
        };

        tracing::info!(
            relations = data.catalog.len(),
            regions = data.regions.len(),
            history_pool = data.history_pool.len(),
            diseases = data.diseases.len(),
            "reference data loaded"
        );

        data
    }

    /// Canonical names of every disease the application knows about.
    ///
    /// Used when scanning uploaded report text for diagnoses.
    pub fn known_diseases(&self) -> Vec<DiseaseName> {
        let mut names: Vec<DiseaseName> = self
            .diseases
            .iter()
            .map(|d| DiseaseName::new(&d.disease_name))
            .chain(self.history_pool.iter().cloned())
            .filter(|name| !name.is_empty())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

fn read_optional(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!("reference file {} unavailable: {e}", path.display());
            None
        }
    }
}

/// Reads and parses a JSON reference file, returning the type's default on any failure.
fn load_json_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(text) = read_optional(path) else {
        return T::default();
    };

    serde_json::from_str(&text).unwrap_or_else(|e| {
        tracing::warn!("invalid JSON in {}: {e}", path.display());
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config(temp: &TempDir) -> CoreConfig {
        CoreConfig::new(temp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn loads_all_tables() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("relations.json"),
            r#"{"Dengue": {"Malaria": {"probability": 0.4, "report": "r"}}}"#,
        )
        .unwrap();
        fs::write(
            temp.path().join("state_diseases.json"),
            r#"{"Odisha": ["Malaria", "Dengue"]}"#,
        )
        .unwrap();
        fs::write(
            temp.path().join("mock_history_diseases.json"),
            r#"["flu", "", "Asthma"]"#,
        )
        .unwrap();
        fs::write(
            temp.path().join("diseases.json"),
            r#"[{"disease_name": "Dengue", "category": "Viral", "common_symptoms": "Fever", "description": "d"}]"#,
        )
        .unwrap();

        let data = ReferenceData::load(&config(&temp));

        assert_eq!(data.catalog.len(), 1);
        assert_eq!(data.regions.diseases_for("Odisha"), ["Malaria", "Dengue"]);
        assert_eq!(data.history_pool, vec![DiseaseName::new("Flu"), DiseaseName::new("Asthma")]);
        assert_eq!(data.diseases.len(), 1);
        let known: Vec<String> = data
            .known_diseases()
            .into_iter()
            .map(DiseaseName::into_string)
            .collect();
        assert_eq!(known, vec!["Asthma", "Dengue", "Flu"]);
    }

    #[test]
    fn missing_and_malformed_files_degrade_to_empty() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("relations.json"), "{ definitely not json").unwrap();
        fs::write(temp.path().join("state_diseases.json"), "[1, 2]").unwrap();

        let data = ReferenceData::load(&config(&temp));

        assert!(data.catalog.is_empty());
        assert!(data.regions.is_empty());
        assert!(data.history_pool.is_empty());
        assert!(data.diseases.is_empty());
    }

    #[test]
    fn region_lookup_falls_back_to_title_case() {
        let regions = RegionDiseases::new([("Tamil Nadu".to_string(), vec!["Dengue".to_string()])]);

        assert_eq!(regions.diseases_for("Tamil Nadu"), ["Dengue"]);
        assert_eq!(regions.diseases_for(" tamil nadu "), ["Dengue"]);
        assert!(regions.diseases_for("Atlantis").is_empty());
        assert!(regions.diseases_for("").is_empty());
    }

    #[test]
    fn colliding_region_keys_resolve_the_same_way_every_time() {
        let build = || {
            RegionDiseases::new([
                ("odisha ".to_string(), vec!["Malaria".to_string()]),
                ("ODISHA".to_string(), vec!["Cholera".to_string()]),
            ])
        };

        let first = build();
        assert_eq!(first.diseases_for("odisha"), ["Cholera"]);
        for _ in 0..50 {
            assert_eq!(build().diseases_for("odisha"), first.diseases_for("odisha"));
        }
        // Exact keys still win over the normalised fallback.
        assert_eq!(first.diseases_for("ODISHA"), ["Cholera"]);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn colliding_region_keys_load_deterministically_from_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("state_diseases.json"),
            r#"{"odisha ": ["Malaria"], "ODISHA": ["Cholera"]}"#,
        )
        .unwrap();

        let data = ReferenceData::load(&config(&temp));
        assert_eq!(data.regions.diseases_for("Odisha"), ["Cholera"]);
    }
}
