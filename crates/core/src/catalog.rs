//! Static relation catalog.
//!
//! Maps a present disease to the previous diseases known to relate to it, each with a base
//! probability and an optional narrative. The catalog is built once from reference data and is
//! read-only afterwards, so it can be shared across threads without locking.
//!
//! Reference data shape:
//!
//! ```json
//! { "Dengue": { "Malaria": { "probability": 0.42, "report": "..." } } }
//! ```
//!
//! Parsing is lenient below the top level: keys are normalised, probabilities may be numbers or
//! numeric strings (anything else counts as `0.0`) and are clamped into `[0, 1]`, and a missing or
//! empty `report` leaves the entry without a narrative. Entries that are not objects are skipped.

use crate::error::{NhlError, NhlResult};
use crate::name::DiseaseName;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// A catalogued relation between a present and a previous disease.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RelationEntry {
    pub base_probability: f64,
    pub narrative: Option<String>,
}

impl RelationEntry {
    pub fn new(base_probability: f64, narrative: Option<String>) -> Self {
        Self {
            base_probability: clamp_unit(base_probability),
            narrative: narrative.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// Two-level lookup table: present disease → previous disease → [`RelationEntry`].
#[derive(Debug, Clone, Default)]
pub struct RelationCatalog {
    relations: HashMap<DiseaseName, HashMap<DiseaseName, RelationEntry>>,
}

impl RelationCatalog {
    /// Creates an empty catalog. Every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a catalog from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or its top level is not an object.
    /// Callers loading reference data are expected to fall back to [`RelationCatalog::empty`].
    pub fn from_json_str(json: &str) -> NhlResult<Self> {
        let value: Value = serde_json::from_str(json).map_err(NhlError::Deserialization)?;
        Self::from_value(&value)
    }

    /// Builds a catalog from an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns `NhlError::InvalidInput` if `value` is not a JSON object.
    pub fn from_value(value: &Value) -> NhlResult<Self> {
        let top = value.as_object().ok_or_else(|| {
            NhlError::InvalidInput("relation catalog must be a JSON object".into())
        })?;

        let mut relations: HashMap<DiseaseName, HashMap<DiseaseName, RelationEntry>> =
            HashMap::new();

        for (present, previous_map) in top {
            let Some(previous_map) = previous_map.as_object() else {
                tracing::warn!("skipping relation catalog entry for {present:?}: not an object");
                continue;
            };

            let inner = relations.entry(DiseaseName::new(present)).or_default();
            for (previous, info) in previous_map {
                let Some(info) = info.as_object() else {
                    continue;
                };
                let probability = info.get("probability").map_or(0.0, safe_float);
                let narrative = info
                    .get("report")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                inner.insert(
                    DiseaseName::new(previous),
                    RelationEntry::new(probability, narrative),
                );
            }
        }

        Ok(Self { relations })
    }

    /// Looks up the relation for a (present, previous) pair.
    ///
    /// `None` is the expected result for uncatalogued pairs.
    pub fn lookup(&self, present: &DiseaseName, previous: &DiseaseName) -> Option<&RelationEntry> {
        self.relations.get(present)?.get(previous)
    }

    /// Returns every catalogued relation for `present`, ordered by previous disease name.
    ///
    /// Unknown diseases yield an empty map.
    pub fn get_all(&self, present: &DiseaseName) -> BTreeMap<DiseaseName, RelationEntry> {
        self.relations
            .get(present)
            .map(|inner| {
                inner
                    .iter()
                    .map(|(name, entry)| (name.clone(), entry.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn contains(&self, present: &DiseaseName, previous: &DiseaseName) -> bool {
        self.lookup(present, previous).is_some()
    }

    /// Number of catalogued (present, previous) pairs.
    pub fn len(&self) -> usize {
        self.relations.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<(DiseaseName, DiseaseName, RelationEntry)> for RelationCatalog {
    fn from_iter<I: IntoIterator<Item = (DiseaseName, DiseaseName, RelationEntry)>>(
        iter: I,
    ) -> Self {
        let mut relations: HashMap<DiseaseName, HashMap<DiseaseName, RelationEntry>> =
            HashMap::new();
        for (present, previous, entry) in iter {
            relations.entry(present).or_default().insert(previous, entry);
        }
        Self { relations }
    }
}

fn safe_float(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
