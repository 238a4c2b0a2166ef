//! Blending of catalog probabilities with deterministic noise.
//!
//! Every causal-context record is produced here. The numeric rule is shared by all streams:
//!
//! ```text
//! final = W * base + (1 - W) * rand    when the catalog has base > 0
//! final = rand                         otherwise
//! ```
//!
//! `W` depends on the stream: 0.5 for regional (state) context and 0.6 for patient history,
//! whether auto-generated or taken from an uploaded report.

use crate::catalog::RelationCatalog;
use crate::name::DiseaseName;
use crate::random;

/// Catalog weight for the regional stream.
pub const STATE_CATALOG_WEIGHT: f64 = 0.5;

/// Catalog weight for both patient-history streams.
pub const HISTORY_CATALOG_WEIGHT: f64 = 0.6;

/// Which input stream a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextSource {
    State,
    AutoHistory,
    ReportHistory,
}

impl ContextSource {
    pub fn catalog_weight(self) -> f64 {
        match self {
            ContextSource::State => STATE_CATALOG_WEIGHT,
            ContextSource::AutoHistory | ContextSource::ReportHistory => HISTORY_CATALOG_WEIGHT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContextSource::State => "state",
            ContextSource::AutoHistory => "auto-history",
            ContextSource::ReportHistory => "report-history",
        }
    }
}

impl std::fmt::Display for ContextSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthesized relation between the present disease and a contextual disease.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CausalContextRecord {
    pub disease: DiseaseName,
    pub probability: f64,
    pub narrative: String,
    pub source: ContextSource,
}

/// Mixes a catalog base probability with a random component.
///
/// A base of zero (no catalog entry, or a catalogued zero) returns `rand` unchanged.
pub fn blend_probability(base: f64, rand: f64, catalog_weight: f64) -> f64 {
    if base > 0.0 {
        (catalog_weight * base + (1.0 - catalog_weight) * rand).clamp(0.0, 1.0)
    } else {
        rand
    }
}

/// Produces [`CausalContextRecord`]s against a borrowed catalog.
#[derive(Debug, Clone, Copy)]
pub struct CausalBlender<'a> {
    catalog: &'a RelationCatalog,
}

impl<'a> CausalBlender<'a> {
    pub fn new(catalog: &'a RelationCatalog) -> Self {
        Self { catalog }
    }

    /// Blends one (present, previous) pair.
    ///
    /// `fallback_narrative` is only called when the catalog has no narrative for the pair.
    pub fn blend<F>(
        &self,
        present: &DiseaseName,
        previous: &DiseaseName,
        random_key: &str,
        source: ContextSource,
        fallback_narrative: F,
    ) -> CausalContextRecord
    where
        F: FnOnce() -> String,
    {
        let entry = self.catalog.lookup(present, previous);
        let base = entry.map_or(0.0, |e| e.base_probability);
        let rand = random::derive(random_key);

        let narrative = entry
            .and_then(|e| e.narrative.clone())
            .unwrap_or_else(fallback_narrative);

        CausalContextRecord {
            disease: previous.clone(),
            probability: blend_probability(base, rand, source.catalog_weight()),
            narrative,
            source,
        }
    }
}
