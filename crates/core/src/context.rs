//! Causal-context construction for a patient.
//!
//! Three independent streams feed the bell-curve panel:
//!
//! | stream         | input                    | cap | weight | random key                                          |
//! |----------------|--------------------------|-----|--------|-----------------------------------------------------|
//! | state          | region disease list      | 5   | 0.5    | `state:{pid}:{region}:{disease}:{present}`          |
//! | auto-history   | generated history        | -   | 0.6    | `hist:{pid}:{present}:{disease}:{date}`             |
//! | report-history | document-derived history | -   | 0.6    | `hist:{pid}:{present}:{disease}:report-{date}`      |
//!
//! Disease names in keys are normalised; `pid`, `region` and `date` are used as given. The key
//! formats are part of the output contract: altering a separator changes every probability.
//!
//! Records keep input order and are never deduplicated, within or across streams.

use crate::blend::{CausalBlender, CausalContextRecord, ContextSource};
use crate::catalog::RelationCatalog;
use crate::name::DiseaseName;

/// Maximum number of regional diseases shown per patient.
pub const STATE_PANEL_LIMIT: usize = 5;

/// A previous disease with the date it was (nominally) diagnosed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    pub disease: String,
    #[serde(default)]
    pub diagnosed_on: Option<String>,
}

impl HistoryEntry {
    pub fn new(disease: impl Into<String>, diagnosed_on: impl Into<String>) -> Self {
        Self {
            disease: disease.into(),
            diagnosed_on: Some(diagnosed_on.into()),
        }
    }

    pub fn undated(disease: impl Into<String>) -> Self {
        Self {
            disease: disease.into(),
            diagnosed_on: None,
        }
    }

    fn date_or_empty(&self) -> &str {
        self.diagnosed_on.as_deref().unwrap_or("")
    }
}

/// Everything needed to build one patient's causal context.
#[derive(Debug, Clone, Copy)]
pub struct ContextRequest<'a> {
    pub patient_id: &'a str,
    pub present_disease: &'a str,
    pub region: &'a str,
    pub region_diseases: &'a [String],
    pub auto_history: &'a [HistoryEntry],
    pub report_history: &'a [HistoryEntry],
}

/// Per-stream causal-context records.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct CausalContext {
    pub state_context: Vec<CausalContextRecord>,
    pub auto_context: Vec<CausalContextRecord>,
    pub report_context: Vec<CausalContextRecord>,
}

impl CausalContext {
    /// All records, state first, then auto-history, then report-history.
    pub fn records(&self) -> impl Iterator<Item = &CausalContextRecord> {
        self.state_context
            .iter()
            .chain(&self.auto_context)
            .chain(&self.report_context)
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.records().map(|r| r.probability).collect()
    }

    pub fn len(&self) -> usize {
        self.state_context.len() + self.auto_context.len() + self.report_context.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn state_key(
    patient_id: &str,
    region: &str,
    disease: &DiseaseName,
    present: &DiseaseName,
) -> String {
    format!("state:{patient_id}:{region}:{disease}:{present}")
}

pub fn history_key(
    patient_id: &str,
    present: &DiseaseName,
    disease: &DiseaseName,
    diagnosed_on: &str,
) -> String {
    format!("hist:{patient_id}:{present}:{disease}:{diagnosed_on}")
}

pub fn report_history_key(
    patient_id: &str,
    present: &DiseaseName,
    disease: &DiseaseName,
    diagnosed_on: &str,
) -> String {
    history_key(patient_id, present, disease, &format!("report-{diagnosed_on}"))
}

/// Runs the blender over every stream of a [`ContextRequest`].
#[derive(Debug, Clone, Copy)]
pub struct ContextBuilder<'a> {
    blender: CausalBlender<'a>,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(catalog: &'a RelationCatalog) -> Self {
        Self {
            blender: CausalBlender::new(catalog),
        }
    }

    pub fn build(&self, request: &ContextRequest<'_>) -> CausalContext {
        let present = DiseaseName::new(request.present_disease);

        CausalContext {
            state_context: self.state_stream(request, &present),
            auto_context: self.history_stream(
                request.patient_id,
                &present,
                request.auto_history,
                ContextSource::AutoHistory,
            ),
            report_context: self.history_stream(
                request.patient_id,
                &present,
                request.report_history,
                ContextSource::ReportHistory,
            ),
        }
    }

    fn state_stream(
        &self,
        request: &ContextRequest<'_>,
        present: &DiseaseName,
    ) -> Vec<CausalContextRecord> {
        let region = request.region;

        request
            .region_diseases
            .iter()
            .take(STATE_PANEL_LIMIT)
            .map(|raw| {
                let disease = DiseaseName::new(raw);
                let key = state_key(request.patient_id, region, &disease, present);
                self.blender
                    .blend(present, &disease, &key, ContextSource::State, || {
                        format!(
                            "In {region}, historical patterns suggest that {disease} can \
                             contribute to the risk of {present} in certain clinical scenarios \
                             (mock model)."
                        )
                    })
            })
            .collect()
    }

    fn history_stream(
        &self,
        patient_id: &str,
        present: &DiseaseName,
        history: &[HistoryEntry],
        source: ContextSource,
    ) -> Vec<CausalContextRecord> {
        history
            .iter()
            .map(|entry| {
                let disease = DiseaseName::new(&entry.disease);
                let date = entry.date_or_empty();
                let key = match source {
                    ContextSource::ReportHistory => {
                        report_history_key(patient_id, present, &disease, date)
                    }
                    _ => history_key(patient_id, present, &disease, date),
                };
                self.blender.blend(present, &disease, &key, source, || {
                    history_narrative(&disease, present, date, source)
                })
            })
            .collect()
    }
}

fn history_narrative(
    disease: &DiseaseName,
    present: &DiseaseName,
    date: &str,
    source: ContextSource,
) -> String {
    let origin = match source {
        ContextSource::ReportHistory => "an uploaded medical report",
        _ => "the patient's history",
    };
    let when = if date.is_empty() {
        String::new()
    } else {
        format!(" (recorded {date})")
    };
    format!(
        "{disease}{when}, noted in {origin}, may have influenced the current presentation of \
         {present} (mock model)."
    )
}
