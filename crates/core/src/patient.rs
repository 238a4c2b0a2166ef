//! Patient service and related types.
//!
//! This module ties the repositories and the synthesis engine together: it loads a patient,
//! gathers the three history streams and the regional disease list, runs the context builder and
//! attaches vitals.

use crate::catalog::RelationEntry;
use crate::config::CoreConfig;
use crate::constants::UNKNOWN_REGION;
use crate::context::{CausalContext, ContextBuilder, ContextRequest, HistoryEntry};
use crate::error::{NhlError, NhlResult};
use crate::history::generate_mock_history;
use crate::name::DiseaseName;
use crate::reference::ReferenceData;
use crate::repositories::patients::{previous_diseases, PatientRepository};
use crate::repositories::reports::{extract_report_history, ReportHistoryRepository};
use crate::vitals::{generate_mock_vitals, map_to_scores, VitalsSnapshot};
use api_shared::{CreatePatientReq, Patient};
use std::sync::Arc;

/// Narrative used for explicit-history pairs the catalog does not know.
pub const NO_RELATION_NARRATIVE: &str = "No data available for this pair in mock dataset.";

/// Narrative returned by the relation endpoint when no entry exists.
pub const NO_RELATION_FOUND: &str = "No predefined relation found.";

/// Catalog relation between the present disease and one explicit previous disease.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RelationSummary {
    pub present_disease: DiseaseName,
    pub previous_disease: DiseaseName,
    pub probability: Option<f64>,
    pub report: String,
}

impl RelationSummary {
    fn from_entry(
        present: DiseaseName,
        previous: DiseaseName,
        entry: Option<&RelationEntry>,
    ) -> Self {
        match entry {
            Some(entry) => Self {
                present_disease: present,
                previous_disease: previous,
                probability: Some(entry.base_probability),
                report: entry
                    .narrative
                    .clone()
                    .unwrap_or_else(|| "No data available.".to_string()),
            },
            None => Self {
                present_disease: present,
                previous_disease: previous,
                probability: None,
                report: NO_RELATION_FOUND.to_string(),
            },
        }
    }
}

/// Everything the report view needs for one patient.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientReport {
    pub patient: Patient,
    pub region: String,
    /// Explicit previous diseases with their catalog relation (probability 0 when unknown).
    pub relation_data: Vec<RelationSummary>,
    pub auto_history: Vec<HistoryEntry>,
    pub report_history: Vec<HistoryEntry>,
    pub context: CausalContext,
    pub vitals: VitalsSnapshot,
    pub vital_scores: Vec<f64>,
}

impl PatientReport {
    /// Values for the bell-curve chart: every context probability, then the vital scores.
    pub fn chart_values(&self) -> Vec<f64> {
        let mut values = self.context.probabilities();
        values.extend_from_slice(&self.vital_scores);
        values
    }
}

/// Pure patient data operations - no API concerns
#[derive(Clone)]
pub struct PatientService {
    cfg: Arc<CoreConfig>,
    reference: Arc<ReferenceData>,
    patients: Arc<PatientRepository>,
    reports: Arc<ReportHistoryRepository>,
}

impl PatientService {
    /// Creates a new instance of PatientService.
    ///
    /// # Arguments
    ///
    /// * `cfg` - Startup configuration; determines where the JSON stores live.
    /// * `reference` - Reference data loaded once at startup and shared read-only.
    pub fn new(cfg: Arc<CoreConfig>, reference: Arc<ReferenceData>) -> Self {
        let patients = Arc::new(PatientRepository::new(cfg.patients_path()));
        let reports = Arc::new(ReportHistoryRepository::new(cfg.patient_history_path()));
        Self {
            cfg,
            reference,
            patients,
            reports,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Lists all patients.
    ///
    /// # Errors
    ///
    /// Returns an error if the patient store cannot be read or parsed.
    pub fn list_patients(&self) -> NhlResult<Vec<Patient>> {
        self.patients.list()
    }

    /// Looks up a single patient.
    ///
    /// # Errors
    ///
    /// Returns an error if the patient store cannot be read or parsed.
    pub fn get_patient(&self, patient_id: &str) -> NhlResult<Option<Patient>> {
        self.patients.get(patient_id)
    }

    /// Registers a new patient.
    ///
    /// # Errors
    ///
    /// Returns `NhlError::InvalidInput` for blank required fields, or a storage error.
    pub fn register_patient(&self, req: CreatePatientReq) -> NhlResult<Patient> {
        self.patients.register(req)
    }

    /// Catalog relation between two diseases, by normalised name.
    pub fn relation(&self, present: &str, previous: &str) -> RelationSummary {
        let present = DiseaseName::new(present);
        let previous = DiseaseName::new(previous);
        let entry = self.reference.catalog.lookup(&present, &previous);
        RelationSummary::from_entry(present, previous, entry)
    }

    /// Builds the full causal-context report for a patient.
    ///
    /// # Errors
    ///
    /// Returns `NhlError::PatientNotFound` for unknown ids, or a storage error if the patient
    /// store cannot be read.
    pub fn patient_report(&self, patient_id: &str) -> NhlResult<PatientReport> {
        let patient = self
            .patients
            .get(patient_id)?
            .ok_or_else(|| NhlError::PatientNotFound(patient_id.trim().to_string()))?;
        Ok(self.build_report(patient))
    }

    /// Builds a report for an already loaded patient row.
    pub fn build_report(&self, patient: Patient) -> PatientReport {
        let reference = &*self.reference;
        let pid = patient.patient_id.trim().to_string();
        let present = DiseaseName::new(&patient.present_disease);

        let mut seen: Vec<DiseaseName> = Vec::new();
        let relation_data = previous_diseases(&patient)
            .into_iter()
            .map(DiseaseName::new)
            .filter(|previous| {
                if previous.is_empty() || seen.contains(previous) {
                    false
                } else {
                    seen.push(previous.clone());
                    true
                }
            })
            .map(|previous| {
                match reference.catalog.lookup(&present, &previous) {
                    Some(entry) => {
                        RelationSummary::from_entry(present.clone(), previous, Some(entry))
                    }
                    None => RelationSummary {
                        present_disease: present.clone(),
                        previous_disease: previous,
                        probability: Some(0.0),
                        report: NO_RELATION_NARRATIVE.to_string(),
                    },
                }
            })
            .collect();

        let state = patient.state.trim();
        let region = if state.is_empty() {
            UNKNOWN_REGION.to_string()
        } else {
            state.to_string()
        };
        let region_diseases = reference.regions.diseases_for(state);

        let auto_history = generate_mock_history(
            &pid,
            &patient.last_visit,
            &reference.history_pool,
            self.cfg.history(),
        );
        let report_history = self.reports.history_for(&pid);

        let context = ContextBuilder::new(&reference.catalog).build(&ContextRequest {
            patient_id: &pid,
            present_disease: &patient.present_disease,
            region: &region,
            region_diseases,
            auto_history: &auto_history,
            report_history: &report_history,
        });

        let vitals = generate_mock_vitals(&pid);
        let vital_scores = map_to_scores(&vitals);

        tracing::debug!(
            patient_id = %pid,
            records = context.len(),
            "built causal context"
        );

        PatientReport {
            patient,
            region,
            relation_data,
            auto_history,
            report_history,
            context,
            vitals,
            vital_scores,
        }
    }

    /// Scans uploaded report text for known diseases and stores them as report history.
    ///
    /// Returns the entries that were added (possibly none).
    ///
    /// # Errors
    ///
    /// Returns `NhlError::PatientNotFound` for unknown ids, or a storage error.
    pub fn add_report(
        &self,
        patient_id: &str,
        text: &str,
        reported_on: Option<&str>,
    ) -> NhlResult<Vec<HistoryEntry>> {
        let patient = self
            .patients
            .get(patient_id)?
            .ok_or_else(|| NhlError::PatientNotFound(patient_id.trim().to_string()))?;

        let known = self.reference.known_diseases();
        let entries = extract_report_history(text, &known, reported_on);
        self.reports.append(&patient.patient_id, &entries)?;

        tracing::info!(
            patient_id = %patient.patient_id,
            added = entries.len(),
            "stored report history"
        );
        Ok(entries)
    }
}
