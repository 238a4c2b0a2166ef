//! # API Shared
//!
//! Shared wire types for the NHL APIs.
//!
//! Contains:
//! - Request/response bodies (`serde` + `utoipa::ToSchema`) used by `api-rest`
//! - The stored patient and disease rows, which are also the JSON store formats
//! - Shared services like `HealthService`
//!
//! Used by `nhl-core` for its store formats and by `api-rest` and `nhl-cli` for output.

pub mod health;

pub use health::HealthService;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A patient row as stored in `patients.json` and returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Patient {
    pub patient_id: String,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub city: String,
    pub state: String,
    pub last_visit: String,
    pub present_disease: String,
    /// Explicit history, `|`-separated.
    pub previous_diseases: String,
}

/// A disease description from `diseases.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Disease {
    pub disease_name: String,
    pub category: String,
    pub common_symptoms: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MetaRes {
    pub app: String,
    pub version: String,
    pub author: String,
    pub country: String,
    pub data_source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListPatientsRes {
    pub patients: Vec<Patient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    pub patient: Patient,
}

/// Registration form. `last_visit` defaults to 2025-01-01 when omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreatePatientReq {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub city: String,
    pub state: String,
    pub present_disease: String,
    pub last_visit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientRes {
    pub patient: Patient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListDiseasesRes {
    pub diseases: Vec<Disease>,
}

/// Catalog relation between two diseases. `probability` is null when no relation exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RelationRes {
    pub present_disease: String,
    pub previous_disease: String,
    pub probability: Option<f64>,
    pub report: String,
}

/// One synthesized causal-context record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContextRecord {
    pub disease: String,
    pub probability: f64,
    pub narrative: String,
    /// `state`, `auto-history` or `report-history`.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryItem {
    pub disease: String,
    pub diagnosed_on: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VitalSignsRes {
    pub heart_rate: Option<f64>,
    pub bp_systolic: Option<f64>,
    pub bp_diastolic: Option<f64>,
    pub spo2: Option<f64>,
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VitalsRes {
    pub current: VitalSignsRes,
    pub predicted: VitalSignsRes,
}

/// Full causal-context report for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientReportRes {
    pub patient: Patient,
    pub region: String,
    pub relation_data: Vec<RelationRes>,
    pub auto_history: Vec<HistoryItem>,
    pub report_history: Vec<HistoryItem>,
    pub state_context: Vec<ContextRecord>,
    pub auto_context: Vec<ContextRecord>,
    pub report_context: Vec<ContextRecord>,
    pub vitals: VitalsRes,
    pub vital_scores: Vec<f64>,
    /// Context probabilities (state, auto, report) followed by vital scores.
    pub chart_values: Vec<f64>,
}

/// Text already extracted from an uploaded medical report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AddReportReq {
    pub text: String,
    pub reported_on: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AddReportRes {
    pub added: Vec<HistoryItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_rows_tolerate_missing_columns() {
        let patient: Patient =
            serde_json::from_str(r#"{"patient_id": "7", "name": "Asha"}"#).unwrap();
        assert_eq!(patient.patient_id, "7");
        assert!(patient.previous_diseases.is_empty());
    }

    #[test]
    fn create_patient_req_last_visit_is_optional() {
        let req: CreatePatientReq =
            serde_json::from_str(r#"{"name": "Asha", "present_disease": "Dengue"}"#).unwrap();
        assert_eq!(req.last_visit, None);
        assert!(req.city.is_empty());
    }
}
