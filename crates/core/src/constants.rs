//! Constants used throughout the NHL core crate.
//!
//! File names, application metadata and mock-generation parameters live here so the loaders,
//! repositories and services agree on them.

/// Default directory for reference data and JSON stores when none is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Patient rows (JSON array).
pub const PATIENTS_FILENAME: &str = "patients.json";

/// Disease descriptions (JSON array).
pub const DISEASES_FILENAME: &str = "diseases.json";

/// Relation catalog (present → previous → relation).
pub const RELATIONS_FILENAME: &str = "relations.json";

/// Region → ordered list of prevalent diseases.
pub const STATE_DISEASES_FILENAME: &str = "state_diseases.json";

/// Pool of disease names used for auto-generated history.
pub const MOCK_HISTORY_DISEASES_FILENAME: &str = "mock_history_diseases.json";

/// Document-derived history per patient.
pub const PATIENT_HISTORY_FILENAME: &str = "patient_history.json";

pub const APP_NAME: &str = "Neural Health Link";
pub const APP_VERSION: &str = "1.1";
pub const APP_AUTHOR: &str = "Doctigo";
pub const DEFAULT_COUNTRY: &str = "India";

/// Region used in keys and narratives when a patient has no state recorded.
pub const UNKNOWN_REGION: &str = "Unknown";

/// Last-visit date assumed for newly registered patients and unparseable rows.
pub const DEFAULT_LAST_VISIT: &str = "2025-01-01";

/// Number of auto-generated history entries per patient.
pub const RANDOM_HISTORY_COUNT: usize = 5;

/// Auto-generated diagnoses are at least this many days before the last visit.
pub const RANDOM_HISTORY_MIN_DAYS: i64 = 30;

/// ...and at most this many (roughly three years).
pub const RANDOM_HISTORY_MAX_DAYS: i64 = 1200;
