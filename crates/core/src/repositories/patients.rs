//! Patient rows.
//!
//! Patients are stored as a single JSON array in `patients.json`. Identifiers are decimal
//! integers assigned on registration; they increase monotonically and are never reused.
//!
//! `previous_diseases` holds the explicit history as a `|`-separated list, e.g.
//! `"Malaria|Typhoid"`.

use crate::constants::DEFAULT_LAST_VISIT;
use crate::error::{NhlError, NhlResult};
use crate::repositories::shared::{read_store, write_store};
use api_shared::{CreatePatientReq, Patient};
use std::path::PathBuf;
use std::sync::Mutex;

/// Separator used in the `previous_diseases` column.
pub const PREVIOUS_DISEASES_SEPARATOR: char = '|';

/// Read/append access to the patient store.
#[derive(Debug)]
pub struct PatientRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl PatientRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Lists every stored patient in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read or parsed.
    pub fn list(&self) -> NhlResult<Vec<Patient>> {
        read_store(&self.path)
    }

    /// Finds a patient by id. Ids are compared after trimming.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read or parsed.
    pub fn get(&self, patient_id: &str) -> NhlResult<Option<Patient>> {
        let wanted = patient_id.trim();
        Ok(self
            .list()?
            .into_iter()
            .find(|p| p.patient_id.trim() == wanted))
    }

    /// Registers a new patient under the next free id.
    ///
    /// `last_visit` defaults to 2025-01-01 and the explicit history starts empty.
    ///
    /// # Errors
    ///
    /// Returns `NhlError::InvalidInput` if the name or present disease is blank, and a storage
    /// error if the store cannot be read or written.
    pub fn register(&self, req: CreatePatientReq) -> NhlResult<Patient> {
        if req.name.trim().is_empty() {
            return Err(NhlError::InvalidInput("name is required".into()));
        }
        if req.present_disease.trim().is_empty() {
            return Err(NhlError::InvalidInput("present_disease is required".into()));
        }

        let _guard = self.write_lock.lock().map_err(|_| NhlError::LockPoisoned)?;

        let mut patients = self.list()?;
        let last_visit = req
            .last_visit
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LAST_VISIT.to_string());

        let patient = Patient {
            patient_id: next_patient_id(&patients).to_string(),
            name: req.name.trim().to_string(),
            age: req.age.trim().to_string(),
            gender: req.gender.trim().to_string(),
            city: req.city.trim().to_string(),
            state: req.state.trim().to_string(),
            last_visit,
            present_disease: req.present_disease.trim().to_string(),
            previous_diseases: String::new(),
        };

        patients.push(patient.clone());
        write_store(&self.path, &patients)?;

        tracing::info!(patient_id = %patient.patient_id, "registered patient");
        Ok(patient)
    }
}

/// Next integer id: one more than the largest numeric id, or 1 for an empty store.
///
/// Non-numeric ids are ignored.
pub fn next_patient_id(patients: &[Patient]) -> u64 {
    patients
        .iter()
        .filter_map(|p| p.patient_id.trim().parse::<u64>().ok())
        .max()
        .map_or(1, |max| max + 1)
}

/// Splits the explicit history column into trimmed, non-empty names.
pub fn previous_diseases(patient: &Patient) -> Vec<String> {
    patient
        .previous_diseases
        .split(PREVIOUS_DISEASES_SEPARATOR)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn patient(id: &str) -> Patient {
        Patient {
            patient_id: id.into(),
            name: format!("Patient {id}"),
            ..Patient::default()
        }
    }

    fn request(name: &str, present: &str) -> CreatePatientReq {
        CreatePatientReq {
            name: name.into(),
            age: "34".into(),
            gender: "F".into(),
            city: "Puri".into(),
            state: "Odisha".into(),
            present_disease: present.into(),
            last_visit: None,
        }
    }

    #[test]
    fn next_id_skips_non_numeric_ids() {
        assert_eq!(next_patient_id(&[]), 1);
        assert_eq!(
            next_patient_id(&[patient("3"), patient("x9"), patient(" 12 "), patient("7")]),
            13
        );
        assert_eq!(next_patient_id(&[patient("abc")]), 1);
    }

    #[test]
    fn register_assigns_ids_and_defaults() {
        let temp = TempDir::new().unwrap();
        let repo = PatientRepository::new(temp.path().join("patients.json"));

        let first = repo.register(request(" Asha ", "dengue")).unwrap();
        let second = repo.register(request("Ravi", "Malaria")).unwrap();

        assert_eq!(first.patient_id, "1");
        assert_eq!(first.name, "Asha");
        assert_eq!(first.last_visit, "2025-01-01");
        assert!(first.previous_diseases.is_empty());
        assert_eq!(second.patient_id, "2");

        let listed = repo.list().unwrap();
        assert_eq!(listed, vec![first.clone(), second]);
        assert_eq!(repo.get(" 1 ").unwrap(), Some(first));
        assert_eq!(repo.get("99").unwrap(), None);
    }

    #[test]
    fn register_keeps_explicit_last_visit() {
        let temp = TempDir::new().unwrap();
        let repo = PatientRepository::new(temp.path().join("patients.json"));
        let mut req = request("Asha", "Dengue");
        req.last_visit = Some("2024-11-05".into());

        assert_eq!(repo.register(req).unwrap().last_visit, "2024-11-05");
    }

    #[test]
    fn register_rejects_blank_required_fields() {
        let temp = TempDir::new().unwrap();
        let repo = PatientRepository::new(temp.path().join("patients.json"));

        assert!(matches!(
            repo.register(request("  ", "Dengue")),
            Err(NhlError::InvalidInput(_))
        ));
        assert!(matches!(
            repo.register(request("Asha", "")),
            Err(NhlError::InvalidInput(_))
        ));
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn splits_previous_diseases() {
        let mut p = patient("1");
        p.previous_diseases = " Malaria | |typhoid|".into();
        assert_eq!(previous_diseases(&p), vec!["Malaria", "typhoid"]);

        p.previous_diseases = String::new();
        assert!(previous_diseases(&p).is_empty());
    }
}
