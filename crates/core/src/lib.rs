//! # NHL Core
//!
//! Core business logic for Neural Health Link, a demonstration patient dashboard that renders
//! mock disease relations as a bell curve.
//!
//! The centre of the crate is the causal-context synthesis engine:
//! - [`name`]: canonical disease names used for every lookup
//! - [`random`]: stable pseudo-random values from SHA-256 of a string key
//! - [`catalog`]: read-only present → previous disease relations
//! - [`blend`]: mixing catalog probabilities with the random component
//! - [`context`]: building the state, auto-history and report-history streams
//! - [`vitals`]: deterministic mock vitals and their risk scores
//!
//! None of the engine modules can fail. Around them sit the data-facing pieces:
//! configuration, reference-data loading, the JSON stores and [`PatientService`].
//!
//! **No API concerns**: HTTP servers and CLI parsing belong in `api-rest` and `nhl-cli`.

pub mod blend;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod history;
pub mod name;
pub mod patient;
pub mod random;
pub mod reference;
pub mod repositories;
pub mod vitals;
pub mod wire;

pub use blend::{CausalBlender, CausalContextRecord, ContextSource};
pub use catalog::{RelationCatalog, RelationEntry};
pub use config::{AppMetadata, CoreConfig, HistoryParams};
pub use constants::DEFAULT_DATA_DIR;
pub use context::{CausalContext, ContextBuilder, ContextRequest, HistoryEntry};
pub use error::{NhlError, NhlResult};
pub use name::DiseaseName;
pub use patient::{PatientReport, PatientService, RelationSummary};
pub use reference::{ReferenceData, RegionDiseases};
pub use vitals::{VitalSigns, VitalsSnapshot};
