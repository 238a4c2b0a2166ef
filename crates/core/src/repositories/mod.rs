//! Repository management modules.
//!
//! JSON-backed stores for data that changes at runtime: registered patients and
//! document-derived history. Reference data that never changes lives in [`crate::reference`].

pub mod patients;
pub mod reports;
pub(crate) mod shared;
