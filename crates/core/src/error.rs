#[derive(Debug, thiserror::Error)]
pub enum NhlError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("patient not found: {0}")]
    PatientNotFound(String),
    #[error("failed to read data file {path}: {source}", path = path.display())]
    FileRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write data file {path}: {source}", path = path.display())]
    FileWrite {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize data: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize data: {0}")]
    Deserialization(serde_json::Error),
    #[error("data store lock poisoned")]
    LockPoisoned,
}

pub type NhlResult<T> = std::result::Result<T, NhlError>;
