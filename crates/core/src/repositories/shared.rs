//! Shared repository utilities.
//!
//! Both JSON stores are small whole-file documents: reads parse the entire file, writes replace
//! it. Writes go to a sibling temporary file first and are then renamed into place so a crash
//! mid-write never leaves a truncated store behind.

use crate::error::{NhlError, NhlResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Reads a JSON store. A missing file is treated as an empty store.
///
/// # Errors
///
/// Returns `NhlError::FileRead` for I/O failures other than "not found" and
/// `NhlError::Deserialization` when the file content is not valid for `T`.
pub(crate) fn read_store<T>(path: &Path) -> NhlResult<T>
where
    T: DeserializeOwned + Default,
{
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(source) => {
            return Err(NhlError::FileRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if text.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(&text).map_err(NhlError::Deserialization)
}

/// Replaces a JSON store with `value`, pretty-printed.
///
/// # Errors
///
/// Returns `NhlError::Serialization` if `value` cannot be encoded and `NhlError::FileWrite` if
/// the temporary file cannot be written or renamed into place.
pub(crate) fn write_store<T>(path: &Path, value: &T) -> NhlResult<()>
where
    T: Serialize,
{
    let mut json = serde_json::to_string_pretty(value).map_err(NhlError::Serialization)?;
    json.push('\n');

    let tmp = path.with_extension("json.tmp");
    let write_err = |source| NhlError::FileWrite {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp, json).map_err(write_err)?;
    fs::rename(&tmp, path).map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_or_blank_store_reads_as_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store.json");

        let empty: Vec<String> = read_store(&path).unwrap();
        assert!(empty.is_empty());

        fs::write(&path, "  \n").unwrap();
        let blank: Vec<String> = read_store(&path).unwrap();
        assert!(blank.is_empty());
    }

    #[test]
    fn write_then_read() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store.json");

        write_store(&path, &vec!["a".to_string(), "b".to_string()]).unwrap();
        let back: Vec<String> = read_store(&path).unwrap();

        assert_eq!(back, vec!["a", "b"]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn malformed_store_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store.json");
        fs::write(&path, "{oops").unwrap();

        let result: NhlResult<Vec<String>> = read_store(&path);
        assert!(matches!(result, Err(NhlError::Deserialization(_))));
    }
}
