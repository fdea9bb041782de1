//! # Document Reader/Writer
//!
//! Raw byte-level access to project documents. Reading yields an untyped
//! `serde_json::Value` for the migrator; writing serializes a validated
//! [`Project`] pretty-printed with a trailing newline (documents are
//! diffed by tooling) and replaces the target atomically.
//!
//! ## Atomic Replace
//!
//! Writes go to a `.tmp` sibling first, then `fs::rename` over the target.
//! A reader racing a writer sees either the old document or the new one,
//! never a partial write.

use std::path::Path;

use renovo_core::RepoError;
use renovo_model::Project;
use serde_json::Value;

/// Read and parse a project document.
///
/// # Errors
///
/// `Io` if the file cannot be read, `Parse` if it is not valid JSON.
pub fn read_raw(path: &Path) -> Result<Value, RepoError> {
    let bytes = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&bytes)?;
    Ok(value)
}

/// Serialize a project pretty-printed with a trailing newline and replace
/// the document at `path` atomically.
pub fn write_project(path: &Path, project: &Project) -> Result<(), RepoError> {
    let mut body = serde_json::to_string_pretty(project)?;
    body.push('\n');

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, body.as_bytes())?;
    std::fs::rename(&tmp, path)?;

    tracing::debug!(path = %path.display(), bytes = body.len(), "persisted project document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_project() -> Project {
        serde_json::from_value(json!({
            "id": "p-1",
            "name": "Maple St 12",
            "materialCategories": [
                {"id": "uncategorized", "name": "Uncategorized", "sortOrder": 0}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p-1.json");
        let project = sample_project();
        write_project(&path, &project).unwrap();

        let raw = read_raw(&path).unwrap();
        let reloaded: Project = serde_json::from_value(raw).unwrap();
        assert_eq!(reloaded, project);
    }

    #[test]
    fn test_output_is_pretty_with_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p-1.json");
        write_project(&path, &sample_project()).unwrap();

        let bytes = std::fs::read_to_string(&path).unwrap();
        assert!(bytes.ends_with("}\n"));
        assert!(bytes.contains("\n  \"name\""));
    }

    #[test]
    fn test_no_tmp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p-1.json");
        write_project(&path, &sample_project()).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_read_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_raw(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, RepoError::Io(_)));
    }

    #[test]
    fn test_read_garbage_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{oops").unwrap();
        let err = read_raw(&path).unwrap_err();
        assert!(matches!(err, RepoError::Parse(_)));
    }
}
