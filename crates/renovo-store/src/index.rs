//! # Index Resolver
//!
//! Maps project ids to document locations. Backed by a small `index.json`
//! at the repository root:
//!
//! ```json
//! { "defaultProjectId": "p-1", "projects": [{ "id": "p-1", "file": "p-1.json" }] }
//! ```
//!
//! An unknown id yields a `NotFound` result, not a panic — callers decide
//! how to surface it.

use std::path::{Path, PathBuf};

use renovo_core::RepoError;
use serde::{Deserialize, Serialize};

/// Filename of the index document inside the repository root.
pub const INDEX_FILE: &str = "index.json";

/// One entry of the index document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    /// Project id.
    pub id: String,
    /// Document filename, relative to the repository root.
    pub file: String,
}

/// The index document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIndex {
    /// Id of the project opened when none is specified.
    pub default_project_id: String,
    /// All known projects.
    #[serde(default)]
    pub projects: Vec<IndexEntry>,
}

/// Resolves project ids to document paths under a repository root.
#[derive(Debug)]
pub struct IndexResolver {
    root: PathBuf,
    index: ProjectIndex,
}

impl IndexResolver {
    /// Load the index document from `root`.
    ///
    /// # Errors
    ///
    /// `Io` if `index.json` cannot be read, `Parse` if it is not valid JSON.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, RepoError> {
        let root = root.as_ref().to_path_buf();
        let raw = std::fs::read_to_string(root.join(INDEX_FILE))?;
        let index: ProjectIndex = serde_json::from_str(&raw)?;
        Ok(Self { root, index })
    }

    /// The repository root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The configured default project id.
    pub fn default_project_id(&self) -> &str {
        &self.index.default_project_id
    }

    /// All known project ids, in index order.
    pub fn list_ids(&self) -> Vec<String> {
        self.index.projects.iter().map(|p| p.id.clone()).collect()
    }

    /// Resolve a project id to its document path.
    ///
    /// # Errors
    ///
    /// `NotFound` naming the project id if the index has no such entry.
    pub fn resolve(&self, project_id: &str) -> Result<PathBuf, RepoError> {
        self.index
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .map(|p| self.root.join(&p.file))
            .ok_or_else(|| RepoError::not_found("project", project_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_index(dir: &Path, body: &str) {
        std::fs::write(dir.join(INDEX_FILE), body).unwrap();
    }

    #[test]
    fn test_resolve_known_id() {
        let dir = tempfile::tempdir().unwrap();
        write_index(
            dir.path(),
            r#"{"defaultProjectId":"p-1","projects":[{"id":"p-1","file":"p-1.json"}]}"#,
        );
        let resolver = IndexResolver::open(dir.path()).unwrap();
        assert_eq!(resolver.default_project_id(), "p-1");
        assert_eq!(resolver.resolve("p-1").unwrap(), dir.path().join("p-1.json"));
    }

    #[test]
    fn test_resolve_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write_index(
            dir.path(),
            r#"{"defaultProjectId":"p-1","projects":[{"id":"p-1","file":"p-1.json"}]}"#,
        );
        let resolver = IndexResolver::open(dir.path()).unwrap();
        let err = resolver.resolve("p-9").unwrap_err();
        assert!(matches!(err, RepoError::NotFound { kind: "project", .. }));
    }

    #[test]
    fn test_list_ids_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        write_index(
            dir.path(),
            r#"{"defaultProjectId":"p-2","projects":[
                {"id":"p-2","file":"p-2.json"},
                {"id":"p-1","file":"p-1.json"}
            ]}"#,
        );
        let resolver = IndexResolver::open(dir.path()).unwrap();
        assert_eq!(resolver.list_ids(), vec!["p-2", "p-1"]);
    }

    #[test]
    fn test_missing_index_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = IndexResolver::open(dir.path()).unwrap_err();
        assert!(matches!(err, RepoError::Io(_)));
    }

    #[test]
    fn test_malformed_index_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_index(dir.path(), "{not json");
        let err = IndexResolver::open(dir.path()).unwrap_err();
        assert!(matches!(err, RepoError::Parse(_)));
    }
}
