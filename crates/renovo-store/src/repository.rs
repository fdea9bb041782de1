//! # Repository — Mutation Transaction Manager
//!
//! The single choke point through which every write passes. Each mutation
//! runs the strict sequence load → migrate → validate → transform →
//! normalize → validate → ledger guard → persist, holding the project's
//! write lock for the whole sequence.
//!
//! ## Why the lock
//!
//! Persistence is whole-document replacement. Two unserialized writers
//! racing the same project would each re-read and rewrite the full file,
//! and the last one would silently drop the other's change. One exclusive
//! lock per project id closes that window; reads need no lock because the
//! writer replaces the file atomically.
//!
//! ## Ledger Guard
//!
//! After every transform the prior ledger must survive as an unchanged
//! suffix of the candidate ledger. Confirmation prepends new entries;
//! nothing may rewrite or drop an existing one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use renovo_core::RepoError;
use renovo_model::{LedgerEntry, Project};

use crate::document::{read_raw, write_project};
use crate::index::IndexResolver;
use crate::migrate::migrate;
use crate::normalize::normalize_ordering;
use crate::validate::{check_invariants, validate};

/// The project repository: loads, validates, and atomically mutates
/// project documents under a root directory.
pub struct Repository {
    resolver: IndexResolver,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Repository {
    /// Open the repository rooted at `root` (must contain `index.json`).
    pub fn open(root: impl AsRef<Path>) -> Result<Self, RepoError> {
        let resolver = IndexResolver::open(root)?;
        Ok(Self {
            resolver,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// The configured default project id.
    pub fn get_default_project_id(&self) -> String {
        self.resolver.default_project_id().to_string()
    }

    /// All known project ids.
    pub fn list_project_ids(&self) -> Vec<String> {
        self.resolver.list_ids()
    }

    /// Load, migrate, and validate a project by id.
    pub fn get_project(&self, project_id: &str) -> Result<Project, RepoError> {
        let path = self.resolver.resolve(project_id)?;
        load_project(&path)
    }

    /// Apply `transform` to the project atomically.
    ///
    /// The transform receives the validated current project and mutates it
    /// in place; it performs its own existence checks so that not-found
    /// conditions surface before validation runs. Derived orderings are
    /// re-normalized afterwards, so transforms never renumber positions by
    /// hand.
    ///
    /// # Errors
    ///
    /// On any error — unknown project, transform failure, validation
    /// failure, ledger guard violation, I/O — the on-disk document is left
    /// exactly as it was before the call.
    pub fn mutate(
        &self,
        project_id: &str,
        transform: impl FnOnce(&mut Project) -> Result<(), RepoError>,
    ) -> Result<Project, RepoError> {
        let path = self.resolver.resolve(project_id)?;
        let lock = self.project_lock(project_id);
        let _guard = lock.lock();

        let mut project = load_project(&path)?;
        let prior_ledger = project.purchase_ledger.clone();

        transform(&mut project)?;
        normalize_ordering(&mut project);
        check_invariants(&project)?;
        guard_ledger_append_only(&prior_ledger, &project.purchase_ledger)?;

        write_project(&path, &project)?;
        tracing::debug!(project_id, "mutation committed");
        Ok(project)
    }

    /// The exclusive write lock for one project id.
    fn project_lock(&self, project_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks
            .entry(project_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// The path of a project document (for tests and tooling).
    pub fn document_path(&self, project_id: &str) -> Result<PathBuf, RepoError> {
        self.resolver.resolve(project_id)
    }
}

/// Read, migrate, and validate one document.
fn load_project(path: &Path) -> Result<Project, RepoError> {
    let raw = read_raw(path)?;
    let migrated = migrate(raw);
    validate(&migrated)
}

/// Reject any candidate ledger that does not keep the prior ledger as an
/// unchanged suffix (new entries are prepended, never interleaved).
fn guard_ledger_append_only(
    prior: &[LedgerEntry],
    candidate: &[LedgerEntry],
) -> Result<(), RepoError> {
    if candidate.len() < prior.len()
        || candidate[candidate.len() - prior.len()..] != *prior
    {
        return Err(RepoError::conflict(
            "the purchase ledger is append-only; posted entries may not be modified or removed",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seed_repo(dir: &Path) {
        std::fs::write(
            dir.join("index.json"),
            r#"{"defaultProjectId":"p-1","projects":[{"id":"p-1","file":"p-1.json"}]}"#,
        )
        .unwrap();
        let doc = json!({
            "id": "p-1",
            "name": "Maple St 12",
            "sections": [{"id": "s-1", "title": "Demolition", "position": 0}],
            "materialCategories": [
                {"id": "uncategorized", "name": "Uncategorized", "sortOrder": 0}
            ]
        });
        std::fs::write(
            dir.join("p-1.json"),
            serde_json::to_string_pretty(&doc).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_mutate_persists_result() {
        let dir = tempfile::tempdir().unwrap();
        seed_repo(dir.path());
        let repo = Repository::open(dir.path()).unwrap();

        let updated = repo
            .mutate("p-1", |p| {
                p.name = "Maple St 12A".to_string();
                Ok(())
            })
            .unwrap();
        assert_eq!(updated.name, "Maple St 12A");

        let reloaded = repo.get_project("p-1").unwrap();
        assert_eq!(reloaded.name, "Maple St 12A");
    }

    #[test]
    fn test_unknown_project_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        seed_repo(dir.path());
        let repo = Repository::open(dir.path()).unwrap();
        let err = repo.mutate("p-9", |_| Ok(())).unwrap_err();
        assert!(matches!(err, RepoError::NotFound { kind: "project", .. }));
    }

    #[test]
    fn test_failed_transform_leaves_document_untouched() {
        let dir = tempfile::tempdir().unwrap();
        seed_repo(dir.path());
        let repo = Repository::open(dir.path()).unwrap();
        let before = std::fs::read(dir.path().join("p-1.json")).unwrap();

        let err = repo
            .mutate("p-1", |p| {
                p.name = "should not persist".to_string();
                Err(RepoError::conflict("boom"))
            })
            .unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));

        let after = std::fs::read(dir.path().join("p-1.json")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_invalid_candidate_leaves_document_untouched() {
        let dir = tempfile::tempdir().unwrap();
        seed_repo(dir.path());
        let repo = Repository::open(dir.path()).unwrap();
        let before = std::fs::read(dir.path().join("p-1.json")).unwrap();

        let err = repo
            .mutate("p-1", |p| {
                // Orphan item: validation must reject the candidate.
                p.items.push(
                    serde_json::from_value(json!({
                        "id": "i-1", "sectionId": "s-ghost", "title": "t"
                    }))
                    .unwrap(),
                );
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation { .. }));

        let after = std::fs::read(dir.path().join("p-1.json")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_normalization_runs_on_candidates() {
        let dir = tempfile::tempdir().unwrap();
        seed_repo(dir.path());
        let repo = Repository::open(dir.path()).unwrap();

        let updated = repo
            .mutate("p-1", |p| {
                // Sloppy transform: appends with a gapped position.
                p.sections.push(
                    serde_json::from_value(json!({
                        "id": "s-2", "title": "Plumbing", "position": 40
                    }))
                    .unwrap(),
                );
                Ok(())
            })
            .unwrap();
        let positions: Vec<usize> = updated.sections.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0, 1]);
    }

    #[test]
    fn test_ledger_guard_blocks_tampering() {
        let prior: Vec<LedgerEntry> = vec![serde_json::from_value(json!({
            "id": "led-1", "projectId": "p-1", "invoiceId": "inv-1",
            "invoiceLineId": "line-1", "postedAt": "2026-02-01T10:00:00Z",
            "materialId": "m", "quantity": 1.0, "unitPrice": 1.0,
            "lineTotal": 1.0, "entryType": "purchase"
        }))
        .unwrap()];

        // Unchanged ledger passes.
        assert!(guard_ledger_append_only(&prior, &prior).is_ok());

        // Prepend passes.
        let mut prepended = prior.clone();
        let mut extra: LedgerEntry = prior[0].clone();
        extra.id = "led-2".to_string();
        prepended.insert(0, extra);
        assert!(guard_ledger_append_only(&prior, &prepended).is_ok());

        // Removal fails.
        assert!(guard_ledger_append_only(&prior, &[]).is_err());

        // In-place edit fails.
        let mut edited = prior.clone();
        edited[0].quantity = 99.0;
        assert!(guard_ledger_append_only(&prior, &edited).is_err());
    }
}
