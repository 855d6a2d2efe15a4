//! Read-only blueprint store backed by a directory of YAML/JSON files.
//!
//! Files are discovered recursively and matched by glob against their path
//! relative to the store root. A blueprint without an `id` takes its file
//! stem. Blueprint ids and test ids must be unique across the store.

use crate::blueprint::{Blueprint, PromptTest};
use crate::error::{ForgeError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Patterns used when none are configured.
pub const DEFAULT_PATTERNS: &[&str] = &["*.yaml", "*.yml", "*.json"];

/// A loaded blueprint and the file it came from.
#[derive(Debug, Clone)]
pub struct StoredBlueprint {
    pub path: PathBuf,
    pub blueprint: Blueprint,
}

#[derive(Debug, Clone, Default)]
pub struct BlueprintStore {
    root: PathBuf,
    entries: Vec<StoredBlueprint>,
    by_id: HashMap<String, usize>,
    tests: HashMap<String, (usize, usize)>,
}

impl BlueprintStore {
    /// Load every blueprint under `dir` whose relative path matches one of `patterns`.
    ///
    /// An empty pattern list means [`DEFAULT_PATTERNS`].
    pub fn open<P: AsRef<Path>>(dir: P, patterns: &[String]) -> Result<Self> {
        let root = dir.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(ForgeError::UserError(format!(
                "blueprints directory '{}' does not exist",
                root.display()
            )));
        }

        let globs = if patterns.is_empty() {
            let defaults: Vec<String> = DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect();
            build_globset(&defaults)
        } else {
            build_globset(patterns)
        }
        .map_err(|e| ForgeError::UserError(format!("invalid blueprint pattern: {}", e)))?;

        let mut files = Vec::new();
        collect_files(&root, &mut files)?;
        files.sort();

        let mut store = Self {
            root: root.clone(),
            ..Self::default()
        };

        for path in files {
            let relative = path.strip_prefix(&root).unwrap_or(&path);
            let relative = relative.to_string_lossy().replace('\\', "/");
            if !globs.is_match(&relative) {
                continue;
            }

            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let blueprint = Blueprint::load_with(&path, |bp| {
                if bp.id.is_empty() {
                    bp.id = stem;
                }
            })?;
            store.insert(StoredBlueprint { path, blueprint })?;
        }

        tracing::debug!(
            root = %store.root.display(),
            blueprints = store.entries.len(),
            tests = store.tests.len(),
            "opened blueprint store"
        );
        Ok(store)
    }

    fn insert(&mut self, entry: StoredBlueprint) -> Result<()> {
        let index = self.entries.len();
        let id = entry.blueprint.id.clone();

        if let Some(&existing) = self.by_id.get(&id) {
            return Err(ForgeError::UserError(format!(
                "duplicate blueprint id '{}' in '{}' and '{}'",
                id,
                self.entries[existing].path.display(),
                entry.path.display()
            )));
        }

        for (test_index, test) in entry.blueprint.tests.iter().enumerate() {
            if self.tests.contains_key(&test.id) {
                return Err(ForgeError::UserError(format!(
                    "duplicate test id '{}' in '{}'",
                    test.id,
                    entry.path.display()
                )));
            }
            self.tests.insert(test.id.clone(), (index, test_index));
        }

        self.by_id.insert(id, index);
        self.entries.push(entry);
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loaded blueprints in path order.
    pub fn blueprints(&self) -> impl Iterator<Item = &StoredBlueprint> {
        self.entries.iter()
    }

    /// Every test with the blueprint that owns it.
    pub fn tests(&self) -> impl Iterator<Item = (&Blueprint, &PromptTest)> {
        self.entries
            .iter()
            .flat_map(|e| e.blueprint.tests.iter().map(move |t| (&e.blueprint, t)))
    }

    pub fn blueprint(&self, id: &str) -> Result<&Blueprint> {
        self.by_id
            .get(id)
            .map(|&i| &self.entries[i].blueprint)
            .ok_or_else(|| ForgeError::NotFound(format!("blueprint '{}'", id)))
    }

    /// Resolve a test id to the test and its owning blueprint.
    pub fn test(&self, id: &str) -> Result<(&Blueprint, &PromptTest)> {
        let &(bp, t) = self
            .tests
            .get(id)
            .ok_or_else(|| ForgeError::NotFound(format!("test '{}'", id)))?;
        let blueprint = &self.entries[bp].blueprint;
        Ok((blueprint, &blueprint.tests[t]))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn build_globset(patterns: &[String]) -> std::result::Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let normalized = pattern.trim().replace('\\', "/");
        if normalized.is_empty() {
            continue;
        }
        builder.add(Glob::new(&normalized)?);
    }

    builder.build()
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        ForgeError::UserError(format!("failed to read directory '{}': {}", dir.display(), e))
    })?;

    for entry in entries {
        let path = entry
            .map_err(|e| ForgeError::UserError(format!("failed to read directory entry: {}", e)))?
            .path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SUMMARY: &str = r#"
id: bp-summary
name: Summarizer
role: analyst
taskTemplate: "Summarize {document}."
outputSchema:
  summary: string
tests:
  - id: t-basic
    name: basic
    inputs:
      document: policy
    assertions:
      - id: a1
        type: contains
        field: summary
        expectedValue: policy
"#;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_open_discovers_yaml_and_json() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "summary.yaml", SUMMARY);
        write(
            temp.path(),
            "nested/tagger.json",
            r#"{"name": "Tagger", "role": "librarian", "taskTemplate": "Tag it."}"#,
        );
        write(temp.path(), "README.md", "not a blueprint");

        let store = BlueprintStore::open(temp.path(), &[]).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.blueprint("bp-summary").unwrap().name, "Summarizer");
        // id falls back to the file stem
        assert_eq!(store.blueprint("tagger").unwrap().role, "librarian");
    }

    #[test]
    fn test_stem_id_applies_before_validation() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "summarizer.yaml",
            r#"
name: Summarizer
role: analyst
taskTemplate: "Summarize."
tests:
  - id: t1
    name: owned by stem
    blueprintId: summarizer
"#,
        );

        let store = BlueprintStore::open(temp.path(), &[]).unwrap();
        let (blueprint, test) = store.test("t1").unwrap();

        assert_eq!(blueprint.id, "summarizer");
        assert_eq!(test.blueprint_id.as_deref(), Some("summarizer"));
    }

    #[test]
    fn test_stem_id_still_checks_test_owner() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "summarizer.yaml",
            "name: S\nrole: r\ntaskTemplate: t\ntests:\n  - id: t1\n    blueprintId: other\n",
        );

        let err = BlueprintStore::open(temp.path(), &[]).unwrap_err();
        assert!(err.to_string().contains("belongs to blueprint 'other'"));
    }

    #[test]
    fn test_resolves_test_with_its_blueprint() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "summary.yaml", SUMMARY);

        let store = BlueprintStore::open(temp.path(), &[]).unwrap();
        let (blueprint, test) = store.test("t-basic").unwrap();

        assert_eq!(blueprint.id, "bp-summary");
        assert_eq!(test.assertions().len(), 1);
        assert_eq!(store.tests().count(), 1);
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "summary.yaml", SUMMARY);
        let store = BlueprintStore::open(temp.path(), &[]).unwrap();

        assert!(matches!(store.blueprint("nope"), Err(ForgeError::NotFound(_))));
        assert!(matches!(store.test("nope"), Err(ForgeError::NotFound(_))));
    }

    #[test]
    fn test_custom_patterns_filter_files() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "summary.yaml", SUMMARY);
        write(
            temp.path(),
            "other.json",
            r#"{"id": "o", "name": "O", "role": "r", "taskTemplate": "t"}"#,
        );

        let store = BlueprintStore::open(temp.path(), &["*.json".to_string()]).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.blueprint("o").is_ok());
    }

    #[test]
    fn test_duplicate_blueprint_ids_rejected() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.yaml", SUMMARY);
        write(temp.path(), "b.yaml", SUMMARY);

        let err = BlueprintStore::open(temp.path(), &[]).unwrap_err();
        assert!(err.to_string().contains("duplicate blueprint id 'bp-summary'"));
    }

    #[test]
    fn test_duplicate_test_ids_across_blueprints_rejected() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.yaml", SUMMARY);
        write(
            temp.path(),
            "b.yaml",
            &SUMMARY.replace("id: bp-summary", "id: bp-other"),
        );

        let err = BlueprintStore::open(temp.path(), &[]).unwrap_err();
        assert!(err.to_string().contains("duplicate test id 't-basic'"));
    }

    #[test]
    fn test_invalid_blueprint_fails_open() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "bad.yaml", "name: ''\nrole: r\ntaskTemplate: t\n");

        let err = BlueprintStore::open(temp.path(), &[]).unwrap_err();
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_missing_directory_is_user_error() {
        let temp = TempDir::new().unwrap();
        let err = BlueprintStore::open(temp.path().join("absent"), &[]).unwrap_err();
        assert_eq!(err.exit_code(), crate::exit_codes::USER_ERROR);
    }
}
