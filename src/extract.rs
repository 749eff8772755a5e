//! Recursive directory extraction: walk a file tree, filter test files,
//! dispatch each source file to its grammar, and aggregate the entities.

use crate::entity::CodeEntity;
use crate::ts::{extract_from_file, Lang};
use std::path::Path;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Directory names treated as test trees when `exclude_tests` is set.
const TEST_DIR_SEGMENTS: [&str; 4] = ["spec", "tests", "test", "testing"];

/// Extract entities from every recognized source file under `directory_path`.
///
/// The walk is strictly sequential; each file is parsed and fully consumed
/// before the next. Unreadable or non-UTF-8 files and unregistered
/// extensions are skipped silently. `max_entities` caps each file
/// independently, not the aggregate: a cap of N yields up to N entities
/// per file.
pub fn extract_entities_from_directory(
    directory_path: &Path,
    exclude_tests: bool,
    max_entities: Option<usize>,
) -> Vec<CodeEntity> {
    let mut entities = Vec::new();

    let walker = WalkDir::new(directory_path)
        .into_iter()
        .filter_entry(|entry| !(exclude_tests && is_test_dir(entry)));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        if exclude_tests && is_test_file(file_name) {
            continue;
        }

        let Some(lang) = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Lang::from_ext)
        else {
            continue;
        };

        // Fresh buffer per file: the cap applies to each file on its own.
        let mut file_entities = Vec::new();
        if let Err(e) = extract_from_file(&mut file_entities, entry.path(), lang, max_entities) {
            debug!(file = %entry.path().display(), error = %e, "skipping file");
            continue;
        }
        entities.extend(file_entities);
    }

    entities
}

fn is_test_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| TEST_DIR_SEGMENTS.contains(&name))
}

fn is_test_file(file_name: &str) -> bool {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    file_name.starts_with("test_")
        || stem.ends_with("_spec")
        || stem.ends_with("_test")
        || stem.ends_with("Test")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_patterns() {
        assert!(is_test_file("test_foo.py"));
        assert!(is_test_file("bar_test.go"));
        assert!(is_test_file("widget_spec.js"));
        assert!(is_test_file("WidgetTest.java"));
        assert!(!is_test_file("foo.py"));
        assert!(!is_test_file("contest.py"));
        assert!(!is_test_file("latest.rs"));
    }
}
