use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::record::{ResultRecord, sort_by_version};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Expected a JSON object at the top level, found {0}")]
    NotAnObject(&'static str),
    #[error("Path has no file name")]
    NoFileName,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Recursively finds every file under `dir` whose extension is `extension`,
/// in lexical path order. Hidden files and directories are skipped.
pub fn discover(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == extension))
        .map(DirEntry::into_path)
        .collect::<Vec<_>>();
    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    files
}

/// Decodes one results file. The top-level value must be a JSON object.
pub fn load_record(path: &Path) -> Result<ResultRecord, LoadError> {
    let filename = path
        .file_name()
        .ok_or(LoadError::NoFileName)?
        .to_string_lossy()
        .into_owned();
    let data = read_to_string(path)?;
    match serde_json::from_str::<serde_json::Value>(&data)? {
        serde_json::Value::Object(fields) => Ok(ResultRecord::new(filename, fields)),
        other => Err(LoadError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Loads every results file under `dir` and returns them sorted by version.
///
/// Files that fail to read or decode are reported and left out; one bad file
/// never stops the rest from loading. An empty vector means there is nothing
/// to report.
pub fn load_results(dir: &Path, extension: &str) -> Vec<ResultRecord> {
    let files = discover(dir, extension);
    if files.is_empty() {
        println!("No JSON files found in {}", dir.display());
        return Vec::new();
    }

    println!("Found {} JSON files:", files.len());
    let mut records = Vec::with_capacity(files.len());
    for path in &files {
        match load_record(path) {
            Ok(record) => {
                debug!("Loaded {} as version {}", path.display(), record.version);
                println!("  ✓ {}", path.display());
                records.push(record);
            }
            Err(err) => {
                warn!("Skipping {}: {err}", path.display());
                println!("  ✗ Error loading {}: {err}", path.display());
            }
        }
    }

    sort_by_version(&mut records);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, body).unwrap();
    }

    #[test]
    fn empty_dir_loads_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(load_results(dir.path(), "json").is_empty());
    }

    #[test]
    fn missing_dir_loads_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(load_results(&dir.path().join("nope"), "json").is_empty());
    }

    #[test]
    fn discovers_recursively_in_lexical_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.json", "{}");
        write(dir.path(), "a/z.json", "{}");
        write(dir.path(), "a.json", "{}");
        write(dir.path(), "notes.txt", "{}");
        write(dir.path(), ".hidden/x.json", "{}");
        write(dir.path(), ".y.json", "{}");

        let found = discover(dir.path(), "json");
        let rel: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            [
                PathBuf::from("a.json"),
                PathBuf::from("a/z.json"),
                PathBuf::from("b.json")
            ]
        );
    }

    #[test]
    fn corrupt_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "results-v1.0.json", r#"{"total_liquido": 1}"#);
        write(dir.path(), "results-v1.1.json", r#"{"total_liquido": "#);
        write(dir.path(), "results-v1.2.json", r#"{"total_liquido": 3}"#);

        let records = load_results(dir.path(), "json");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].version, "1.0");
        assert_eq!(records[1].version, "1.2");
    }

    #[test]
    fn sorted_by_numeric_version() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "v1.10.json", "{}");
        write(dir.path(), "v1.2.json", "{}");
        write(dir.path(), "v1.9.json", "{}");
        write(dir.path(), "baseline.json", "{}");

        let records = load_results(dir.path(), "json");
        let versions: Vec<_> = records.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, ["unknown", "1.2", "1.9", "1.10"]);
        assert!(
            records
                .windows(2)
                .all(|w| w[0].version_key() <= w[1].version_key())
        );
    }

    #[test]
    fn version_comes_from_file_name() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "v9.9/run.json", "{}");
        let records = load_results(dir.path(), "json");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].filename, "run.json");
        assert_eq!(records[0].version, "unknown");
    }

    #[test]
    fn non_object_is_rejected() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "list.json", "[1, 2]");
        let err = load_record(&dir.path().join("list.json")).unwrap_err();
        assert!(matches!(err, LoadError::NotAnObject("an array")));
        assert!(load_results(dir.path(), "json").is_empty());
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_record(&dir.path().join("gone.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
