//! File-backed stores: a JSON document collection and a CSV index.
//!
//! Stores are read whole and written whole. Writes go to a temp file in the
//! destination directory and are renamed into place, so a failed run never
//! leaves a half-written store behind.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use newsdigest_shared::{DigestError, IndexEntry, ProcessedArticle, Result};

use crate::merge::{Keyed, MergeReport, merge};

/// Header row of the tabular index.
pub const INDEX_HEADERS: [&str; 3] = ["date", "URL", "topic"];

/// A whole-file store of entries.
pub trait Store {
    /// Entry type held by the store.
    type Entry: Serialize + DeserializeOwned;

    /// Location of the store file.
    fn path(&self) -> &Path;

    /// Read every entry. Missing or malformed files are errors.
    fn read(&self) -> Result<Vec<Self::Entry>>;

    /// Replace the store contents atomically.
    fn write(&self, entries: &[Self::Entry]) -> Result<()>;

    /// Read the store, treating a missing file as empty and an unreadable
    /// one as empty after a warning.
    fn load_or_empty(&self) -> Vec<Self::Entry> {
        let path = self.path();
        if !path.exists() {
            debug!(path = %path.display(), "store not found, starting empty");
            return Vec::new();
        }

        match self.read() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read store, treating as empty");
                Vec::new()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// JSON store
// ---------------------------------------------------------------------------

/// A JSON array of entries, pretty-printed with non-ASCII kept literal.
#[derive(Debug, Clone)]
pub struct JsonStore<T> {
    path: PathBuf,
    _entry: PhantomData<fn() -> T>,
}

/// The document collection (`contents.json`).
pub type DocumentStore = JsonStore<ProcessedArticle>;

impl<T> JsonStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _entry: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> Store for JsonStore<T> {
    type Entry = T;

    fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<T>> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| DigestError::io(&self.path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            DigestError::parse(format!(
                "{} is not a JSON array of records: {e}",
                self.path.display()
            ))
        })
    }

    fn write(&self, entries: &[T]) -> Result<()> {
        let mut json = serde_json::to_string_pretty(entries)
            .map_err(|e| DigestError::Storage(format!("JSON serialization failed: {e}")))?;
        json.push('\n');
        write_atomic(&self.path, json.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// CSV index store
// ---------------------------------------------------------------------------

/// The tabular index (`database.csv`) with header `date,URL,topic`.
#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Store for IndexStore {
    type Entry = IndexEntry;

    fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<IndexEntry>> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| csv_error(&self.path, e))?;

        reader
            .deserialize::<IndexEntry>()
            .map(|row| row.map_err(|e| csv_error(&self.path, e)))
            .collect()
    }

    fn write(&self, entries: &[IndexEntry]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer
            .write_record(INDEX_HEADERS)
            .map_err(|e| csv_error(&self.path, e))?;
        for entry in entries {
            writer
                .serialize(entry)
                .map_err(|e| csv_error(&self.path, e))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| DigestError::Storage(format!("CSV flush failed: {e}")))?;
        write_atomic(&self.path, &bytes)
    }
}

fn csv_error(path: &Path, e: csv::Error) -> DigestError {
    let message = e.to_string();
    match e.into_kind() {
        csv::ErrorKind::Io(source) => DigestError::io(path, source),
        _ => DigestError::parse(format!("{}: {message}", path.display())),
    }
}

// ---------------------------------------------------------------------------
// Merge against a persisted store
// ---------------------------------------------------------------------------

/// Merge `incoming` into `store`.
///
/// The store is loaded with [`Store::load_or_empty`], merged in memory, and
/// rewritten only when entries were added and `dry_run` is false. The report
/// is the same either way.
#[instrument(skip_all, fields(store = %store.path().display(), incoming = incoming.len(), dry_run = dry_run))]
pub fn merge_into<S>(store: &S, incoming: &[S::Entry], dry_run: bool) -> Result<MergeReport>
where
    S: Store,
    S::Entry: Keyed + Clone,
{
    let existing = store.load_or_empty();
    let existing_count = existing.len();
    let merged = merge(existing, incoming);

    let written = merged.added > 0 && !dry_run;
    if written {
        store.write(&merged.entries)?;
    }

    info!(
        existing = existing_count,
        added = merged.added,
        written,
        "store merge complete"
    );

    Ok(MergeReport {
        store: store.path().to_path_buf(),
        existing: existing_count,
        incoming: incoming.len(),
        added: merged.added,
        dry_run,
        written,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Write `bytes` to `path` via a sibling temp file and rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| DigestError::io(&dir, e))?;

    let file_name = path
        .file_name()
        .ok_or_else(|| DigestError::validation(format!("not a file path: {}", path.display())))?
        .to_string_lossy();
    let temp = dir.join(format!(".{file_name}.tmp"));

    std::fs::write(&temp, bytes).map_err(|e| DigestError::io(&temp, e))?;
    if let Err(e) = std::fs::rename(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(DigestError::io(path, e));
    }

    debug!(path = %path.display(), size = bytes.len(), "wrote store file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsdigest_shared::RawArticle;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nd-store-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn article(url: &str, topic: &str) -> ProcessedArticle {
        ProcessedArticle {
            date: "2025-08-11".into(),
            url: url.into(),
            topic: topic.into(),
            source: "Body text.".into(),
            summary: "Body text.".into(),
            questions: vec!["What is the main focus of this article?".into()],
        }
    }

    fn index(url: &str, topic: &str) -> IndexEntry {
        IndexEntry {
            date: "2025-08-11".into(),
            url: url.into(),
            topic: topic.into(),
        }
    }

    #[test]
    fn json_store_roundtrip() {
        let tmp = temp_dir();
        let store = DocumentStore::new(tmp.join("contents.json"));
        let entries = vec![article("a", "기술 뉴스"), article("b", "B")];

        store.write(&entries).unwrap();
        assert_eq!(store.read().unwrap(), entries);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("기술 뉴스"));
        assert!(raw.contains("\"URL\": \"a\""));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_store_loads_empty() {
        let tmp = temp_dir();
        let store = DocumentStore::new(tmp.join("nope.json"));
        assert!(store.load_or_empty().is_empty());
        assert!(matches!(store.read(), Err(DigestError::Io { .. })));
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn malformed_store_loads_empty_but_read_fails() {
        let tmp = temp_dir();
        let path = tmp.join("contents.json");
        std::fs::write(&path, "{\"not\": \"an array\"}").unwrap();

        let store = DocumentStore::new(&path);
        assert!(store.load_or_empty().is_empty());
        let err = store.read().unwrap_err();
        assert!(matches!(err, DigestError::Parse { .. }));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn index_store_roundtrip_with_quoting() {
        let tmp = temp_dir();
        let store = IndexStore::new(tmp.join("database.csv"));
        let entries = vec![index("a", "Plain"), index("b", "Commas, \"quotes\", and more")];

        store.write(&entries).unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("date,URL,topic\n"));
        assert!(raw.contains("\"Commas, \"\"quotes\"\", and more\""));

        assert_eq!(store.read().unwrap(), entries);
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn empty_index_still_has_header() {
        let tmp = temp_dir();
        let store = IndexStore::new(tmp.join("database.csv"));
        store.write(&[]).unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "date,URL,topic\n");
        assert!(store.read().unwrap().is_empty());
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn index_store_reads_reordered_columns() {
        let tmp = temp_dir();
        let path = tmp.join("database.csv");
        std::fs::write(&path, "URL,topic,date\nhttps://x,Topic X,2025-08-01\n").unwrap();
        let store = IndexStore::new(&path);
        let rows = store.read().unwrap();
        assert_eq!(rows, vec![IndexEntry {
            date: "2025-08-01".into(),
            url: "https://x".into(),
            topic: "Topic X".into(),
        }]);
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn merge_into_writes_and_is_idempotent() {
        let tmp = temp_dir();
        let store = DocumentStore::new(tmp.join("contents.json"));
        let batch = vec![article("a", "first"), article("a", "second"), article("b", "B")];

        let first = merge_into(&store, &batch, false).unwrap();
        assert_eq!(first.added, 2);
        assert!(first.written);

        let second = merge_into(&store, &batch, false).unwrap();
        assert_eq!(second.existing, 2);
        assert_eq!(second.added, 0);
        assert!(!second.written);

        let stored = store.read().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].topic, "first");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn merge_into_dry_run_reports_without_writing() {
        let tmp = temp_dir();
        let store = IndexStore::new(tmp.join("database.csv"));
        let batch = vec![index("a", "A"), index("b", "B")];

        let report = merge_into(&store, &batch, true).unwrap();
        assert_eq!(report.added, 2);
        assert!(report.dry_run);
        assert!(!report.written);
        assert!(!store.path().exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn merge_into_recovers_from_corrupt_store() {
        let tmp = temp_dir();
        let path = tmp.join("contents.json");
        std::fs::write(&path, "not json at all").unwrap();
        let store = DocumentStore::new(&path);

        let report = merge_into(&store, &[article("a", "A")], false).unwrap();
        assert_eq!(report.existing, 0);
        assert_eq!(report.added, 1);
        assert_eq!(store.read().unwrap().len(), 1);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn merge_into_keeps_records_with_null_fields() {
        let tmp = temp_dir();
        let path = tmp.join("contents.json");
        std::fs::write(
            &path,
            r#"[
  {"date": "2025-08-01", "URL": "https://old/1", "topic": null, "source": "Old text.",
   "summary": "Old text.", "questions": []},
  {"date": "2025-08-01", "URL": "https://old/2", "topic": "Kept", "source": "Old text.",
   "summary": "Old text.", "questions": []}
]"#,
        )
        .unwrap();
        let store = DocumentStore::new(&path);

        let report = merge_into(&store, &[article("https://new/1", "New")], false).unwrap();
        assert_eq!(report.existing, 2);
        assert_eq!(report.added, 1);

        let urls: Vec<String> = store.read().unwrap().into_iter().map(|a| a.url).collect();
        assert_eq!(urls, vec!["https://old/1", "https://old/2", "https://new/1"]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn write_leaves_no_temp_files() {
        let tmp = temp_dir();
        let store = JsonStore::<RawArticle>::new(tmp.join("raw.json"));
        store.write(&[RawArticle::default()]).unwrap();

        let names: Vec<String> = std::fs::read_dir(&tmp)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["raw.json"]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn write_creates_parent_directories() {
        let tmp = temp_dir();
        let store = IndexStore::new(tmp.join("nested").join("deeper").join("database.csv"));
        store.write(&[index("a", "A")]).unwrap();
        assert!(store.path().exists());
        let _ = std::fs::remove_dir_all(&tmp);
    }
}
