use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, instrument, warn};

use crate::domain::{Unit, UnitId, UnitPatch, ValidUnit};
use crate::infrastructure::traits::{StoreError, StoreResult, UnitStore};

/// On-disk layout of the store file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    units: Vec<Record>,
}

/// One entry of the `units` array. Entries that do not read as a unit (an
/// unknown level, a missing field) are carried along untouched.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Record {
    Unit(Unit),
    Unreadable(serde_json::Value),
}

/// Contents of the store file, split into usable units and the rest.
#[derive(Debug, Default)]
struct Snapshot {
    units: Vec<Unit>,
    unreadable: Vec<serde_json::Value>,
}

/// Store persisting the whole collection as one JSON document.
///
/// The file is re-read on every operation. Records that cannot be read are
/// skipped with a warning and written back unchanged, after the readable ones.
/// Writes go to a sibling temp file
/// that is renamed over the original, so readers never see a partial document.
/// The mutex only serializes writers inside this process; two processes
/// writing the same file can still lose updates.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<Vec<Unit>> {
        Ok(self.load_snapshot()?.units)
    }

    fn load_snapshot(&self) -> StoreResult<Snapshot> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Snapshot::default()),
            Err(e) => {
                return Err(StoreError::unavailable(
                    format!("read {}", self.path.display()),
                    e,
                ))
            }
        };
        if content.trim().is_empty() {
            return Ok(Snapshot::default());
        }
        let doc: StoreDocument =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        let mut snapshot = Snapshot::default();
        for record in doc.units {
            match record {
                Record::Unit(unit) => snapshot.units.push(unit),
                Record::Unreadable(raw) => {
                    warn!(
                        "skipping unreadable record {} in {}",
                        raw.get("id").unwrap_or(&serde_json::Value::Null),
                        self.path.display()
                    );
                    snapshot.unreadable.push(raw);
                }
            }
        }
        Ok(snapshot)
    }

    fn save(&self, snapshot: Snapshot) -> StoreResult<()> {
        let context = || format!("write {}", self.path.display());
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| StoreError::unavailable(context(), e))?;

        let doc = StoreDocument {
            units: snapshot
                .units
                .into_iter()
                .map(Record::Unit)
                .chain(snapshot.unreadable.into_iter().map(Record::Unreadable))
                .collect(),
        };
        let mut tmp =
            NamedTempFile::new_in(&dir).map_err(|e| StoreError::unavailable(context(), e))?;
        serde_json::to_writer_pretty(&mut tmp, &doc)
            .map_err(|e| StoreError::unavailable(context(), io::Error::from(e)))?;
        tmp.write_all(b"\n")
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| StoreError::unavailable(context(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::unavailable(context(), e.error))?;
        Ok(())
    }

    /// Read-modify-write under the process-local write lock.
    fn mutate<T>(&self, op: impl FnOnce(&mut Vec<Unit>) -> T) -> StoreResult<T> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut snapshot = self.load_snapshot()?;
        let result = op(&mut snapshot.units);
        self.save(snapshot)?;
        Ok(result)
    }
}

impl UnitStore for JsonFileStore {
    fn list(&self) -> StoreResult<Vec<Unit>> {
        self.load()
    }

    fn get(&self, id: &UnitId) -> StoreResult<Option<Unit>> {
        Ok(self.load()?.into_iter().find(|u| &u.id == id))
    }

    fn find_by_parent(&self, parent: &UnitId) -> StoreResult<Vec<Unit>> {
        let units = self.load()?;
        Ok(super::find_by_parent(&units, parent))
    }

    #[instrument(level = "trace", skip(self), fields(path = %self.path.display()))]
    fn insert(&self, unit: ValidUnit) -> StoreResult<Unit> {
        self.mutate(|units| super::insert_record(units, unit))
    }

    #[instrument(level = "trace", skip(self), fields(path = %self.path.display()))]
    fn update(&self, id: &UnitId, patch: &UnitPatch) -> StoreResult<Option<Unit>> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut snapshot = self.load_snapshot()?;
        let updated = super::update_record(&mut snapshot.units, id, patch);
        if updated.is_some() {
            self.save(snapshot)?;
        }
        Ok(updated)
    }

    #[instrument(level = "trace", skip(self), fields(path = %self.path.display()))]
    fn delete_many(&self, ids: &[UnitId]) -> StoreResult<usize> {
        let removed = self.mutate(|units| super::remove_records(units, ids))?;
        debug!("removed {} units from {}", removed, self.path.display());
        Ok(removed)
    }
}
