use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::instrument;

use crate::domain::{Unit, UnitId, UnitPatch, ValidUnit};
use crate::infrastructure::traits::{StoreError, StoreResult, UnitStore};

/// Process-local store, used in tests and with the `memory` backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    units: RwLock<Vec<Unit>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records, kept in the given order.
    pub fn with_units(units: Vec<Unit>) -> Self {
        Self {
            units: RwLock::new(units),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Vec<Unit>>> {
        self.units.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<Unit>>> {
        self.units.write().map_err(|_| StoreError::Poisoned)
    }
}

impl UnitStore for MemoryStore {
    fn list(&self) -> StoreResult<Vec<Unit>> {
        Ok(self.read()?.clone())
    }

    fn get(&self, id: &UnitId) -> StoreResult<Option<Unit>> {
        Ok(self.read()?.iter().find(|u| &u.id == id).cloned())
    }

    fn find_by_parent(&self, parent: &UnitId) -> StoreResult<Vec<Unit>> {
        let units = self.read()?;
        Ok(super::find_by_parent(&units, parent))
    }

    #[instrument(level = "trace", skip(self))]
    fn insert(&self, unit: ValidUnit) -> StoreResult<Unit> {
        let mut units = self.write()?;
        Ok(super::insert_record(&mut units, unit))
    }

    #[instrument(level = "trace", skip(self))]
    fn update(&self, id: &UnitId, patch: &UnitPatch) -> StoreResult<Option<Unit>> {
        let mut units = self.write()?;
        Ok(super::update_record(&mut units, id, patch))
    }

    #[instrument(level = "trace", skip(self))]
    fn delete_many(&self, ids: &[UnitId]) -> StoreResult<usize> {
        let mut units = self.write()?;
        Ok(super::remove_records(&mut units, ids))
    }
}
