//! Store backends
//!
//! Both backends keep the collection as an ordered `Vec<Unit>` and share the
//! record operations below, so they agree on id assignment, timestamps and
//! ordering.

mod json_file;
mod memory;

use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Unit, UnitId, UnitPatch, ValidUnit};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

fn find_by_parent(units: &[Unit], parent: &UnitId) -> Vec<Unit> {
    units
        .iter()
        .filter(|u| u.parent_id.as_ref() == Some(parent))
        .cloned()
        .collect()
}

fn insert_record(units: &mut Vec<Unit>, valid: ValidUnit) -> Unit {
    let unit = Unit::from_valid(UnitId::new(Uuid::new_v4().to_string()), valid, Utc::now());
    units.push(unit.clone());
    unit
}

fn update_record(units: &mut [Unit], id: &UnitId, patch: &UnitPatch) -> Option<Unit> {
    let unit = units.iter_mut().find(|u| &u.id == id)?;
    unit.apply(patch);
    unit.updated_at = Utc::now();
    Some(unit.clone())
}

fn remove_records(units: &mut Vec<Unit>, ids: &[UnitId]) -> usize {
    let doomed: HashSet<&UnitId> = ids.iter().collect();
    let before = units.len();
    units.retain(|u| !doomed.contains(&u.id));
    before - units.len()
}
