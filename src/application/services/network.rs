//! Party network service
//!
//! Reads the unit forest and applies create/update/cascade-delete mutations.
//!
//! No operation takes a lock across store calls. A child created under a unit
//! while that unit is being deleted can be left with a dangling parent; it then
//! shows up as an orphan and is hidden from the forest. Concurrent structural
//! edits on the same subtree are therefore unsafe; the expected load is a few
//! administrators.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, StoreResultExt};
use crate::domain::{
    check_parent, normalize_patch, validate_draft, Forest, TreeBuilder, UnitDraft, UnitId,
    UnitNode, UnitPatch, UnitTable,
};
use crate::infrastructure::traits::UnitStore;

/// Result of a cascade delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    /// The unit the delete was requested for
    pub root: UnitId,
    /// Root first, then its descendants in pre-order
    pub removed: Vec<UnitId>,
}

impl DeleteOutcome {
    /// Descendants removed together with the root.
    pub fn descendants(&self) -> &[UnitId] {
        self.removed.get(1..).unwrap_or_default()
    }
}

/// Service for reading and mutating the party network.
pub struct NetworkService {
    store: Arc<dyn UnitStore>,
}

impl NetworkService {
    /// Create a new network service over a store handle.
    pub fn new(store: Arc<dyn UnitStore>) -> Self {
        Self { store }
    }

    /// Build the full union-rooted forest from the store.
    ///
    /// Units whose parent cannot be placed are left out without error.
    #[instrument(level = "debug", skip(self))]
    pub fn list_tree(&self) -> ApplicationResult<Forest> {
        let units = self.store.list().with_store_context("load units")?;
        let mut builder = TreeBuilder::new();
        let forest = builder.build(&units);
        if !builder.orphans().is_empty() {
            debug!(orphans = ?builder.orphans(), "units hidden from tree");
        }
        Ok(forest)
    }

    /// Fetch one unit.
    #[instrument(level = "debug", skip(self))]
    pub fn get_unit(&self, id: &UnitId) -> ApplicationResult<UnitNode> {
        self.store
            .get(id)
            .with_store_context("load unit")?
            .map(UnitNode::from)
            .ok_or_else(|| ApplicationError::NotFound(id.clone()))
    }

    /// Direct children of a unit, in store order, for drill-down views.
    #[instrument(level = "debug", skip(self))]
    pub fn list_children(&self, id: &UnitId) -> ApplicationResult<Vec<UnitNode>> {
        let parent = self
            .store
            .get(id)
            .with_store_context("load unit")?
            .ok_or_else(|| ApplicationError::NotFound(id.clone()))?;
        let expected = parent.level.child_level();
        let children: Vec<UnitNode> = self
            .store
            .find_by_parent(id)
            .with_store_context("load children")?
            .iter()
            .filter(|child| Some(child.level) == expected)
            .map(UnitNode::from)
            .collect();
        Ok(children)
    }

    /// Validate and persist a new unit.
    ///
    /// Validation happens before any store write. The parent must exist and
    /// sit directly above the new unit's level.
    #[instrument(level = "debug", skip(self, draft), fields(level = %draft.level))]
    pub fn create_unit(&self, draft: UnitDraft) -> ApplicationResult<UnitNode> {
        let valid = validate_draft(draft)?;

        if let Some(parent_id) = &valid.parent_id {
            let parent = self
                .store
                .get(parent_id)
                .with_store_context("load parent")?;
            check_parent(valid.level, parent_id, parent.as_ref())?;
        }

        let unit = self.store.insert(valid).with_store_context("insert unit")?;
        info!("created {} {} '{}'", unit.level, unit.id, unit.name_label);
        Ok(UnitNode::from(unit))
    }

    /// Patch the descriptive fields of a unit. Level and parent never change.
    #[instrument(level = "debug", skip(self, patch))]
    pub fn update_unit(&self, id: &UnitId, patch: UnitPatch) -> ApplicationResult<UnitNode> {
        let patch = normalize_patch(patch)?;

        if patch.is_empty() {
            debug!("empty patch for {}, nothing to write", id);
            return self.get_unit(id);
        }

        let unit = self
            .store
            .update(id, &patch)
            .with_store_context("update unit")?
            .ok_or_else(|| ApplicationError::NotFound(id.clone()))?;
        info!("updated {} {}", unit.level, unit.id);
        Ok(UnitNode::from(unit))
    }

    /// Delete a unit together with all of its transitive descendants.
    ///
    /// The full id set is computed from one snapshot, then removed in a single
    /// store call. A missing root fails before anything is removed.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_unit(&self, id: &UnitId) -> ApplicationResult<DeleteOutcome> {
        let units = self.store.list().with_store_context("load units")?;
        let table = UnitTable::new(&units);
        if table.get(id).is_none() {
            return Err(ApplicationError::NotFound(id.clone()));
        }

        let mut removed = vec![id.clone()];
        removed.extend(table.descendants_of(id).into_iter().map(|u| u.id.clone()));
        debug!("cascade from {} covers {} units", id, removed.len());

        let count = self
            .store
            .delete_many(&removed)
            .with_store_context("delete units")?;
        if count != removed.len() {
            // Someone else changed the subtree between snapshot and delete.
            warn!(
                "expected to remove {} units under {}, store removed {}",
                removed.len(),
                id,
                count
            );
        }
        info!("deleted {} and {} descendants", id, removed.len() - 1);

        Ok(DeleteOutcome {
            root: id.clone(),
            removed,
        })
    }
}
