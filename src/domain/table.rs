use std::collections::{HashMap, HashSet};

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::{instrument, warn};

use crate::domain::entities::{Unit, UnitId};

/// Entry in the arena-backed unit table.
#[derive(Debug)]
pub struct TableEntry<'a> {
    /// The stored record
    pub unit: &'a Unit,
    /// Index of the parent entry, None for roots and dangling references
    pub parent: Option<Index>,
    /// Indices of child entries, in store order
    pub children: Vec<Index>,
}

/// Node table keyed by id with a parent-id index.
///
/// Built in one pass over a flat unit slice. Children keep the order in which
/// the store returned them. Parent links are not level-checked here. A record
/// repeating an earlier id is dropped.
#[derive(Debug)]
pub struct UnitTable<'a> {
    arena: Arena<TableEntry<'a>>,
    by_id: HashMap<&'a str, Index>,
    order: Vec<Index>,
}

impl<'a> UnitTable<'a> {
    #[instrument(level = "trace", skip(units), fields(units = units.len()))]
    pub fn new(units: &'a [Unit]) -> Self {
        let mut arena = Arena::with_capacity(units.len());
        let mut by_id = HashMap::with_capacity(units.len());
        let mut order = Vec::with_capacity(units.len());

        for unit in units {
            if by_id.contains_key(unit.id.as_str()) {
                warn!("duplicate unit id {}, keeping first occurrence", unit.id);
                continue;
            }
            let idx = arena.insert(TableEntry {
                unit,
                parent: None,
                children: Vec::new(),
            });
            by_id.insert(unit.id.as_str(), idx);
            order.push(idx);
        }

        // Stable grouping: values keep the order of `order`.
        let grouped = order
            .iter()
            .filter_map(|&idx| {
                let parent_id = arena[idx].unit.parent_id.as_ref()?;
                let parent_idx = *by_id.get(parent_id.as_str())?;
                Some((parent_idx, idx))
            })
            .into_group_map();

        for (parent_idx, children) in grouped {
            for &child in &children {
                arena[child].parent = Some(parent_idx);
            }
            arena[parent_idx].children = children;
        }

        Self {
            arena,
            by_id,
            order,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn index_of(&self, id: &UnitId) -> Option<Index> {
        self.by_id.get(id.as_str()).copied()
    }

    pub fn entry(&self, idx: Index) -> Option<&TableEntry<'a>> {
        self.arena.get(idx)
    }

    pub fn get(&self, id: &UnitId) -> Option<&'a Unit> {
        self.index_of(id)
            .and_then(|idx| self.arena.get(idx))
            .map(|entry| entry.unit)
    }

    /// All units in store order.
    pub fn units(&self) -> impl Iterator<Item = &'a Unit> + '_ {
        self.order.iter().map(move |&idx| self.arena[idx].unit)
    }

    /// Direct children of `id`, in store order.
    pub fn children_of(&self, id: &UnitId) -> Vec<&'a Unit> {
        self.index_of(id)
            .map(|idx| self.children_at(idx).collect())
            .unwrap_or_default()
    }

    fn children_at(&self, idx: Index) -> impl Iterator<Item = &'a Unit> + '_ {
        self.arena
            .get(idx)
            .into_iter()
            .flat_map(|entry| entry.children.iter())
            .map(move |&child| self.arena[child].unit)
    }

    /// Transitive descendants of `id` in pre-order, excluding `id` itself.
    #[instrument(level = "trace", skip(self))]
    pub fn descendants_of(&self, id: &UnitId) -> Vec<&'a Unit> {
        match self.index_of(id) {
            Some(root) => Descendants::new(self, root).map(|(_, e)| e.unit).collect(),
            None => Vec::new(),
        }
    }
}

/// Pre-order walk below a start entry using an explicit stack.
///
/// A visited set keeps cyclic parent links from looping.
pub struct Descendants<'t, 'a> {
    table: &'t UnitTable<'a>,
    stack: Vec<Index>,
    visited: HashSet<Index>,
}

impl<'t, 'a> Descendants<'t, 'a> {
    pub fn new(table: &'t UnitTable<'a>, start: Index) -> Self {
        let mut visited = HashSet::new();
        visited.insert(start);
        let stack = table
            .entry(start)
            .map(|e| e.children.iter().rev().copied().collect())
            .unwrap_or_default();
        Self {
            table,
            stack,
            visited,
        }
    }
}

impl<'t, 'a> Iterator for Descendants<'t, 'a> {
    type Item = (Index, &'t TableEntry<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if !self.visited.insert(current) {
                continue;
            }
            if let Some(entry) = self.table.entry(current) {
                // Reverse so the first child is visited first
                for &child in entry.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current, entry));
            }
        }
        None
    }
}
