//! Tree builder: reconstructs the union-rooted forest from the flat unit collection.
//!
//! Assembly groups children by parent id once (see [`UnitTable`]) and then walks
//! top-down, so the cost is linear in the number of units. Children appear in the
//! order the store returned them. A unit whose parent is missing, or is not at the
//! level directly above it, is left out of the forest.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::entities::{Level, Unit, UnitId, UnitNode};
use crate::domain::table::UnitTable;

/// A ward with its booths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardTree {
    #[serde(flatten)]
    pub unit: UnitNode,
    pub booths: Vec<UnitNode>,
}

/// A village with its wards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillageTree {
    #[serde(flatten)]
    pub unit: UnitNode,
    pub wards: Vec<WardTree>,
}

/// A union with its villages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionTree {
    #[serde(flatten)]
    pub unit: UnitNode,
    pub villages: Vec<VillageTree>,
}

/// Number of placed units per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    pub unions: usize,
    pub villages: usize,
    pub wards: usize,
    pub booths: usize,
}

impl LevelCounts {
    pub fn total(&self) -> usize {
        self.unions + self.villages + self.wards + self.booths
    }
}

/// The collection of all union-rooted trees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    unions: Vec<UnionTree>,
}

impl Forest {
    pub fn new(unions: Vec<UnionTree>) -> Self {
        Self { unions }
    }

    pub fn unions(&self) -> &[UnionTree] {
        &self.unions
    }

    pub fn is_empty(&self) -> bool {
        self.unions.is_empty()
    }

    /// All nodes in pre-order: each union, then its villages, each followed by
    /// its wards, each followed by its booths.
    pub fn flatten(&self) -> Vec<&UnitNode> {
        let mut nodes = Vec::new();
        for union in &self.unions {
            nodes.push(&union.unit);
            for village in &union.villages {
                nodes.push(&village.unit);
                for ward in &village.wards {
                    nodes.push(&ward.unit);
                    nodes.extend(ward.booths.iter());
                }
            }
        }
        nodes
    }

    pub fn find(&self, id: &str) -> Option<&UnitNode> {
        self.flatten().into_iter().find(|node| node.id == id)
    }

    pub fn stats(&self) -> LevelCounts {
        let mut counts = LevelCounts::default();
        for node in self.flatten() {
            match node.level {
                Level::Union => counts.unions += 1,
                Level::Village => counts.villages += 1,
                Level::Ward => counts.wards += 1,
                Level::Booth => counts.booths += 1,
            }
        }
        counts
    }
}

/// Builds a [`Forest`] from a flat unit list and remembers which units were
/// left out.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    orphans: Vec<UnitId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Units excluded by the last [`build`](Self::build), in store order.
    pub fn orphans(&self) -> &[UnitId] {
        &self.orphans
    }

    #[instrument(level = "debug", skip_all, fields(units = units.len()))]
    pub fn build(&mut self, units: &[Unit]) -> Forest {
        self.orphans.clear();

        let table = UnitTable::new(units);
        let mut placed: HashSet<&UnitId> = HashSet::with_capacity(units.len());

        let children_at = |parent: &Unit, level: Level| {
            table
                .children_of(&parent.id)
                .into_iter()
                .filter(|child| child.level == level)
                .collect::<Vec<_>>()
        };

        let mut unions = Vec::new();
        for union in table.units().filter(|u| u.level == Level::Union) {
            placed.insert(&union.id);
            let mut villages = Vec::new();
            for village in children_at(union, Level::Village) {
                placed.insert(&village.id);
                let mut wards = Vec::new();
                for ward in children_at(village, Level::Ward) {
                    placed.insert(&ward.id);
                    let booths: Vec<UnitNode> = children_at(ward, Level::Booth)
                        .into_iter()
                        .inspect(|&booth| {
                            placed.insert(&booth.id);
                        })
                        .map(UnitNode::from)
                        .collect();
                    wards.push(WardTree {
                        unit: UnitNode::from(ward),
                        booths,
                    });
                }
                villages.push(VillageTree {
                    unit: UnitNode::from(village),
                    wards,
                });
            }
            unions.push(UnionTree {
                unit: UnitNode::from(union),
                villages,
            });
        }

        self.orphans = table
            .units()
            .filter(|u| !placed.contains(&u.id))
            .map(|u| u.id.clone())
            .collect();
        if !self.orphans.is_empty() {
            debug!("excluded {} orphaned units", self.orphans.len());
        }

        Forest::new(unions)
    }
}

/// Build the forest without keeping orphan diagnostics.
pub fn build_forest(units: &[Unit]) -> Forest {
    TreeBuilder::new().build(units)
}
