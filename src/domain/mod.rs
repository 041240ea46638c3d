//! Domain layer: entities and hierarchy rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod entities;
pub mod error;
pub mod photo;
pub mod table;
pub mod validation;

pub use builder::{build_forest, Forest, LevelCounts, TreeBuilder, UnionTree, VillageTree, WardTree};
pub use entities::*;
pub use error::DomainError;
pub use photo::{encode_data_uri, mime_for_path, Photo};
pub use table::UnitTable;
pub use validation::{check_parent, normalize_patch, validate_draft};
