//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod decorate;
pub mod display;
pub mod entities;
pub mod error;
pub mod forest;

pub use arena::{NodeData, TreeArena};
pub use builder::{build_forests, BuildOptions, ForestBuilder};
pub use decorate::{annotate, annotate_forest, is_search_active, SearchFilter};
pub use display::TreeNodeConvert;
pub use entities::*;
pub use error::{DomainError, TreeResult};
pub use forest::{graduation_years, select_tree, tree_names};
