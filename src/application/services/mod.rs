//! Application services

pub mod lineage;

pub use lineage::{LineagePage, LineageService};
