//! Storefront catalog data model, migration history, seed data, and
//! in-memory filtering.
//!
//! This crate defines the product record and the query vocabulary without
//! any database dependency. `storefront-db` persists these types and runs
//! the migration history against SQLite.

pub mod filter;
pub mod migration;
pub mod seed;
pub mod types;

pub use filter::{
    Criterion, FilterState, SortDirection, SortState, apply_filters, matches_criterion,
    matches_search, resolved_value,
};
pub use migration::{
    FieldTypes, HistoryError, MigrationBatch, MigrationHistory, MigrationStep, SchemaVersion,
    PLACEHOLDER_IMAGE,
};
pub use seed::{SeedError, default_products, load_seed_file};
pub use types::*;
