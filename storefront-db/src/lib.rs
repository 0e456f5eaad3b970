//! SQLite persistence layer for the storefront catalog.
//!
//! Provides schema creation and migration, seeding, and the query API
//! backed by SQLite (via rusqlite with bundled feature).

pub mod migrate;
pub mod operations;
pub mod queries;
pub mod schema;
pub mod store;

pub use operations::{OperationError, SeedStats, insert_product, seed_products};
pub use queries::{
    IndexRow, ScanPlan, SortPlan, count_products, field_extremes, index_for_field, list_all,
    list_indexes, ordered_scan, scan_plan, sort_plan, unique_values,
};
pub use schema::{
    DbLocation, SchemaError, connect, open_database, open_memory, schema_version, upgrade,
};
pub use store::{CatalogStore, StoreConfig, StoreError, StoreState};
