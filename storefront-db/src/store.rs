//! Catalog store: lifecycle and query API over the product database.
//!
//! A store moves through `Unopened → Opening → Migrating → Seeding → Ready`.
//! Any failure on the way moves it to `Failed`, which is terminal; retry by
//! building a new store from [`CatalogStore::into_config`].
//!
//! `initialize()` always discards and rebuilds the catalog from the seed
//! list. User-authored catalog changes are not persisted across starts.

use std::fmt;

use rusqlite::Connection;
use storefront_catalog::{
    Boundaries, Field, FieldTypes, FieldValue, FilterState, MigrationHistory, Product,
    SchemaVersion, SortDirection, SortState, apply_filters, default_products,
};
use thiserror::Error;

use crate::operations::{self, OperationError};
use crate::queries::{self, IndexRow, SortPlan};
use crate::schema::{self, DbLocation, SchemaError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Catalog store is not ready (state: {0})")]
    NotReady(StoreState),
    #[error("Catalog store failed to initialize; create a new store to retry")]
    Failed,
    #[error("Migration to version {version} failed at '{step}': {source}")]
    MigrationFailed {
        version: SchemaVersion,
        step: String,
        source: rusqlite::Error,
    },
    #[error("Database is at schema version {found}, newer than the supported version {expected}")]
    VersionAhead {
        expected: SchemaVersion,
        found: SchemaVersion,
    },
    #[error("No data for field '{0}'")]
    NoData(Field),
    #[error("Duplicate product name '{0}' in seed list")]
    DuplicateKey(String),
    #[error("Product '{0}' in seed list has a price that is not a finite number")]
    InvalidRecord(String),
    #[error("I/O error creating {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Malformed product document: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SchemaError> for StoreError {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::Sqlite(e) => StoreError::Sqlite(e),
            SchemaError::Io { path, source } => StoreError::Io { path, source },
            SchemaError::VersionAhead { expected, found } => {
                StoreError::VersionAhead { expected, found }
            }
            SchemaError::MigrationFailed {
                version,
                step,
                source,
            } => StoreError::MigrationFailed {
                version,
                step,
                source,
            },
        }
    }
}

impl From<OperationError> for StoreError {
    fn from(e: OperationError) -> Self {
        match e {
            OperationError::Sqlite(e) => StoreError::Sqlite(e),
            OperationError::Json(e) => StoreError::Json(e),
            OperationError::DuplicateKey(name) => StoreError::DuplicateKey(name),
            OperationError::InvalidRecord(name) => StoreError::InvalidRecord(name),
        }
    }
}

/// Lifecycle state of a [`CatalogStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Unopened,
    Opening,
    Migrating {
        from: SchemaVersion,
        to: SchemaVersion,
    },
    Seeding,
    Ready,
    Failed,
}

impl fmt::Display for StoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreState::Unopened => f.write_str("unopened"),
            StoreState::Opening => f.write_str("opening"),
            StoreState::Migrating { from, to } => write!(f, "migrating v{from} -> v{to}"),
            StoreState::Seeding => f.write_str("seeding"),
            StoreState::Ready => f.write_str("ready"),
            StoreState::Failed => f.write_str("failed"),
        }
    }
}

/// Everything a store needs to open, migrate, and seed its database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub location: DbLocation,
    pub history: MigrationHistory,
    pub seed: Vec<Product>,
}

impl StoreConfig {
    /// Built-in history and seed list at the given location.
    pub fn new(location: DbLocation) -> Self {
        Self {
            location,
            history: MigrationHistory::default(),
            seed: default_products(),
        }
    }

    pub fn with_history(mut self, history: MigrationHistory) -> Self {
        self.history = history;
        self
    }

    pub fn with_seed(mut self, seed: Vec<Product>) -> Self {
        self.seed = seed;
        self
    }
}

pub struct CatalogStore {
    config: StoreConfig,
    conn: Option<Connection>,
    state: StoreState,
    field_types: FieldTypes,
}

impl CatalogStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            conn: None,
            state: StoreState::Unopened,
            field_types: FieldTypes::default(),
        }
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    /// The schema version this store runs at.
    pub fn version(&self) -> SchemaVersion {
        self.config.history.version()
    }

    pub fn history(&self) -> &MigrationHistory {
        &self.config.history
    }

    /// Field types as of the current schema version.
    pub fn field_types(&self) -> &FieldTypes {
        &self.field_types
    }

    /// Give back the configuration, e.g. to retry after a failure.
    pub fn into_config(self) -> StoreConfig {
        self.config
    }

    /// Open the database, run pending migrations, then clear and reseed the
    /// product store. Calling it again on a ready store reseeds.
    pub fn initialize(&mut self) -> Result<(), StoreError> {
        if self.state == StoreState::Failed {
            return Err(StoreError::Failed);
        }

        match self.try_initialize() {
            Ok(()) => {
                self.state = StoreState::Ready;
                Ok(())
            }
            Err(e) => {
                log::error!("Catalog store initialization failed: {e}");
                self.state = StoreState::Failed;
                self.conn = None;
                Err(e)
            }
        }
    }

    fn try_initialize(&mut self) -> Result<(), StoreError> {
        let mut conn = match self.conn.take() {
            Some(conn) => conn,
            None => self.open()?,
        };

        self.state = StoreState::Seeding;
        let stats = operations::seed_products(&mut conn, &self.config.seed)?;
        log::info!(
            "Seeded {} products (replaced {})",
            stats.inserted,
            stats.cleared
        );

        self.conn = Some(conn);
        Ok(())
    }

    fn open(&mut self) -> Result<Connection, StoreError> {
        self.state = StoreState::Opening;
        let mut conn = schema::connect(&self.config.location)?;

        let from = schema::schema_version(&conn)?;
        let to = self.config.history.version();
        if from < to {
            self.state = StoreState::Migrating { from, to };
        }
        schema::upgrade(&mut conn, &self.config.history)?;

        self.field_types = self.config.history.field_types_at(to);
        Ok(conn)
    }

    fn ready_conn(&self) -> Result<&Connection, StoreError> {
        match (&self.state, &self.conn) {
            (StoreState::Ready, Some(conn)) => Ok(conn),
            _ => Err(StoreError::NotReady(self.state)),
        }
    }

    /// Every product, in primary-key order.
    pub fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        let conn = self.ready_conn()?;
        Ok(queries::list_all(conn)?)
    }

    /// Distinct values of `field`, used to build value-filter option lists.
    pub fn unique_values_for_field(&self, field: Field) -> Result<Vec<FieldValue>, StoreError> {
        let conn = self.ready_conn()?;
        let plan = queries::scan_plan(conn, field)?;
        log::debug!("Unique values for '{field}' via {plan:?}");
        Ok(queries::unique_values(
            conn,
            field,
            self.field_types.get(field),
            &plan,
        )?)
    }

    /// Minimum and maximum of `field`, used to bound range filters.
    pub fn boundaries_for_field(&self, field: Field) -> Result<Boundaries, StoreError> {
        let conn = self.ready_conn()?;
        let plan = queries::scan_plan(conn, field)?;
        log::debug!("Boundaries for '{field}' via {plan:?}");
        let (min, max) = queries::field_extremes(conn, field, self.field_types.get(field), &plan)?
            .ok_or(StoreError::NoData(field))?;
        Ok(Boundaries { min, max })
    }

    /// Base ordering a query sorted by `sort` would use.
    pub fn sort_plan(&self, sort: &SortState) -> Result<SortPlan, StoreError> {
        let conn = self.ready_conn()?;
        Ok(queries::sort_plan(conn, sort.field)?)
    }

    /// Derived indexes present in the database.
    pub fn indexes(&self) -> Result<Vec<IndexRow>, StoreError> {
        let conn = self.ready_conn()?;
        Ok(queries::list_indexes(conn)?)
    }

    /// Filtered, searched, and sorted products.
    ///
    /// The base order comes from the sort field's index, or primary-key order
    /// when the field has none. Descending order reverses the filtered result.
    pub fn query(
        &self,
        filters: &FilterState,
        sort: &SortState,
        search: Option<&str>,
    ) -> Result<Vec<Product>, StoreError> {
        let conn = self.ready_conn()?;
        let plan = queries::sort_plan(conn, sort.field)?;
        if let SortPlan::PrimaryKey {
            fallback_from: Some(field),
        } = &plan
        {
            log::debug!("No index on '{field}', sorting by name instead");
        }

        let base = queries::ordered_scan(conn, &plan)?;
        let mut products = apply_filters(base, filters, search, &self.field_types);
        if sort.direction == SortDirection::Descending {
            products.reverse();
        }
        Ok(products)
    }
}
