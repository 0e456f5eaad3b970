//! Write operations on the product store.

use rusqlite::{Connection, ffi, params};
use storefront_catalog::Product;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Malformed product document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate product name '{0}'")]
    DuplicateKey(String),
    #[error("Product '{0}' has a price that is not a finite number")]
    InvalidRecord(String),
}

/// Counts from a seeding pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedStats {
    pub cleared: usize,
    pub inserted: usize,
}

/// Replace the whole product store with `products` in one write transaction.
///
/// A primary-key conflict aborts the transaction, leaving the previous
/// contents in place.
pub fn seed_products(conn: &mut Connection, products: &[Product]) -> Result<SeedStats, OperationError> {
    let tx = conn.transaction()?;
    let cleared = tx.execute("DELETE FROM products", [])?;

    for product in products {
        insert_product(&tx, product)?;
    }

    tx.commit()?;
    Ok(SeedStats {
        cleared,
        inserted: products.len(),
    })
}

/// Insert a single product. Fails with [`OperationError::DuplicateKey`] if
/// a product with the same name exists, and with
/// [`OperationError::InvalidRecord`] if the price is NaN or infinite, which
/// JSON cannot represent.
pub fn insert_product(conn: &Connection, product: &Product) -> Result<(), OperationError> {
    if !product.price.is_finite() {
        return Err(OperationError::InvalidRecord(product.name.clone()));
    }
    let data = serde_json::to_string(product)?;
    match conn.execute(
        "INSERT INTO products (name, data) VALUES (?1, ?2)",
        params![product.name, data],
    ) {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            Err(OperationError::DuplicateKey(product.name.clone()))
        }
        Err(e) => Err(e.into()),
    }
}
