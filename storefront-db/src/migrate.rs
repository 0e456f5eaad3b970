//! Migration runner: applies one schema change inside the upgrade transaction.

use rusqlite::{Connection, params};
use storefront_catalog::MigrationStep;

use crate::schema::{field_expr, field_path};

/// Apply `step` on `conn`, which is expected to be the open upgrade transaction.
///
/// - Field additions backfill the default into documents that lack the field.
///   The store is reseeded after every upgrade, so this only matters for
///   documents written outside the seed path.
/// - Index additions fail if an index with that name already exists.
/// - Index removals fail if the index does not exist.
pub fn apply(conn: &Connection, step: &MigrationStep) -> Result<(), rusqlite::Error> {
    match step {
        MigrationStep::FieldAdded { field, default, .. } => {
            let path = field_path(*field);
            let backfilled = conn.execute(
                "UPDATE products SET data = json_insert(data, ?1, json(?2))
                 WHERE json_type(data, ?1) IS NULL",
                params![path, default.to_string()],
            )?;
            if backfilled > 0 {
                log::debug!("Backfilled '{field}' on {backfilled} products");
            }
        }
        MigrationStep::IndexAdded { field, index } => {
            conn.execute_batch(&format!(
                "CREATE INDEX \"{index}\" ON products ({})",
                field_expr(*field)
            ))?;
            conn.execute(
                "INSERT INTO product_indexes (name, field) VALUES (?1, ?2)",
                params![index, field.as_str()],
            )?;
        }
        MigrationStep::IndexRemoved { index } => {
            conn.execute_batch(&format!("DROP INDEX \"{index}\""))?;
            conn.execute(
                "DELETE FROM product_indexes WHERE name = ?1",
                params![index],
            )?;
        }
    }
    Ok(())
}
