//! Read queries for the product store.
//!
//! Ordered scans use a field's derived index when one is registered. Unique
//! value and boundary lookups do the same and fall back to an explicit full
//! scan when the field has no index.

use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params};
use storefront_catalog::{Field, FieldType, FieldValue, Product};

use crate::operations::OperationError;
use crate::schema::{field_expr, field_path};

// ── Plans ───────────────────────────────────────────────────────────────────

/// How a field is read: through its derived index or by scanning every document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanPlan {
    Index(String),
    FullScan,
}

/// Base ordering chosen for a sorted query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortPlan {
    /// Scan through the field's index, ascending by field value.
    Index { index: String, field: Field },
    /// Scan in primary-key order. `fallback_from` names the requested sort
    /// field when it had no index.
    PrimaryKey { fallback_from: Option<Field> },
}

impl SortPlan {
    pub fn is_fallback(&self) -> bool {
        matches!(self, SortPlan::PrimaryKey { fallback_from: Some(_) })
    }
}

/// A registered derived index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub name: String,
    pub field: String,
}

// ── Index registry ──────────────────────────────────────────────────────────

/// List all derived indexes, by name.
pub fn list_indexes(conn: &Connection) -> Result<Vec<IndexRow>, OperationError> {
    let mut stmt = conn.prepare("SELECT name, field FROM product_indexes ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok(IndexRow {
            name: row.get(0)?,
            field: row.get(1)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Name of an index on `field`, if one exists.
pub fn index_for_field(conn: &Connection, field: Field) -> Result<Option<String>, OperationError> {
    let name = conn
        .query_row(
            "SELECT name FROM product_indexes WHERE field = ?1 ORDER BY name LIMIT 1",
            params![field.as_str()],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(name)
}

pub fn scan_plan(conn: &Connection, field: Field) -> Result<ScanPlan, OperationError> {
    Ok(match index_for_field(conn, field)? {
        Some(index) => ScanPlan::Index(index),
        None => ScanPlan::FullScan,
    })
}

/// Choose the base ordering for sorting by `field`.
pub fn sort_plan(conn: &Connection, field: Field) -> Result<SortPlan, OperationError> {
    if field.is_primary_key() {
        return Ok(SortPlan::PrimaryKey {
            fallback_from: None,
        });
    }
    Ok(match index_for_field(conn, field)? {
        Some(index) => SortPlan::Index { index, field },
        None => SortPlan::PrimaryKey {
            fallback_from: Some(field),
        },
    })
}

// ── Product scans ───────────────────────────────────────────────────────────

/// Count products in the store.
pub fn count_products(conn: &Connection) -> Result<usize, OperationError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |r| r.get(0))?;
    Ok(count as usize)
}

/// Every product, in primary-key order.
pub fn list_all(conn: &Connection) -> Result<Vec<Product>, OperationError> {
    ordered_scan(conn, &SortPlan::PrimaryKey { fallback_from: None })
}

/// Every product in the plan's ascending order. Ties on an indexed field
/// keep primary-key order.
pub fn ordered_scan(conn: &Connection, plan: &SortPlan) -> Result<Vec<Product>, OperationError> {
    let sql = match plan {
        SortPlan::Index { field, .. } => format!(
            "SELECT data FROM products ORDER BY {} ASC, name ASC",
            field_expr(*field)
        ),
        SortPlan::PrimaryKey { .. } => "SELECT data FROM products ORDER BY name ASC".to_string(),
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut products = Vec::new();
    for data in rows {
        products.push(serde_json::from_str(&data?)?);
    }
    Ok(products)
}

// ── Field lookups ───────────────────────────────────────────────────────────

/// Distinct values of `field`, ascending, resolved to `ty` when given.
/// Values that cannot be resolved are skipped.
pub fn unique_values(
    conn: &Connection,
    field: Field,
    ty: Option<FieldType>,
    plan: &ScanPlan,
) -> Result<Vec<FieldValue>, OperationError> {
    let raw: Vec<FieldValue> = match plan {
        ScanPlan::Index(_) => {
            let expr = field_expr(field);
            let mut stmt = conn.prepare(&format!(
                "SELECT DISTINCT {expr} FROM products WHERE {expr} IS NOT NULL ORDER BY {expr}"
            ))?;
            let rows = stmt.query_map([], |row| row.get::<_, Value>(0))?;
            let mut values = Vec::new();
            for value in rows {
                values.extend(from_sql(value?));
            }
            values
        }
        ScanPlan::FullScan => list_all(conn)?
            .iter()
            .map(|product| field.read(product))
            .collect(),
    };

    let mut values: Vec<FieldValue> = raw
        .into_iter()
        .filter_map(|value| match ty {
            Some(ty) => value.resolve(ty),
            None => Some(value),
        })
        .collect();
    values.sort_by(compare_values);
    values.dedup();
    Ok(values)
}

/// Lowest and highest value of `field` resolved to `ty`, or `None` when no
/// document holds a value that resolves.
///
/// Text fields accept every stored value, since numbers resolve to text.
pub fn field_extremes(
    conn: &Connection,
    field: Field,
    ty: Option<FieldType>,
    plan: &ScanPlan,
) -> Result<Option<(FieldValue, FieldValue)>, OperationError> {
    let type_filter = match ty {
        Some(FieldType::Number) => "IN ('integer', 'real')",
        Some(FieldType::Date) => "= 'text'",
        Some(FieldType::Text) => {
            let values = unique_values(conn, field, ty, plan)?;
            return Ok(values.first().cloned().zip(values.last().cloned()));
        }
        None => "IS NOT NULL",
    };
    let expr = field_expr(field);
    let path = field_path(field);

    let (min, max) = match plan {
        ScanPlan::Index(_) => {
            // First and last entries of the index.
            let first = |order: &str| -> Result<Option<Value>, rusqlite::Error> {
                conn.query_row(
                    &format!(
                        "SELECT {expr} FROM products WHERE json_type(data, ?1) {type_filter}
                         ORDER BY {expr} {order} LIMIT 1"
                    ),
                    params![path],
                    |row| row.get(0),
                )
                .optional()
            };
            (first("ASC")?, first("DESC")?)
        }
        ScanPlan::FullScan => conn.query_row(
            &format!(
                "SELECT MIN({expr}), MAX({expr}) FROM products WHERE json_type(data, ?1) {type_filter}"
            ),
            params![path],
            |row| Ok((row.get::<_, Option<Value>>(0)?, row.get::<_, Option<Value>>(1)?)),
        )?,
    };

    let resolve = |value: Option<Value>| {
        let value = from_sql(value?)?;
        match ty {
            Some(ty) => value.resolve(ty),
            None => Some(value),
        }
    };
    Ok(resolve(min).zip(resolve(max)))
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn from_sql(value: Value) -> Option<FieldValue> {
    match value {
        Value::Integer(i) => Some(FieldValue::Number(i as f64)),
        Value::Real(f) => Some(FieldValue::Number(f)),
        Value::Text(s) => Some(FieldValue::Text(s)),
        Value::Null | Value::Blob(_) => None,
    }
}

/// Index key order: numbers before text, dates by calendar order.
fn compare_values(a: &FieldValue, b: &FieldValue) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => x.total_cmp(y),
        (FieldValue::Date(x), FieldValue::Date(y)) => x.cmp(y),
        (FieldValue::Text(x), FieldValue::Text(y)) => x.cmp(y),
        (FieldValue::Number(_), _) => Ordering::Less,
        (_, FieldValue::Number(_)) => Ordering::Greater,
        (FieldValue::Date(_), FieldValue::Text(_)) => Ordering::Less,
        (FieldValue::Text(_), FieldValue::Date(_)) => Ordering::Greater,
    }
}
