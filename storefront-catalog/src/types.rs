//! Data model types for the storefront catalog.
//!
//! These types represent one catalog record and the field vocabulary used
//! by indexes, filters, and sorting. They carry no database dependency.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Product ─────────────────────────────────────────────────────────────────

/// One catalog item. `name` is the primary key of the product store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: f64,
    pub vendor: String,
    pub memory: Memory,
    pub color: String,
    pub stock: u32,
    /// Asset path or URL of the product picture.
    pub image: String,
    /// Last restock date.
    pub date: NaiveDate,
    /// Fan count descriptor ("1", "2", "3", "passive", ...).
    pub fans: String,
}

/// Memory size as stored in a product document.
///
/// Early schema versions declared memory as free text, later ones as a
/// number of gigabytes, so stored documents may hold either form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Memory {
    Gigabytes(u32),
    Label(String),
}

impl fmt::Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Memory::Gigabytes(gb) => write!(f, "{gb} GB"),
            Memory::Label(label) => f.write_str(label),
        }
    }
}

// ── Fields ──────────────────────────────────────────────────────────────────

/// Error returned when a field name does not match any product field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown product field: '{0}'")]
pub struct UnknownField(pub String);

/// Identifier of a product field, used for index, filter, and sort dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Price,
    Vendor,
    Memory,
    Color,
    Stock,
    Image,
    Date,
    Fans,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Name,
        Field::Price,
        Field::Vendor,
        Field::Memory,
        Field::Color,
        Field::Stock,
        Field::Image,
        Field::Date,
        Field::Fans,
    ];

    /// The field's key inside a stored product document.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Price => "price",
            Field::Vendor => "vendor",
            Field::Memory => "memory",
            Field::Color => "color",
            Field::Stock => "stock",
            Field::Image => "image",
            Field::Date => "date",
            Field::Fans => "fans",
        }
    }

    /// `name` is the product store's key path.
    pub fn is_primary_key(self) -> bool {
        self == Field::Name
    }

    /// Accessor that reads this field from a product in its stored form.
    pub fn accessor(self) -> fn(&Product) -> FieldValue {
        match self {
            Field::Name => |p| FieldValue::Text(p.name.clone()),
            Field::Price => |p| FieldValue::Number(p.price),
            Field::Vendor => |p| FieldValue::Text(p.vendor.clone()),
            Field::Memory => |p| match &p.memory {
                Memory::Gigabytes(gb) => FieldValue::Number(f64::from(*gb)),
                Memory::Label(label) => FieldValue::Text(label.clone()),
            },
            Field::Color => |p| FieldValue::Text(p.color.clone()),
            Field::Stock => |p| FieldValue::Number(f64::from(p.stock)),
            Field::Image => |p| FieldValue::Text(p.image.clone()),
            Field::Date => |p| FieldValue::Date(p.date),
            Field::Fans => |p| FieldValue::Text(p.fans.clone()),
        }
    }

    /// Read this field from a product, without type resolution.
    pub fn read(self, product: &Product) -> FieldValue {
        (self.accessor())(product)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == lower)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

// ── Field types and values ──────────────────────────────────────────────────

/// Declared type of a field at some schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
        })
    }
}

/// A single field value read from a product or an index.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl FieldValue {
    /// Coerce this value to the given declared type.
    ///
    /// Returns `None` when the stored value cannot represent that type
    /// (e.g. a text label such as "default" read as a number).
    pub fn resolve(self, ty: FieldType) -> Option<FieldValue> {
        match (self, ty) {
            (value @ FieldValue::Text(_), FieldType::Text) => Some(value),
            (value @ FieldValue::Number(_), FieldType::Number) => Some(value),
            (value @ FieldValue::Date(_), FieldType::Date) => Some(value),
            (FieldValue::Number(n), FieldType::Text) => Some(FieldValue::Text(n.to_string())),
            (FieldValue::Date(d), FieldType::Text) => Some(FieldValue::Text(d.to_string())),
            (FieldValue::Text(s), FieldType::Number) => {
                s.trim().parse::<f64>().ok().map(FieldValue::Number)
            }
            (FieldValue::Text(s), FieldType::Date) => parse_date(&s).map(FieldValue::Date),
            (FieldValue::Number(_), FieldType::Date) | (FieldValue::Date(_), FieldType::Number) => {
                None
            }
        }
    }

    /// Numeric view used by range filters. Dates count days since the Unix epoch.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Date(d) => Some(days_since_epoch(*d) as f64),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Parse an ISO-8601 date, accepting a full timestamp by its date prefix.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| s.get(..10).and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()))
}

/// Days between the Unix epoch and `date` (negative before 1970).
pub fn days_since_epoch(date: NaiveDate) -> i64 {
    // 1970-01-01 is day 719_163 of the common era.
    i64::from(date.num_days_from_ce()) - 719_163
}

/// Inclusive minimum and maximum observed for a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundaries {
    pub min: FieldValue,
    pub max: FieldValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip_case_insensitively() {
        assert_eq!("Vendor".parse::<Field>().unwrap(), Field::Vendor);
        assert_eq!(" price ".parse::<Field>().unwrap(), Field::Price);
        assert!("wattage".parse::<Field>().is_err());
    }

    #[test]
    fn text_resolves_to_number_when_numeric() {
        let value = FieldValue::Text("12".into()).resolve(FieldType::Number);
        assert_eq!(value, Some(FieldValue::Number(12.0)));
        assert_eq!(FieldValue::Text("default".into()).resolve(FieldType::Number), None);
    }

    #[test]
    fn timestamps_resolve_to_dates() {
        let value = FieldValue::Text("2022-07-13T00:00:00.000Z".into()).resolve(FieldType::Date);
        assert_eq!(value, Some(FieldValue::Date(NaiveDate::from_ymd_opt(2022, 7, 13).unwrap())));
    }

    #[test]
    fn dates_count_days_from_epoch() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 11).unwrap();
        assert_eq!(FieldValue::Date(date).as_number(), Some(10.0));
    }
}
