//! Filter, sort, and search state, and the in-memory half of a query.
//!
//! The state types are owned by the presentation layer and passed into
//! queries; they are serializable so a preferences store can persist them
//! between sessions.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::migration::FieldTypes;
use crate::types::{Field, FieldValue, Product};

// ── Filter state ────────────────────────────────────────────────────────────

/// Constraint contributed by one filter widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    /// Accepted discrete values, compared as strings. Empty means unconstrained.
    Values(BTreeSet<String>),
    /// Inclusive numeric bounds.
    Range { min: f64, max: f64 },
}

impl Criterion {
    fn is_unconstrained(&self) -> bool {
        matches!(self, Criterion::Values(values) if values.is_empty())
    }
}

/// Filter label (lower-cased) to criterion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    criteria: BTreeMap<String, Criterion>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_values<I, S>(&mut self, label: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.criteria.insert(
            label.to_lowercase(),
            Criterion::Values(values.into_iter().map(Into::into).collect()),
        );
    }

    pub fn set_range(&mut self, label: &str, min: f64, max: f64) {
        self.criteria
            .insert(label.to_lowercase(), Criterion::Range { min, max });
    }

    pub fn remove(&mut self, label: &str) -> Option<Criterion> {
        self.criteria.remove(&label.to_lowercase())
    }

    pub fn get(&self, label: &str) -> Option<&Criterion> {
        self.criteria.get(&label.to_lowercase())
    }

    pub fn clear(&mut self) {
        self.criteria.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Criterion)> {
        self.criteria.iter().map(|(label, c)| (label.as_str(), c))
    }

    /// True when no filter constrains the result.
    pub fn is_empty(&self) -> bool {
        self.criteria.values().all(Criterion::is_unconstrained)
    }

    /// Criteria that actually constrain results, keyed by field.
    ///
    /// Labels that do not name a product field are skipped with a warning.
    pub fn constraints(&self) -> Vec<(Field, &Criterion)> {
        self.criteria
            .iter()
            .filter(|(_, criterion)| !criterion.is_unconstrained())
            .filter_map(|(label, criterion)| match label.parse::<Field>() {
                Ok(field) => Some((field, criterion)),
                Err(e) => {
                    log::warn!("Ignoring filter: {e}");
                    None
                }
            })
            .collect()
    }
}

// ── Sort state ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "up")]
    Ascending,
    #[serde(rename = "down")]
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: Field,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::ascending(Field::Name)
    }
}

// ── Matching ────────────────────────────────────────────────────────────────

/// Read `field` from `product`, resolved against the current field types.
///
/// A field with no declared type is returned in its stored form.
pub fn resolved_value(product: &Product, field: Field, types: &FieldTypes) -> Option<FieldValue> {
    let value = field.read(product);
    match types.get(field) {
        Some(ty) => value.resolve(ty),
        None => Some(value),
    }
}

/// Whether `product` satisfies one criterion on `field`.
pub fn matches_criterion(
    product: &Product,
    field: Field,
    criterion: &Criterion,
    types: &FieldTypes,
) -> bool {
    let Some(value) = resolved_value(product, field, types) else {
        return false;
    };
    match criterion {
        Criterion::Values(accepted) => accepted.is_empty() || accepted.contains(&value.to_string()),
        Criterion::Range { min, max } => value
            .as_number()
            .is_some_and(|n| n >= *min && n <= *max),
    }
}

/// Case-insensitive substring match on the product name. A blank term matches everything.
pub fn matches_search(name: &str, term: &str) -> bool {
    let term = term.trim();
    term.is_empty() || name.to_lowercase().contains(&term.to_lowercase())
}

/// Keep the products that satisfy every constraint and the search term,
/// preserving their order.
pub fn apply_filters(
    products: Vec<Product>,
    filters: &FilterState,
    search: Option<&str>,
    types: &FieldTypes,
) -> Vec<Product> {
    let constraints = filters.constraints();
    products
        .into_iter()
        .filter(|product| {
            constraints
                .iter()
                .all(|(field, criterion)| matches_criterion(product, *field, criterion, types))
        })
        .filter(|product| search.is_none_or(|term| matches_search(&product.name, term)))
        .collect()
}
