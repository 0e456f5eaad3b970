use storefront_catalog::SeedError;
use storefront_db::StoreError;
use thiserror::Error;

use crate::cart::CartError;
use crate::prefs::PrefsError;

/// Errors surfaced by [`StorefrontContext`](crate::StorefrontContext).
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error(transparent)]
    Prefs(#[from] PrefsError),

    #[error(transparent)]
    Cart(#[from] CartError),

    /// No product in the catalog has this name
    #[error("No product named '{0}'")]
    UnknownProduct(String),
}

impl AppError {
    pub fn unknown_product(name: impl Into<String>) -> Self {
        Self::UnknownProduct(name.into())
    }
}
