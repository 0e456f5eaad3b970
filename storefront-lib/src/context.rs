//! Storefront context: an initialized catalog store plus the user's
//! preferences.
//!
//! This is the main entry point for front ends. Build a context from the
//! settings file, then query the catalog and manage the saved view and
//! cart through it.

use std::path::PathBuf;

use storefront_catalog::{FilterState, Product, SortState, load_seed_file};
use storefront_db::{CatalogStore, DbLocation, StoreConfig};

use crate::cart::Cart;
use crate::error::AppError;
use crate::prefs::PreferencesStore;
use crate::settings::Settings;

/// Filter, sort, and search state as the user last left it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedView {
    pub filters: FilterState,
    pub sort: SortState,
    pub search: Option<String>,
}

/// Overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    pub database: Option<PathBuf>,
    pub seed_file: Option<PathBuf>,
}

pub struct StorefrontContext {
    store: CatalogStore,
    prefs: PreferencesStore,
}

impl StorefrontContext {
    /// Resolve paths from `settings` and `options`, then open, migrate, and
    /// seed the catalog. The context is only returned once the store is ready.
    pub fn open(settings: &Settings, options: ContextOptions) -> Result<Self, AppError> {
        let database = settings.database_path(options.database);
        let mut config = StoreConfig::new(DbLocation::File(database));
        if let Some(seed_file) = settings.seed_file(options.seed_file) {
            log::info!("Loading seed list from {}", seed_file.display());
            config = config.with_seed(load_seed_file(&seed_file)?);
        }

        let prefs = PreferencesStore::new(
            settings.preferences_dir(),
            settings.preferences.namespace.clone(),
        );
        Self::start(config, prefs)
    }

    /// Initialize a store from `config` and pair it with `prefs`.
    pub fn start(config: StoreConfig, prefs: PreferencesStore) -> Result<Self, AppError> {
        let mut store = CatalogStore::new(config);
        store.initialize()?;
        Ok(Self { store, prefs })
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn prefs(&self) -> &PreferencesStore {
        &self.prefs
    }

    /// The saved view, with defaults for anything never saved.
    pub fn saved_view(&self) -> Result<SavedView, AppError> {
        Ok(SavedView {
            filters: self.prefs.load_filters()?.unwrap_or_default(),
            sort: self.prefs.load_sort()?.unwrap_or_default(),
            search: self.prefs.load_search_term()?,
        })
    }

    pub fn save_view(&self, view: &SavedView) -> Result<(), AppError> {
        self.prefs.save_filters(&view.filters)?;
        self.prefs.save_sort(&view.sort)?;
        self.prefs
            .save_search_term(view.search.as_deref().unwrap_or_default())?;
        Ok(())
    }

    pub fn query(&self, view: &SavedView) -> Result<Vec<Product>, AppError> {
        Ok(self
            .store
            .query(&view.filters, &view.sort, view.search.as_deref())?)
    }

    pub fn find_product(&self, name: &str) -> Result<Product, AppError> {
        self.store
            .list_all()?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| AppError::unknown_product(name))
    }

    pub fn cart(&self) -> Result<Cart, AppError> {
        Ok(self.prefs.load_cart()?.unwrap_or_default())
    }

    /// Add one unit of the named product and persist the cart.
    pub fn add_to_cart(&self, name: &str) -> Result<Cart, AppError> {
        let product = self.find_product(name)?;
        let mut cart = self.cart()?;
        cart.add(product);
        self.prefs.save_cart(&cart)?;
        Ok(cart)
    }

    pub fn remove_from_cart(&self, name: &str) -> Result<Cart, AppError> {
        let mut cart = self.cart()?;
        cart.remove(name)?;
        self.prefs.save_cart(&cart)?;
        Ok(cart)
    }

    pub fn clear_cart(&self) -> Result<(), AppError> {
        self.prefs.save_cart(&Cart::new())?;
        Ok(())
    }

    /// Forget the saved view and the cart.
    pub fn reset_preferences(&self) -> Result<(), AppError> {
        self.prefs.clear()?;
        log::info!("Cleared preferences for '{}'", self.prefs.namespace());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_catalog::{Field, SortDirection};
    use tempfile::TempDir;

    fn memory_context(tmp: &TempDir) -> StorefrontContext {
        StorefrontContext::start(
            StoreConfig::new(DbLocation::Memory),
            PreferencesStore::new(tmp.path(), "test"),
        )
        .unwrap()
    }

    #[test]
    fn fresh_context_has_default_view() {
        let tmp = TempDir::new().unwrap();
        let ctx = memory_context(&tmp);
        assert_eq!(ctx.saved_view().unwrap(), SavedView::default());
        assert_eq!(ctx.query(&SavedView::default()).unwrap().len(), 25);
    }

    #[test]
    fn saved_view_survives_restart() {
        let tmp = TempDir::new().unwrap();
        let mut view = SavedView::default();
        view.filters.set_values("vendor", ["Palit"]);
        view.sort = SortState::descending(Field::Price);
        view.search = Some("rtx".to_string());

        memory_context(&tmp).save_view(&view).unwrap();

        let ctx = memory_context(&tmp);
        let restored = ctx.saved_view().unwrap();
        assert_eq!(restored, view);
        assert_eq!(restored.sort.direction, SortDirection::Descending);
        let results = ctx.query(&restored).unwrap();
        assert!(!results.is_empty());
        for product in results {
            assert_eq!(product.vendor, "Palit");
            assert!(product.name.to_lowercase().contains("rtx"));
        }
    }

    #[test]
    fn cart_operations_persist() {
        let tmp = TempDir::new().unwrap();
        let ctx = memory_context(&tmp);
        let name = ctx.store().list_all().unwrap()[0].name.clone();

        ctx.add_to_cart(&name).unwrap();
        let cart = ctx.add_to_cart(&name).unwrap();
        assert_eq!(cart.amount_of(&name), 2);
        assert_eq!(memory_context(&tmp).cart().unwrap().amount_of(&name), 2);

        let cart = ctx.remove_from_cart(&name).unwrap();
        assert_eq!(cart.amount_of(&name), 1);

        ctx.clear_cart().unwrap();
        assert!(ctx.cart().unwrap().is_empty());
    }

    #[test]
    fn unknown_products_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let ctx = memory_context(&tmp);
        assert!(matches!(
            ctx.add_to_cart("Not a card"),
            Err(AppError::UnknownProduct(_))
        ));
        assert!(matches!(
            ctx.remove_from_cart("Not a card"),
            Err(AppError::Cart(_))
        ));
    }

    #[test]
    fn reset_forgets_everything() {
        let tmp = TempDir::new().unwrap();
        let ctx = memory_context(&tmp);
        let name = ctx.store().list_all().unwrap()[0].name.clone();
        ctx.add_to_cart(&name).unwrap();
        ctx.save_view(&SavedView {
            search: Some("gtx".to_string()),
            ..SavedView::default()
        })
        .unwrap();

        ctx.reset_preferences().unwrap();
        assert_eq!(ctx.saved_view().unwrap(), SavedView::default());
        assert!(ctx.cart().unwrap().is_empty());
    }

    #[test]
    fn open_uses_settings_paths() {
        let tmp = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.catalog.database = Some(tmp.path().join("db").join("catalog.db"));
        settings.preferences.directory = Some(tmp.path().join("prefs"));

        let ctx = StorefrontContext::open(&settings, ContextOptions::default()).unwrap();
        assert_eq!(ctx.store().list_all().unwrap().len(), 25);
        assert!(tmp.path().join("db").join("catalog.db").exists());
        assert_eq!(ctx.prefs().dir(), tmp.path().join("prefs"));
    }

    #[test]
    fn missing_seed_file_fails_to_open() {
        let tmp = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.catalog.database = Some(tmp.path().join("catalog.db"));
        let options = ContextOptions {
            database: None,
            seed_file: Some(tmp.path().join("missing.yaml")),
        };
        assert!(matches!(
            StorefrontContext::open(&settings, options),
            Err(AppError::Seed(_))
        ));
    }
}
