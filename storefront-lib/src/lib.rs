pub mod cart;
pub mod context;
pub mod error;
pub mod prefs;
pub mod settings;

pub use cart::{Cart, CartEntry, CartError};
pub use context::{ContextOptions, SavedView, StorefrontContext};
pub use error::AppError;
pub use prefs::{PreferencesStore, PrefsError};
pub use settings::{DEFAULT_NAMESPACE, Settings, settings_path};
