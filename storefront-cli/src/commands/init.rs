use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use storefront_lib::{AppError, StorefrontContext};

use crate::CliError;

/// Report the state of a freshly initialized catalog.
pub(crate) fn run_init(ctx: &StorefrontContext) -> Result<(), CliError> {
    let store = ctx.store();
    let products = store.list_all().map_err(AppError::from)?;

    log::info!(
        "{}",
        "Catalog ready".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  State:          {}", store.state());
    log::info!("  Schema version: {}", store.version());
    log::info!("  Products:       {}", products.len());
    log::info!(
        "  Preferences:    {} ({})",
        ctx.prefs().dir().display(),
        ctx.prefs().namespace(),
    );
    Ok(())
}
