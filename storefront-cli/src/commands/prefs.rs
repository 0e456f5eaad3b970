use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use storefront_catalog::Criterion;
use storefront_lib::StorefrontContext;

use crate::CliError;

/// Show the saved view and where it is stored.
pub(crate) fn run_prefs_show(ctx: &StorefrontContext) -> Result<(), CliError> {
    let view = ctx.saved_view()?;
    let prefs = ctx.prefs();

    log::info!(
        "{}",
        "Saved Preferences".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!(
        "  Directory: {}",
        prefs.dir().display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!("  Namespace: {}", prefs.namespace());
    crate::log_blank();

    if view.filters.is_empty() {
        log::info!("  Filters: {}", "none".if_supports_color(Stdout, |t| t.dimmed()));
    } else {
        log::info!("  Filters:");
        for (label, criterion) in view.filters.iter() {
            match criterion {
                Criterion::Values(values) => {
                    let values: Vec<&str> = values.iter().map(String::as_str).collect();
                    log::info!("    {label}: {}", values.join(", "));
                }
                Criterion::Range { min, max } => log::info!("    {label}: {min}..{max}"),
            }
        }
    }
    log::info!("  Sort:    {} {:?}", view.sort.field, view.sort.direction);
    log::info!(
        "  Search:  {}",
        view.search.as_deref().unwrap_or("(none)"),
    );
    log::info!("  Cart:    {} item(s)", ctx.cart()?.total_items());
    Ok(())
}

/// Forget the saved view and the cart.
pub(crate) fn run_prefs_reset(ctx: &StorefrontContext) -> Result<(), CliError> {
    ctx.reset_preferences()?;
    log::info!(
        "{}",
        "Preferences reset.".if_supports_color(Stdout, |t| t.bold()),
    );
    Ok(())
}
