use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use storefront_catalog::Field;
use storefront_lib::{AppError, StorefrontContext};

use crate::CliError;

/// List the distinct values of a field.
pub(crate) fn run_values(ctx: &StorefrontContext, field: Field) -> Result<(), CliError> {
    let values = ctx
        .store()
        .unique_values_for_field(field)
        .map_err(AppError::from)?;

    log::info!(
        "{}",
        format!("Values of '{field}'").if_supports_color(Stdout, |t| t.bold()),
    );
    for value in &values {
        log::info!("  {value}");
    }
    if values.is_empty() {
        log::info!("  {}", "(none)".if_supports_color(Stdout, |t| t.dimmed()));
    }
    Ok(())
}

/// Show the range a range filter on this field can take.
pub(crate) fn run_bounds(ctx: &StorefrontContext, field: Field) -> Result<(), CliError> {
    let bounds = ctx
        .store()
        .boundaries_for_field(field)
        .map_err(AppError::from)?;

    log::info!(
        "{}",
        format!("Bounds of '{field}'").if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Min: {}", bounds.min.if_supports_color(Stdout, |t| t.cyan()));
    log::info!("  Max: {}", bounds.max.if_supports_color(Stdout, |t| t.cyan()));
    Ok(())
}
