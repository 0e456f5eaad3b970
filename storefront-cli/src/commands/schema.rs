use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use storefront_catalog::{Field, SortState};
use storefront_lib::{AppError, StorefrontContext};

use crate::CliError;

/// Show the schema version, declared field types, and live indexes.
pub(crate) fn run_schema(ctx: &StorefrontContext) -> Result<(), CliError> {
    let store = ctx.store();
    let indexes = store.indexes().map_err(AppError::from)?;

    log::info!(
        "{}",
        "Catalog Schema".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Version: {}", store.version());
    crate::log_blank();

    log::info!("  Fields:");
    for (field, ty) in store.field_types().iter() {
        log::info!("    {:<8} {ty}", field.as_str());
    }
    crate::log_blank();

    log::info!("  Indexes:");
    for index in &indexes {
        log::info!(
            "    {:<12} on {}",
            index.name.if_supports_color(Stdout, |t| t.cyan()),
            index.field,
        );
    }
    crate::log_blank();

    let unsorted: Vec<&str> = Field::ALL
        .iter()
        .filter(|field| {
            store
                .sort_plan(&SortState::ascending(**field))
                .is_ok_and(|plan| plan.is_fallback())
        })
        .map(|field| field.as_str())
        .collect();
    if !unsorted.is_empty() {
        log::info!(
            "  Sorting by {} falls back to name order",
            unsorted.join(", ").if_supports_color(Stdout, |t| t.yellow()),
        );
    }
    Ok(())
}
