use storefront_lib::{AppError, StorefrontContext};

use crate::CliError;

use super::log_products;

pub(crate) fn run_list(ctx: &StorefrontContext) -> Result<(), CliError> {
    let products = ctx.store().list_all().map_err(AppError::from)?;
    log_products(&products);
    Ok(())
}
