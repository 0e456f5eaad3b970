use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use storefront_lib::{Cart, StorefrontContext};

use crate::CliError;

use super::{format_price, truncate_str};

pub(crate) fn run_cart_show(ctx: &StorefrontContext) -> Result<(), CliError> {
    log_cart(&ctx.cart()?);
    Ok(())
}

pub(crate) fn run_cart_add(ctx: &StorefrontContext, name: &str) -> Result<(), CliError> {
    let cart = ctx.add_to_cart(name)?;
    log::info!(
        "{} {name} (x{})",
        "Added".if_supports_color(Stdout, |t| t.green()),
        cart.amount_of(name),
    );
    log_totals(&cart);
    Ok(())
}

pub(crate) fn run_cart_remove(ctx: &StorefrontContext, name: &str) -> Result<(), CliError> {
    let cart = ctx.remove_from_cart(name)?;
    log::info!(
        "{} {name} (x{} left)",
        "Removed".if_supports_color(Stdout, |t| t.yellow()),
        cart.amount_of(name),
    );
    log_totals(&cart);
    Ok(())
}

pub(crate) fn run_cart_clear(ctx: &StorefrontContext) -> Result<(), CliError> {
    ctx.clear_cart()?;
    log::info!("{}", "Cart cleared.".if_supports_color(Stdout, |t| t.bold()));
    Ok(())
}

fn log_cart(cart: &Cart) {
    log::info!("{}", "Cart".if_supports_color(Stdout, |t| t.bold()));
    if cart.is_empty() {
        log::info!("  {}", "(empty)".if_supports_color(Stdout, |t| t.dimmed()));
        return;
    }
    for entry in cart.entries() {
        log::info!(
            "  {:>3} x {:<44} {:>10}",
            entry.amount,
            truncate_str(&entry.product.name, 44),
            format_price(entry.product.price * f64::from(entry.amount)),
        );
    }
    crate::log_blank();
    log_totals(cart);
}

fn log_totals(cart: &Cart) {
    log::info!(
        "  Items: {}  Total: {}",
        cart.total_items(),
        format_price(cart.total_price()).if_supports_color(Stdout, |t| t.cyan()),
    );
}
