pub(crate) mod cart;
pub(crate) mod config;
pub(crate) mod field;
pub(crate) mod init;
pub(crate) mod list;
pub(crate) mod prefs;
pub(crate) mod query;
pub(crate) mod schema;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use storefront_catalog::Product;

/// Truncate a string to a maximum width in characters, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max).collect()
    }
}

pub(crate) fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

/// Log products as a table, one row per product.
pub(crate) fn log_products(products: &[Product]) {
    log::info!(
        "{}",
        format!(
            "  {:<44} {:>10}  {:<10} {:>7}  {:<8} {:>5}  {:<10}",
            "Name", "Price", "Vendor", "Memory", "Color", "Stock", "Date",
        )
        .if_supports_color(Stdout, |t| t.bold()),
    );
    for product in products {
        log::info!(
            "  {:<44} {:>10}  {:<10} {:>7}  {:<8} {:>5}  {}",
            truncate_str(&product.name, 44),
            format_price(product.price),
            truncate_str(&product.vendor, 10),
            product.memory.to_string(),
            truncate_str(&product.color, 8),
            product.stock,
            product.date,
        );
    }
    crate::log_blank();
    log::info!("{} product(s)", products.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_str("MSI", 10), "MSI");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_str("GeForce RTX 3080", 10), "GeForce...");
        assert_eq!(truncate_str("abcdef", 2), "ab");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_str("Видеокарта", 6), "Вид...");
    }
}
