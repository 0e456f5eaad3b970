//! Shopping cart: products and their amounts, matched by product name.

use serde::{Deserialize, Serialize};
use storefront_catalog::Product;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("'{0}' is not in the cart")]
    NotInCart(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
    pub amount: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`.
    pub fn add(&mut self, product: Product) {
        match self.entry_mut(&product.name) {
            Some(entry) => entry.amount += 1,
            None => self.entries.push(CartEntry { product, amount: 1 }),
        }
    }

    /// Remove one unit of the named product, dropping the entry at zero.
    pub fn remove(&mut self, name: &str) -> Result<(), CartError> {
        let entry = self
            .entry_mut(name)
            .ok_or_else(|| CartError::NotInCart(name.to_string()))?;
        entry.amount = entry.amount.saturating_sub(1);
        if entry.amount == 0 {
            self.entries.retain(|e| e.product.name != name);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn amount_of(&self, name: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.product.name == name)
            .map_or(0, |e| e.amount)
    }

    pub fn total_items(&self) -> u32 {
        self.entries.iter().map(|e| e.amount).sum()
    }

    pub fn total_price(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.product.price * f64::from(e.amount))
            .sum()
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| e.product.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_catalog::default_products;

    fn two_products() -> (Product, Product) {
        let mut products = default_products().into_iter();
        (products.next().unwrap(), products.next().unwrap())
    }

    #[test]
    fn adding_twice_bumps_amount() {
        let (a, b) = two_products();
        let mut cart = Cart::new();
        cart.add(a.clone());
        cart.add(a.clone());
        cart.add(b.clone());
        assert_eq!(cart.entries().len(), 2);
        assert_eq!(cart.amount_of(&a.name), 2);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), a.price * 2.0 + b.price);
    }

    #[test]
    fn removing_last_unit_drops_entry() {
        let (a, _) = two_products();
        let mut cart = Cart::new();
        cart.add(a.clone());
        cart.add(a.clone());
        cart.remove(&a.name).unwrap();
        assert_eq!(cart.amount_of(&a.name), 1);
        cart.remove(&a.name).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn removing_absent_product_fails() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.remove("Nothing"),
            Err(CartError::NotInCart("Nothing".to_string()))
        );
    }
}
