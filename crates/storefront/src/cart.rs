//! Shopping cart: a quantity map plus the store's shipping and tax rules.
//!
//! The cart only stores `product id -> quantity`. Product details are joined
//! from the [`Catalog`] when lines are rendered, so a product removed from the
//! catalog silently drops out of the cart view.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use techstore_core::{CurrencyCode, Price, ProductId};
use tracing::debug;

use crate::catalog::{Catalog, Product};

/// A line in the cart as handed to checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
    /// Image path or URL for the review step thumbnail.
    pub image_ref: Option<String>,
}

impl CartLine {
    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Shipping and tax rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartPricing {
    pub currency: CurrencyCode,
    /// Shipping is free when the subtotal is strictly above this amount.
    pub free_shipping_threshold: Decimal,
    /// Shipping fee otherwise.
    pub flat_shipping: Decimal,
    /// Tax rate applied to the subtotal (IVA).
    pub tax_rate: Decimal,
}

impl Default for CartPricing {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::MXN,
            free_shipping_threshold: Decimal::from(1000),
            flat_shipping: Decimal::from(50),
            tax_rate: Decimal::new(16, 2),
        }
    }
}

/// Cart totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    pub total_items: u32,
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl CartSummary {
    /// Whether the order qualified for free shipping.
    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping.amount.is_zero() && !self.subtotal.amount.is_zero()
    }
}

impl CartPricing {
    /// Compute totals for a set of lines.
    ///
    /// An empty cart costs nothing, shipping included.
    #[must_use]
    pub fn summarize(&self, lines: &[CartLine]) -> CartSummary {
        let subtotal: Decimal = lines.iter().map(|l| l.line_total().amount).sum();
        let total_items = lines.iter().map(|l| l.quantity).sum();

        let shipping = if lines.is_empty() || subtotal > self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.flat_shipping
        };
        let tax = (subtotal * self.tax_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        CartSummary {
            total_items,
            subtotal: Price::new(subtotal, self.currency),
            shipping: Price::new(shipping, self.currency),
            tax: Price::new(tax, self.currency),
            total: Price::new(subtotal + shipping + tax, self.currency),
        }
    }
}

/// What checkout receives from the cart: the lines and the precomputed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutCart {
    pub lines: Vec<CartLine>,
    pub total: Price,
}

/// A shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    quantities: BTreeMap<ProductId, u32>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product, capped at its stock.
    ///
    /// Returns the new quantity (unchanged if already at stock).
    pub fn add(&mut self, product: &Product) -> u32 {
        let quantity = self.quantities.entry(product.id.clone()).or_insert(0);
        if *quantity < product.stock {
            *quantity += 1;
        }
        let result = *quantity;
        if result == 0 {
            self.quantities.remove(&product.id);
        }
        debug!(product_id = %product.id, quantity = result, "Added to cart");
        result
    }

    /// Set a line's quantity. Zero removes the line; values above `stock`
    /// are capped.
    ///
    /// Returns the stored quantity.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: u32, stock: u32) -> u32 {
        let quantity = quantity.min(stock);
        if quantity == 0 {
            self.quantities.remove(id);
        } else {
            self.quantities.insert(id.clone(), quantity);
        }
        quantity
    }

    /// Remove a line entirely.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        self.quantities.remove(id).is_some()
    }

    /// Empty the cart (after an order completes).
    pub fn clear(&mut self) {
        self.quantities.clear();
    }

    /// Quantity for a product (0 if absent).
    #[must_use]
    pub fn quantity(&self, id: &ProductId) -> u32 {
        self.quantities.get(id).copied().unwrap_or(0)
    }

    /// Total number of units.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.quantities.values().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Join quantities with catalog products, in catalog order.
    #[must_use]
    pub fn lines(&self, catalog: &Catalog) -> Vec<CartLine> {
        catalog
            .products
            .iter()
            .filter_map(|product| {
                let quantity = *self.quantities.get(&product.id)?;
                Some(CartLine {
                    id: product.id.clone(),
                    name: product.name.clone(),
                    unit_price: catalog.price_of(product),
                    quantity,
                    image_ref: product.primary_image().map(str::to_owned),
                })
            })
            .collect()
    }

    /// Build the checkout hand-off: lines plus the total under `pricing`.
    #[must_use]
    pub fn checkout(&self, catalog: &Catalog, pricing: &CartPricing) -> CheckoutCart {
        let lines = self.lines(catalog);
        let total = pricing.summarize(&lines).total;
        CheckoutCart { lines, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;

    fn catalog() -> Catalog {
        let mut scarce = product("b", "Scarce", "X", 300);
        scarce.stock = 1;
        Catalog {
            currency: CurrencyCode::MXN,
            products: vec![product("a", "Alpha", "X", 400), scarce],
        }
    }

    #[test]
    fn test_add_caps_at_stock() {
        let mut scarce = product("b", "Scarce", "X", 300);
        scarce.stock = 1;
        let mut cart = Cart::new();
        assert_eq!(cart.add(&scarce), 1);
        assert_eq!(cart.add(&scarce), 1);
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_add_out_of_stock_leaves_no_line() {
        let mut sold_out = product("z", "Sold out", "X", 10);
        sold_out.stock = 0;
        let mut cart = Cart::new();
        assert_eq!(cart.add(&sold_out), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let id = ProductId::new("a");
        let mut cart = Cart::new();
        assert_eq!(cart.set_quantity(&id, 3, 5), 3);
        assert_eq!(cart.set_quantity(&id, 9, 5), 5);
        assert_eq!(cart.set_quantity(&id, 0, 5), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_lines_skip_unknown_products() {
        let mut cart = Cart::new();
        cart.set_quantity(&ProductId::new("a"), 2, 5);
        cart.set_quantity(&ProductId::new("ghost"), 1, 5);
        let lines = cart.lines(&catalog());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().map(|l| l.quantity), Some(2));
        assert_eq!(
            lines.first().and_then(|l| l.image_ref.clone()).as_deref(),
            Some("/img/a.jpg")
        );
    }

    #[test]
    fn test_summary_below_threshold_charges_shipping() {
        let mut cart = Cart::new();
        cart.set_quantity(&ProductId::new("a"), 2, 5);
        let pricing = CartPricing::default();
        let summary = pricing.summarize(&cart.lines(&catalog()));

        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.subtotal.amount, Decimal::from(800));
        assert_eq!(summary.shipping.amount, Decimal::from(50));
        assert_eq!(summary.tax.amount, Decimal::from(128));
        assert_eq!(summary.total.amount, Decimal::from(978));
        assert!(!summary.free_shipping());
    }

    #[test]
    fn test_summary_above_threshold_ships_free() {
        let mut cart = Cart::new();
        cart.set_quantity(&ProductId::new("a"), 3, 5);
        let summary = CartPricing::default().summarize(&cart.lines(&catalog()));

        assert_eq!(summary.subtotal.amount, Decimal::from(1200));
        assert!(summary.free_shipping());
        assert_eq!(summary.total.amount, Decimal::from(1392));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut cart = Cart::new();
        cart.set_quantity(&ProductId::new("a"), 1, 5);
        cart.set_quantity(&ProductId::new("b"), 1, 1);
        let summary = CartPricing {
            free_shipping_threshold: Decimal::from(700),
            ..CartPricing::default()
        }
        .summarize(&cart.lines(&catalog()));
        assert_eq!(summary.shipping.amount, Decimal::from(50));
    }

    #[test]
    fn test_empty_cart_costs_nothing() {
        let summary = CartPricing::default().summarize(&[]);
        assert_eq!(summary.total.amount, Decimal::ZERO);
        assert!(!summary.free_shipping());
    }

    #[test]
    fn test_checkout_carries_total() {
        let mut cart = Cart::new();
        cart.set_quantity(&ProductId::new("a"), 2, 5);
        let handoff = cart.checkout(&catalog(), &CartPricing::default());
        assert_eq!(handoff.lines.len(), 1);
        assert_eq!(handoff.total.display(), "$978.00");
    }
}
