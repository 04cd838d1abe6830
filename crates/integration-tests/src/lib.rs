//! Integration tests for TechStore.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p techstore-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_wizard` - Cart handoff through confirmation
//! - `assistant` - Chat, descriptions, recommendations and search
//!
//! This crate holds the fixtures those tests share: a demo shopper, a
//! listener that records what the wizard reports, and helpers that walk a
//! wizard to a given step.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use techstore_core::{OrderNumber, PaymentMethod, ProductId};
use techstore_storefront::cart::Cart;
use techstore_storefront::catalog::Catalog;
use techstore_storefront::checkout::{
    CheckoutError, CheckoutListener, CheckoutStep, CheckoutWizard, CustomerField, OrderRecord,
    OrderSubmitter, PaymentField, ShippingField, SimulatedSubmitter,
};
use techstore_storefront::config::StorefrontConfig;
use techstore_storefront::{AppError, Result};

/// Step 1 values for the demo shopper.
pub const CUSTOMER: [(CustomerField, &str); 4] = [
    (CustomerField::Email, "ana.lopez@example.com"),
    (CustomerField::FirstName, "Ana"),
    (CustomerField::LastName, "López"),
    (CustomerField::Phone, "5512345678"),
];

/// Step 2 values for the demo shopper.
pub const SHIPPING: [(ShippingField, &str); 4] = [
    (ShippingField::Address, "Av. Reforma 100"),
    (ShippingField::City, "Ciudad de México"),
    (ShippingField::State, "CDMX"),
    (ShippingField::ZipCode, "06600"),
];

/// Step 3 card values, typed without separators.
pub const CARD: [(PaymentField, &str); 4] = [
    (PaymentField::CardNumber, "4111111111111111"),
    (PaymentField::ExpiryDate, "1230"),
    (PaymentField::Cvv, "987"),
    (PaymentField::CardholderName, "ANA LOPEZ"),
];

/// Records every listener call.
#[derive(Debug, Default)]
pub struct RecordingListener {
    orders: Mutex<Vec<OrderNumber>>,
    closes: AtomicUsize,
}

impl RecordingListener {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Order numbers reported so far.
    #[must_use]
    pub fn orders(&self) -> Vec<OrderNumber> {
        self.orders
            .lock()
            .map(|orders| orders.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl CheckoutListener for RecordingListener {
    fn on_order_complete(&self, order: &OrderRecord) {
        if let Ok(mut orders) = self.orders.lock() {
            orders.push(order.order_number.clone());
        }
    }

    fn on_close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// A cart holding `items` from `catalog`, as `(product id, quantity)`.
///
/// # Errors
///
/// Returns an error for an id the catalog does not have.
pub fn cart_with(catalog: &Catalog, items: &[(&str, u32)]) -> Result<Cart> {
    let mut cart = Cart::new();
    for (id, quantity) in items {
        let id = ProductId::new(*id);
        let product = catalog
            .get(&id)
            .ok_or_else(|| AppError::BadRequest(format!("unknown product {id}")))?;
        cart.set_quantity(&id, *quantity, product.stock);
    }
    Ok(cart)
}

/// Open a wizard over the demo catalog with the simulated submitter.
///
/// # Errors
///
/// Returns an error if the demo catalog fails to load or the cart is empty.
pub fn open_demo_wizard(
    items: &[(&str, u32)],
    delay: Duration,
    listener: Arc<dyn CheckoutListener>,
) -> Result<CheckoutWizard<SimulatedSubmitter>> {
    let config = StorefrontConfig::default();
    let catalog = Catalog::demo()?;
    let cart = cart_with(&catalog, items)?;
    Ok(CheckoutWizard::open(
        cart.checkout(&catalog, &config.pricing),
        SimulatedSubmitter::new(delay),
        listener,
        &config.checkout,
    )?)
}

/// Fill step 1 and advance.
///
/// # Errors
///
/// Returns the wizard's error.
pub fn complete_customer<S: OrderSubmitter>(
    wizard: &CheckoutWizard<S>,
) -> std::result::Result<CheckoutStep, CheckoutError> {
    for (field, value) in CUSTOMER {
        wizard.set_customer_field(field, value)?;
    }
    wizard.go_next()
}

/// Fill step 2 and advance.
///
/// # Errors
///
/// Returns the wizard's error.
pub fn complete_shipping<S: OrderSubmitter>(
    wizard: &CheckoutWizard<S>,
) -> std::result::Result<CheckoutStep, CheckoutError> {
    for (field, value) in SHIPPING {
        wizard.set_shipping_field(field, value)?;
    }
    wizard.go_next()
}

/// Choose `method`, fill the card when it needs one, and advance.
///
/// # Errors
///
/// Returns the wizard's error.
pub fn complete_payment<S: OrderSubmitter>(
    wizard: &CheckoutWizard<S>,
    method: PaymentMethod,
) -> std::result::Result<CheckoutStep, CheckoutError> {
    wizard.select_payment_method(method)?;
    if method.requires_card() {
        for (field, value) in CARD {
            wizard.set_payment_field(field, value)?;
        }
    }
    wizard.go_next()
}

/// Walk a fresh wizard to the review step.
///
/// # Errors
///
/// Returns the wizard's error.
pub fn advance_to_review<S: OrderSubmitter>(
    wizard: &CheckoutWizard<S>,
    method: PaymentMethod,
) -> std::result::Result<CheckoutStep, CheckoutError> {
    complete_customer(wizard)?;
    complete_shipping(wizard)?;
    complete_payment(wizard, method)
}
