//! Scripted checkout.
//!
//! Reads an order script, fills the cart from the catalog, then walks the
//! wizard through every step exactly as a shopper would.
//!
//! # Script format
//!
//! ```yaml
//! items:
//!   - product: "3"
//!     quantity: 1
//! customer:
//!   email: ana@example.com
//!   first_name: Ana
//!   last_name: López
//!   phone: "5512345678"
//! shipping:
//!   address: Av. Reforma 100
//!   city: Ciudad de México
//!   state: CDMX
//!   zip_code: "06600"
//! payment:
//!   method: credit          # credit | debit | paypal
//!   card_number: "4111 1111 1111 1111"
//!   expiry: "12/30"
//!   cvv: "123"
//!   cardholder_name: ANA LOPEZ
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex};

use askama::Template;
use serde::Deserialize;
use techstore_core::{PaymentMethod, ProductId};
use techstore_storefront::cart::{Cart, CartSummary};
use techstore_storefront::catalog::{Catalog, CatalogError};
use techstore_storefront::checkout::{
    CheckoutStep, CheckoutWizard, ConfirmationReceipt, CustomerField, CustomerInfo, OrderRecord,
    OrderSubmitter, PaymentField, ShippingField, SimulatedSubmitter,
};
use techstore_storefront::config::StorefrontConfig;
use techstore_storefront::services::listener::CartListener;
use techstore_storefront::{AppError, Result};
use tracing::{info, warn};

/// One cart line of the script.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptItem {
    pub product: ProductId,
    pub quantity: u32,
}

/// Shipping fields of the script. The country comes from configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptShipping {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Payment fields of the script, typed as a shopper would type them.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptPayment {
    #[serde(default)]
    pub method: PaymentMethod,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub expiry: String,
    #[serde(default)]
    pub cvv: String,
    #[serde(default)]
    pub cardholder_name: String,
}

/// A scripted order.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderScript {
    pub items: Vec<ScriptItem>,
    pub customer: CustomerInfo,
    pub shipping: ScriptShipping,
    pub payment: ScriptPayment,
}

impl OrderScript {
    /// Parse a script from YAML.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the YAML does not match the format.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| AppError::BadRequest(format!("Invalid order script: {e}")))
    }
}

/// Fill a cart from script items. Quantities above stock are capped.
///
/// # Errors
///
/// Returns an error if an item names a product the catalog does not have.
pub fn build_cart(catalog: &Catalog, items: &[ScriptItem]) -> Result<Cart> {
    let mut cart = Cart::new();
    for item in items {
        let product = catalog
            .get(&item.product)
            .ok_or_else(|| CatalogError::ProductNotFound(item.product.clone()))?;
        let stored = cart.set_quantity(&product.id, item.quantity, product.stock);
        if stored < item.quantity {
            warn!(
                product_id = %product.id,
                requested = item.quantity,
                stored,
                "Quantity capped at stock"
            );
        }
    }
    Ok(cart)
}

/// Advance one step, failing if the current step is incomplete.
fn advance<S: OrderSubmitter>(wizard: &CheckoutWizard<S>) -> Result<CheckoutStep> {
    let before = wizard.current_step()?;
    let after = wizard.go_next()?;
    if after == before {
        return Err(AppError::BadRequest(format!("Step {before} is incomplete")));
    }
    info!(step = %after, "Step completed");
    Ok(after)
}

fn fill<S: OrderSubmitter>(wizard: &CheckoutWizard<S>, script: &OrderScript) -> Result<()> {
    let customer = &script.customer;
    for (field, value) in [
        (CustomerField::Email, &customer.email),
        (CustomerField::FirstName, &customer.first_name),
        (CustomerField::LastName, &customer.last_name),
        (CustomerField::Phone, &customer.phone),
    ] {
        wizard.set_customer_field(field, value)?;
    }
    advance(wizard)?;

    let shipping = &script.shipping;
    for (field, value) in [
        (ShippingField::Address, &shipping.address),
        (ShippingField::City, &shipping.city),
        (ShippingField::State, &shipping.state),
        (ShippingField::ZipCode, &shipping.zip_code),
    ] {
        wizard.set_shipping_field(field, value)?;
    }
    advance(wizard)?;

    let payment = &script.payment;
    wizard.select_payment_method(payment.method)?;
    if payment.method.requires_card() {
        for (field, value) in [
            (PaymentField::CardNumber, &payment.card_number),
            (PaymentField::ExpiryDate, &payment.expiry),
            (PaymentField::Cvv, &payment.cvv),
            (PaymentField::CardholderName, &payment.cardholder_name),
        ] {
            wizard.set_payment_field(field, value)?;
        }
    }
    advance(wizard)?;
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart_summary(summary: &CartSummary) {
    println!("Carrito ({} artículos)", summary.total_items);
    println!("  Subtotal: {}", summary.subtotal);
    if summary.free_shipping() {
        println!("  Envío:    Gratis");
    } else {
        println!("  Envío:    {}", summary.shipping);
    }
    println!("  IVA:      {}", summary.tax);
    println!("  Total:    {}", summary.total);
    println!();
}

#[allow(clippy::print_stdout)]
fn print_order(order: &OrderRecord, yaml: bool) -> Result<()> {
    let text = if yaml {
        serde_yaml::to_string(order)
            .map_err(|e| AppError::BadRequest(format!("Cannot serialize order: {e}")))?
    } else {
        ConfirmationReceipt::from(order).render()?
    };
    println!("{text}");
    Ok(())
}

/// Run an order script through the wizard and print the result.
///
/// # Errors
///
/// Returns an error if the script cannot be read, names unknown products,
/// leaves a step incomplete, or the order is not placed.
#[allow(clippy::print_stdout)]
pub async fn run(
    catalog: &Catalog,
    config: &StorefrontConfig,
    path: &Path,
    yaml: bool,
) -> Result<()> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::BadRequest(format!("Cannot read {}: {e}", path.display())))?;
    let script = OrderScript::from_yaml_str(&content)?;
    info!(path = %path.display(), items = script.items.len(), "Loaded order script");

    let cart = build_cart(catalog, &script.items)?;
    let handoff = cart.checkout(catalog, &config.pricing);
    print_cart_summary(&config.pricing.summarize(&handoff.lines));

    let listener = CartListener::new(Arc::new(Mutex::new(cart)));
    let wizard = CheckoutWizard::open(
        handoff,
        SimulatedSubmitter::new(config.checkout.submit_delay),
        Arc::new(listener),
        &config.checkout,
    )?;

    fill(&wizard, &script)?;
    println!("{}", wizard.review()?.render()?);
    println!();

    let order = wizard
        .submit()
        .await?
        .ok_or_else(|| AppError::BadRequest("Order was not submitted".to_string()))?;
    wizard.close()?;

    print_order(&order, yaml)
}
