//! Plain-text renderings of the review step and the order confirmation.

use askama::Template;

use super::form::{CustomerInfo, PaymentInfo, ShippingInfo};
use super::submit::{OrderRecord, PaymentSummary};
use crate::cart::{CartLine, CheckoutCart};

/// A cart line formatted for display.
#[derive(Debug, Clone)]
pub struct LineView {
    pub name: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartLine> for LineView {
    fn from(line: &CartLine) -> Self {
        Self {
            name: line.name.clone(),
            quantity: line.quantity,
            line_total: line.line_total().display(),
        }
    }
}

/// Summary shown on the review step.
#[derive(Template)]
#[template(path = "checkout/review.txt")]
pub struct ReviewSummary {
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub payment: String,
    pub lines: Vec<LineView>,
    pub total: String,
}

impl ReviewSummary {
    #[must_use]
    pub fn new(
        customer: &CustomerInfo,
        shipping: &ShippingInfo,
        payment: &PaymentInfo,
        cart: &CheckoutCart,
    ) -> Self {
        Self {
            customer_name: customer.full_name(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            address: shipping.address.clone(),
            city: shipping.city.clone(),
            state: shipping.state_label().to_owned(),
            zip_code: shipping.zip_code.clone(),
            country: shipping.country.clone(),
            payment: payment.summary_line(),
            lines: cart.lines.iter().map(LineView::from).collect(),
            total: cart.total.display(),
        }
    }
}

/// Printable confirmation for a placed order.
#[derive(Template)]
#[template(path = "checkout/confirmation.txt")]
pub struct ConfirmationReceipt {
    pub order_number: String,
    pub order_date: String,
    pub status: String,
    pub customer_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub payment: String,
    pub lines: Vec<LineView>,
    pub total: String,
}

fn payment_line(payment: &PaymentSummary) -> String {
    let label = payment.method.label();
    payment
        .card_number
        .as_deref()
        .and_then(|masked| masked.rsplit(' ').next())
        .map_or_else(|| label.to_owned(), |last4| format!("{label} **** {last4}"))
}

impl From<&OrderRecord> for ConfirmationReceipt {
    fn from(order: &OrderRecord) -> Self {
        Self {
            order_number: order.order_number.to_string(),
            order_date: order.order_date.format("%Y-%m-%d %H:%M UTC").to_string(),
            status: order.status.to_string(),
            customer_name: order.customer.full_name(),
            email: order.customer.email.clone(),
            address: order.shipping.address.clone(),
            city: order.shipping.city.clone(),
            state: order.shipping.state_label().to_owned(),
            zip_code: order.shipping.zip_code.clone(),
            country: order.shipping.country.clone(),
            payment: payment_line(&order.payment),
            lines: order.items.iter().map(LineView::from).collect(),
            total: order.total.display(),
        }
    }
}
