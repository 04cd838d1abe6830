//! Order submission.
//!
//! There is no payment backend. [`SimulatedSubmitter`] waits a fixed delay and
//! confirms every order, but the [`OrderSubmitter`] contract returns a
//! `Result` so a real processor can slot in without touching the wizard.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use techstore_core::{OrderNumber, OrderStatus, PaymentMethod, Price};
use thiserror::Error;
use tracing::{info, instrument};

use super::form::{CustomerInfo, PaymentInfo, ShippingInfo};
use crate::cart::CartLine;

/// Errors a submitter can report.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The processor declined the payment.
    #[error("Payment declined: {0}")]
    Declined(String),

    /// The processor could not be reached or failed.
    #[error("Payment processor unavailable: {0}")]
    Unavailable(String),
}

/// Everything the submitter needs, snapshotted when the customer pays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub customer: CustomerInfo,
    pub shipping: ShippingInfo,
    pub payment: PaymentInfo,
    pub items: Vec<CartLine>,
    pub total: Price,
}

/// Payment details safe to keep on an order. Never holds the CVV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub method: PaymentMethod,
    /// `**** **** **** 1234`; `None` for methods without a card.
    pub card_number: Option<String>,
    pub expiry_date: Option<String>,
    pub cardholder_name: Option<String>,
}

impl From<&PaymentInfo> for PaymentSummary {
    fn from(payment: &PaymentInfo) -> Self {
        let card = payment.payment_method.requires_card();
        Self {
            method: payment.payment_method,
            card_number: payment.masked_card_number(),
            expiry_date: card.then(|| payment.expiry_date.clone()),
            cardholder_name: card.then(|| payment.cardholder_name.clone()),
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_number: OrderNumber,
    pub customer: CustomerInfo,
    pub shipping: ShippingInfo,
    pub payment: PaymentSummary,
    pub items: Vec<CartLine>,
    pub total: Price,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

impl OrderRecord {
    /// Confirm a draft as of `order_date`, assigning a fresh order number.
    #[must_use]
    pub fn confirm(draft: &OrderDraft, order_date: DateTime<Utc>) -> Self {
        Self {
            order_number: OrderNumber::generate(order_date),
            customer: draft.customer.clone(),
            shipping: draft.shipping.clone(),
            payment: PaymentSummary::from(&draft.payment),
            items: draft.items.clone(),
            total: draft.total,
            order_date,
            status: OrderStatus::Confirmed,
        }
    }
}

/// Turns a draft into a placed order.
pub trait OrderSubmitter: Send + Sync + 'static {
    /// Submit an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order could not be placed.
    fn submit_order(
        &self,
        draft: &OrderDraft,
    ) -> impl Future<Output = Result<OrderRecord, SubmissionError>> + Send;
}

/// Confirms every order after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
}

impl SimulatedSubmitter {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl OrderSubmitter for SimulatedSubmitter {
    #[instrument(skip(self, draft), fields(items = draft.items.len(), total = %draft.total))]
    async fn submit_order(&self, draft: &OrderDraft) -> Result<OrderRecord, SubmissionError> {
        tokio::time::sleep(self.delay).await;
        let record = OrderRecord::confirm(draft, Utc::now());
        info!(order_number = %record.order_number, "Order confirmed");
        Ok(record)
    }
}
