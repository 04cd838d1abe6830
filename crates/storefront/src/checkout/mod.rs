//! Checkout wizard.
//!
//! A four-step form (customer, shipping, payment, review) followed by a
//! terminal confirmation. Each step's fields are validated before the wizard
//! advances; the review step submits the order through an [`OrderSubmitter`].
//!
//! The wizard is a cheap-to-clone handle. State lives behind a mutex that is
//! never held across the submitter's `.await`, so a second `submit` issued
//! while the first is pending observes `is_processing` and returns without
//! placing another order. Dropping a pending `submit` future clears the flag
//! and leaves the wizard on review.

mod error;
mod form;
mod format;
mod receipt;
mod step;
mod submit;
mod validate;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use techstore_core::{OrderNumber, PaymentMethod};
use tracing::{debug, info, instrument, warn};

pub use error::CheckoutError;
pub use form::{
    CustomerField, CustomerInfo, PaymentField, PaymentInfo, REGIONS, ShippingField, ShippingInfo,
};
pub use format::{format_card_number, format_expiry, sanitize_cvv};
pub use receipt::{ConfirmationReceipt, LineView, ReviewSummary};
pub use step::{CheckoutStep, StepProgress, progress};
pub use submit::{
    OrderDraft, OrderRecord, OrderSubmitter, PaymentSummary, SimulatedSubmitter, SubmissionError,
};
pub use validate::validate;

use crate::cart::CheckoutCart;
use crate::config::CheckoutConfig;

/// Receives the wizard's outcome.
pub trait CheckoutListener: Send + Sync {
    /// Called exactly once, after a successful submission.
    fn on_order_complete(&self, order: &OrderRecord);

    /// Called when the wizard is closed.
    fn on_close(&self);
}

/// Listener that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl CheckoutListener for NoopListener {
    fn on_order_complete(&self, _order: &OrderRecord) {}
    fn on_close(&self) {}
}

/// A snapshot of the wizard.
#[derive(Debug, Clone)]
pub struct WizardState {
    pub step: CheckoutStep,
    pub customer: CustomerInfo,
    pub shipping: ShippingInfo,
    pub payment: PaymentInfo,
    /// A submission is pending.
    pub is_processing: bool,
    /// Set once, when submission succeeds.
    pub order: Option<OrderRecord>,
    pub closed: bool,
}

impl WizardState {
    fn new(country: &str) -> Self {
        Self {
            step: CheckoutStep::Customer,
            customer: CustomerInfo::default(),
            shipping: ShippingInfo::new(country),
            payment: PaymentInfo::default(),
            is_processing: false,
            order: None,
            closed: false,
        }
    }

    /// Whether the current step's fields are complete.
    #[must_use]
    pub fn current_step_valid(&self) -> bool {
        validate(self.step, &self.customer, &self.shipping, &self.payment)
    }

    #[must_use]
    pub fn order_number(&self) -> Option<&OrderNumber> {
        self.order.as_ref().map(|o| &o.order_number)
    }

    fn ensure_active(&self) -> Result<(), CheckoutError> {
        if self.closed {
            return Err(CheckoutError::Closed);
        }
        if self.is_processing {
            return Err(CheckoutError::SubmissionInProgress);
        }
        if self.order.is_some() {
            return Err(CheckoutError::AlreadySubmitted);
        }
        Ok(())
    }

    fn ensure_editable(
        &self,
        field: &'static str,
        expected: CheckoutStep,
    ) -> Result<(), CheckoutError> {
        self.ensure_active()?;
        if self.step != expected {
            return Err(CheckoutError::FieldNotEditable {
                field,
                expected,
                current: self.step,
            });
        }
        Ok(())
    }
}

/// Clears `is_processing` if a submission is dropped before it completes.
struct ProcessingGuard<'a> {
    state: &'a Mutex<WizardState>,
    armed: bool,
}

impl<'a> ProcessingGuard<'a> {
    const fn new(state: &'a Mutex<WizardState>) -> Self {
        Self { state, armed: true }
    }

    const fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.is_processing = false;
        warn!("Order submission abandoned before completion");
    }
}

struct Inner<S> {
    cart: CheckoutCart,
    submitter: S,
    listener: Arc<dyn CheckoutListener>,
    state: Mutex<WizardState>,
}

/// Handle to an open checkout.
pub struct CheckoutWizard<S> {
    inner: Arc<Inner<S>>,
}

impl<S> std::fmt::Debug for CheckoutWizard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutWizard").finish_non_exhaustive()
    }
}

impl<S> Clone for CheckoutWizard<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: OrderSubmitter> CheckoutWizard<S> {
    /// Open a fresh wizard for `cart` at the customer step.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    #[instrument(skip_all, fields(lines = cart.lines.len(), total = %cart.total))]
    pub fn open(
        cart: CheckoutCart,
        submitter: S,
        listener: Arc<dyn CheckoutListener>,
        config: &CheckoutConfig,
    ) -> Result<Self, CheckoutError> {
        if cart.lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        info!("Checkout opened");
        Ok(Self {
            inner: Arc::new(Inner {
                cart,
                submitter,
                listener,
                state: Mutex::new(WizardState::new(&config.default_country)),
            }),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, WizardState>, CheckoutError> {
        self.inner
            .state
            .lock()
            .map_err(|_| CheckoutError::LockPoisoned)
    }

    /// The cart being checked out.
    #[must_use]
    pub fn cart(&self) -> &CheckoutCart {
        &self.inner.cart
    }

    /// A copy of the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn snapshot(&self) -> Result<WizardState, CheckoutError> {
        Ok(self.lock()?.clone())
    }

    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn current_step(&self) -> Result<CheckoutStep, CheckoutError> {
        Ok(self.lock()?.step)
    }

    /// Progress indicator for the current step.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn progress(&self) -> Result<[StepProgress; 4], CheckoutError> {
        Ok(progress(self.lock()?.step))
    }

    /// The order number, once the order is placed.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn order_number(&self) -> Result<Option<OrderNumber>, CheckoutError> {
        Ok(self.lock()?.order_number().cloned())
    }

    /// The placed order, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn order(&self) -> Result<Option<OrderRecord>, CheckoutError> {
        Ok(self.lock()?.order.clone())
    }

    /// Edit a customer field. Only allowed on the customer step.
    ///
    /// # Errors
    ///
    /// Returns an error if the wizard is not on the customer step or is
    /// closed, processing, or done.
    pub fn set_customer_field(&self, field: CustomerField, value: &str) -> Result<(), CheckoutError> {
        let mut state = self.lock()?;
        state.ensure_editable("customer", CheckoutStep::Customer)?;
        state.customer.set(field, value);
        Ok(())
    }

    /// Edit a shipping field. Only allowed on the shipping step.
    ///
    /// # Errors
    ///
    /// Returns an error if the wizard is not on the shipping step or is
    /// closed, processing, or done.
    pub fn set_shipping_field(&self, field: ShippingField, value: &str) -> Result<(), CheckoutError> {
        let mut state = self.lock()?;
        state.ensure_editable("shipping", CheckoutStep::Shipping)?;
        state.shipping.set(field, value);
        Ok(())
    }

    /// Edit a payment field, applying its input mask. Only allowed on the
    /// payment step.
    ///
    /// # Errors
    ///
    /// Returns an error if the wizard is not on the payment step or is
    /// closed, processing, or done.
    pub fn set_payment_field(&self, field: PaymentField, raw: &str) -> Result<(), CheckoutError> {
        let mut state = self.lock()?;
        state.ensure_editable("payment", CheckoutStep::Payment)?;
        state.payment.set(field, raw);
        Ok(())
    }

    /// Choose the payment method. Card fields already typed are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the wizard is not on the payment step or is
    /// closed, processing, or done.
    pub fn select_payment_method(&self, method: PaymentMethod) -> Result<(), CheckoutError> {
        let mut state = self.lock()?;
        state.ensure_editable("payment_method", CheckoutStep::Payment)?;
        state.payment.payment_method = method;
        Ok(())
    }

    /// Whether `go_next` would advance.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn can_go_next(&self) -> Result<bool, CheckoutError> {
        let state = self.lock()?;
        Ok(state.ensure_active().is_ok()
            && state.step < CheckoutStep::Review
            && state.current_step_valid())
    }

    /// Advance if the current step is complete. Never moves past review.
    ///
    /// Returns the step the wizard is on afterwards, unchanged when the
    /// current step is incomplete.
    ///
    /// # Errors
    ///
    /// Returns an error if the wizard is closed, processing, or done.
    pub fn go_next(&self) -> Result<CheckoutStep, CheckoutError> {
        let mut state = self.lock()?;
        state.ensure_active()?;
        if state.current_step_valid() {
            state.step = state.step.advanced();
            info!(step = %state.step, "Advanced");
        } else {
            debug!(step = %state.step, "Step incomplete");
        }
        Ok(state.step)
    }

    /// Step back. Never moves before the customer step.
    ///
    /// # Errors
    ///
    /// Returns an error if the wizard is closed, processing, or done.
    pub fn go_back(&self) -> Result<CheckoutStep, CheckoutError> {
        let mut state = self.lock()?;
        state.ensure_active()?;
        state.step = state.step.previous();
        Ok(state.step)
    }

    /// Whether `submit` would place the order now.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn can_submit(&self) -> Result<bool, CheckoutError> {
        let state = self.lock()?;
        Ok(state.ensure_active().is_ok()
            && state.step == CheckoutStep::Review
            && state.current_step_valid())
    }

    /// Review summary for the current form contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn review(&self) -> Result<ReviewSummary, CheckoutError> {
        let state = self.lock()?;
        Ok(ReviewSummary::new(
            &state.customer,
            &state.shipping,
            &state.payment,
            &self.inner.cart,
        ))
    }

    /// Place the order.
    ///
    /// Returns `Ok(None)` without doing anything if a submission is already
    /// pending. On success the wizard moves to the confirmation step and the
    /// listener is notified. On failure the wizard stays on review.
    ///
    /// # Errors
    ///
    /// Returns an error if the wizard is not on the review step, is closed or
    /// already done, or if the submitter fails.
    pub async fn submit(&self) -> Result<Option<OrderRecord>, CheckoutError> {
        let draft = {
            let mut state = self.lock()?;
            if state.is_processing {
                debug!("Submission already pending");
                return Ok(None);
            }
            state.ensure_active()?;
            if state.step != CheckoutStep::Review {
                return Err(CheckoutError::NotOnReview(state.step));
            }
            if !state.current_step_valid() {
                return Ok(None);
            }
            state.is_processing = true;
            OrderDraft {
                customer: state.customer.clone(),
                shipping: state.shipping.clone(),
                payment: state.payment.clone(),
                items: self.inner.cart.lines.clone(),
                total: self.inner.cart.total,
            }
        };

        let mut guard = ProcessingGuard::new(&self.inner.state);
        info!(method = %draft.payment.payment_method, "Submitting order");
        let result = self.inner.submitter.submit_order(&draft).await;

        let order = {
            let mut state = self.lock()?;
            state.is_processing = false;
            guard.disarm();
            match result {
                Ok(order) => {
                    state.step = CheckoutStep::Confirmation;
                    state.order = Some(order.clone());
                    order
                }
                Err(e) => {
                    warn!(error = %e, "Order submission failed");
                    return Err(e.into());
                }
            }
        };

        info!(order_number = %order.order_number, "Order placed");
        self.inner.listener.on_order_complete(&order);
        Ok(Some(order))
    }

    /// Close the wizard. Later calls on any handle are refused.
    ///
    /// Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::SubmissionInProgress`] while an order is
    /// being submitted.
    pub fn close(&self) -> Result<(), CheckoutError> {
        {
            let mut state = self.lock()?;
            if state.closed {
                return Ok(());
            }
            if state.is_processing {
                return Err(CheckoutError::SubmissionInProgress);
            }
            state.closed = true;
        }
        info!("Checkout closed");
        self.inner.listener.on_close();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use rust_decimal::Decimal;
    use techstore_core::{CurrencyCode, OrderStatus, Price, ProductId};

    use super::*;
    use crate::cart::CartLine;

    #[derive(Default)]
    struct CountingListener {
        completed: AtomicUsize,
        closed: AtomicUsize,
    }

    impl CheckoutListener for CountingListener {
        fn on_order_complete(&self, _order: &OrderRecord) {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }

        fn on_close(&self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FailingSubmitter;

    impl OrderSubmitter for FailingSubmitter {
        async fn submit_order(&self, _draft: &OrderDraft) -> Result<OrderRecord, SubmissionError> {
            Err(SubmissionError::Declined("insufficient funds".into()))
        }
    }

    fn cart() -> CheckoutCart {
        CheckoutCart {
            lines: vec![CartLine {
                id: ProductId::new("1"),
                name: "Smartphone".into(),
                unit_price: Price::new(Decimal::from(600), CurrencyCode::MXN),
                quantity: 1,
                image_ref: None,
            }],
            total: Price::new(Decimal::from(746), CurrencyCode::MXN),
        }
    }

    fn wizard_with<S: OrderSubmitter>(
        submitter: S,
        listener: Arc<CountingListener>,
    ) -> CheckoutWizard<S> {
        CheckoutWizard::open(cart(), submitter, listener, &CheckoutConfig::default()).unwrap()
    }

    fn simulated(listener: Arc<CountingListener>) -> CheckoutWizard<SimulatedSubmitter> {
        wizard_with(SimulatedSubmitter::new(Duration::from_secs(3)), listener)
    }

    fn fill_to_review<S: OrderSubmitter>(wizard: &CheckoutWizard<S>) {
        wizard.set_customer_field(CustomerField::Email, "ana@example.com").unwrap();
        wizard.set_customer_field(CustomerField::FirstName, "Ana").unwrap();
        wizard.set_customer_field(CustomerField::LastName, "López").unwrap();
        wizard.set_customer_field(CustomerField::Phone, "5512345678").unwrap();
        assert_eq!(wizard.go_next().unwrap(), CheckoutStep::Shipping);

        wizard.set_shipping_field(ShippingField::Address, "Av. Reforma 100").unwrap();
        wizard.set_shipping_field(ShippingField::City, "CDMX").unwrap();
        wizard.set_shipping_field(ShippingField::State, "CDMX").unwrap();
        wizard.set_shipping_field(ShippingField::ZipCode, "06600").unwrap();
        assert_eq!(wizard.go_next().unwrap(), CheckoutStep::Payment);

        wizard.set_payment_field(PaymentField::CardNumber, "4111111111111111").unwrap();
        wizard.set_payment_field(PaymentField::ExpiryDate, "1230").unwrap();
        wizard.set_payment_field(PaymentField::Cvv, "123").unwrap();
        wizard.set_payment_field(PaymentField::CardholderName, "ANA LOPEZ").unwrap();
        assert_eq!(wizard.go_next().unwrap(), CheckoutStep::Review);
    }

    #[test]
    fn test_opens_fresh_at_customer_step() {
        let wizard = simulated(Arc::default());
        let state = wizard.snapshot().unwrap();
        assert_eq!(state.step, CheckoutStep::Customer);
        assert_eq!(state.shipping.country, "México");
        assert_eq!(state.payment.payment_method, PaymentMethod::Credit);
        assert!(state.order_number().is_none());
        assert!(!state.is_processing);
    }

    #[test]
    fn test_empty_cart_is_refused() {
        let empty = CheckoutCart {
            lines: Vec::new(),
            total: Price::zero(CurrencyCode::MXN),
        };
        let result = CheckoutWizard::open(
            empty,
            SimulatedSubmitter::new(Duration::ZERO),
            Arc::new(NoopListener),
            &CheckoutConfig::default(),
        );
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn test_incomplete_step_blocks_next() {
        let wizard = simulated(Arc::default());
        wizard.set_customer_field(CustomerField::Email, "ana@example.com").unwrap();
        assert!(!wizard.can_go_next().unwrap());
        assert_eq!(wizard.go_next().unwrap(), CheckoutStep::Customer);
    }

    #[test]
    fn test_back_needs_no_validation_and_floors() {
        let wizard = simulated(Arc::default());
        assert_eq!(wizard.go_back().unwrap(), CheckoutStep::Customer);
        fill_to_review(&wizard);
        assert_eq!(wizard.go_back().unwrap(), CheckoutStep::Payment);
        assert_eq!(wizard.go_back().unwrap(), CheckoutStep::Shipping);
    }

    #[test]
    fn test_next_caps_at_review() {
        let wizard = simulated(Arc::default());
        fill_to_review(&wizard);
        assert!(!wizard.can_go_next().unwrap());
        assert_eq!(wizard.go_next().unwrap(), CheckoutStep::Review);
    }

    #[test]
    fn test_fields_only_editable_on_their_step() {
        let wizard = simulated(Arc::default());
        let err = wizard
            .set_shipping_field(ShippingField::City, "Puebla")
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::FieldNotEditable {
                expected: CheckoutStep::Shipping,
                current: CheckoutStep::Customer,
                ..
            }
        ));
        assert!(wizard.select_payment_method(PaymentMethod::Paypal).is_err());
    }

    #[test]
    fn test_paypal_skips_card_fields() {
        let wizard = simulated(Arc::default());
        fill_to_review(&wizard);
        wizard.go_back().unwrap();
        wizard.select_payment_method(PaymentMethod::Paypal).unwrap();
        wizard.set_payment_field(PaymentField::CardNumber, "").unwrap();
        assert!(wizard.can_go_next().unwrap());
        assert_eq!(wizard.go_next().unwrap(), CheckoutStep::Review);
    }

    #[tokio::test]
    async fn test_submit_requires_review_step() {
        let wizard = simulated(Arc::default());
        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(err, CheckoutError::NotOnReview(CheckoutStep::Customer)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_flow_reaches_confirmation() {
        let listener = Arc::new(CountingListener::default());
        let wizard = simulated(Arc::clone(&listener));
        fill_to_review(&wizard);
        assert!(wizard.can_submit().unwrap());

        let order = wizard.submit().await.unwrap().unwrap();

        assert_eq!(wizard.current_step().unwrap(), CheckoutStep::Confirmation);
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(wizard.order_number().unwrap(), Some(order.order_number.clone()));
        assert_eq!(order.payment.card_number.as_deref(), Some("**** **** **** 1111"));
        assert_eq!(order.total, cart().total);
        assert_eq!(listener.completed.load(Ordering::SeqCst), 1);
        assert!(wizard.progress().unwrap().iter().all(|p| p.completed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_submit_places_one_order() {
        let listener = Arc::new(CountingListener::default());
        let wizard = simulated(Arc::clone(&listener));
        fill_to_review(&wizard);

        let (first, second) = tokio::join!(wizard.submit(), wizard.submit());

        assert!(first.unwrap().is_some());
        assert!(second.unwrap().is_none());
        assert_eq!(listener.completed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_number_is_immutable() {
        let wizard = simulated(Arc::default());
        fill_to_review(&wizard);
        let order = wizard.submit().await.unwrap().unwrap();

        assert!(matches!(
            wizard.submit().await,
            Err(CheckoutError::AlreadySubmitted)
        ));
        assert!(wizard.go_back().is_err());
        assert_eq!(wizard.order_number().unwrap(), Some(order.order_number));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_refused_while_processing() {
        let listener = Arc::new(CountingListener::default());
        let wizard = simulated(Arc::clone(&listener));
        fill_to_review(&wizard);

        let pending = tokio::spawn({
            let wizard = wizard.clone();
            async move { wizard.submit().await }
        });
        tokio::task::yield_now().await;

        assert!(wizard.snapshot().unwrap().is_processing);
        assert!(matches!(
            wizard.close(),
            Err(CheckoutError::SubmissionInProgress)
        ));
        assert!(matches!(
            wizard.set_payment_field(PaymentField::Cvv, "999"),
            Err(CheckoutError::SubmissionInProgress)
        ));

        pending.await.unwrap().unwrap();
        wizard.close().unwrap();
        wizard.close().unwrap();
        assert_eq!(listener.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_submission_releases_wizard() {
        let listener = Arc::new(CountingListener::default());
        let wizard = simulated(Arc::clone(&listener));
        fill_to_review(&wizard);

        let abandoned = tokio::time::timeout(Duration::from_secs(1), wizard.submit()).await;
        assert!(abandoned.is_err());

        let state = wizard.snapshot().unwrap();
        assert!(!state.is_processing);
        assert_eq!(state.step, CheckoutStep::Review);
        assert!(state.order.is_none());
        assert_eq!(listener.completed.load(Ordering::SeqCst), 0);

        assert!(wizard.submit().await.unwrap().is_some());
        wizard.close().unwrap();
        assert_eq!(listener.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_submission_allows_close() {
        let listener = Arc::new(CountingListener::default());
        let wizard = simulated(Arc::clone(&listener));
        fill_to_review(&wizard);

        let pending = tokio::spawn({
            let wizard = wizard.clone();
            async move { wizard.submit().await }
        });
        tokio::task::yield_now().await;
        assert!(wizard.snapshot().unwrap().is_processing);

        pending.abort();
        assert!(pending.await.unwrap_err().is_cancelled());

        wizard.close().unwrap();
        assert_eq!(listener.closed.load(Ordering::SeqCst), 1);
        assert_eq!(listener.completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_submission_stays_on_review() {
        let listener = Arc::new(CountingListener::default());
        let wizard = wizard_with(FailingSubmitter, Arc::clone(&listener));
        fill_to_review(&wizard);

        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(err, CheckoutError::Submission(SubmissionError::Declined(_))));

        let state = wizard.snapshot().unwrap();
        assert_eq!(state.step, CheckoutStep::Review);
        assert!(!state.is_processing);
        assert!(state.order.is_none());
        assert_eq!(listener.completed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_closed_wizard_refuses_calls() {
        let wizard = simulated(Arc::default());
        wizard.close().unwrap();
        assert!(matches!(wizard.go_next(), Err(CheckoutError::Closed)));
        assert!(matches!(
            wizard.set_customer_field(CustomerField::Email, "x"),
            Err(CheckoutError::Closed)
        ));
    }
}
