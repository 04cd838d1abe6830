//! Cart-side checkout listener.

use std::sync::{Arc, Mutex};

use tracing::{error, info};

use crate::cart::Cart;
use crate::checkout::{CheckoutListener, OrderRecord};

/// Empties the shared cart when an order is placed and keeps the orders.
#[derive(Debug, Clone, Default)]
pub struct CartListener {
    cart: Arc<Mutex<Cart>>,
    orders: Arc<Mutex<Vec<OrderRecord>>>,
}

impl CartListener {
    #[must_use]
    pub fn new(cart: Arc<Mutex<Cart>>) -> Self {
        Self {
            cart,
            orders: Arc::default(),
        }
    }

    /// Orders placed so far, oldest first.
    #[must_use]
    pub fn orders(&self) -> Vec<OrderRecord> {
        self.orders
            .lock()
            .map(|orders| orders.clone())
            .unwrap_or_default()
    }
}

impl CheckoutListener for CartListener {
    fn on_order_complete(&self, order: &OrderRecord) {
        match self.cart.lock() {
            Ok(mut cart) => cart.clear(),
            Err(_) => error!(order_number = %order.order_number, "Cart lock poisoned, cart not cleared"),
        }
        match self.orders.lock() {
            Ok(mut orders) => orders.push(order.clone()),
            Err(_) => error!(order_number = %order.order_number, "Order log lock poisoned, order not recorded"),
        }
        info!(order_number = %order.order_number, total = %order.total, "Order received, cart cleared");
    }

    fn on_close(&self) {
        info!("Checkout closed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use techstore_core::PaymentMethod;

    use super::*;
    use crate::catalog::Catalog;
    use crate::checkout::{
        CheckoutWizard, CustomerField, CustomerInfo, OrderDraft, PaymentInfo, ShippingField,
        ShippingInfo, SimulatedSubmitter,
    };
    use crate::config::StorefrontConfig;

    #[test]
    fn test_poisoned_order_log_still_clears_cart() {
        let config = StorefrontConfig::default();
        let catalog = Catalog::demo().unwrap();
        let first = catalog.products.first().unwrap();
        let mut cart = Cart::new();
        cart.add(first);
        let handoff = cart.checkout(&catalog, &config.pricing);
        let cart = Arc::new(Mutex::new(cart));
        let listener = CartListener::new(Arc::clone(&cart));

        let orders = Arc::clone(&listener.orders);
        let _ = std::thread::spawn(move || {
            let _held = orders.lock().unwrap();
            panic!("poison the order log");
        })
        .join();
        assert!(listener.orders.is_poisoned());

        let draft = OrderDraft {
            customer: CustomerInfo::default(),
            shipping: ShippingInfo::new("México"),
            payment: PaymentInfo::default(),
            items: handoff.lines,
            total: handoff.total,
        };
        let order = OrderRecord::confirm(&draft, Utc::now());
        listener.on_order_complete(&order);

        assert!(cart.lock().unwrap().is_empty());
        assert!(listener.orders().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_order_clears_cart() {
        let config = StorefrontConfig::default();
        let catalog = Catalog::demo().unwrap();
        let cart = Arc::new(Mutex::new(Cart::new()));
        let first = catalog.products.first().unwrap();
        cart.lock().unwrap().add(first);

        let listener = CartListener::new(Arc::clone(&cart));
        let handoff = cart.lock().unwrap().checkout(&catalog, &config.pricing);
        let wizard = CheckoutWizard::open(
            handoff,
            SimulatedSubmitter::new(Duration::from_millis(10)),
            Arc::new(listener.clone()),
            &config.checkout,
        )
        .unwrap();

        for (field, value) in [
            (CustomerField::Email, "luis@example.com"),
            (CustomerField::FirstName, "Luis"),
            (CustomerField::LastName, "Pérez"),
            (CustomerField::Phone, "3311223344"),
        ] {
            wizard.set_customer_field(field, value).unwrap();
        }
        wizard.go_next().unwrap();
        for (field, value) in [
            (ShippingField::Address, "Calle 5"),
            (ShippingField::City, "Guadalajara"),
            (ShippingField::State, "Jalisco"),
            (ShippingField::ZipCode, "44100"),
        ] {
            wizard.set_shipping_field(field, value).unwrap();
        }
        wizard.go_next().unwrap();
        wizard.select_payment_method(PaymentMethod::Paypal).unwrap();
        wizard.go_next().unwrap();

        let order = wizard.submit().await.unwrap().unwrap();

        assert!(cart.lock().unwrap().is_empty());
        assert_eq!(listener.orders(), vec![order]);
    }
}
