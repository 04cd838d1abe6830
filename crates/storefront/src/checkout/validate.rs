//! Per-step completeness checks that gate advancement.

use super::form::{CustomerInfo, PaymentInfo, ShippingInfo};
use super::step::CheckoutStep;

fn filled(fields: &[&str]) -> bool {
    fields.iter().all(|f| !f.trim().is_empty())
}

/// Whether `step`'s required fields are all filled.
///
/// Whitespace-only values count as empty. The shipping country is fixed and
/// not checked. The review and confirmation steps have no fields of their own.
#[must_use]
pub fn validate(
    step: CheckoutStep,
    customer: &CustomerInfo,
    shipping: &ShippingInfo,
    payment: &PaymentInfo,
) -> bool {
    match step {
        CheckoutStep::Customer => filled(&[
            customer.email.as_str(),
            customer.first_name.as_str(),
            customer.last_name.as_str(),
            customer.phone.as_str(),
        ]),
        CheckoutStep::Shipping => filled(&[
            shipping.address.as_str(),
            shipping.city.as_str(),
            shipping.state.as_str(),
            shipping.zip_code.as_str(),
        ]),
        CheckoutStep::Payment => {
            !payment.payment_method.requires_card()
                || filled(&[
                    payment.card_number.as_str(),
                    payment.expiry_date.as_str(),
                    payment.cvv.as_str(),
                    payment.cardholder_name.as_str(),
                ])
        }
        CheckoutStep::Review | CheckoutStep::Confirmation => true,
    }
}
