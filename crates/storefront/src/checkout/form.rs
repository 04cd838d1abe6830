//! Checkout form state: customer, shipping and payment field groups.

use serde::{Deserialize, Serialize};
use techstore_core::PaymentMethod;

use super::format::{format_card_number, format_expiry, sanitize_cvv};

/// Regions offered by the shipping step, as `(value, label)`.
pub const REGIONS: &[(&str, &str)] = &[
    ("CDMX", "Ciudad de México"),
    ("Jalisco", "Jalisco"),
    ("Nuevo León", "Nuevo León"),
    ("Puebla", "Puebla"),
    ("Veracruz", "Veracruz"),
    ("Yucatán", "Yucatán"),
];

/// Step 1 fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// A step 1 field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    Email,
    FirstName,
    LastName,
    Phone,
}

impl CustomerInfo {
    pub(crate) fn set(&mut self, field: CustomerField, value: &str) {
        let slot = match field {
            CustomerField::Email => &mut self.email,
            CustomerField::FirstName => &mut self.first_name,
            CustomerField::LastName => &mut self.last_name,
            CustomerField::Phone => &mut self.phone,
        };
        value.clone_into(slot);
    }

    /// `"First Last"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Step 2 fields. The country is fixed per store and never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// An editable step 2 field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingField {
    Address,
    City,
    State,
    ZipCode,
}

impl ShippingInfo {
    /// Empty shipping details for the store's fixed country.
    #[must_use]
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: country.into(),
        }
    }

    pub(crate) fn set(&mut self, field: ShippingField, value: &str) {
        let slot = match field {
            ShippingField::Address => &mut self.address,
            ShippingField::City => &mut self.city,
            ShippingField::State => &mut self.state,
            ShippingField::ZipCode => &mut self.zip_code,
        };
        value.clone_into(slot);
    }

    /// Display label for the selected region (falls back to the raw value).
    #[must_use]
    pub fn state_label(&self) -> &str {
        REGIONS
            .iter()
            .find(|(value, _)| *value == self.state)
            .map_or(self.state.as_str(), |(_, label)| label)
    }
}

/// Step 3 fields.
///
/// Implements `Debug` manually so card data never reaches logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PaymentInfo {
    /// Always `NNNN NNNN NNNN NNNN`, truncated to what was typed.
    pub card_number: String,
    /// Always `MM` or `MM/YY`, truncated to what was typed.
    pub expiry_date: String,
    /// Up to four digits.
    pub cvv: String,
    pub cardholder_name: String,
    pub payment_method: PaymentMethod,
}

/// A step 3 text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentField {
    CardNumber,
    ExpiryDate,
    Cvv,
    CardholderName,
}

impl PaymentInfo {
    /// Store raw input, applying the field's formatter.
    pub(crate) fn set(&mut self, field: PaymentField, raw: &str) {
        match field {
            PaymentField::CardNumber => self.card_number = format_card_number(raw),
            PaymentField::ExpiryDate => self.expiry_date = format_expiry(raw),
            PaymentField::Cvv => self.cvv = sanitize_cvv(raw),
            PaymentField::CardholderName => raw.clone_into(&mut self.cardholder_name),
        }
    }

    /// Last four digits of the card (fewer if fewer were typed).
    #[must_use]
    pub fn last4(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().filter(char::is_ascii_digit).collect();
        let start = digits.len().saturating_sub(4);
        digits.get(start..).unwrap_or_default().iter().collect()
    }

    /// `**** **** **** 1234`, or `None` when no card is used.
    #[must_use]
    pub fn masked_card_number(&self) -> Option<String> {
        if !self.payment_method.requires_card() || self.card_number.is_empty() {
            return None;
        }
        Some(format!("**** **** **** {}", self.last4()))
    }

    /// One-line description for the review step.
    #[must_use]
    pub fn summary_line(&self) -> String {
        self.masked_card_number().map_or_else(
            || self.payment_method.label().to_string(),
            |_| format!("{} **** {}", self.payment_method.label(), self.last4()),
        )
    }
}

impl std::fmt::Debug for PaymentInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentInfo")
            .field("card_number", &self.masked_card_number())
            .field("expiry_date", &self.expiry_date)
            .field("cvv", &"[REDACTED]")
            .field("cardholder_name", &self.cardholder_name)
            .field("payment_method", &self.payment_method)
            .finish()
    }
}
