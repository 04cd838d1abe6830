//! Customer-facing order number.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur when parsing an [`OrderNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderNumberError {
    /// The input string is empty.
    #[error("order number cannot be empty")]
    Empty,
    /// The input does not start with the `ORD-` prefix.
    #[error("order number must start with {prefix}")]
    MissingPrefix {
        /// Expected prefix.
        prefix: &'static str,
    },
    /// Nothing follows the prefix.
    #[error("order number has no identifier after the prefix")]
    EmptyIdentifier,
}

/// An order number such as `ORD-1760745600000-3f9c2a1b`.
///
/// Generated numbers combine the submission time in milliseconds with a
/// random suffix, so two orders placed within the same millisecond still get
/// distinct numbers.
///
/// ## Examples
///
/// ```
/// use techstore_core::OrderNumber;
///
/// let number = OrderNumber::generate(chrono::Utc::now());
/// assert!(number.as_str().starts_with("ORD-"));
///
/// assert!(OrderNumber::parse("ORD-1234").is_ok());
/// assert!(OrderNumber::parse("1234").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Prefix shared by every order number.
    pub const PREFIX: &'static str = "ORD-";

    /// Length of the random suffix in hex characters.
    const SUFFIX_LEN: usize = 8;

    /// Generate a fresh order number for an order placed at `placed_at`.
    #[must_use]
    pub fn generate(placed_at: DateTime<Utc>) -> Self {
        let random = Uuid::new_v4().simple().to_string();
        let suffix = random.get(..Self::SUFFIX_LEN).unwrap_or(&random);
        Self(format!(
            "{}{}-{suffix}",
            Self::PREFIX,
            placed_at.timestamp_millis()
        ))
    }

    /// Parse an `OrderNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, lacks the `ORD-` prefix, or
    /// has nothing after the prefix.
    pub fn parse(s: &str) -> Result<Self, OrderNumberError> {
        if s.is_empty() {
            return Err(OrderNumberError::Empty);
        }

        let rest = s
            .strip_prefix(Self::PREFIX)
            .ok_or(OrderNumberError::MissingPrefix {
                prefix: Self::PREFIX,
            })?;

        if rest.is_empty() {
            return Err(OrderNumberError::EmptyIdentifier);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `OrderNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OrderNumber {
    type Err = OrderNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
