//! Unified error handling.
//!
//! Every storefront concern has its own error enum. `AppError` collects them
//! for callers that drive several at once (the CLI) and classifies each as
//! the shopper's mistake or a fault on our side.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::checkout::{CheckoutError, SubmissionError};
use crate::config::ConfigError;
use crate::services::assistant::AssistantError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog could not be loaded or queried.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Checkout refused an action or the order failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Shopping assistant failed.
    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    /// Rendering a receipt failed.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Input that does not fit any of the above.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        Self::Checkout(CheckoutError::Submission(err))
    }
}

/// Broad class of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was wrong; retrying it unchanged will fail again.
    User,
    /// The payment processor declined or was unavailable.
    Payment,
    /// Something on our side broke.
    Internal,
}

impl AppError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Checkout(CheckoutError::Submission(_)) => ErrorKind::Payment,
            Self::Checkout(CheckoutError::LockPoisoned)
            | Self::Assistant(AssistantError::LockPoisoned)
            | Self::Render(_) => ErrorKind::Internal,
            Self::Config(_)
            | Self::Catalog(_)
            | Self::Checkout(_)
            | Self::Assistant(_)
            | Self::BadRequest(_) => ErrorKind::User,
        }
    }

    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::User => 2,
            ErrorKind::Payment => 3,
            ErrorKind::Internal => 1,
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use techstore_core::ProductId;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("missing --order".to_string());
        assert_eq!(err.to_string(), "Bad request: missing --order");

        let err = AppError::from(CatalogError::ProductNotFound(ProductId::new("42")));
        assert!(err.to_string().starts_with("Catalog error: "));
    }

    #[test]
    fn test_app_error_kinds() {
        assert_eq!(AppError::from(CheckoutError::EmptyCart).kind(), ErrorKind::User);
        assert_eq!(
            AppError::from(SubmissionError::Declined("card".into())).kind(),
            ErrorKind::Payment
        );
        assert_eq!(
            AppError::from(CheckoutError::LockPoisoned).kind(),
            ErrorKind::Internal
        );
        assert_eq!(AppError::from(AssistantError::EmptyMessage).exit_code(), 2);
    }
}
