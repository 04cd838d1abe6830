//! Checkout wizard errors.
//!
//! An incomplete step is not an error: [`super::CheckoutWizard::go_next`]
//! simply stays put. These cover calls that make no sense in the current
//! state and failures reported by the submitter.

use thiserror::Error;

use super::step::CheckoutStep;
use super::submit::SubmissionError;

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The wizard was closed; every further call is refused.
    #[error("Checkout is closed")]
    Closed,

    /// A submission is pending; edits and navigation wait for it.
    #[error("Order submission in progress")]
    SubmissionInProgress,

    /// The order was already placed.
    #[error("Order already placed")]
    AlreadySubmitted,

    /// The field belongs to another step.
    #[error("{field} can only be edited on the {expected} step (current: {current})")]
    FieldNotEditable {
        field: &'static str,
        expected: CheckoutStep,
        current: CheckoutStep,
    },

    /// Submit was called before reaching the review step.
    #[error("Cannot submit from the {0} step")]
    NotOnReview(CheckoutStep),

    /// The cart handed to checkout had no lines.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    #[error("Submission failed: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Checkout state lock poisoned")]
    LockPoisoned,
}
