//! Checkout steps and the progress indicator.

use serde::{Deserialize, Serialize};

/// A step of the checkout wizard.
///
/// Steps 1-4 are editable or review steps. [`CheckoutStep::Confirmation`] is
/// terminal and only reachable through a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    Customer,
    Shipping,
    Payment,
    Review,
    Confirmation,
}

impl CheckoutStep {
    /// Steps shown in the progress indicator (the confirmation is not).
    pub const PROGRESS: [Self; 4] = [Self::Customer, Self::Shipping, Self::Payment, Self::Review];

    /// 1-based step number.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Customer => 1,
            Self::Shipping => 2,
            Self::Payment => 3,
            Self::Review => 4,
            Self::Confirmation => 5,
        }
    }

    /// Step for a 1-based number.
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::Customer),
            2 => Some(Self::Shipping),
            3 => Some(Self::Payment),
            4 => Some(Self::Review),
            5 => Some(Self::Confirmation),
            _ => None,
        }
    }

    /// Title shown above the step.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Customer => "Información Personal",
            Self::Shipping => "Dirección de Envío",
            Self::Payment => "Método de Pago",
            Self::Review => "Confirmación",
            Self::Confirmation => "Pedido Confirmado",
        }
    }

    /// Next step through plain advancement. Capped at [`CheckoutStep::Review`].
    #[must_use]
    pub const fn advanced(self) -> Self {
        match self {
            Self::Customer => Self::Shipping,
            Self::Shipping => Self::Payment,
            Self::Payment | Self::Review => Self::Review,
            Self::Confirmation => Self::Confirmation,
        }
    }

    /// Previous step. Floored at [`CheckoutStep::Customer`].
    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::Customer | Self::Shipping => Self::Customer,
            Self::Payment => Self::Shipping,
            Self::Review => Self::Payment,
            Self::Confirmation => Self::Confirmation,
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmation)
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

/// One entry of the progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepProgress {
    pub step: CheckoutStep,
    /// The wizard is at or past this step.
    pub active: bool,
    /// The wizard is past this step.
    pub completed: bool,
}

/// Progress indicator for the wizard at `current`.
#[must_use]
pub fn progress(current: CheckoutStep) -> [StepProgress; 4] {
    CheckoutStep::PROGRESS.map(|step| StepProgress {
        step,
        active: current >= step,
        completed: current > step,
    })
}
