//! # Checkout
//!
//! Server-side state of a checkout transaction, as returned by the payments
//! API after a pledge is submitted.
//!
//! ```text
//! Authorizing ──► Verifying ──► Successful
//!      │              └──────► Failed
//!      └─────────────────────► Failed
//! ```
//!
//! The server only ever moves a checkout forward. No transition logic lives
//! here: a [`Checkout`] is a snapshot decoded atomically from one payload.

use serde::{Deserialize, Serialize};

use crate::errors::{PledgeError, Result};

/// Status of a checkout transaction.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutStatus {
    Authorizing,
    Verifying,
    Successful,
    Failed,
}

impl CheckoutStatus {
    pub const ALL: [CheckoutStatus; 4] = [
        Self::Authorizing,
        Self::Verifying,
        Self::Successful,
        Self::Failed,
    ];

    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authorizing => "AUTHORIZING",
            Self::Verifying => "VERIFYING",
            Self::Successful => "SUCCESSFUL",
            Self::Failed => "FAILED",
        }
    }

    /// `Successful` and `Failed` are final; polling can stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Successful | Self::Failed)
    }
}

/// Payment confirmation attached to a checkout.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    #[serde(rename = "requiresAction")]
    pub requires_additional_action: bool,
    /// Secret used to complete an out-of-band (e.g. 3-D Secure) step.
    #[serde(rename = "clientSecret", default)]
    pub client_secret: Option<String>,
}

/// A decoded checkout payload.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Checkout {
    #[serde(rename = "state")]
    pub status: CheckoutStatus,
    #[serde(rename = "backing")]
    pub confirmation: PaymentConfirmation,
}

impl Checkout {
    /// Decode a checkout from its JSON payload.
    ///
    /// Fails with [`PledgeError::Decode`] for unknown statuses or a missing
    /// `backing` object, and with [`PledgeError::MissingClientSecret`] when the
    /// server asks for additional action without sending a client secret.
    pub fn decode(json: &str) -> Result<Self> {
        let checkout: Checkout = serde_json::from_str(json)?;
        checkout.validate()?;
        Ok(checkout)
    }

    /// Same as [`Checkout::decode`] for an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let checkout: Checkout = serde_json::from_value(value)?;
        checkout.validate()?;
        Ok(checkout)
    }

    fn validate(&self) -> Result<()> {
        if self.confirmation.requires_additional_action
            && self.confirmation.client_secret.is_none()
        {
            return Err(PledgeError::MissingClientSecret);
        }
        Ok(())
    }

    /// The client secret to hand to the payment SDK, if an extra
    /// authentication step is needed.
    pub fn client_secret_for_action(&self) -> Option<&str> {
        if self.confirmation.requires_additional_action {
            self.confirmation.client_secret.as_deref()
        } else {
            None
        }
    }
}
