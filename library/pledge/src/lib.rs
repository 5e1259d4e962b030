//! # Pledge
//!
//! Data derivation for the pledge confirmation screen of the crowdfunding
//! client, plus the checkout status model the payment flow polls.
//!
//! | Concern               | Module                          |
//! |-----------------------|---------------------------------|
//! | Domain objects        | [`types`], [`checkout`]         |
//! | Stream primitives     | [`signal`]                      |
//! | Display formatting    | [`format`]                      |
//! | Injected dependencies | [`environment`], [`config`]     |
//! | Screen pipeline       | [`view_model`]                  |
//!
//! ## Architecture
//!
//! The view model is a small dataflow graph built from [`signal`] primitives.
//! All I/O (fetching projects, resolving the session) happens before values
//! reach it; everything inside is synchronous and runs on the caller's thread.

pub mod checkout;
pub mod config;
pub mod environment;
pub mod errors;
pub mod format;
pub mod signal;
pub mod types;
pub mod view_model;

#[cfg(test)]
mod test_view_model;

pub use checkout::{Checkout, CheckoutStatus, PaymentConfirmation};
pub use config::PledgeConfig;
pub use environment::{AuthenticationSnapshotProvider, Environment, SessionStore, StaticSession};
pub use errors::{PledgeError, Result};
pub use types::{Country, Project, ProjectStats, Reward, User};
pub use view_model::{
    preview, PledgeViewData, PledgeViewModel, PledgeViewModelType, ShippingSummary,
};
