//! # Pledge view model
//!
//! Derives everything the pledge confirmation screen shows from a selected
//! project and reward.
//!
//! ```text
//! configure ──► project_and_reward ─┐
//!                                   ├─ combine_latest ─► skip incomplete ─► derive display ─► + session ─► snapshots
//! view_ready ──► ready (first only) ┘
//! ```
//!
//! Nothing is emitted until both inputs have fired. From then on every
//! `configure` produces exactly one snapshot; repeated `view_ready` calls are
//! ignored. The session is sampled when each snapshot is built, never cached.

use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::PledgeConfig;
use crate::environment::{AuthenticationSnapshotProvider, Environment};
use crate::format::{shipping_value, CurrencyFormatter, DateFormatter, FormattedAmount};
use crate::signal::{combine_latest, MutableProperty, Signal};
use crate::types::{Project, Reward};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShippingSummary {
    pub location: String,
    /// `None` when the project's currency could not be rendered.
    pub amount: Option<FormattedAmount>,
}

/// One immutable rendering of the pledge screen.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PledgeViewData {
    pub amount: f64,
    pub currency_label: String,
    /// Empty when the reward has no estimated delivery date.
    pub delivery_label: String,
    pub shipping: ShippingSummary,
    pub is_authenticated: bool,
}

/// The session-independent part of a snapshot.
#[derive(Clone, Debug, PartialEq)]
struct PledgeDisplay {
    project_id: u64,
    reward_id: u64,
    amount: f64,
    currency_label: String,
    delivery_label: String,
    shipping: ShippingSummary,
}

pub trait PledgeViewModelType {
    /// Set the project and reward to pledge to. Replaces any earlier pair.
    fn configure(&self, project: Project, reward: Reward);

    /// The screen finished loading. Only the first call has any effect.
    fn view_ready(&self);

    /// Snapshots for the screen to render, newest last.
    fn snapshots(&self) -> Signal<PledgeViewData>;
}

pub struct PledgeViewModel {
    project_and_reward: MutableProperty<Option<(Project, Reward)>>,
    ready: MutableProperty<()>,
    snapshots: Signal<PledgeViewData>,
}

impl PledgeViewModel {
    pub fn new(env: Environment) -> Self {
        let project_and_reward: MutableProperty<Option<(Project, Reward)>> =
            MutableProperty::new(None);
        let ready = MutableProperty::new(());

        let configured = combine_latest(&project_and_reward.signal(), &ready.signal().take(1))
            .filter_map(|(pair, _)| pair.clone());

        let Environment {
            session,
            currency,
            dates,
            config,
        } = env;

        let display = configured.map(move |(project, reward)| {
            derive_display(project, reward, currency.as_ref(), dates.as_ref(), &config)
        });

        let snapshots = display.map(move |view| snapshot(view.clone(), session.as_ref()));

        PledgeViewModel {
            project_and_reward,
            ready,
            snapshots,
        }
    }
}

impl PledgeViewModelType for PledgeViewModel {
    fn configure(&self, project: Project, reward: Reward) {
        self.project_and_reward.set(Some((project, reward)));
    }

    fn view_ready(&self) {
        self.ready.set(());
    }

    fn snapshots(&self) -> Signal<PledgeViewData> {
        self.snapshots.clone()
    }
}

fn derive_display(
    project: &Project,
    reward: &Reward,
    currency: &dyn CurrencyFormatter,
    dates: &dyn DateFormatter,
    config: &PledgeConfig,
) -> PledgeDisplay {
    let currency_label = currency
        .symbol_for(&project.country.country_code)
        .trim()
        .to_string();

    let delivery_label = reward
        .estimated_delivery_on
        .map(|ts| dates.format(ts, &config.delivery_date_template, config.delivery_time_zone()))
        .unwrap_or_default();

    let amount = shipping_value(currency, config.shipping_reference_amount, project);
    if amount.is_none() {
        warn!(
            "No shipping amount for project {} (country {})",
            project.id, project.country.country_code
        );
    }

    PledgeDisplay {
        project_id: project.id,
        reward_id: reward.id,
        amount: reward.minimum,
        currency_label,
        delivery_label,
        shipping: ShippingSummary {
            location: config.shipping_location.clone(),
            amount,
        },
    }
}

fn snapshot(view: PledgeDisplay, session: &dyn AuthenticationSnapshotProvider) -> PledgeViewData {
    let is_authenticated = session.current_user().is_some();
    debug!(
        project_id = view.project_id,
        reward_id = view.reward_id,
        is_authenticated,
        "Pledge snapshot emitted"
    );

    PledgeViewData {
        amount: view.amount,
        currency_label: view.currency_label,
        delivery_label: view.delivery_label,
        shipping: view.shipping,
        is_authenticated,
    }
}

/// Run a fresh view model once and return the single snapshot it produces.
///
/// Handy for request/response callers that have no long-lived screen.
pub fn preview(env: Environment, project: Project, reward: Reward) -> Option<PledgeViewData> {
    let view_model = PledgeViewModel::new(env);
    let latest = Rc::new(Cell::new(None));
    let sink = latest.clone();
    let subscription = view_model
        .snapshots()
        .observe(move |data: &PledgeViewData| sink.set(Some(data.clone())));

    view_model.configure(project, reward);
    view_model.view_ready();
    subscription.dispose();

    latest.take()
}
