//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use pledge::format::{CurrencyFormatter, StandardCurrencyFormatter};
use pledge::{
    preview, Checkout, CheckoutStatus, Environment, PledgeViewData, Project, Reward,
    StaticSession, User,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::errors::{ApiError, Result};
use crate::ksapi;

#[derive(Clone)]
pub struct ApiState {
    pub client: Client,
    pub config: Config,
    pub currency: Arc<dyn CurrencyFormatter>,
}

impl ApiState {
    pub fn new(client: Client, config: Config) -> Self {
        let currency = Arc::new(StandardCurrencyFormatter::new(config.viewer_country.clone()));
        ApiState {
            client,
            config,
            currency,
        }
    }

    fn environment(&self, user: Option<User>) -> Environment {
        Environment::new(Arc::new(StaticSession(user)))
            .with_config(self.config.pledge.clone())
            .with_currency(self.currency.clone())
    }

    fn preview(&self, project: Project, reward: Reward, user: Option<User>) -> Result<PledgeViewData> {
        preview(self.environment(user), project, reward).ok_or(ApiError::NoSnapshot)
    }
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PreviewRequest {
    pub project: Project,
    pub reward: Reward,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CheckoutResponse {
    pub status: CheckoutStatus,
    pub requires_action: bool,
    pub client_secret: Option<String>,
    pub terminal: bool,
}

impl From<Checkout> for CheckoutResponse {
    fn from(checkout: Checkout) -> Self {
        CheckoutResponse {
            status: checkout.status,
            terminal: checkout.status.is_terminal(),
            requires_action: checkout.confirmation.requires_additional_action,
            client_secret: checkout.client_secret_for_action().map(String::from),
        }
    }
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /pledge/preview`
///
/// Derives the pledge screen for a posted project and reward.
pub async fn preview_pledge(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<PreviewRequest>,
) -> Result<Json<PledgeViewData>> {
    let data = state.preview(body.project, body.reward, body.user)?;
    Ok(Json(data))
}

/// `GET /projects/:project_id/rewards/:reward_id/pledge`
///
/// Fetches the project upstream and previews it for an anonymous viewer.
/// Reward id `0` selects the "no reward" tier.
pub async fn project_pledge(
    State(state): State<Arc<ApiState>>,
    Path((project_id, reward_id)): Path<(u64, u64)>,
) -> Result<Json<PledgeViewData>> {
    let project = ksapi::fetch_project(&state.client, &state.config.ksapi_url, project_id).await?;
    let reward = if reward_id == 0 {
        Reward::no_reward()
    } else {
        project.reward(reward_id).cloned().ok_or_else(|| {
            ApiError::NotFound(format!("reward {reward_id} in project {project_id}"))
        })?
    };

    info!("Previewing pledge for project {project_id}, reward {reward_id}");
    let data = state.preview(project, reward, None)?;
    Ok(Json(data))
}

/// `GET /checkouts/:id`
pub async fn get_checkout(
    State(state): State<Arc<ApiState>>,
    Path(checkout_id): Path<String>,
) -> Result<Json<CheckoutResponse>> {
    let checkout =
        ksapi::fetch_checkout(&state.client, &state.config.ksapi_url, &checkout_id).await?;
    Ok(Json(checkout.into()))
}
