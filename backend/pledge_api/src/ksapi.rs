//! Upstream API client — fetches projects and checkouts as JSON.
//!
//! Failures are surfaced to the caller as-is; there is no retry loop here.
//! Payloads the upstream sends that do not decode are reported as
//! [`ApiError::UpstreamPayload`], never as a client error.

use pledge::{Checkout, PledgeError, Project};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use crate::errors::{ApiError, Result};

/// Fetch a project, including its rewards.
pub async fn fetch_project(client: &Client, base_url: &str, project_id: u64) -> Result<Project> {
    let url = endpoint(base_url, &["v1", "projects", &project_id.to_string()])?;
    let project = decode_project(get_json(client, url).await?)?;
    debug!(
        "Fetched project {} with {} rewards",
        project.id,
        project.rewards.len()
    );
    Ok(project)
}

/// Fetch and decode the current state of a checkout.
pub async fn fetch_checkout(client: &Client, base_url: &str, checkout_id: &str) -> Result<Checkout> {
    validate_id(checkout_id)?;
    let url = endpoint(base_url, &["v1", "checkouts", checkout_id])?;
    let checkout = decode_checkout(get_json(client, url).await?)?;
    debug!("Checkout {checkout_id} is {}", checkout.status.as_str());
    Ok(checkout)
}

fn decode_project(value: Value) -> Result<Project> {
    serde_json::from_value(unwrap_envelope(value, "project"))
        .map_err(|e| ApiError::UpstreamPayload(PledgeError::from(e)))
}

fn decode_checkout(value: Value) -> Result<Checkout> {
    Checkout::from_value(unwrap_envelope(value, "checkout")).map_err(ApiError::UpstreamPayload)
}

async fn get_json(client: &Client, url: Url) -> Result<Value> {
    let resp = client.get(url.clone()).send().await?;
    let status = resp.status();

    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(url.to_string()));
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    Ok(resp.json().await?)
}

/// Identifiers are opaque tokens: ASCII letters, digits, `-` and `_`.
fn validate_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ApiError::InvalidId(id.to_string()))
    }
}

/// Append `segments` to the base URL's path, percent-encoding each one.
fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ApiError::Config(format!("Invalid KSAPI_URL {base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ApiError::Config(format!("KSAPI_URL cannot be a base: {base_url}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Accept both `{"project": {...}}` and a bare object.
fn unwrap_envelope(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key(key) => {
            map.remove(key).unwrap_or(Value::Null)
        }
        other => other,
    }
}
