//! Application configuration loaded from environment variables.

use std::str::FromStr;

use pledge::PledgeConfig;

use crate::errors::{ApiError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the REST API server
    pub api_port: u16,
    /// Base URL of the upstream projects/checkouts API
    pub ksapi_url: String,
    /// Timeout (in seconds) for a single upstream request
    pub ksapi_timeout_secs: u64,
    /// Country the viewers of this deployment browse from
    pub viewer_country: String,
    pub pledge: PledgeConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = PledgeConfig::default();

        let pledge = PledgeConfig {
            shipping_reference_amount: parse_or(
                &lookup,
                "SHIPPING_REFERENCE_AMOUNT",
                defaults.shipping_reference_amount,
            )?,
            shipping_location: lookup("SHIPPING_LOCATION").unwrap_or(defaults.shipping_location),
            delivery_date_template: lookup("DELIVERY_DATE_TEMPLATE")
                .unwrap_or(defaults.delivery_date_template),
            delivery_time_zone_offset_secs: parse_or(
                &lookup,
                "DELIVERY_TZ_OFFSET_SECS",
                defaults.delivery_time_zone_offset_secs,
            )?,
        };
        pledge
            .validate()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Config {
            api_port: parse_or(&lookup, "API_PORT", 3002)?,
            ksapi_url: lookup("KSAPI_URL")
                .unwrap_or_else(|| "https://api.kickstarter.com".to_string()),
            ksapi_timeout_secs: parse_or(&lookup, "KSAPI_TIMEOUT_SECS", 10)?,
            viewer_country: lookup("VIEWER_COUNTRY").unwrap_or_else(|| "US".to_string()),
            pledge,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ApiError::Config(format!("Invalid {key}"))),
        None => Ok(default),
    }
}
