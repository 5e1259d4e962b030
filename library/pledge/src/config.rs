//! Tunables for the pledge screen that the product may change without a
//! code change.

use chrono::{FixedOffset, Offset, Utc};

use crate::errors::{PledgeError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct PledgeConfig {
    /// Reference shipping cost shown as the estimate, in project currency.
    pub shipping_reference_amount: f64,
    /// Location label shown next to the shipping estimate.
    pub shipping_location: String,
    /// ICU-style template for the estimated delivery label.
    pub delivery_date_template: String,
    /// Offset east of UTC used when rendering delivery dates.
    pub delivery_time_zone_offset_secs: i32,
}

impl Default for PledgeConfig {
    fn default() -> Self {
        PledgeConfig {
            shipping_reference_amount: 7.5,
            shipping_location: "Brooklyn".to_string(),
            delivery_date_template: "MMMMyyyy".to_string(),
            delivery_time_zone_offset_secs: 0,
        }
    }
}

impl PledgeConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.shipping_reference_amount.is_finite() || self.shipping_reference_amount < 0.0 {
            return Err(PledgeError::Config(format!(
                "shipping reference amount must be a non-negative number, got {}",
                self.shipping_reference_amount
            )));
        }
        if self.delivery_date_template.trim().is_empty() {
            return Err(PledgeError::Config(
                "delivery date template must not be empty".to_string(),
            ));
        }
        if FixedOffset::east_opt(self.delivery_time_zone_offset_secs).is_none() {
            return Err(PledgeError::Config(format!(
                "time zone offset out of range: {}s",
                self.delivery_time_zone_offset_secs
            )));
        }
        Ok(())
    }

    /// The delivery time zone; falls back to UTC for an out-of-range offset.
    pub fn delivery_time_zone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.delivery_time_zone_offset_secs).unwrap_or_else(|| Utc.fix())
    }
}
