//! # Types
//!
//! Domain objects handed to the pledge pipeline by the API layer.
//!
//! Everything here is plain data decoded from upstream JSON. The pipeline only
//! ever reads these values; it never mutates or re-validates them.

use serde::{Deserialize, Serialize};

/// A launched country and the currency rules that go with it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub country_code: String,
    pub currency_code: String,
    pub currency_symbol: String,
    /// Whether the currency code trails amounts in long-form displays.
    pub currency_trailing_code: bool,
    pub min_pledge: u32,
    pub max_pledge: u32,
    /// Number of fraction digits shown for amounts in this currency.
    #[serde(default = "default_fraction_digits")]
    pub fraction_digits: u8,
}

fn default_fraction_digits() -> u8 {
    2
}

// (country, currency, symbol, trailing code, min pledge, max pledge, fraction digits)
const LAUNCHED: &[(&str, &str, &str, bool, u32, u32, u8)] = &[
    ("US", "USD", "$", true, 1, 10_000, 2),
    ("CA", "CAD", "$", true, 1, 13_000, 2),
    ("AU", "AUD", "$", true, 1, 14_000, 2),
    ("NZ", "NZD", "$", true, 1, 14_000, 2),
    ("MX", "MXN", "$", true, 10, 200_000, 2),
    ("HK", "HKD", "$", true, 10, 75_000, 2),
    ("SG", "SGD", "$", true, 2, 13_000, 2),
    ("GB", "GBP", "£", false, 1, 8_000, 2),
    ("IE", "EUR", "€", false, 1, 8_500, 2),
    ("DE", "EUR", "€", false, 1, 8_500, 2),
    ("FR", "EUR", "€", false, 1, 8_500, 2),
    ("NL", "EUR", "€", false, 1, 8_500, 2),
    ("JP", "JPY", "¥", false, 100, 1_200_000, 0),
    ("SE", "SEK", "kr", true, 5, 85_000, 2),
    ("DK", "DKK", "kr", true, 5, 65_000, 2),
    ("NO", "NOK", "kr", true, 5, 90_000, 2),
    ("CH", "CHF", "Fr", true, 1, 9_500, 2),
];

impl Country {
    /// All countries projects can currently launch from.
    pub fn launched() -> Vec<Country> {
        LAUNCHED.iter().map(Self::from_row).collect()
    }

    /// Look up a launched country by its ISO code (case-insensitive).
    pub fn find(code: &str) -> Option<Country> {
        LAUNCHED
            .iter()
            .find(|row| row.0.eq_ignore_ascii_case(code))
            .map(Self::from_row)
    }

    pub fn us() -> Country {
        Self::from_row(&LAUNCHED[0])
    }

    fn from_row(row: &(&str, &str, &str, bool, u32, u32, u8)) -> Country {
        let (code, currency, symbol, trailing, min, max, digits) = *row;
        Country {
            country_code: code.to_string(),
            currency_code: currency.to_string(),
            currency_symbol: symbol.to_string(),
            currency_trailing_code: trailing,
            min_pledge: min,
            max_pledge: max,
            fraction_digits: digits,
        }
    }
}

/// Aggregate funding numbers for a project.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    #[serde(default)]
    pub backers_count: u32,
    #[serde(default)]
    pub pledged: f64,
    #[serde(default)]
    pub goal: f64,
    /// Suppress the "US" prefix on dollar amounts for US-based viewers.
    #[serde(default)]
    pub omit_us_currency_code: bool,
}

/// A crowdfunding campaign.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub country: Country,
    #[serde(default)]
    pub stats: ProjectStats,
    #[serde(default)]
    pub rewards: Vec<Reward>,
}

impl Project {
    pub fn reward(&self, reward_id: u64) -> Option<&Reward> {
        self.rewards.iter().find(|r| r.id == reward_id)
    }
}

/// A pledge tier offered by a project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    /// Minimum pledge amount, in the project's currency.
    pub minimum: f64,
    /// Estimated delivery, in unix seconds (UTC).
    #[serde(default)]
    pub estimated_delivery_on: Option<i64>,
    #[serde(default)]
    pub shipping_enabled: bool,
}

impl Reward {
    /// The implicit "pledge without a reward" tier.
    pub fn no_reward() -> Reward {
        Reward {
            id: 0,
            title: None,
            minimum: 1.0,
            estimated_delivery_on: None,
            shipping_enabled: false,
        }
    }
}

/// The signed-in account, as far as the pledge flow cares.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}
