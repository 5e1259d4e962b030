//! Display formatting collaborators: currency symbols, styled amounts and dates.
//!
//! These are pure functions behind traits so the view model can be driven with
//! fakes in tests. The default implementations cover the launched countries.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::debug;

use crate::types::{Country, Project};

/// Visual style of one run of a [`FormattedAmount`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Default,
    Superscript,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StyledRun {
    pub text: String,
    pub style: TextStyle,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        StyledRun {
            text: text.into(),
            style,
        }
    }
}

/// An amount split into styled runs, e.g. superscript `$`, `7`, superscript `.50`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct FormattedAmount {
    runs: Vec<StyledRun>,
}

impl FormattedAmount {
    pub fn new(runs: Vec<StyledRun>) -> Self {
        FormattedAmount { runs }
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    /// The text with all styling dropped.
    pub fn plain(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn prepend(&mut self, run: StyledRun) {
        self.runs.insert(0, run);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AmountOptions {
    /// Render plain `$` instead of `US$` for US projects seen from the US.
    pub omit_currency_code: bool,
}

impl Default for AmountOptions {
    fn default() -> Self {
        AmountOptions {
            omit_currency_code: true,
        }
    }
}

pub trait CurrencyFormatter: Send + Sync {
    /// Display symbol for the currency of `country_code`.
    fn symbol_for(&self, country_code: &str) -> String;

    /// Styled rendering of `amount`, or `None` if the country is not known.
    fn attributed_amount(
        &self,
        amount: f64,
        country_code: &str,
        options: &AmountOptions,
    ) -> Option<FormattedAmount>;
}

pub trait DateFormatter: Send + Sync {
    /// Render a unix timestamp (seconds) with an ICU-style template.
    fn format(&self, timestamp: i64, template: &str, offset: FixedOffset) -> String;
}

/// Symbols shared by several launched currencies; these need disambiguation.
const AMBIGUOUS_SYMBOLS: &[&str] = &["$", "kr"];

/// Currency formatting over the launched-country table.
#[derive(Clone, Debug)]
pub struct StandardCurrencyFormatter {
    countries: Vec<Country>,
    /// Country the viewer is browsing from.
    viewer_country: String,
}

impl StandardCurrencyFormatter {
    pub fn new(viewer_country: impl Into<String>) -> Self {
        StandardCurrencyFormatter {
            countries: Country::launched(),
            viewer_country: viewer_country.into(),
        }
    }

    fn country(&self, code: &str) -> Option<&Country> {
        self.countries
            .iter()
            .find(|c| c.country_code.eq_ignore_ascii_case(code))
    }

    fn symbol(&self, country: &Country, omit_currency_code: bool) -> String {
        let symbol = country.currency_symbol.trim();
        if !AMBIGUOUS_SYMBOLS.contains(&symbol) {
            return symbol.to_string();
        }
        if omit_currency_code
            && country.country_code == "US"
            && self.viewer_country.eq_ignore_ascii_case("US")
        {
            return symbol.to_string();
        }
        if symbol == "$" {
            format!("{}{}", country.country_code, symbol)
        } else {
            country.currency_code.clone()
        }
    }
}

impl Default for StandardCurrencyFormatter {
    fn default() -> Self {
        Self::new("US")
    }
}

impl CurrencyFormatter for StandardCurrencyFormatter {
    fn symbol_for(&self, country_code: &str) -> String {
        match self.country(country_code) {
            Some(country) => self.symbol(country, true),
            None => {
                debug!("No currency symbol for country {country_code}");
                country_code.trim().to_string()
            }
        }
    }

    fn attributed_amount(
        &self,
        amount: f64,
        country_code: &str,
        options: &AmountOptions,
    ) -> Option<FormattedAmount> {
        let country = self.country(country_code)?;
        if !amount.is_finite() {
            return None;
        }

        let digits = usize::from(country.fraction_digits);
        let fixed = format!("{:.*}", digits, amount.abs());
        let (whole, fraction) = match fixed.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (fixed.as_str(), None),
        };

        let mut runs = Vec::with_capacity(4);
        if amount < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
            runs.push(StyledRun::new("-", TextStyle::Default));
        }
        runs.push(StyledRun::new(
            self.symbol(country, options.omit_currency_code),
            TextStyle::Superscript,
        ));
        runs.push(StyledRun::new(group_thousands(whole), TextStyle::Default));
        if let Some(fraction) = fraction {
            runs.push(StyledRun::new(format!(".{fraction}"), TextStyle::Superscript));
        }
        Some(FormattedAmount::new(runs))
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Date formatting backed by `chrono`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChronoDateFormatter;

impl DateFormatter for ChronoDateFormatter {
    fn format(&self, timestamp: i64, template: &str, offset: FixedOffset) -> String {
        let Some(utc) = DateTime::from_timestamp(timestamp, 0) else {
            debug!("Timestamp {timestamp} out of range");
            return String::new();
        };
        utc.with_timezone(&offset)
            .format(&strftime_pattern(template))
            .to_string()
    }
}

/// Translate an ICU-style template into a strftime pattern.
///
/// A template made only of field letters (`"MMMMyyyy"`) is a skeleton and its
/// fields are joined with spaces; otherwise literal characters are kept as-is.
fn strftime_pattern(template: &str) -> String {
    let chars: Vec<char> = template.chars().collect();
    let mut fields = Vec::new();
    let mut has_literals = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }
        let field = match (c, run) {
            ('M', 1) => Some("%-m"),
            ('M', 2) => Some("%m"),
            ('M', 3) => Some("%b"),
            ('M', _) => Some("%B"),
            ('y', 2) => Some("%y"),
            ('y', _) => Some("%Y"),
            ('d', 1) => Some("%-d"),
            ('d', _) => Some("%d"),
            ('E', 1..=3) => Some("%a"),
            ('E', _) => Some("%A"),
            _ => None,
        };
        match field {
            Some(spec) => fields.push(spec.to_string()),
            None => {
                has_literals = true;
                let literal: String = chars[i..i + run].iter().collect();
                fields.push(literal.replace('%', "%%"));
            }
        }
        i += run;
    }

    if has_literals {
        fields.concat()
    } else {
        fields.join(" ")
    }
}

/// Signed shipping estimate for `project`, e.g. `+$7.50`.
///
/// Returns `None` when the formatter cannot render the project's currency.
pub fn shipping_value(
    formatter: &dyn CurrencyFormatter,
    amount: f64,
    project: &Project,
) -> Option<FormattedAmount> {
    let options = AmountOptions {
        omit_currency_code: project.stats.omit_us_currency_code,
    };
    let mut rendered =
        formatter.attributed_amount(amount, &project.country.country_code, &options)?;
    rendered.prepend(StyledRun::new("+", TextStyle::Superscript));
    Some(rendered)
}
