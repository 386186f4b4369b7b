use std::{fmt, str::FromStr, time::SystemTime};

use serde::{Deserialize, Serialize};

/// Which side of the Atlantic a listing was generated for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    Us,
    Eu,
}

impl Market {
    pub fn name(&self) -> &'static str {
        match self {
            Market::Us => "USA",
            Market::Eu => "EU",
        }
    }

    /// Currency symbol of the generated `price` column.
    pub fn currency_symbol(&self) -> &'static str {
        match self {
            Market::Us => "$",
            Market::Eu => "€",
        }
    }

    /// Unit of the generated `mileage` column.
    pub fn mileage_unit(&self) -> &'static str {
        match self {
            Market::Us => "mi",
            Market::Eu => "km",
        }
    }

    /// Header of the location column in tables and exports.
    pub fn location_label(&self) -> &'static str {
        match self {
            Market::Us => "Region",
            Market::Eu => "Country",
        }
    }
}

/// Quality bucket attached to every listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Scarce,
    Good,
    Excellent,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Condition::Scarce, Condition::Good, Condition::Excellent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Scarce => "scarce",
            Condition::Good => "good",
            Condition::Excellent => "excellent",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition selector offered to the user; `All` disables filtering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionFilter {
    #[default]
    All,
    Only(Condition),
}

impl ConditionFilter {
    pub const OPTIONS: [ConditionFilter; 4] = [
        ConditionFilter::All,
        ConditionFilter::Only(Condition::Scarce),
        ConditionFilter::Only(Condition::Good),
        ConditionFilter::Only(Condition::Excellent),
    ];

    pub fn matches(&self, condition: Condition) -> bool {
        match self {
            ConditionFilter::All => true,
            ConditionFilter::Only(wanted) => *wanted == condition,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionFilter::All => "all",
            ConditionFilter::Only(condition) => condition.as_str(),
        }
    }
}

impl FromStr for ConditionFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim().to_ascii_lowercase();
        if value == "all" {
            return Ok(ConditionFilter::All);
        }
        Condition::ALL
            .into_iter()
            .find(|condition| condition.as_str() == value)
            .map(ConditionFilter::Only)
            .ok_or_else(|| format!("unknown condition filter: {value}"))
    }
}

/// One generated row. `price` and `mileage` are in the market's own
/// currency and unit (USD/miles for the US, EUR/km for the EU).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub market: Market,
    pub model: String,
    pub year: i32,
    pub price: u32,
    pub mileage: u32,
    pub condition: Condition,
    pub location: String,
}

/// A US listing with its EUR price and km mileage derived from the rate.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertedListing {
    pub listing: Listing,
    pub price_eur: f64,
    pub mileage_km: u32,
}

/// Inclusive model-year bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Bounds in ascending order.
    pub fn ordered(&self) -> Self {
        if self.max < self.min {
            Self::new(self.max, self.min)
        } else {
            *self
        }
    }
}

/// Sidebar filters driving both generators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketFilters {
    pub model: String,
    /// 0 means "derive from the data".
    pub min_year: i32,
    /// 0 means "derive from the data".
    pub max_year: i32,
    pub km_cap: u32,
    pub condition: ConditionFilter,
}

pub const YEAR_INPUT_MAX: i32 = 2025;
pub const KM_CAP_MIN: u32 = 5_000;
pub const KM_CAP_MAX: u32 = 300_000;
pub const KM_CAP_STEP: u32 = 1_000;

impl Default for MarketFilters {
    fn default() -> Self {
        Self {
            model: "BMW M3 E92".to_string(),
            min_year: 0,
            max_year: 0,
            km_cap: 100_000,
            condition: ConditionFilter::All,
        }
    }
}

impl MarketFilters {
    pub fn clamp_year(value: i32) -> i32 {
        value.clamp(0, YEAR_INPUT_MAX)
    }

    pub fn clamp_km_cap(value: u32) -> u32 {
        value.clamp(KM_CAP_MIN, KM_CAP_MAX)
    }
}

/// User-entered import parameters. Amounts are EUR unless named otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportCosts {
    /// `None` follows the average US asking price.
    pub purchase_usd: Option<f64>,
    pub shipping: f64,
    pub duty_pct: f64,
    pub vat_pct: f64,
    pub homologation: f64,
    pub other_fees: f64,
    pub sale_price_eur: f64,
}

impl Default for ImportCosts {
    fn default() -> Self {
        Self {
            purchase_usd: None,
            shipping: 2_000.0,
            duty_pct: 10.0,
            vat_pct: 22.0,
            homologation: 2_500.0,
            other_fees: 1_000.0,
            sale_price_eur: 60_000.0,
        }
    }
}

/// Landed cost split into its components, all in EUR.
#[derive(Clone, Debug, PartialEq)]
pub struct CostBreakdown {
    pub purchase_eur: f64,
    pub shipping: f64,
    pub duty: f64,
    pub vat: f64,
    pub homologation: f64,
    pub other_fees: f64,
    pub landed_cost: f64,
}

/// Average asking prices of the filtered tables.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MarketAverages {
    pub us_usd: f64,
    pub us_eur: f64,
    pub eu_eur: f64,
}

/// Base/quote currency codes, e.g. USD/EUR.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub base: String,
    pub quote: String,
}

impl CurrencyPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }

    pub fn usd_eur() -> Self {
        Self::new("USD", "EUR")
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.base, self.quote)
    }
}

/// Where an exchange rate came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateStatus {
    Live,
    Cached,
    Fallback,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FxQuote {
    pub pair: CurrencyPair,
    pub rate: f64,
    pub fetched_at: SystemTime,
    pub status: RateStatus,
}

impl FxQuote {
    pub fn new(pair: CurrencyPair, rate: f64, fetched_at: SystemTime, status: RateStatus) -> Self {
        Self {
            pair,
            rate,
            fetched_at,
            status,
        }
    }

    pub fn fallback(pair: CurrencyPair, rate: f64) -> Self {
        Self::new(pair, rate, SystemTime::now(), RateStatus::Fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_filter_parses_case_insensitively() {
        assert_eq!("All".parse::<ConditionFilter>(), Ok(ConditionFilter::All));
        assert_eq!(
            " Excellent ".parse::<ConditionFilter>(),
            Ok(ConditionFilter::Only(Condition::Excellent))
        );
        assert!("mint".parse::<ConditionFilter>().is_err());
    }

    #[test]
    fn all_filter_matches_every_condition() {
        for condition in Condition::ALL {
            assert!(ConditionFilter::All.matches(condition));
        }
        assert!(!ConditionFilter::Only(Condition::Good).matches(Condition::Scarce));
    }

    #[test]
    fn year_range_orders_bounds() {
        assert_eq!(YearRange::new(2010, 2001).ordered(), YearRange::new(2001, 2010));
        assert_eq!(YearRange::new(2001, 2010).ordered(), YearRange::new(2001, 2010));
    }

    #[test]
    fn filter_inputs_clamp_to_bounds() {
        assert_eq!(MarketFilters::clamp_year(-4), 0);
        assert_eq!(MarketFilters::clamp_year(3000), YEAR_INPUT_MAX);
        assert_eq!(MarketFilters::clamp_km_cap(10), KM_CAP_MIN);
        assert_eq!(MarketFilters::clamp_km_cap(1_000_000), KM_CAP_MAX);
    }
}
