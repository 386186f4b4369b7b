//! Listing generation and import arithmetic live here.

pub mod entities;
pub mod evaluation;
pub mod generator;
pub mod histogram;
pub mod normalize;
pub mod session;
pub mod years;

#[allow(unused_imports)]
pub use entities::{
    Condition, ConditionFilter, ConvertedListing, CostBreakdown, CurrencyPair, FxQuote,
    ImportCosts, Listing, Market, MarketAverages, MarketFilters, RateStatus, YearRange,
};
#[allow(unused_imports)]
pub use evaluation::{
    classify_profit, import_outlook, landed_cost, market_averages, mean, profit, ProfitOutlook,
    ProfitOutlookStatus,
};
#[allow(unused_imports)]
pub use generator::{generate, GenerateRequest, MarketProfile, EU_PROFILE, US_PROFILE};
#[allow(unused_imports)]
pub use histogram::{histogram, HistogramBin, PRICE_BINS};
#[allow(unused_imports)]
pub use session::{DatasetCache, MarketSnapshot, Session};
#[allow(unused_imports)]
pub use years::{observed_year_bounds, resolve_year_range};
