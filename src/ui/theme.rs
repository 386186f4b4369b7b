//! Market-specific class helpers so both halves of the dashboard stay consistent.

use crate::domain::{Condition, Market, ProfitOutlookStatus, RateStatus};

pub fn market_class(market: Market) -> &'static str {
    match market {
        Market::Us => "us",
        Market::Eu => "eu",
    }
}

pub fn panel(market: Option<Market>) -> String {
    match market {
        Some(market) => format!("panel {}", market_class(market)),
        None => "panel".to_string(),
    }
}

pub fn table_container(market: Market) -> String {
    format!("table-wrap {}", market_class(market))
}

pub fn histogram(market: Market) -> String {
    format!("histogram {}", market_class(market))
}

pub fn nav_button(active: bool) -> &'static str {
    if active {
        "nav-btn active"
    } else {
        "nav-btn"
    }
}

pub fn condition_badge(condition: Condition) -> &'static str {
    match condition {
        Condition::Scarce => "badge scarce",
        Condition::Good => "badge good",
        Condition::Excellent => "badge excellent",
    }
}

pub fn rate_badge(status: RateStatus) -> (&'static str, &'static str) {
    match status {
        RateStatus::Live => ("badge live", "live"),
        RateStatus::Cached => ("badge cached", "cached"),
        RateStatus::Fallback => ("badge fallback", "fallback"),
    }
}

pub fn outlook(status: ProfitOutlookStatus) -> (&'static str, &'static str) {
    match status {
        ProfitOutlookStatus::Favorable => ("outlook favorable", "Potentially profitable"),
        ProfitOutlookStatus::Unfavorable => ("outlook unfavorable", "US not cheaper"),
        ProfitOutlookStatus::NegativeProfit => ("outlook negative", "Not profitable"),
    }
}
