pub mod condition_badge;
pub mod kpi_card;
pub mod listing_table;
pub mod price_histogram;
pub mod profit_indicator;
pub mod toast;
