use dioxus::prelude::*;

use super::condition_badge::ConditionBadge;
use crate::domain::{Condition, ConvertedListing, Listing, Market};
use crate::ui::theme;
use crate::util::format::{euro, thousands};

/// One display row; US rows carry their converted columns.
#[derive(Clone, PartialEq)]
pub struct ListingRow {
    pub model: String,
    pub year: i32,
    pub price: String,
    pub mileage: String,
    pub condition: Condition,
    pub location: String,
    pub price_eur: Option<String>,
    pub mileage_km: Option<String>,
}

impl From<&Listing> for ListingRow {
    fn from(listing: &Listing) -> Self {
        Self {
            model: listing.model.clone(),
            year: listing.year,
            price: format!(
                "{}{}",
                listing.market.currency_symbol(),
                thousands(listing.price as f64)
            ),
            mileage: thousands(listing.mileage as f64),
            condition: listing.condition,
            location: listing.location.clone(),
            price_eur: None,
            mileage_km: None,
        }
    }
}

impl From<&ConvertedListing> for ListingRow {
    fn from(row: &ConvertedListing) -> Self {
        Self {
            price_eur: Some(euro(row.price_eur)),
            mileage_km: Some(thousands(row.mileage_km as f64)),
            ..ListingRow::from(&row.listing)
        }
    }
}

#[component]
pub fn ListingTable(market: Market, rows: Vec<ListingRow>) -> Element {
    let is_empty = rows.is_empty();
    let converted = market == Market::Us;
    let columns = if converted { 8 } else { 6 };
    let price_header = format!("Price ({})", market.currency_symbol());
    let mileage_header = format!("Mileage ({})", market.mileage_unit());

    rsx! {
        div {
            class: "{theme::table_container(market)}",
            table {
                thead {
                    tr {
                        th { "Model" }
                        th { "Year" }
                        th { "{price_header}" }
                        th { "{mileage_header}" }
                        th { "Condition" }
                        th { "{market.location_label()}" }
                        if converted {
                            th { "Price (€)" }
                            th { "Mileage (km)" }
                        }
                    }
                }
                tbody {
                    for row in rows {
                        ListingRowView { row, converted }
                    }
                    if is_empty {
                        tr {
                            td {
                                class: "empty",
                                colspan: "{columns}",
                                "No listings match the current filters."
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ListingRowView(row: ListingRow, converted: bool) -> Element {
    let price_eur = row.price_eur.clone().unwrap_or_default();
    let mileage_km = row.mileage_km.clone().unwrap_or_default();
    rsx! {
        tr {
            td { "{row.model}" }
            td { "{row.year}" }
            td { class: "num", "{row.price}" }
            td { class: "num", "{row.mileage}" }
            td { ConditionBadge { condition: row.condition } }
            td { "{row.location}" }
            if converted {
                td { class: "num", "{price_eur}" }
                td { class: "num", "{mileage_km}" }
            }
        }
    }
}
