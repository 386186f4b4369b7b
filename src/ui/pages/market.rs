use dioxus::prelude::*;

use crate::app::InputEvents;
use crate::config::AppConfig;
use crate::domain::entities::KM_CAP_STEP;
use crate::domain::{ConditionFilter, Market, MarketFilters, Session};
use crate::infra::export::{eu_csv, us_csv, write_export, EU_EXPORT_FILENAME, US_EXPORT_FILENAME};
use crate::ui::components::kpi_card::KpiCard;
use crate::ui::components::listing_table::{ListingRow, ListingTable};
use crate::ui::components::price_histogram::PriceHistogram;
use crate::ui::components::toast::{push_toast, ToastKind, ToastMessage};
use crate::ui::theme;
use crate::util::format::{dollar, euro, rate};

#[component]
pub fn MarketPage() -> Element {
    let session = use_context::<Signal<Session>>();
    let inputs = use_context::<InputEvents>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let config = use_context::<AppConfig>();

    let filters = session.with(|s| s.filters().clone());
    let snapshot = session.with(|s| s.snapshot().clone());
    let averages = snapshot.averages;

    let year_label = snapshot
        .years
        .map(|years| format!("{} – {}", years.min, years.max))
        .unwrap_or_else(|| "—".to_string());
    let year_hint = if filters.min_year == 0 || filters.max_year == 0 {
        "Derived from the listings"
    } else {
        "Set in the sidebar"
    };

    let us_prices = snapshot.us.iter().map(|row| row.price_eur).collect::<Vec<_>>();
    let eu_prices = snapshot.eu.iter().map(|row| row.price as f64).collect::<Vec<_>>();
    let us_rows = snapshot.us.iter().map(ListingRow::from).collect::<Vec<_>>();
    let eu_rows = snapshot.eu.iter().map(ListingRow::from).collect::<Vec<_>>();
    let us_count = format!("{} listings", snapshot.us.len());
    let eu_count = format!("{} listings", snapshot.eu.len());
    let rate_desc = format!("at USD→EUR {}", rate(snapshot.fx_rate));

    let min_year_value = year_input_value(filters.min_year);
    let max_year_value = year_input_value(filters.max_year);
    let km_value = filters.km_cap.to_string();
    let condition_value = filters.condition.as_str();

    let on_download_us = {
        let export_dir = config.export_dir.clone();
        let rows = snapshot.us.clone();
        move |_: MouseEvent| match us_csv(&rows)
            .and_then(|csv| write_export(&export_dir, US_EXPORT_FILENAME, &csv))
        {
            Ok(path) => push_toast(
                toasts,
                ToastKind::Success,
                format!("Saved {}", path.display()),
            ),
            Err(err) => push_toast(toasts, ToastKind::Error, format!("US export failed: {err}")),
        }
    };

    let on_download_eu = {
        let export_dir = config.export_dir.clone();
        let rows = snapshot.eu.clone();
        move |_: MouseEvent| match eu_csv(&rows)
            .and_then(|csv| write_export(&export_dir, EU_EXPORT_FILENAME, &csv))
        {
            Ok(path) => push_toast(
                toasts,
                ToastKind::Success,
                format!("Saved {}", path.display()),
            ),
            Err(err) => push_toast(toasts, ToastKind::Error, format!("EU export failed: {err}")),
        }
    };

    rsx! {
        div { class: "layout",
            aside {
                class: "{theme::panel(None)}",
                h2 { "Filters" }
                label { class: "field",
                    span { class: "label", "Model" }
                    input {
                        class: "input",
                        value: "{filters.model}",
                        onchange: move |evt: FormEvent| {
                            let model = evt.value().trim().to_string();
                            if !model.is_empty() {
                                inputs.record(session, |s| s.update_filters(|f| f.model = model));
                            }
                        },
                    }
                }
                div { class: "grid-2",
                    label { class: "field",
                        span { class: "label", "Min year" }
                        input {
                            class: "input",
                            r#type: "number",
                            min: "0",
                            max: "2025",
                            placeholder: "auto",
                            value: "{min_year_value}",
                            onchange: move |evt: FormEvent| {
                                if let Some(year) = parse_year_input(&evt.value()) {
                                    inputs.record(session, |s| s.update_filters(|f| f.min_year = year));
                                }
                            },
                        }
                    }
                    label { class: "field",
                        span { class: "label", "Max year" }
                        input {
                            class: "input",
                            r#type: "number",
                            min: "0",
                            max: "2025",
                            placeholder: "auto",
                            value: "{max_year_value}",
                            onchange: move |evt: FormEvent| {
                                if let Some(year) = parse_year_input(&evt.value()) {
                                    inputs.record(session, |s| s.update_filters(|f| f.max_year = year));
                                }
                            },
                        }
                    }
                }
                label { class: "field",
                    span { class: "label", "Max mileage (km)" }
                    input {
                        class: "input",
                        r#type: "number",
                        min: "5000",
                        max: "300000",
                        step: "{KM_CAP_STEP}",
                        value: "{km_value}",
                        onchange: move |evt: FormEvent| {
                            if let Some(km_cap) = parse_km_input(&evt.value()) {
                                inputs.record(session, |s| s.update_filters(|f| f.km_cap = km_cap));
                            }
                        },
                    }
                }
                label { class: "field",
                    span { class: "label", "Condition" }
                    select {
                        class: "input",
                        value: "{condition_value}",
                        onchange: move |evt: FormEvent| {
                            if let Ok(condition) = evt.value().parse::<ConditionFilter>() {
                                inputs.record(session, |s| s.update_filters(|f| f.condition = condition));
                            }
                        },
                        for choice in ConditionFilter::OPTIONS {
                            option {
                                value: "{choice.as_str()}",
                                selected: choice == filters.condition,
                                "{choice.as_str()}"
                            }
                        }
                    }
                }
                h2 { "Download" }
                div { class: "grid-2",
                    button { class: "btn", onclick: on_download_us, "US CSV" }
                    button { class: "btn", onclick: on_download_eu, "EU CSV" }
                }
                p { class: "caption", "Saved to {config.export_dir.display()}" }
            }

            section { class: "stack",
                div { class: "grid-2",
                    KpiCard {
                        title: "Average US price".to_string(),
                        value: dollar(averages.us_usd),
                        description: Some(format!("{} · {us_count}", euro(averages.us_eur))),
                        market: Some(Market::Us),
                    }
                    KpiCard {
                        title: "Average EU price".to_string(),
                        value: euro(averages.eu_eur),
                        description: Some(eu_count),
                        market: Some(Market::Eu),
                    }
                }
                div { class: "grid-2",
                    KpiCard {
                        title: "Year range".to_string(),
                        value: year_label,
                        description: Some(year_hint.to_string()),
                        market: None,
                    }
                    KpiCard {
                        title: "US price in EUR".to_string(),
                        value: euro(averages.us_eur),
                        description: Some(rate_desc),
                        market: None,
                    }
                }
                div { class: "grid-2",
                    PriceHistogram {
                        title: "US prices (€)".to_string(),
                        market: Market::Us,
                        prices_eur: us_prices,
                    }
                    PriceHistogram {
                        title: "EU prices (€)".to_string(),
                        market: Market::Eu,
                        prices_eur: eu_prices,
                    }
                }
                div {
                    class: "{theme::panel(Some(Market::Us))}",
                    h2 { "{Market::Us.name()} listings" }
                    ListingTable { market: Market::Us, rows: us_rows }
                }
                div {
                    class: "{theme::panel(Some(Market::Eu))}",
                    h2 { "{Market::Eu.name()} listings" }
                    ListingTable { market: Market::Eu, rows: eu_rows }
                }
            }
        }
    }
}

fn year_input_value(year: i32) -> String {
    if year == 0 {
        String::new()
    } else {
        year.to_string()
    }
}

/// Empty input means "auto" (0). Unparsable text yields `None`.
fn parse_year_input(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0);
    }
    raw.parse::<i32>().ok().map(MarketFilters::clamp_year)
}

/// Snaps to the nearest step before clamping to the allowed range.
fn parse_km_input(raw: &str) -> Option<u32> {
    let value = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    let step = f64::from(KM_CAP_STEP);
    let snapped = ((value / step).round() * step).max(0.0) as u32;
    Some(MarketFilters::clamp_km_cap(snapped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_input_clamps_and_treats_blank_as_auto() {
        assert_eq!(parse_year_input(""), Some(0));
        assert_eq!(parse_year_input(" 2011 "), Some(2011));
        assert_eq!(parse_year_input("3000"), Some(2025));
        assert_eq!(parse_year_input("-5"), Some(0));
        assert_eq!(parse_year_input("abc"), None);
    }

    #[test]
    fn km_input_snaps_to_step_and_bounds() {
        assert_eq!(parse_km_input("120400"), Some(120_000));
        assert_eq!(parse_km_input("120500"), Some(121_000));
        assert_eq!(parse_km_input("10"), Some(5_000));
        assert_eq!(parse_km_input("1000000"), Some(300_000));
        assert_eq!(parse_km_input(""), None);
    }

    #[test]
    fn auto_year_renders_blank() {
        assert_eq!(year_input_value(0), "");
        assert_eq!(year_input_value(1999), "1999");
    }
}
