use dioxus::prelude::*;

use crate::domain::Market;
use crate::ui::theme;

#[component]
pub fn KpiCard(
    title: String,
    value: String,
    description: Option<String>,
    market: Option<Market>,
) -> Element {
    rsx! {
        div {
            class: "{theme::panel(market)}",
            h3 { class: "kpi-title", "{title}" }
            p { class: "kpi-value", "{value}" }
            if let Some(desc) = description {
                p { class: "kpi-desc", "{desc}" }
            }
        }
    }
}
