use dioxus::prelude::*;

use crate::domain::ProfitOutlook;
use crate::ui::theme;
use crate::util::format::euro;

#[component]
pub fn ProfitIndicator(outlook: ProfitOutlook) -> Element {
    let (class, label) = theme::outlook(outlook.status);
    let profit_display = euro(outlook.profit);

    rsx! {
        div {
            class: "{class}",
            div {
                class: "row",
                span { "Estimated profit" }
                span { "{label}" }
            }
            p { class: "kpi-value", "{profit_display}" }
            p { class: "kpi-desc", "{outlook.rationale}" }
        }
    }
}
