use dioxus::prelude::*;

use crate::domain::Condition;
use crate::ui::theme;

#[component]
pub fn ConditionBadge(condition: Condition) -> Element {
    rsx! {
        span { class: "{theme::condition_badge(condition)}", "{condition}" }
    }
}
