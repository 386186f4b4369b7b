use dioxus::prelude::*;

use crate::app::Route;
use crate::domain::Session;
use crate::ui::theme;
use crate::util::{
    format::{clock, humanize_age, rate},
    APP_NAME,
};

#[component]
pub fn Shell(children: Element) -> Element {
    let session = use_context::<Signal<Session>>();
    let mut fx_refresh = use_context::<Signal<u32>>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    let quote = session.with(|s| s.fx().clone());
    let (badge_class, badge_label) = theme::rate_badge(quote.status);
    let rate_display = rate(quote.rate);
    let fetched = format!("{} ({})", clock(quote.fetched_at), humanize_age(quote.fetched_at));

    rsx! {
        div { class: "app",
            header { class: "header",
                div {
                    h1 { "{APP_NAME}" }
                    p { class: "caption",
                        "{quote.pair}: "
                        strong { "{rate_display}" }
                        " "
                        span { class: "{badge_class}", "{badge_label}" }
                        " · {fetched}"
                    }
                }
                nav { class: "nav",
                    NavButton {
                        active: matches!(current_route, Route::Market {}),
                        onclick: move |_| { nav.push(Route::Market {}); },
                        label: "Market",
                    }
                    NavButton {
                        active: matches!(current_route, Route::Import {}),
                        onclick: move |_| { nav.push(Route::Import {}); },
                        label: "Import",
                    }
                    button {
                        class: "btn small",
                        title: "Fetch a fresh exchange rate",
                        onclick: move |_: MouseEvent| fx_refresh += 1,
                        "Refresh rate"
                    }
                }
            }
            main { class: "main",
                {children}
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    rsx! {
        button {
            class: "{theme::nav_button(active)}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
