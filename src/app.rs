use dioxus::prelude::*;
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    domain::{CurrencyPair, FxQuote, RateStatus, Session},
    infra::fx::{FxClient, FxProvider},
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage, Toasts},
        pages::{ImportPage, MarketPage},
        shell::Shell,
    },
    util::{assets, format::rate},
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Market {},
    #[route("/import")]
    Import {},
}

#[component]
pub fn App() -> Element {
    let config = use_hook(|| {
        AppConfig::from_env().unwrap_or_else(|err| {
            warn!("[config] {err}; using defaults");
            AppConfig::default()
        })
    });
    use_context_provider(|| config.clone());

    let fx = use_hook({
        let config = config.clone();
        move || match FxProvider::from_config(&config) {
            Ok(provider) => Some(provider),
            Err(err) => {
                warn!("[fx] client unavailable ({err}); rates stay on the fallback");
                None
            }
        }
    });

    let session = use_signal({
        let fallback = config.fx_fallback;
        move || Session::new(FxQuote::fallback(CurrencyPair::usd_eur(), fallback))
    });
    use_context_provider(|| session);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    // Bumped by the header's refresh button; a change forces a refetch.
    let fx_refresh = use_signal(|| 0u32);
    use_context_provider(|| fx_refresh);
    let mut seen_refresh = use_signal(|| 0u32);

    let inputs = InputEvents(use_signal(|| 0u64));
    use_context_provider(|| inputs);

    // Re-runs on every input so the provider can swap in a new rate once the
    // cached one outlives its TTL.
    let _rate = use_resource(move || {
        let fx = fx.clone();
        async move {
            let requested = fx_refresh();
            inputs.count();
            let forced = requested != *seen_refresh.peek();
            if forced {
                seen_refresh.set(requested);
            }
            if let Some(provider) = fx {
                refresh_rate(provider, forced, session, toasts).await;
            } else if forced {
                push_toast(toasts, ToastKind::Error, "No exchange-rate client configured.");
            }
        }
    });

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toasts {}
    }
}

/// Counts user edits; the rate resource subscribes to it.
#[derive(Clone, Copy)]
pub struct InputEvents(Signal<u64>);

impl InputEvents {
    pub fn count(&self) -> u64 {
        *self.0.read()
    }

    /// Applies an edit to the session and notifies the rate resource.
    pub fn record(mut self, mut session: Signal<Session>, apply: impl FnOnce(&mut Session)) {
        session.with_mut(apply);
        self.0 += 1;
    }
}

async fn refresh_rate(
    provider: FxProvider<FxClient>,
    forced: bool,
    mut session: Signal<Session>,
    toasts: Signal<Vec<ToastMessage>>,
) {
    let quote = provider.refresh(forced).await;
    let (pair, value, status) = (quote.pair.clone(), quote.rate, quote.status);
    if !session.with_mut(|s| s.apply_fx_quote(quote)) {
        return;
    }
    info!("[app] applying {pair} rate {value:.4} ({status:?})");

    match status {
        RateStatus::Fallback => push_toast(
            toasts,
            ToastKind::Warning,
            format!("Exchange rate unavailable; using fallback {}.", rate(value)),
        ),
        RateStatus::Live if forced => push_toast(
            toasts,
            ToastKind::Success,
            format!("{pair} updated to {}.", rate(value)),
        ),
        _ => {}
    }
}

#[component]
pub fn Market() -> Element {
    rsx! { Shell { MarketPage {} } }
}

#[component]
pub fn Import() -> Element {
    rsx! { Shell { ImportPage {} } }
}
