use dioxus::prelude::*;

use crate::domain::{histogram, HistogramBin, Market, PRICE_BINS};
use crate::ui::theme;
use crate::util::format::euro;

#[component]
pub fn PriceHistogram(title: String, market: Market, prices_eur: Vec<f64>) -> Element {
    let bins = histogram(&prices_eur, PRICE_BINS);
    let tallest = bins.iter().map(|bin| bin.count).max().unwrap_or(0);
    let axis = axis_labels(&bins);
    let bars = bins
        .iter()
        .map(|bin| BarView {
            style: format!("height: {:.1}%", bar_height(bin.count, tallest)),
            tooltip: format!("{} – {}: {}", euro(bin.start), euro(bin.end), bin.count),
        })
        .collect::<Vec<_>>();

    rsx! {
        div {
            class: "{theme::panel(Some(market))}",
            h2 { "{title}" }
            if bars.is_empty() {
                p { class: "caption", "No listings match the current filters." }
            } else {
                div {
                    class: "{theme::histogram(market)}",
                    for bar in bars {
                        div {
                            class: "bar",
                            style: "{bar.style}",
                            title: "{bar.tooltip}",
                        }
                    }
                }
                if let Some((low, high)) = axis {
                    div {
                        class: "histogram-axis",
                        span { "{low}" }
                        span { "{high}" }
                    }
                }
            }
        }
    }
}

struct BarView {
    style: String,
    tooltip: String,
}

fn bar_height(count: usize, tallest: usize) -> f64 {
    if tallest == 0 {
        0.0
    } else {
        count as f64 / tallest as f64 * 100.0
    }
}

fn axis_labels(bins: &[HistogramBin]) -> Option<(String, String)> {
    let first = bins.first()?;
    let last = bins.last()?;
    Some((euro(first.start), euro(last.end)))
}
