//! Import profit simulator: landed cost of a US car against a target EU sale price.

use dioxus::prelude::*;

use crate::app::InputEvents;
use crate::domain::{ImportCosts, Market, Session};
use crate::ui::components::kpi_card::KpiCard;
use crate::ui::components::profit_indicator::ProfitIndicator;
use crate::ui::components::toast::{push_toast, ToastKind, ToastMessage};
use crate::ui::theme;
use crate::util::format::{dollar, euro, thousands};

#[derive(Clone, Copy, PartialEq)]
enum CostField {
    Shipping,
    DutyPct,
    VatPct,
    Homologation,
    OtherFees,
    SalePrice,
}

impl CostField {
    const ALL: [CostField; 6] = [
        CostField::Shipping,
        CostField::DutyPct,
        CostField::VatPct,
        CostField::Homologation,
        CostField::OtherFees,
        CostField::SalePrice,
    ];

    fn label(self) -> &'static str {
        match self {
            CostField::Shipping => "Shipping (€)",
            CostField::DutyPct => "Customs duty (%)",
            CostField::VatPct => "VAT (%)",
            CostField::Homologation => "Homologation (€)",
            CostField::OtherFees => "Other fees (€)",
            CostField::SalePrice => "Expected EU sale price (€)",
        }
    }

    fn read(self, costs: &ImportCosts) -> f64 {
        match self {
            CostField::Shipping => costs.shipping,
            CostField::DutyPct => costs.duty_pct,
            CostField::VatPct => costs.vat_pct,
            CostField::Homologation => costs.homologation,
            CostField::OtherFees => costs.other_fees,
            CostField::SalePrice => costs.sale_price_eur,
        }
    }

    fn write(self, costs: &mut ImportCosts, value: f64) {
        let slot = match self {
            CostField::Shipping => &mut costs.shipping,
            CostField::DutyPct => &mut costs.duty_pct,
            CostField::VatPct => &mut costs.vat_pct,
            CostField::Homologation => &mut costs.homologation,
            CostField::OtherFees => &mut costs.other_fees,
            CostField::SalePrice => &mut costs.sale_price_eur,
        };
        *slot = value;
    }
}

#[component]
pub fn ImportPage() -> Element {
    let session = use_context::<Signal<Session>>();
    let inputs = use_context::<InputEvents>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let costs = session.with(|s| s.costs().clone());
    let averages = session.with(|s| s.snapshot().averages);
    let fx_rate = session.with(|s| s.snapshot().fx_rate);
    let (breakdown, outlook) = session.with(|s| s.import_outlook());

    let purchase_value = costs
        .purchase_usd
        .map(|value| value.to_string())
        .unwrap_or_default();
    let purchase_placeholder = format!("avg US {}", thousands(averages.us_usd.trunc()));
    let purchase_usd = costs.effective_purchase_usd(&averages);
    let purchase_desc = format!("{} at {:.4}", dollar(purchase_usd), fx_rate);

    let breakdown_rows = [
        ("Purchase", breakdown.purchase_eur),
        ("Shipping", breakdown.shipping),
        ("Customs duty", breakdown.duty),
        ("VAT", breakdown.vat),
        ("Homologation", breakdown.homologation),
        ("Other fees", breakdown.other_fees),
    ];

    rsx! {
        div { class: "layout",
            aside {
                class: "{theme::panel(None)}",
                h2 { "Costs" }
                label { class: "field",
                    span { class: "label", "Purchase price (USD)" }
                    input {
                        class: "input",
                        r#type: "number",
                        min: "0",
                        placeholder: "{purchase_placeholder}",
                        value: "{purchase_value}",
                        onchange: move |evt: FormEvent| {
                            let raw = evt.value();
                            if raw.trim().is_empty() {
                                inputs.record(session, |s| s.update_costs(|c| c.purchase_usd = None));
                            } else if let Some(value) = parse_amount(&raw) {
                                inputs.record(session, |s| s.update_costs(|c| c.purchase_usd = Some(value)));
                            }
                        },
                    }
                }
                for field in CostField::ALL {
                    CostInput { field, value: field.read(&costs) }
                }
                button {
                    class: "btn",
                    onclick: move |_: MouseEvent| {
                        inputs.record(session, |s| s.reset_costs());
                        push_toast(toasts, ToastKind::Info, "Import costs reset to defaults.");
                    },
                    "Reset defaults"
                }
            }

            section { class: "stack",
                div { class: "grid-2",
                    KpiCard {
                        title: "Landed cost".to_string(),
                        value: euro(breakdown.landed_cost),
                        description: Some(purchase_desc),
                        market: Some(Market::Us),
                    }
                    KpiCard {
                        title: "Sale price".to_string(),
                        value: euro(costs.sale_price_eur),
                        description: Some(format!("avg EU listing {}", euro(averages.eu_eur))),
                        market: Some(Market::Eu),
                    }
                }
                ProfitIndicator { outlook }
                div {
                    class: "{theme::panel(None)}",
                    h2 { "Cost breakdown" }
                    table {
                        class: "breakdown",
                        tbody {
                            for (label, amount) in breakdown_rows {
                                tr {
                                    td { "{label}" }
                                    td { class: "num", "{euro(amount)}" }
                                }
                            }
                            tr {
                                class: "total",
                                td { "Total landed cost" }
                                td { class: "num", "{euro(breakdown.landed_cost)}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn CostInput(field: CostField, value: f64) -> Element {
    let session = use_context::<Signal<Session>>();
    let inputs = use_context::<InputEvents>();
    rsx! {
        label { class: "field",
            span { class: "label", "{field.label()}" }
            input {
                class: "input",
                r#type: "number",
                min: "0",
                value: "{value}",
                onchange: move |evt: FormEvent| {
                    if let Some(parsed) = parse_amount(&evt.value()) {
                        inputs.record(session, |s| s.update_costs(|c| field.write(c, parsed)));
                    }
                },
            }
        }
    }
}

/// Numeric input; negatives are passed through unvalidated.
fn parse_amount(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let plain = if raw.contains(',') {
        strip_grouping(raw)?
    } else {
        raw.to_string()
    };
    plain.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Removes thousands separators from `12,345.6` style input. A comma that is
/// not followed by exactly three digits (e.g. the decimal comma in `22,5`)
/// makes the input ambiguous and yields `None`.
fn strip_grouping(raw: &str) -> Option<String> {
    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (raw, None),
    };
    let (sign, unsigned) = match whole.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", whole),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    let mut groups = unsigned.split(',');
    let head = groups.next().filter(|head| head.len() <= 3 && all_digits(head))?;
    let mut plain = format!("{sign}{head}");
    for group in groups {
        if group.len() != 3 || !all_digits(group) {
            return None;
        }
        plain.push_str(group);
    }
    if let Some(fraction) = fraction {
        plain.push('.');
        plain.push_str(fraction);
    }
    Some(plain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_grouping_commas() {
        assert_eq!(parse_amount("40,000"), Some(40_000.0));
        assert_eq!(parse_amount("1,234,567.5"), Some(1_234_567.5));
        assert_eq!(parse_amount("-1,000"), Some(-1_000.0));
        assert_eq!(parse_amount(" 22.5 "), Some(22.5));
        assert_eq!(parse_amount("-100"), Some(-100.0));
        assert_eq!(parse_amount("ten"), None);
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn decimal_commas_are_rejected_not_misread() {
        assert_eq!(parse_amount("22,5"), None);
        assert_eq!(parse_amount("1,23"), None);
        assert_eq!(parse_amount("1234,567"), None);
        assert_eq!(parse_amount(",500"), None);
        assert_eq!(parse_amount("1,000,5"), None);
        assert_eq!(parse_amount("1.5,000"), None);
    }

    #[test]
    fn fields_write_back_to_their_slot() {
        let mut costs = ImportCosts::default();
        for (i, field) in CostField::ALL.into_iter().enumerate() {
            field.write(&mut costs, i as f64);
        }
        assert_eq!(costs.shipping, 0.0);
        assert_eq!(costs.vat_pct, 2.0);
        assert_eq!(costs.sale_price_eur, 5.0);
        assert_eq!(CostField::SalePrice.read(&costs), 5.0);
        assert_eq!(costs.purchase_usd, None);
    }
}
