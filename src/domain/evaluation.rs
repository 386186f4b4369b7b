use super::entities::{ConvertedListing, CostBreakdown, ImportCosts, Listing, MarketAverages};

/// Arithmetic mean; an empty input averages to zero.
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub fn market_averages(us: &[ConvertedListing], eu: &[Listing]) -> MarketAverages {
    MarketAverages {
        us_usd: mean(us.iter().map(|row| row.listing.price as f64)),
        us_eur: mean(us.iter().map(|row| row.price_eur)),
        eu_eur: mean(eu.iter().map(|row| row.price as f64)),
    }
}

impl ImportCosts {
    /// Purchase price in USD, following the US average until overridden.
    pub fn effective_purchase_usd(&self, averages: &MarketAverages) -> f64 {
        self.purchase_usd.unwrap_or_else(|| averages.us_usd.trunc())
    }
}

pub fn landed_cost(purchase_usd: f64, fx_rate: f64, costs: &ImportCosts) -> CostBreakdown {
    let purchase_eur = purchase_usd * fx_rate;
    let duty = purchase_eur * costs.duty_pct / 100.0;
    let vat = (purchase_eur + duty + costs.shipping) * costs.vat_pct / 100.0;
    let landed_cost =
        purchase_eur + costs.shipping + duty + vat + costs.homologation + costs.other_fees;

    CostBreakdown {
        purchase_eur,
        shipping: costs.shipping,
        duty,
        vat,
        homologation: costs.homologation,
        other_fees: costs.other_fees,
        landed_cost,
    }
}

pub fn profit(sale_price_eur: f64, breakdown: &CostBreakdown) -> f64 {
    sale_price_eur - breakdown.landed_cost
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfitOutlookStatus {
    Favorable,
    /// US cars are not cheaper on average, whatever the profit says.
    Unfavorable,
    NegativeProfit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProfitOutlook {
    pub status: ProfitOutlookStatus,
    pub profit: f64,
    pub rationale: String,
}

pub fn classify_profit(profit: f64, averages: &MarketAverages) -> ProfitOutlookStatus {
    if averages.us_eur >= averages.eu_eur {
        ProfitOutlookStatus::Unfavorable
    } else if profit > 0.0 {
        ProfitOutlookStatus::Favorable
    } else {
        ProfitOutlookStatus::NegativeProfit
    }
}

/// Full import estimate: cost breakdown, profit and its classification.
pub fn import_outlook(
    costs: &ImportCosts,
    fx_rate: f64,
    averages: &MarketAverages,
) -> (CostBreakdown, ProfitOutlook) {
    let purchase_usd = costs.effective_purchase_usd(averages);
    let breakdown = landed_cost(purchase_usd, fx_rate, costs);
    let profit = profit(costs.sale_price_eur, &breakdown);
    let status = classify_profit(profit, averages);

    let rationale = format!(
        "Sale {:.0} - landed {:.0} (avg US {:.0} vs EU {:.0})",
        costs.sale_price_eur, breakdown.landed_cost, averages.us_eur, averages.eu_eur
    );

    (
        breakdown,
        ProfitOutlook {
            status,
            profit,
            rationale,
        },
    )
}
