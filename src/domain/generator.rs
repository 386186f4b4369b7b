//! Seeded synthetic listings for the US and EU markets.
//!
//! Each market owns a fixed seed, so identical requests always produce
//! identical tables. Condition filtering happens after generation and only
//! drops rows.

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::entities::{Condition, ConditionFilter, Listing, Market, YearRange};

pub const MILES_TO_KM: f64 = 1.609;
const MIN_MILEAGE: u32 = 3_000;

/// Hard-coded sampling ranges for one market.
#[derive(Debug)]
pub struct MarketProfile {
    pub market: Market,
    pub seed: u64,
    pub default_count: usize,
    /// Half-open price range in the market currency.
    pub price_range: (u32, u32),
    pub condition_weights: [(Condition, f64); 3],
    pub locations: [&'static str; 6],
}

pub const US_PROFILE: MarketProfile = MarketProfile {
    market: Market::Us,
    seed: 42,
    default_count: 150,
    price_range: (25_000, 90_000),
    condition_weights: [
        (Condition::Scarce, 0.2),
        (Condition::Good, 0.5),
        (Condition::Excellent, 0.3),
    ],
    locations: ["CA", "TX", "FL", "NY", "NJ", "IL"],
};

pub const EU_PROFILE: MarketProfile = MarketProfile {
    market: Market::Eu,
    seed: 123,
    default_count: 120,
    price_range: (23_000, 85_000),
    condition_weights: [
        (Condition::Scarce, 0.25),
        (Condition::Good, 0.5),
        (Condition::Excellent, 0.25),
    ],
    locations: ["DE", "FR", "IT", "ES", "NL", "BE"],
};

impl Market {
    pub fn profile(&self) -> &'static MarketProfile {
        match self {
            Market::Us => &US_PROFILE,
            Market::Eu => &EU_PROFILE,
        }
    }
}

impl MarketProfile {
    /// Half-open mileage range in the market unit for a km cap.
    pub fn mileage_range(&self, km_cap: u32) -> (u32, u32) {
        let upper = match self.market {
            Market::Us => (km_cap as f64 / MILES_TO_KM) as u32,
            Market::Eu => km_cap,
        };
        (MIN_MILEAGE, upper)
    }
}

/// Everything that shapes one generated table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GenerateRequest {
    pub market: Market,
    pub model: String,
    pub years: YearRange,
    pub km_cap: u32,
    pub condition: ConditionFilter,
    pub count: usize,
}

impl GenerateRequest {
    pub fn new(
        market: Market,
        model: impl Into<String>,
        years: YearRange,
        km_cap: u32,
        condition: ConditionFilter,
    ) -> Self {
        Self {
            market,
            model: model.into(),
            years,
            km_cap,
            condition,
            count: market.profile().default_count,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

pub fn generate(request: &GenerateRequest) -> Vec<Listing> {
    let profile = request.market.profile();
    let mut rng = ChaCha8Rng::seed_from_u64(profile.seed);

    let years = request.years.ordered();
    let (price_low, price_high) = profile.price_range;
    let (mileage_low, mileage_high) = profile.mileage_range(request.km_cap);

    let mut rows = Vec::with_capacity(request.count);
    for _ in 0..request.count {
        let year = rng.gen_range(years.min..=years.max);
        let price = draw_below(&mut rng, price_low, price_high);
        let mileage = draw_below(&mut rng, mileage_low, mileage_high);
        let condition = profile
            .condition_weights
            .choose_weighted(&mut rng, |(_, weight)| *weight)
            .map(|(condition, _)| *condition)
            .unwrap_or(Condition::Good);
        let location = profile
            .locations
            .choose(&mut rng)
            .copied()
            .unwrap_or_default();

        rows.push(Listing {
            market: request.market,
            model: request.model.clone(),
            year,
            price,
            mileage,
            condition,
            location: location.to_string(),
        });
    }

    rows.retain(|row| request.condition.matches(row.condition));
    rows
}

/// Uniform draw in `[low, high)`; collapses to `low` when the range is empty.
fn draw_below<R: Rng>(rng: &mut R, low: u32, high: u32) -> u32 {
    if high <= low {
        low
    } else {
        rng.gen_range(low..high)
    }
}
