use super::entities::{ConditionFilter, Listing, Market, YearRange};
use super::generator::{generate, GenerateRequest};

/// Parameters of the unfiltered sample used to discover "auto" year bounds.
pub const OBSERVATION_YEARS: YearRange = YearRange { min: 1990, max: 2025 };
pub const OBSERVATION_KM_CAP: u32 = 300_000;
pub const OBSERVATION_COUNT: usize = 200;

/// Smallest and largest year present in a table.
pub fn observed_extent(rows: &[Listing]) -> Option<YearRange> {
    let min = rows.iter().map(|row| row.year).min()?;
    let max = rows.iter().map(|row| row.year).max()?;
    Some(YearRange::new(min, max))
}

/// Unfiltered generation requests for both markets.
pub fn observation_requests(model: &str) -> [GenerateRequest; 2] {
    [Market::Us, Market::Eu].map(|market| {
        GenerateRequest::new(
            market,
            model,
            OBSERVATION_YEARS,
            OBSERVATION_KM_CAP,
            ConditionFilter::All,
        )
        .with_count(OBSERVATION_COUNT)
    })
}

/// Year extent across a full unfiltered sample of both markets.
pub fn observed_year_bounds(model: &str) -> YearRange {
    let [us, eu] = observation_requests(model);
    combine_extents(observed_extent(&generate(&us)), observed_extent(&generate(&eu)))
}

/// Widest range covering both extents; falls back to the sampled window.
pub fn combine_extents(us: Option<YearRange>, eu: Option<YearRange>) -> YearRange {
    match (us, eu) {
        (Some(us), Some(eu)) => YearRange::new(us.min.min(eu.min), us.max.max(eu.max)),
        (Some(single), None) | (None, Some(single)) => single,
        (None, None) => OBSERVATION_YEARS,
    }
}

/// User bounds win when positive; zero defers to the observed extent.
pub fn resolve_year_range(user_min: i32, user_max: i32, observed: YearRange) -> YearRange {
    let min = if user_min > 0 { user_min } else { observed.min };
    let max = if user_max > 0 { user_max } else { observed.max };
    YearRange::new(min, max)
}
