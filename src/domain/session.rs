use std::collections::HashMap;

use tracing::debug;

use super::entities::{
    ConvertedListing, CostBreakdown, FxQuote, ImportCosts, Listing, Market, MarketAverages,
    MarketFilters, YearRange,
};
use super::evaluation::{import_outlook, market_averages, ProfitOutlook};
use super::generator::{generate, GenerateRequest};
use super::normalize::convert_us_listings;
use super::years::{observed_year_bounds, resolve_year_range};

/// Dataset entries kept before the cache is reset.
const MAX_CACHED_TABLES: usize = 64;

/// Generated tables keyed by their full generation parameters.
#[derive(Clone, Debug, Default)]
pub struct DatasetCache {
    tables: HashMap<GenerateRequest, Vec<Listing>>,
    year_bounds: HashMap<String, YearRange>,
}

impl DatasetCache {
    pub fn table(&mut self, request: &GenerateRequest) -> Vec<Listing> {
        if let Some(rows) = self.tables.get(request) {
            return rows.clone();
        }
        if self.tables.len() >= MAX_CACHED_TABLES {
            debug!("[session] dataset cache full, clearing {} tables", self.tables.len());
            self.tables.clear();
        }
        let rows = generate(request);
        self.tables.insert(request.clone(), rows.clone());
        rows
    }

    /// Year extent of the unfiltered sample for `model`.
    pub fn year_bounds(&mut self, model: &str) -> YearRange {
        if let Some(bounds) = self.year_bounds.get(model) {
            return *bounds;
        }
        if self.year_bounds.len() >= MAX_CACHED_TABLES {
            self.year_bounds.clear();
        }
        let bounds = observed_year_bounds(model);
        self.year_bounds.insert(model.to_string(), bounds);
        bounds
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }
}

/// Everything the dashboard shows for the current filters and rate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketSnapshot {
    pub years: Option<YearRange>,
    pub us: Vec<ConvertedListing>,
    pub eu: Vec<Listing>,
    pub averages: MarketAverages,
    pub fx_rate: f64,
}

/// Per-window dashboard state. Every mutation recomputes the snapshot.
#[derive(Clone, Debug)]
pub struct Session {
    filters: MarketFilters,
    costs: ImportCosts,
    fx: FxQuote,
    datasets: DatasetCache,
    snapshot: MarketSnapshot,
}

impl Session {
    pub fn new(initial_fx: FxQuote) -> Self {
        let mut session = Self {
            filters: MarketFilters::default(),
            costs: ImportCosts::default(),
            fx: initial_fx,
            datasets: DatasetCache::default(),
            snapshot: MarketSnapshot::default(),
        };
        session.recompute();
        session
    }

    pub fn filters(&self) -> &MarketFilters {
        &self.filters
    }

    pub fn costs(&self) -> &ImportCosts {
        &self.costs
    }

    pub fn fx(&self) -> &FxQuote {
        &self.fx
    }

    pub fn snapshot(&self) -> &MarketSnapshot {
        &self.snapshot
    }

    pub fn set_filters(&mut self, filters: MarketFilters) {
        self.filters = filters;
        self.recompute();
    }

    pub fn update_filters(&mut self, apply: impl FnOnce(&mut MarketFilters)) {
        let mut filters = self.filters.clone();
        apply(&mut filters);
        self.set_filters(filters);
    }

    pub fn set_fx_quote(&mut self, quote: FxQuote) {
        self.fx = quote;
        self.recompute();
    }

    /// Takes a quote re-read from the rate provider. Returns `true` when it
    /// comes from a different fetch than the current one; a cache hit only
    /// updates the status and leaves the tables alone.
    pub fn apply_fx_quote(&mut self, quote: FxQuote) -> bool {
        let fresh = quote.fetched_at != self.fx.fetched_at || quote.rate != self.fx.rate;
        if fresh {
            self.set_fx_quote(quote);
        } else {
            self.fx.status = quote.status;
        }
        fresh
    }

    /// Cost inputs only feed the import estimate, so tables stay as they are.
    pub fn update_costs(&mut self, apply: impl FnOnce(&mut ImportCosts)) {
        apply(&mut self.costs);
    }

    pub fn reset_costs(&mut self) {
        self.costs = ImportCosts::default();
    }

    pub fn import_outlook(&self) -> (CostBreakdown, ProfitOutlook) {
        import_outlook(&self.costs, self.snapshot.fx_rate, &self.snapshot.averages)
    }

    pub fn recompute(&mut self) {
        let filters = &self.filters;
        let observed = self.datasets.year_bounds(&filters.model);
        let years = resolve_year_range(filters.min_year, filters.max_year, observed);

        let us_request = GenerateRequest::new(
            Market::Us,
            filters.model.clone(),
            years,
            filters.km_cap,
            filters.condition,
        );
        let eu_request = GenerateRequest::new(
            Market::Eu,
            filters.model.clone(),
            years,
            filters.km_cap,
            filters.condition,
        );

        let us_raw = self.datasets.table(&us_request);
        let eu = self.datasets.table(&eu_request);
        let us = convert_us_listings(&us_raw, self.fx.rate);
        let averages = market_averages(&us, &eu);

        debug!(
            "[session] recomputed {} US / {} EU rows for {} ({}-{}) at rate {:.4}, {} tables cached",
            us.len(),
            eu.len(),
            filters.model,
            years.min,
            years.max,
            self.fx.rate,
            self.datasets.len()
        );

        self.snapshot = MarketSnapshot {
            years: Some(years),
            us,
            eu,
            averages,
            fx_rate: self.fx.rate,
        };
    }
}
