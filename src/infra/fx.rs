//! Exchange-rate lookup with a per-pair TTL cache and a fixed fallback.
//!
//! - `FxClient` asks an exchangerate.host style endpoint for one pair.
//! - `FxProvider` wraps any `RateSource`, caches results per currency pair
//!   and substitutes the fallback rate whenever the source fails.

use std::{
    collections::HashMap,
    future::Future,
    sync::Arc,
    time::{Duration, SystemTime},
};

use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, DEFAULT_FX_FALLBACK, DEFAULT_FX_TTL};
use crate::domain::{CurrencyPair, FxQuote, RateStatus};

const USER_AGENT: &str = concat!("car-market-analyzer/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FxError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response has no {0} rate")]
    MissingRate(String),
    #[error("unusable rate {rate} for {pair}")]
    InvalidRate { pair: CurrencyPair, rate: f64 },
}

/// Anything that can produce a live exchange rate.
pub trait RateSource {
    fn fetch_rate(&self, pair: &CurrencyPair) -> impl Future<Output = Result<f64, FxError>> + Send;
}

#[derive(Debug, Deserialize)]
struct RatesEnvelope {
    #[serde(default)]
    rates: Option<HashMap<String, f64>>,
}

/// Extracts `rates.<quote>` from a response body.
pub fn parse_rate_body(body: &str, pair: &CurrencyPair) -> Result<f64, FxError> {
    let envelope: RatesEnvelope = serde_json::from_str(body)?;
    let rate = envelope
        .rates
        .and_then(|rates| rates.get(&pair.quote).copied())
        .ok_or_else(|| FxError::MissingRate(pair.quote.clone()))?;

    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(FxError::InvalidRate {
            pair: pair.clone(),
            rate,
        })
    }
}

/// HTTP rate source.
#[derive(Clone)]
pub struct FxClient {
    http: Client,
    endpoint: Url,
}

impl FxClient {
    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> Result<Self, FxError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Self::with_client(endpoint, http)
    }

    pub fn with_client(endpoint: &str, http: Client) -> Result<Self, FxError> {
        let endpoint = Url::parse(endpoint)?;
        Ok(Self { http, endpoint })
    }

    pub fn request_url(&self, pair: &CurrencyPair) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("base", &pair.base)
            .append_pair("symbols", &pair.quote);
        url
    }
}

impl RateSource for FxClient {
    async fn fetch_rate(&self, pair: &CurrencyPair) -> Result<f64, FxError> {
        let url = self.request_url(pair);
        debug!("[fx] requesting {url}");
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_rate_body(&body, pair)
    }
}

struct Cached {
    rate: f64,
    fetched_at: SystemTime,
    status: RateStatus,
}

impl Cached {
    fn is_fresh_at(&self, now: SystemTime, ttl: Duration) -> bool {
        now.duration_since(self.fetched_at)
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(false)
    }
}

/// Session-owned rate lookup. Failed fetches resolve to the fallback rate,
/// which is cached like a live one so a dead endpoint is not hammered.
#[derive(Clone)]
pub struct FxProvider<S> {
    source: S,
    cache: Arc<Mutex<HashMap<CurrencyPair, Cached>>>,
    ttl: Duration,
    fallback: f64,
}

impl FxProvider<FxClient> {
    pub fn from_config(config: &AppConfig) -> Result<Self, FxError> {
        let client = FxClient::with_endpoint(&config.fx_url, config.fx_timeout)?;
        Ok(Self::new(client)
            .with_ttl(config.fx_ttl)
            .with_fallback(config.fx_fallback))
    }
}

impl<S: RateSource> FxProvider<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: Arc::new(Mutex::new(HashMap::new())),
            ttl: DEFAULT_FX_TTL,
            fallback: DEFAULT_FX_FALLBACK,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// USD→EUR quote for an input change. Inside the TTL this is a cache
    /// hit; `forced` drops every cached entry first.
    pub async fn refresh(&self, forced: bool) -> FxQuote {
        if forced {
            self.clear_cache().await;
        }
        self.usd_to_eur().await
    }

    pub async fn usd_to_eur(&self) -> FxQuote {
        self.rate(&CurrencyPair::usd_eur()).await
    }

    pub async fn rate(&self, pair: &CurrencyPair) -> FxQuote {
        self.rate_at(pair, SystemTime::now()).await
    }

    /// Cache lookup and refresh against an explicit clock.
    pub async fn rate_at(&self, pair: &CurrencyPair, now: SystemTime) -> FxQuote {
        let mut cache = self.cache.lock().await;
        if let Some(entry) = cache.get(pair).filter(|entry| entry.is_fresh_at(now, self.ttl)) {
            debug!("[fx] serving cached {pair} rate {:.4}", entry.rate);
            let status = match entry.status {
                RateStatus::Fallback => RateStatus::Fallback,
                _ => RateStatus::Cached,
            };
            return FxQuote::new(pair.clone(), entry.rate, entry.fetched_at, status);
        }

        let (rate, status) = match self.source.fetch_rate(pair).await {
            Ok(rate) => {
                info!("[fx] live {pair} rate {rate:.4}");
                (rate, RateStatus::Live)
            }
            Err(err) => {
                warn!("[fx] {pair} lookup failed ({err}); using fallback {:.4}", self.fallback);
                (self.fallback, RateStatus::Fallback)
            }
        };

        cache.insert(
            pair.clone(),
            Cached {
                rate,
                fetched_at: now,
                status,
            },
        );
        FxQuote::new(pair.clone(), rate, now, status)
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{Read, Write},
        net::{TcpListener, TcpStream},
        sync::atomic::{AtomicUsize, Ordering},
        thread,
        time::Instant,
    };

    use super::*;
    use crate::domain::Session;
    use crate::config::{DEFAULT_FX_TIMEOUT, DEFAULT_FX_URL};

    #[derive(Clone)]
    struct StaticSource {
        rate: Option<f64>,
        calls: Arc<AtomicUsize>,
    }

    impl StaticSource {
        fn ok(rate: f64) -> Self {
            Self {
                rate: Some(rate),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing() -> Self {
            Self {
                rate: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RateSource for StaticSource {
        async fn fetch_rate(&self, pair: &CurrencyPair) -> Result<f64, FxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rate.ok_or_else(|| FxError::MissingRate(pair.quote.clone()))
        }
    }

    #[tokio::test]
    async fn live_rate_is_returned_then_cached() {
        let source = StaticSource::ok(0.9137);
        let provider = FxProvider::new(source.clone());
        let pair = CurrencyPair::usd_eur();
        let now = SystemTime::now();

        let first = provider.rate_at(&pair, now).await;
        assert_eq!(first.rate, 0.9137);
        assert_eq!(first.status, RateStatus::Live);

        let second = provider.rate_at(&pair, now + Duration::from_secs(10)).await;
        assert_eq!(second.rate, 0.9137);
        assert_eq!(second.status, RateStatus::Cached);
        assert_eq!(second.fetched_at, now);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn configured_fallback_replaces_the_default() {
        let provider = FxProvider::new(StaticSource::failing()).with_fallback(0.88);
        let quote = provider.usd_to_eur().await;
        assert_eq!(quote.rate, 0.88);
        assert_eq!(quote.status, RateStatus::Fallback);
    }

    #[tokio::test]
    async fn failure_falls_back_without_retry() {
        let source = StaticSource::failing();
        let provider = FxProvider::new(source.clone());

        let quote = provider.usd_to_eur().await;
        assert_eq!(quote.rate, 0.92);
        assert_eq!(quote.status, RateStatus::Fallback);
        assert_eq!(source.calls(), 1);

        let again = provider.usd_to_eur().await;
        assert_eq!(again.status, RateStatus::Fallback);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn expired_entries_are_refetched() {
        let source = StaticSource::ok(0.95);
        let provider = FxProvider::new(source.clone()).with_ttl(Duration::from_secs(60));
        let pair = CurrencyPair::usd_eur();
        let now = SystemTime::now();

        provider.rate_at(&pair, now).await;
        let later = provider.rate_at(&pair, now + Duration::from_secs(61)).await;
        assert_eq!(later.status, RateStatus::Live);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn pairs_are_cached_independently_and_clearable() {
        let source = StaticSource::ok(1.1);
        let provider = FxProvider::new(source.clone()).with_fallback(1.0);
        provider.rate(&CurrencyPair::usd_eur()).await;
        provider.rate(&CurrencyPair::new("EUR", "USD")).await;
        assert_eq!(source.calls(), 2);

        provider.clear_cache().await;
        let quote = provider.usd_to_eur().await;
        assert_eq!(quote.status, RateStatus::Live);
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn expired_quote_replaces_the_session_rate() {
        let source = StaticSource::ok(0.95);
        let provider = FxProvider::new(source.clone()).with_ttl(Duration::from_secs(60));
        let pair = CurrencyPair::usd_eur();
        let mut session = Session::new(FxQuote::fallback(pair.clone(), 0.92));
        let start = SystemTime::now();

        let first = provider.rate_at(&pair, start).await;
        assert!(session.apply_fx_quote(first));
        assert_eq!(session.snapshot().fx_rate, 0.95);

        let within_ttl = provider.rate_at(&pair, start + Duration::from_secs(30)).await;
        assert!(!session.apply_fx_quote(within_ttl));
        assert_eq!(session.fx().status, RateStatus::Cached);
        assert_eq!(source.calls(), 1);

        let after_ttl = provider.rate_at(&pair, start + Duration::from_secs(61)).await;
        assert!(session.apply_fx_quote(after_ttl));
        assert_eq!(session.fx().status, RateStatus::Live);
        assert_eq!(session.fx().fetched_at, start + Duration::from_secs(61));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn forced_refresh_skips_the_cache() {
        let source = StaticSource::ok(0.93);
        let provider = FxProvider::new(source.clone());

        assert_eq!(provider.refresh(false).await.status, RateStatus::Live);
        assert_eq!(provider.refresh(false).await.status, RateStatus::Cached);
        assert_eq!(source.calls(), 1);

        assert_eq!(provider.refresh(true).await.status, RateStatus::Live);
        assert_eq!(source.calls(), 2);
    }

    /// Serves `/unavailable` (503), `/slow` (answers after 3 s) and anything
    /// else as a valid rates body, one thread per connection.
    fn serve_rates() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                thread::spawn(move || answer(stream));
            }
        });
        format!("http://{addr}")
    }

    fn answer(mut stream: TcpStream) {
        let mut request = Vec::new();
        let mut buf = [0_u8; 1024];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        let head = String::from_utf8_lossy(&request);
        let (status, body) = if head.starts_with("GET /unavailable") {
            ("503 Service Unavailable", "{}")
        } else if head.starts_with("GET /slow") {
            thread::sleep(Duration::from_secs(3));
            ("200 OK", r#"{"rates":{"EUR":0.5}}"#)
        } else {
            ("200 OK", r#"{"rates":{"EUR":0.911}}"#)
        };
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes());
    }

    fn local_client(base: &str, path: &str) -> FxClient {
        let http = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(1))
            .build()
            .unwrap();
        FxClient::with_client(&format!("{base}{path}"), http).unwrap()
    }

    #[tokio::test]
    async fn http_errors_and_timeouts_fall_back() {
        let base = serve_rates();
        let pair = CurrencyPair::usd_eur();

        let unavailable = local_client(&base, "/unavailable");
        assert!(matches!(
            unavailable.fetch_rate(&pair).await,
            Err(FxError::Http(_))
        ));
        let quote = FxProvider::new(unavailable).usd_to_eur().await;
        assert_eq!(quote.rate, 0.92);
        assert_eq!(quote.status, RateStatus::Fallback);

        let started = Instant::now();
        let quote = FxProvider::new(local_client(&base, "/slow")).usd_to_eur().await;
        assert_eq!(quote.rate, 0.92);
        assert_eq!(quote.status, RateStatus::Fallback);
        assert!(started.elapsed() < Duration::from_secs(3));

        let quote = FxProvider::new(local_client(&base, "/latest")).usd_to_eur().await;
        assert_eq!(quote.rate, 0.911);
        assert_eq!(quote.status, RateStatus::Live);
    }

    #[test]
    fn parses_rate_from_body() {
        let pair = CurrencyPair::usd_eur();
        let body = r#"{"success":true,"base":"USD","rates":{"EUR":0.9213}}"#;
        assert_eq!(parse_rate_body(body, &pair).unwrap(), 0.9213);
    }

    #[test]
    fn rejects_bodies_without_a_usable_rate() {
        let pair = CurrencyPair::usd_eur();
        assert!(matches!(
            parse_rate_body(r#"{"rates":{"GBP":0.8}}"#, &pair),
            Err(FxError::MissingRate(_))
        ));
        assert!(matches!(
            parse_rate_body(r#"{"success":false}"#, &pair),
            Err(FxError::MissingRate(_))
        ));
        assert!(matches!(
            parse_rate_body(r#"{"rates":{"EUR":0}}"#, &pair),
            Err(FxError::InvalidRate { .. })
        ));
        assert!(matches!(
            parse_rate_body("<html>", &pair),
            Err(FxError::Decode(_))
        ));
    }

    #[test]
    fn request_url_carries_pair() {
        let client = FxClient::with_endpoint(DEFAULT_FX_URL, DEFAULT_FX_TIMEOUT).unwrap();
        let url = client.request_url(&CurrencyPair::usd_eur());
        assert_eq!(
            url.as_str(),
            "https://api.exchangerate.host/latest?base=USD&symbols=EUR"
        );
    }
}
