/// HTTP client for the bot's status and control endpoints, plus the poll
/// generation guard that drops out-of-order responses.
use tracing::debug;
use url::Url;

use crate::error::ClientError;
use crate::snapshot::StatusSnapshot;

/// Environment variable naming the bot's base URL.
pub const BASE_URL_ENV: &str = "WEATHERVANE_URL";
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Client for `GET /api/status` and `POST /api/bot/{start,stop}`.
///
/// No timeout is configured on the status call: a hung request delays only
/// its own cycle, and the generation guard discards it if a newer poll
/// lands first.
#[derive(Debug, Clone)]
pub struct StatusClient {
    http: reqwest::Client,
    base: Url,
}

impl StatusClient {
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    /// Base URL from `WEATHERVANE_URL`, defaulting to the local bot.
    pub fn from_env() -> Result<Self, ClientError> {
        let raw = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base = Url::parse(&raw).map_err(|e| ClientError::BaseUrl(format!("{}: {}", raw, e)))?;
        Ok(Self::new(base))
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path)
            .map_err(|e| ClientError::BaseUrl(e.to_string()))
    }

    /// Fetch one status snapshot.
    pub async fn fetch_status(&self) -> Result<StatusSnapshot, ClientError> {
        let url = self.endpoint("/api/status")?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::NonSuccess(status.as_u16()));
        }

        response
            .json::<StatusSnapshot>()
            .await
            .map_err(|e| ClientError::Malformed(e.to_string()))
    }

    pub async fn start_bot(&self) -> Result<(), ClientError> {
        self.control("/api/bot/start").await
    }

    pub async fn stop_bot(&self) -> Result<(), ClientError> {
        self.control("/api/bot/stop").await
    }

    /// Fire a control request. The response body is ignored; the caller
    /// refreshes via an immediate poll regardless of the outcome here.
    async fn control(&self, path: &str) -> Result<(), ClientError> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::NonSuccess(status.as_u16()));
        }
        Ok(())
    }
}

/// Monotonic poll generations.
///
/// Each dispatched poll gets an id from [`Generations::issue`]; a response
/// is applied only if [`Generations::admit`] accepts it. A late response
/// from an older poll than the newest applied one is discarded, so an
/// overlapping slow poll can never roll the display back.
#[derive(Debug, Default)]
pub struct Generations {
    issued: u64,
    applied: u64,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next generation id for a poll about to be dispatched.
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Accept `generation` for display iff it is newer than the last one
    /// applied. Marks it applied when accepted.
    pub fn admit(&mut self, generation: u64) -> bool {
        if generation > self.applied {
            self.applied = generation;
            true
        } else {
            debug!(generation, applied = self.applied, "discarding stale poll response");
            false
        }
    }
}
