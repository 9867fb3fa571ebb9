//! VATSIM data feed client and roster poll loop.
//!
//! The [`RosterClient`] trait abstracts over where controller rosters come from.
//! [`VatsimFeedClient`] fetches the VATSIM V3 JSON data feed via `reqwest`;
//! [`RosterPoller`] polls a client on an interval and forwards each changed
//! roster over an mpsc channel.
//!
//! # Design
//!
//! - `new()` + `start()` spawns the poll loop as a tokio task
//! - the loop stops when the receiving side of the channel is dropped
//! - consecutive fetch errors back off exponentially (2^n seconds, capped at 5 minutes)

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc;

use super::{Controller, Facility};

/// Default VATSIM V3 JSON data feed URL.
pub const DEFAULT_VATSIM_DATA_URL: &str = "https://data.vatsim.net/v3/vatsim-data.json";

/// Default poll interval (the feed refreshes roughly every 15 seconds).
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;

/// Default HTTP timeout for fetching the data feed.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum backoff duration (5 minutes).
const MAX_BACKOFF: Duration = Duration::from_secs(300);

/// Errors raised while fetching or parsing a roster.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// JSON deserialization failed.
    #[error("Failed to parse data feed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Controller entry as it appears in the feed. Only the fields we need.
#[derive(Debug, Deserialize)]
struct FeedController {
    cid: u64,
    callsign: String,
    #[serde(default)]
    frequency: String,
    #[serde(default)]
    facility: i64,
}

/// Top-level VATSIM V3 data feed structure.
///
/// Only `controllers` and `atis` are read; other fields are ignored.
#[derive(Debug, Deserialize)]
struct VatsimData {
    #[serde(default)]
    controllers: Vec<FeedController>,
    #[serde(default)]
    atis: Vec<FeedController>,
}

/// Parse a VATSIM V3 data feed document into a roster.
///
/// ATIS connections are returned with [`Facility::Atis`]. The result is sorted
/// by callsign then cid so equal feeds produce equal rosters.
pub fn parse_vatsim_feed(bytes: &[u8]) -> Result<Vec<Controller>, FeedError> {
    let data: VatsimData = serde_json::from_slice(bytes)?;

    let mut roster: Vec<Controller> = data
        .controllers
        .into_iter()
        .map(|c| Controller::new(c.cid, c.callsign, c.frequency, Facility::from_vatsim_code(c.facility)))
        .chain(
            data.atis
                .into_iter()
                .map(|c| Controller::new(c.cid, c.callsign, c.frequency, Facility::Atis)),
        )
        .collect();
    roster.sort_by(|a, b| a.callsign.cmp(&b.callsign).then(a.cid.cmp(&b.cid)));

    tracing::debug!(controllers = roster.len(), "Parsed VATSIM data feed");
    Ok(roster)
}

/// Source of live controller rosters.
pub trait RosterClient: Send + Sync {
    /// Fetch the current roster.
    fn fetch_roster(&self) -> impl Future<Output = Result<Vec<Controller>, FeedError>> + Send;
}

/// Roster client reading the VATSIM V3 data feed over HTTP.
pub struct VatsimFeedClient {
    /// Reusable HTTP client with connection pooling.
    http: reqwest::Client,

    /// URL of the V3 data feed.
    data_url: String,
}

impl VatsimFeedClient {
    /// Create a client for `data_url`.
    pub fn new(data_url: impl Into<String>) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| FeedError::Http(e.to_string()))?;

        Ok(Self {
            http,
            data_url: data_url.into(),
        })
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

impl RosterClient for VatsimFeedClient {
    async fn fetch_roster(&self) -> Result<Vec<Controller>, FeedError> {
        let response = self
            .http
            .get(&self.data_url)
            .send()
            .await
            .map_err(|e| FeedError::Http(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FeedError::Http(e.to_string()))?;

        parse_vatsim_feed(&bytes)
    }
}

/// Poller settings.
#[derive(Debug, Clone)]
pub struct RosterPollerConfig {
    /// How often to poll the client.
    pub poll_interval: Duration,
}

impl Default for RosterPollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}

impl From<&crate::config::FeedSettings> for RosterPollerConfig {
    fn from(settings: &crate::config::FeedSettings) -> Self {
        Self {
            poll_interval: Duration::from_secs(settings.poll_interval_secs),
        }
    }
}

/// Poll loop forwarding changed rosters.
///
/// `T` is whatever the receiver consumes; anything constructible from a
/// roster works, so the poller can feed a service trigger channel directly.
pub struct RosterPoller<C: RosterClient, T> {
    client: C,
    tx: mpsc::Sender<T>,
    config: RosterPollerConfig,
}

impl<C, T> RosterPoller<C, T>
where
    C: RosterClient + 'static,
    T: From<Vec<Controller>> + Send + 'static,
{
    pub fn new(client: C, tx: mpsc::Sender<T>, config: RosterPollerConfig) -> Self {
        Self { client, tx, config }
    }

    /// Start the poll loop as an async task.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(self) {
        tracing::info!(
            poll_interval_secs = self.config.poll_interval.as_secs(),
            "Roster poller started"
        );

        let mut interval = tokio::time::interval(self.config.poll_interval);
        let mut consecutive_errors: u32 = 0;
        let mut last: Option<Vec<Controller>> = None;

        loop {
            interval.tick().await;

            if self.tx.is_closed() {
                tracing::debug!("Roster channel closed, stopping");
                break;
            }

            if consecutive_errors > 0 {
                let backoff = calculate_backoff(consecutive_errors);
                tracing::debug!(
                    backoff_secs = backoff.as_secs(),
                    consecutive_errors,
                    "Backing off after errors"
                );
                tokio::time::sleep(backoff).await;
            }

            match self.client.fetch_roster().await {
                Ok(roster) => {
                    consecutive_errors = 0;

                    if last.as_ref() == Some(&roster) {
                        tracing::trace!("Roster unchanged");
                        continue;
                    }
                    last = Some(roster.clone());

                    if self.tx.send(T::from(roster)).await.is_err() {
                        tracing::debug!("Roster channel closed, stopping");
                        break;
                    }
                }
                Err(e) => {
                    consecutive_errors += 1;
                    tracing::warn!(
                        error = %e,
                        consecutive_errors,
                        "Failed to fetch roster"
                    );
                }
            }
        }

        tracing::info!("Roster poller stopped");
    }
}

/// Exponential backoff: 2^n seconds, capped at [`MAX_BACKOFF`].
fn calculate_backoff(consecutive_errors: u32) -> Duration {
    let secs = 2u64.saturating_pow(consecutive_errors.min(20));
    Duration::from_secs(secs).min(MAX_BACKOFF)
}
