//! HTTP utilities shared by the Risk and Discord clients

use std::{future::Future, pin::Pin, time::Duration};

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client,
};

use tracing::warn;

use crate::Result;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("risk-stars/", env!("CARGO_PKG_VERSION"));

/// Build the shared `reqwest` client with a per-request timeout.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// Accept and Content-Type headers for JSON APIs.
pub fn json_headers() -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(ACCEPT, HeaderValue::from_static("application/json"));
    h.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    h
}

/// JSON headers plus `Authorization: Bot <token>`.
pub fn bot_auth_headers(token: &str) -> Result<HeaderMap> {
    let mut h = json_headers();
    let mut auth = HeaderValue::from_str(&format!("Bot {}", token))?;
    auth.set_sensitive(true);
    h.insert(AUTHORIZATION, auth);
    Ok(h)
}

/// Read a header as a float, ignoring missing or malformed values.
pub fn header_f64(headers: &HeaderMap, name: &str) -> Option<f64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<f64>().ok())
}

/// Longest wait honored for a server-supplied delay.
pub const MAX_WAIT: Duration = Duration::from_secs(3600);

/// Convert a server-supplied seconds value into a `Duration`.
///
/// Negative or non-finite values become zero; anything longer than
/// [`MAX_WAIT`] is clamped to it.
pub fn seconds(value: f64) -> Duration {
    if !(value.is_finite() && value > 0.0) {
        return Duration::ZERO;
    }
    match Duration::try_from_secs_f64(value) {
        Ok(wait) if wait <= MAX_WAIT => wait,
        _ => {
            warn!(requested_secs = value, "Server wait too long; clamping to {:?}", MAX_WAIT);
            MAX_WAIT
        }
    }
}

pub type SleepFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Source of waits for rate-limit cooldowns and retry delays.
///
/// Production code uses [`TokioSleeper`]; tests substitute a recorder so they
/// can assert on the requested durations without waiting.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> SleepFuture;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> SleepFuture {
        Box::pin(tokio::time::sleep(duration))
    }
}
