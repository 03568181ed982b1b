//! Per-address sliding-window rate limiting for the public form endpoints.
//!
//! State is process-wide and in memory. Entries prune themselves on every
//! check, and once the map reaches its configured cap a full sweep drops
//! addresses whose whole window has aged out.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::HeaderMap;
use salonbook_core::LimitsConfig;
use tokio::sync::RwLock;
use tracing::warn;

/// Request timestamps for one client address within the current window.
#[derive(Debug, Default)]
struct WindowEntry {
    requests: Vec<Instant>,
}

impl WindowEntry {
    /// Drop timestamps that fell out of the window, then record this request.
    /// Returns the in-window count including the new request.
    fn record(&mut self, now: Instant, window: Duration) -> usize {
        self.requests.retain(|&at| now.duration_since(at) < window);
        self.requests.push(now);
        self.requests.len()
    }

    fn is_expired(&self, now: Instant, window: Duration) -> bool {
        self.requests.iter().all(|&at| now.duration_since(at) >= window)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Limited { retry_after_secs: u64 },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<RwLock<HashMap<IpAddr, WindowEntry>>>,
    window: Duration,
    max_requests: u32,
    max_tracked_ips: usize,
}

impl RateLimiter {
    pub fn new(config: &LimitsConfig) -> Self {
        Self {
            windows: Arc::new(RwLock::new(HashMap::new())),
            window: Duration::from_secs(config.window_secs),
            max_requests: config.max_requests,
            max_tracked_ips: config.max_tracked_ips,
        }
    }

    pub async fn check(&self, ip: IpAddr) -> RateLimitDecision {
        self.check_at(ip, Instant::now()).await
    }

    /// [`check`](Self::check) with the clock supplied by the caller.
    pub async fn check_at(&self, ip: IpAddr, now: Instant) -> RateLimitDecision {
        let mut windows = self.windows.write().await;

        if windows.len() >= self.max_tracked_ips && !windows.contains_key(&ip) {
            let window = self.window;
            windows.retain(|_, entry| !entry.is_expired(now, window));
        }

        let entry = windows.entry(ip).or_default();
        let count = entry.record(now, self.window);

        if count > self.max_requests as usize {
            warn!(
                event_name = "guard.rate_limit.exceeded",
                client_ip = %ip,
                count,
                limit = self.max_requests,
                "address exceeded the request window"
            );
            return RateLimitDecision::Limited { retry_after_secs: self.window.as_secs() };
        }

        RateLimitDecision::Allowed { remaining: self.max_requests - count as u32 }
    }

    #[cfg(test)]
    async fn tracked_addresses(&self) -> usize {
        self.windows.read().await.len()
    }
}

/// Client address for limiting: the first hop of `X-Forwarded-For` when the
/// site sits behind its reverse proxy, otherwise the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .unwrap_or_else(|| peer.ip())
}
