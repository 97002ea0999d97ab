use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// One outbound proxy from the proxy list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyEndpoint {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl ProxyEndpoint {
    /// Authenticated URL understood by the HTTP client.
    pub fn proxy_url(&self) -> String {
        format!(
            "http://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port
        )
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseProxyError {
    #[error("expected 4 colon-separated fields, found {0}")]
    FieldCount(usize),
    #[error("invalid port {0:?}")]
    Port(String),
}

impl FromStr for ProxyEndpoint {
    type Err = ParseProxyError;

    /// Parses one `ip:port:username:password` record.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.trim().split(':').collect();
        if parts.len() != 4 {
            return Err(ParseProxyError::FieldCount(parts.len()));
        }
        let port = parts[1]
            .parse::<u16>()
            .map_err(|_| ParseProxyError::Port(parts[1].to_string()))?;
        Ok(Self {
            host: parts[0].to_string(),
            port,
            username: parts[2].to_string(),
            password: parts[3].to_string(),
        })
    }
}

/// Thread-safe checkout/return pool of proxy endpoints.
///
/// An endpoint is in exactly one of the available or checked-out sets at
/// any instant. [`ProxyPool::acquire`] waits when every endpoint is checked
/// out; it never fabricates one.
pub struct ProxyPool {
    state: Mutex<PoolState>,
    poll_interval: Duration,
}

struct PoolState {
    // FIFO: released endpoints go to the back, so successive checkouts
    // cycle through the whole list.
    available: VecDeque<ProxyEndpoint>,
    checked_out: Vec<ProxyEndpoint>,
}

impl ProxyPool {
    pub fn new(endpoints: Vec<ProxyEndpoint>) -> Self {
        Self::with_poll_interval(endpoints, DEFAULT_POLL_INTERVAL)
    }

    /// Pool that re-checks availability every `poll_interval` while waiting.
    pub fn with_poll_interval(endpoints: Vec<ProxyEndpoint>, poll_interval: Duration) -> Self {
        Self {
            state: Mutex::new(PoolState {
                available: endpoints.into(),
                checked_out: Vec::new(),
            }),
            poll_interval,
        }
    }

    /// Check out one endpoint, waiting until one is returned if none is
    /// available. Takes a clone of the pool handle so the lease can give
    /// the endpoint back on drop, whatever the exit path of the request
    /// it served.
    pub async fn acquire(self: Arc<Self>) -> ProxyLease {
        loop {
            if let Some(endpoint) = self.try_acquire() {
                return ProxyLease {
                    pool: self,
                    endpoint,
                };
            }
            log::warn!("no proxies available, waiting for one to be returned");
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Non-blocking checkout.
    pub fn try_acquire(&self) -> Option<ProxyEndpoint> {
        let mut state = self.lock();
        let endpoint = state.available.pop_front()?;
        state.checked_out.push(endpoint.clone());
        Some(endpoint)
    }

    /// Return a checked-out endpoint. A no-op if the endpoint is not
    /// currently checked out, so double release cannot corrupt the sets.
    pub fn release(&self, endpoint: &ProxyEndpoint) {
        let mut state = self.lock();
        if let Some(pos) = state.checked_out.iter().position(|e| e == endpoint) {
            let endpoint = state.checked_out.swap_remove(pos);
            state.available.push_back(endpoint);
        }
    }

    /// Endpoints currently available for checkout.
    pub fn available(&self) -> usize {
        self.lock().available.len()
    }

    /// Endpoints currently checked out.
    pub fn checked_out(&self) -> usize {
        self.lock().checked_out.len()
    }

    pub fn len(&self) -> usize {
        let state = self.lock();
        state.available.len() + state.checked_out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, PoolState> {
        // A panicked holder leaves the sets structurally intact.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A checked-out proxy endpoint, returned to its pool on drop.
pub struct ProxyLease {
    pool: Arc<ProxyPool>,
    endpoint: ProxyEndpoint,
}

impl ProxyLease {
    pub fn endpoint(&self) -> &ProxyEndpoint {
        &self.endpoint
    }
}

impl Drop for ProxyLease {
    fn drop(&mut self) {
        self.pool.release(&self.endpoint);
    }
}
