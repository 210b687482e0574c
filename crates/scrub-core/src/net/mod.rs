//! Network reachability monitoring
//!
//! Connectivity is a two-state signal with edge notifications. Consumers
//! read the current status before each replay step and subscribe for
//! offline-to-online transitions to trigger catch-up syncs.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How often the probe monitor rechecks reachability
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(10);

/// Per-probe request timeout
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Reachability of the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    Online,
    Offline,
}

impl NetworkStatus {
    /// Whether the remote is reachable
    #[must_use]
    pub const fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

impl fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// Source of the online/offline signal
pub trait NetworkMonitor: Send + Sync {
    /// Best-effort current status
    fn current_status(&self) -> NetworkStatus;

    /// Receiver that wakes on status transitions
    fn subscribe(&self) -> watch::Receiver<NetworkStatus>;
}

/// Monitor whose status is set by the caller
///
/// Used by tests and by one-shot commands that probe once and pin the
/// result for the duration of the command.
#[derive(Debug)]
pub struct ManualNetworkMonitor {
    tx: watch::Sender<NetworkStatus>,
}

impl ManualNetworkMonitor {
    /// Create a monitor reporting `initial`
    #[must_use]
    pub fn new(initial: NetworkStatus) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Update the status; subscribers wake only on a real transition
    pub fn set_status(&self, status: NetworkStatus) {
        self.tx.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }
}

impl NetworkMonitor for ManualNetworkMonitor {
    fn current_status(&self) -> NetworkStatus {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<NetworkStatus> {
        self.tx.subscribe()
    }
}

/// Monitor that polls the API base URL on an interval
///
/// Any HTTP response counts as online; only transport failures count as
/// offline. A falsely optimistic probe (captive portal) surfaces as
/// ordinary request failures during the next sync pass.
pub struct ProbeMonitor {
    tx: Arc<watch::Sender<NetworkStatus>>,
    handle: JoinHandle<()>,
}

impl ProbeMonitor {
    /// Start probing `base_url` every `interval`
    ///
    /// The first probe fires immediately; the status starts offline
    /// until it lands. Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(client: reqwest::Client, base_url: String, interval: Duration) -> Self {
        let (tx, _rx) = watch::channel(NetworkStatus::Offline);
        let tx = Arc::new(tx);
        let probe_tx = Arc::clone(&tx);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let status = probe_once(&client, &base_url).await;
                probe_tx.send_if_modified(|current| {
                    if *current == status {
                        false
                    } else {
                        tracing::info!(%status, "network status changed");
                        *current = status;
                        true
                    }
                });
            }
        });
        Self { tx, handle }
    }
}

impl NetworkMonitor for ProbeMonitor {
    fn current_status(&self) -> NetworkStatus {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<NetworkStatus> {
        self.tx.subscribe()
    }
}

impl Drop for ProbeMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// One-shot reachability check against the API base URL
///
/// Any HTTP response, success or error status alike, proves the server
/// is reachable.
pub async fn probe_once(client: &reqwest::Client, base_url: &str) -> NetworkStatus {
    match client.get(base_url).timeout(PROBE_TIMEOUT).send().await {
        Ok(_) => NetworkStatus::Online,
        Err(error) => {
            tracing::debug!(%error, "connectivity probe failed");
            NetworkStatus::Offline
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_manual_monitor_signals_transitions_only() {
        let monitor = ManualNetworkMonitor::new(NetworkStatus::Offline);
        let mut rx = monitor.subscribe();
        assert!(!rx.has_changed().unwrap());

        monitor.set_status(NetworkStatus::Offline);
        assert!(!rx.has_changed().unwrap());

        monitor.set_status(NetworkStatus::Online);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), NetworkStatus::Online);
        assert_eq!(monitor.current_status(), NetworkStatus::Online);
    }

    #[tokio::test]
    async fn test_probe_unreachable_host_is_offline() {
        let client = reqwest::Client::new();
        let status = probe_once(&client, "http://127.0.0.1:9").await;
        assert_eq!(status, NetworkStatus::Offline);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(NetworkStatus::Online.to_string(), "online");
        assert_eq!(NetworkStatus::Offline.to_string(), "offline");
    }
}
