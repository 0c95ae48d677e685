use crate::constants::{traffic_data_url, POLL_INTERVAL};
use crate::types::Junction;
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Bundled junction dataset, the no-backend variant of the feed. Loaded once
/// at startup, immutable afterwards.
pub const BUNDLED_DATASET: &str = include_str!("../data/junctions.json");

/// # Errors
///
/// Fails only if the shipped dataset is malformed.
pub fn bundled_junctions() -> Result<Vec<Junction>> {
    serde_json::from_str(BUNDLED_DATASET).context("bundled junction dataset is malformed")
}

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub base_url: String,
    pub interval: Duration,
}

impl PollerConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), interval: POLL_INTERVAL }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn url(&self) -> String {
        traffic_data_url(&self.base_url)
    }
}

/// Handle owned by the view that started a poller. Cancelling stops the
/// timer and tears down the apply loop, so a response still in flight can
/// never be published afterwards. Dropping the handle has the same effect.
pub struct FeedHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl FeedHandle {
    pub fn cancel(self) {
        let _ = self.stop.send(true);
        self.task.abort();
    }
}

/// Live variant of the data source: polls the traffic-data endpoint on a
/// fixed cadence and publishes each snapshot wholesale.
pub struct Poller;

impl Poller {
    /// Starts polling immediately. Each tick fires its request without
    /// waiting for the previous one, so responses may arrive out of order;
    /// every request carries a sequence number and a response is applied
    /// only if it is newer than the last applied one, which keeps a slow
    /// early response from clobbering a fresher snapshot.
    ///
    /// A failed or malformed response is logged and skipped: the previous
    /// snapshot stays on screen and the next tick retries unconditionally.
    #[must_use]
    pub fn start(
        client: reqwest::Client,
        config: PollerConfig,
    ) -> (watch::Receiver<Option<Junction>>, FeedHandle) {
        let (snapshot_tx, snapshot_rx) = watch::channel(None);
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let url = config.url();
            let mut ticker = tokio::time::interval(config.interval);
            let (response_tx, mut response_rx) = mpsc::unbounded_channel::<(u64, Junction)>();

            let mut issued: u64 = 0;
            let mut applied: u64 = 0;

            loop {
                tokio::select! {
                    changed = stop_rx.changed() => {
                        // A dropped handle counts as a cancel.
                        if changed.is_err() || *stop_rx.borrow() {
                            debug!("poller for {url} cancelled");
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        issued += 1;
                        let sequence = issued;
                        let client = client.clone();
                        let url = url.clone();
                        let response_tx = response_tx.clone();
                        tokio::spawn(async move {
                            match fetch_snapshot(&client, &url).await {
                                Ok(snapshot) => {
                                    let _ = response_tx.send((sequence, snapshot));
                                }
                                Err(e) => warn!("traffic-data poll failed: {e:#}"),
                            }
                        });
                    }
                    Some((sequence, snapshot)) = response_rx.recv() => {
                        if sequence > applied {
                            applied = sequence;
                            if snapshot_tx.send(Some(snapshot)).is_err() {
                                // Nobody is watching anymore.
                                break;
                            }
                        } else {
                            debug!(
                                "discarding stale poll response ({sequence} <= {applied})"
                            );
                        }
                    }
                }
            }
        });

        (snapshot_rx, FeedHandle { stop: stop_tx, task })
    }
}

async fn fetch_snapshot(client: &reqwest::Client, url: &str) -> Result<Junction> {
    let snapshot = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<Junction>()
        .await
        .with_context(|| format!("malformed traffic-data body from {url}"))?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::time::{sleep, timeout};

    fn junction_body(id: &str) -> String {
        format!(
            r#"{{"id": "{id}", "name": "Anna Salai", "lat": 13.08, "lng": 80.27,
                "congestion": "High", "vehicle_count": 42, "iot": []}}"#
        )
    }

    /// One-shot HTTP responder: `plan(n)` decides, per accepted connection,
    /// how long to stall and which body to send; `None` shuts the listener
    /// down so later polls see a refused connection.
    async fn stub_endpoint<F>(plan: F) -> SocketAddr
    where
        F: Fn(usize) -> Option<(Duration, String)> + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let mut accepted = 0;
            loop {
                let Ok((mut socket, _)) = listener.accept().await else { break };
                let Some((delay, body)) = plan(accepted) else { break };
                accepted += 1;

                tokio::spawn(async move {
                    let mut request = [0u8; 1024];
                    let _ = socket.read(&mut request).await;
                    sleep(delay).await;
                    let response = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                         content-length: {}\r\nconnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });

        addr
    }

    fn test_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    fn config_for(addr: SocketAddr, interval: Duration) -> PollerConfig {
        PollerConfig::new(format!("http://{addr}")).with_interval(interval)
    }

    #[tokio::test]
    async fn first_snapshot_arrives_without_waiting_a_full_interval() {
        let addr = stub_endpoint(|_| Some((Duration::ZERO, junction_body("J1")))).await;
        let (mut rx, handle) =
            Poller::start(test_client(), config_for(addr, Duration::from_secs(60)));

        timeout(Duration::from_secs(5), rx.changed()).await.unwrap().unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().id, "J1");

        handle.cancel();
    }

    #[tokio::test]
    async fn cancel_before_response_leaves_state_untouched() {
        let addr = stub_endpoint(|_| Some((Duration::from_millis(400), junction_body("J1")))).await;
        let (rx, handle) =
            Poller::start(test_client(), config_for(addr, Duration::from_secs(60)));

        // First request is in flight; cancel before the stalled response lands.
        sleep(Duration::from_millis(100)).await;
        handle.cancel();

        sleep(Duration::from_millis(600)).await;
        assert!(rx.borrow().is_none(), "late response was applied after cancel");
    }

    #[tokio::test]
    async fn poll_failure_keeps_the_previous_snapshot() {
        // Exactly one good response, then the endpoint goes away.
        let addr = stub_endpoint(|n| (n == 0).then(|| (Duration::ZERO, junction_body("J1")))).await;
        let (mut rx, handle) =
            Poller::start(test_client(), config_for(addr, Duration::from_millis(100)));

        timeout(Duration::from_secs(5), rx.changed()).await.unwrap().unwrap();
        rx.borrow_and_update();

        // Several failed ticks later the last good snapshot is still there.
        sleep(Duration::from_millis(400)).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(rx.borrow().as_ref().unwrap().id, "J1");

        handle.cancel();
    }

    #[tokio::test]
    async fn slow_early_response_cannot_clobber_a_fresher_one() {
        // The first request stalls long enough for the second to win the
        // race; when the stale body finally lands it must be discarded.
        let addr = stub_endpoint(|n| {
            Some(if n == 0 {
                (Duration::from_millis(700), junction_body("stale"))
            } else {
                (Duration::ZERO, junction_body("fresh"))
            })
        })
        .await;
        let (mut rx, handle) =
            Poller::start(test_client(), config_for(addr, Duration::from_millis(150)));

        let fresh_applied = timeout(Duration::from_secs(5), async {
            loop {
                rx.changed().await.unwrap();
                if rx.borrow_and_update().as_ref().unwrap().id == "fresh" {
                    break;
                }
            }
        });
        fresh_applied.await.unwrap();

        // Outlive the stalled response by a comfortable margin.
        sleep(Duration::from_millis(900)).await;
        assert_eq!(rx.borrow().as_ref().unwrap().id, "fresh");

        handle.cancel();
    }
}
