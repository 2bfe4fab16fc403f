//! Polling and state reconciliation.
//!
//! Three cycles feed one [`DashboardState`]:
//!
//! - the fleet cycle refreshes the asset list, alarm membership and the
//!   latest sample of every asset,
//! - the detail cycle polls the series of the selected asset,
//! - alarm detail is loaded when live mode is switched on and then kept in
//!   sync by the fleet cycle.
//!
//! Every completion re-checks its cancellation token and sequence number
//! while holding the state lock, so a response that is no longer current
//! never reaches the state.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{ApiError, FleetApi};
use crate::config::DashboardConfig;
use crate::models::{Alarm, Asset, CommandAck, TelemetrySample, TelemetrySeries};
use crate::state::DashboardState;

pub struct Dashboard {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn FleetApi>,
    config: DashboardConfig,
    root: CancellationToken,
    seq: AtomicU64,
    started: AtomicBool,
    shared: Mutex<Shared>,
}

/// State plus the bookkeeping needed to decide whether a completion is
/// still current. Guarded by a single lock.
#[derive(Default)]
struct Shared {
    state: DashboardState,
    selection: Option<CancellationToken>,
    series_seq: u64,
    fleet_seq: u64,
    alarm_detail_seq: u64,
    command_generation: u64,
}

struct AssetFetch {
    asset_id: String,
    alarms: Vec<Alarm>,
    latest: Option<TelemetrySample>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn FleetApi>, config: DashboardConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                config: config.sanitized(),
                root: CancellationToken::new(),
                seq: AtomicU64::new(0),
                started: AtomicBool::new(false),
                shared: Mutex::new(Shared::default()),
            }),
        }
    }

    /// Spawn the fleet cycle. Its first run is immediate. Calling this more
    /// than once has no effect.
    pub fn start(&self) {
        if self.inner.started.swap(true, Ordering::SeqCst) || self.inner.root.is_cancelled() {
            return;
        }
        info!(
            "Starting fleet cycle (every {}s)",
            self.inner.config.fleet_interval.as_secs_f64()
        );
        tokio::spawn(run_fleet_cycle(self.inner.clone()));
    }

    pub fn snapshot(&self) -> DashboardState {
        self.inner.shared.lock().state.clone()
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Run a single fleet cycle now.
    pub async fn refresh_fleet(&self) {
        self.inner.refresh_fleet().await;
    }

    /// Fetch alarm detail for every known asset now.
    pub async fn load_alarm_details(&self) {
        self.inner.load_alarm_details().await;
    }

    /// Change the selected asset.
    ///
    /// Selecting the already selected id keeps its detail cycle running.
    /// Any other change cancels the previous detail cycle, clears the series
    /// and, for `Some`, starts a new cycle whose first fetch is immediate.
    pub fn select_asset(&self, asset: Option<Asset>) {
        let mut shared = self.inner.shared.lock();
        if self.inner.root.is_cancelled() {
            return;
        }

        let unchanged = match (&shared.state.selected_asset, &asset) {
            (Some(current), Some(next)) => current.id == next.id,
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            shared.state.selected_asset = asset;
            return;
        }

        if let Some(previous) = shared.selection.take() {
            previous.cancel();
        }
        shared.state.selected_series.clear();
        shared.state.selected_asset = asset.clone();

        let Some(asset) = asset else {
            debug!("Selection cleared");
            return;
        };

        let token = self.inner.root.child_token();
        shared.selection = Some(token.clone());
        drop(shared);

        debug!(asset_id = %asset.id, "Selected asset");
        tokio::spawn(run_detail_cycle(self.inner.clone(), asset.id, token));
    }

    /// Switch live alarm mode. Turning it on triggers an immediate alarm
    /// detail load; the fleet cycle keeps it current afterwards.
    pub fn set_alarm_live(&self, on: bool) {
        {
            let mut shared = self.inner.shared.lock();
            if self.inner.root.is_cancelled() {
                return;
            }
            shared.state.alarm_live_mode = on;
        }

        if on {
            let inner = self.inner.clone();
            tokio::spawn(async move {
                let root = inner.root.clone();
                tokio::select! {
                    _ = root.cancelled() => {}
                    _ = inner.load_alarm_details() => {}
                }
            });
        }
    }

    /// Send a command for the selected asset.
    ///
    /// Returns `Ok(None)` without calling the API when nothing is selected.
    /// On success the ack status is shown until the clear delay elapses or a
    /// newer command replaces it.
    pub async fn send_command(
        &self,
        cmd: &str,
        params: Value,
    ) -> Result<Option<CommandAck>, ApiError> {
        let asset_id = {
            let shared = self.inner.shared.lock();
            if self.inner.root.is_cancelled() {
                return Ok(None);
            }
            match shared.state.selected_id() {
                Some(id) => id.to_string(),
                None => {
                    debug!(cmd, "No asset selected, command not sent");
                    return Ok(None);
                }
            }
        };

        let ack = self.inner.api.send_command(&asset_id, cmd, params).await?;
        info!(asset_id = %asset_id, cmd, status = %ack.status, "Command acknowledged");

        let generation = {
            let mut shared = self.inner.shared.lock();
            if self.inner.root.is_cancelled() {
                return Ok(Some(ack));
            }
            shared.command_generation += 1;
            shared.state.command_status = Some(ack.status.clone());
            shared.command_generation
        };

        let inner = self.inner.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = inner.root.cancelled() => {}
                _ = sleep(inner.config.command_status_clear) => {
                    let mut shared = inner.shared.lock();
                    if !inner.root.is_cancelled() && shared.command_generation == generation {
                        shared.state.command_status = None;
                    }
                }
            }
        });

        Ok(Some(ack))
    }

    /// Stop every cycle and timer and reset the state. In-flight responses
    /// that arrive afterwards are discarded.
    pub fn teardown(&self) {
        let mut shared = self.inner.shared.lock();
        self.inner.root.cancel();
        shared.selection = None;
        shared.state = DashboardState::default();
        info!("Dashboard torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.root.is_cancelled()
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.inner.root.cancel();
    }
}

impl Inner {
    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn refresh_fleet(&self) {
        let seq = self.next_seq();

        let assets = match self.api.get_assets().await {
            Ok(assets) => assets,
            Err(e) => {
                warn!("Fleet refresh skipped, asset list failed: {}", e);
                return;
            }
        };

        let fetches = assets.iter().map(|asset| self.fetch_asset(&asset.id));
        let results = join_all(fetches).await;

        let mut shared = self.shared.lock();
        if self.root.is_cancelled() {
            debug!(seq, "Discarding fleet refresh after teardown");
            return;
        }
        if seq <= shared.fleet_seq {
            debug!(seq, "Discarding stale fleet refresh");
            return;
        }
        shared.fleet_seq = seq;

        let mut membership = HashSet::new();
        let mut latest = HashMap::new();
        let mut detail = HashMap::new();
        for fetch in results {
            if !fetch.alarms.is_empty() {
                membership.insert(fetch.asset_id.clone());
            }
            if let Some(sample) = fetch.latest {
                latest.insert(fetch.asset_id.clone(), sample);
            }
            detail.insert(fetch.asset_id, fetch.alarms);
        }

        let live = shared.state.alarm_live_mode;
        let state = &mut shared.state;
        state.assets = assets;
        state.alarm_membership = membership;
        state.latest_by_asset = latest;

        if live && seq > shared.alarm_detail_seq {
            shared.alarm_detail_seq = seq;
            shared.state.alarm_detail = detail;
        }

        debug!(
            seq,
            assets = shared.state.assets.len(),
            alarms = shared.state.alarm_membership.len(),
            "Fleet refresh committed"
        );
    }

    /// Alarms and latest sample for one asset. Failures degrade to no data.
    async fn fetch_asset(&self, asset_id: &str) -> AssetFetch {
        let (alarms, telemetry) = tokio::join!(
            self.api.get_alarms(asset_id),
            self.api.get_telemetry(asset_id, 1)
        );

        let alarms = alarms.unwrap_or_else(|e| {
            warn!(asset_id, "Alarm fetch failed: {}", e);
            Vec::new()
        });
        let latest = match telemetry {
            Ok(series) => series.series.into_iter().last(),
            Err(e) => {
                warn!(asset_id, "Latest telemetry fetch failed: {}", e);
                None
            }
        };

        AssetFetch {
            asset_id: asset_id.to_string(),
            alarms,
            latest,
        }
    }

    async fn load_alarm_details(&self) {
        let seq = self.next_seq();
        let ids: Vec<String> = {
            let shared = self.shared.lock();
            shared.state.assets.iter().map(|a| a.id.clone()).collect()
        };

        let fetches = ids.into_iter().map(|id| async move {
            let alarms = self.api.get_alarms(&id).await.unwrap_or_else(|e| {
                warn!(asset_id = %id, "Alarm detail fetch failed: {}", e);
                Vec::new()
            });
            (id, alarms)
        });
        let detail: HashMap<String, Vec<Alarm>> = join_all(fetches).await.into_iter().collect();

        let mut shared = self.shared.lock();
        if self.root.is_cancelled() || seq <= shared.alarm_detail_seq {
            debug!(seq, "Discarding stale alarm detail");
            return;
        }
        shared.alarm_detail_seq = seq;
        shared.state.alarm_detail = detail;
    }

    fn apply_series(
        &self,
        asset_id: &str,
        seq: u64,
        token: &CancellationToken,
        result: Result<TelemetrySeries, ApiError>,
    ) {
        let series = match result {
            Ok(series) => series,
            Err(e) => {
                warn!(asset_id, "Series fetch failed: {}", e);
                return;
            }
        };

        let mut shared = self.shared.lock();
        if token.is_cancelled() {
            debug!(asset_id, seq, "Discarding series for cancelled selection");
            return;
        }
        if shared.state.selected_id() != Some(asset_id) {
            debug!(asset_id, seq, "Discarding series for deselected asset");
            return;
        }
        if seq <= shared.series_seq {
            debug!(asset_id, seq, "Discarding out-of-order series");
            return;
        }
        shared.series_seq = seq;
        shared.state.selected_series = series.series;
    }
}

async fn run_fleet_cycle(inner: Arc<Inner>) {
    let token = inner.root.clone();
    let mut ticker = interval(inner.config.fleet_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        tokio::select! {
            _ = token.cancelled() => break,
            _ = inner.refresh_fleet() => {}
        }
    }

    debug!("Fleet cycle stopped");
}

/// Each tick issues its own fetch so a slow response never delays the next
/// poll; ordering is restored by sequence numbers on apply.
async fn run_detail_cycle(inner: Arc<Inner>, asset_id: String, token: CancellationToken) {
    let mut ticker = interval(inner.config.detail_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let limit = inner.config.detail_limit;

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let seq = inner.next_seq();
        let fetch_inner = inner.clone();
        let fetch_token = token.clone();
        let fetch_id = asset_id.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = fetch_token.cancelled() => {}
                result = fetch_inner.api.get_telemetry(&fetch_id, limit) => {
                    fetch_inner.apply_series(&fetch_id, seq, &fetch_token, result);
                }
            }
        });
    }

    debug!(asset_id = %asset_id, "Detail cycle stopped");
}
