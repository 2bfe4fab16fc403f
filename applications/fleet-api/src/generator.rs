//! Telemetry simulator background task
//!
//! Produces one sample per asset on every tick from each asset's baseline
//! plus bounded uniform jitter, and appends it to the store.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

use crate::models::{Asset, TelemetrySample};
use crate::registry::AssetRegistry;
use crate::store::TelemetryStore;

/// Configuration for the telemetry generator
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Time between samples (default: 2000 ms)
    pub tick_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { tick_ms: 2000 }
    }
}

pub struct TelemetryGenerator {
    registry: Arc<AssetRegistry>,
    store: Arc<TelemetryStore>,
    config: GeneratorConfig,
}

/// Uniform draw in `[-1, 1)`.
fn jitter<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>() * 2.0 - 1.0
}

/// Simulate one reading for `asset`, or `None` if its parameters are unusable.
pub fn simulate<R: Rng + ?Sized>(asset: &Asset, at: DateTime<Utc>, rng: &mut R) -> Option<TelemetrySample> {
    let p = &asset.sim;
    if !p.is_valid() {
        return None;
    }

    let mut power = p.power_base + jitter(rng) * p.power_jitter;
    if p.kind.clamps_power() {
        power = power.max(0.0);
    }
    let efficiency = p.efficiency_base + jitter(rng) * p.efficiency_jitter;
    let emissions = p.emissions_base + jitter(rng) * p.emissions_jitter;

    Some(TelemetrySample {
        timestamp: at,
        power,
        efficiency,
        emissions,
    })
}

impl TelemetryGenerator {
    pub fn new(
        registry: Arc<AssetRegistry>,
        store: Arc<TelemetryStore>,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            registry,
            store,
            config,
        }
    }

    /// Generate and store one sample per asset. Returns how many were stored.
    pub fn tick<R: Rng + ?Sized>(&self, at: DateTime<Utc>, rng: &mut R) -> usize {
        let mut appended = 0;

        for asset in self.registry.all() {
            let Some(sample) = simulate(asset, at, rng) else {
                tracing::warn!("Skipping asset {}: invalid simulation parameters", asset.id);
                continue;
            };

            if self.store.append(&asset.id, sample) {
                appended += 1;
            } else {
                tracing::debug!("No telemetry window for asset {}", asset.id);
            }
        }

        appended
    }

    /// Run the generator loop until `shutdown` flips to `true`.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            "Telemetry generator started (interval: {}ms, assets: {})",
            self.config.tick_ms,
            self.registry.len()
        );

        let mut interval = interval(Duration::from_millis(self.config.tick_ms.max(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut rng = StdRng::from_entropy();

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let appended = self.tick(Utc::now(), &mut rng);
                    tracing::trace!("Generated {} samples", appended);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Telemetry generator stopped");
    }
}
