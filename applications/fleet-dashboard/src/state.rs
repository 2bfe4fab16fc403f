use std::collections::{HashMap, HashSet};

use crate::models::{Alarm, Asset, TelemetrySample};

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Power,
    Efficiency,
    Emissions,
}

impl Metric {
    pub fn value(&self, sample: &TelemetrySample) -> f64 {
        match self {
            Metric::Power => sample.power,
            Metric::Efficiency => sample.efficiency,
            Metric::Emissions => sample.emissions,
        }
    }
}

/// Everything the dashboard shows. Owned by the reconciliation core;
/// callers only ever see clones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub assets: Vec<Asset>,
    /// Ids of assets with at least one active alarm.
    pub alarm_membership: HashSet<String>,
    pub latest_by_asset: HashMap<String, TelemetrySample>,
    pub selected_asset: Option<Asset>,
    pub selected_series: Vec<TelemetrySample>,
    pub alarm_detail: HashMap<String, Vec<Alarm>>,
    pub alarm_live_mode: bool,
    pub command_status: Option<String>,
}

impl DashboardState {
    /// `(alarm, ok)` counts for the fleet summary.
    pub fn status_counts(&self) -> (usize, usize) {
        let alarm = self.alarm_membership.len();
        (alarm, self.assets.len().saturating_sub(alarm))
    }

    /// Assets ranked by the metric of their latest sample, highest first.
    /// Assets without a latest sample rank as 0.
    pub fn top_by_metric(&self, metric: Metric, n: usize) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .assets
            .iter()
            .map(|asset| {
                let value = self
                    .latest_by_asset
                    .get(&asset.id)
                    .map(|s| metric.value(s))
                    .unwrap_or(0.0);
                (asset.id.clone(), value)
            })
            .collect();

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    pub fn filter_by_name(&self, query: &str) -> Vec<&Asset> {
        let needle = query.to_lowercase();
        self.assets
            .iter()
            .filter(|asset| asset.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn latest_selected(&self) -> Option<&TelemetrySample> {
        self.selected_series.last()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_asset.as_ref().map(|a| a.id.as_str())
    }
}
