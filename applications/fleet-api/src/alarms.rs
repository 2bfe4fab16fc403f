use crate::models::{Alarm, AlarmSeverity, AlarmType, TelemetrySample};
use crate::store::TelemetryStore;

pub const EMISSIONS_HIGH_PPM: f64 = 180.0;
pub const EFFICIENCY_LOW_PCT: f64 = 40.0;

/// Evaluate threshold rules against the newest stored sample of an asset.
///
/// No hysteresis: a value hovering around a threshold raises and clears the
/// alarm on successive evaluations.
pub fn evaluate(store: &TelemetryStore, asset_id: &str) -> Vec<Alarm> {
    store
        .latest(asset_id)
        .map(|sample| evaluate_sample(&sample))
        .unwrap_or_default()
}

pub fn evaluate_sample(sample: &TelemetrySample) -> Vec<Alarm> {
    let mut alarms = Vec::new();

    if sample.emissions >= EMISSIONS_HIGH_PPM {
        alarms.push(Alarm {
            ts: sample.timestamp,
            alarm_type: AlarmType::EmissionsHigh,
            severity: AlarmSeverity::Medium,
            message: "NOx above 180 ppm".to_string(),
        });
    }
    if sample.efficiency <= EFFICIENCY_LOW_PCT {
        alarms.push(Alarm {
            ts: sample.timestamp,
            alarm_type: AlarmType::EfficiencyLow,
            severity: AlarmSeverity::Low,
            message: "Efficiency below 40%".to_string(),
        });
    }

    alarms
}
