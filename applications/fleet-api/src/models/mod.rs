pub mod alarm;
pub mod asset;
pub mod command;
pub mod report;
pub mod telemetry;

pub use alarm::{Alarm, AlarmSeverity, AlarmType};
pub use asset::{Asset, AssetKind, AssetStatus, Location, SimParams};
pub use command::{CommandAck, CommandRequest};
pub use report::ReportRow;
pub use telemetry::{TelemetryResponse, TelemetrySample};
