pub mod alarm;
pub mod asset;
pub mod command;
pub mod telemetry;

pub use alarm::{Alarm, AlarmSeverity, AlarmType};
pub use asset::Asset;
pub use command::{CommandAck, CommandRequest};
pub use telemetry::{TelemetrySample, TelemetrySeries};
