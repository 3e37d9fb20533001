// Generated by genmsg. Do not edit.

mod point;
mod telemetry;

pub use point::Point;
pub use telemetry::Telemetry;
