//! Attendance entities: scan log entries and direction.

pub mod log;

pub use log::{AttendanceLog, Direction};
