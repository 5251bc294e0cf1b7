//! Attendance token issuance and gate-scan verification.

pub mod service;

pub use service::{AttendanceService, ScanResult};
