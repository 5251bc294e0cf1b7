//! Room lock manager.

pub mod service;

pub use service::{AcquireOutcome, LockService, evaluate_acquire};
