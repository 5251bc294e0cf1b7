//! Allocation request workflow.

pub mod service;

pub use service::{AllocationRequest, AllocationService};
