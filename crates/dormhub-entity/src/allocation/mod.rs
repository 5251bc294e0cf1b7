//! Allocation request entity: model and status state machine.

pub mod model;
pub mod status;

pub use model::{Allocation, CreateAllocation};
pub use status::{AllocationStatus, RequestType};
