//! # dormhub-service
//!
//! Business logic for DormHub. Each service validates against a freshly
//! read snapshot for precise error reporting, then relies on the
//! repositories' conditional writes as the authority under races.

pub mod allocation;
pub mod attendance;
pub mod audit;
pub mod context;
pub mod lock;
pub mod notification;
pub mod room;

pub use context::RequestContext;
