//! Best-effort audit trail.

pub mod service;

pub use service::AuditService;
