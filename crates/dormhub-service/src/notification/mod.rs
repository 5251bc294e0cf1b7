//! In-app notification dispatch and inbox.

pub mod service;

pub use service::NotificationService;
