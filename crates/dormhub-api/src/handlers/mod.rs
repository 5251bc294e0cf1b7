//! Route handlers, organized by domain.

pub mod allocation;
pub mod attendance;
pub mod audit;
pub mod health;
pub mod notification;
pub mod room;
