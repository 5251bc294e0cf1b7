//! Repository implementations, one per aggregate.

pub mod allocation;
pub mod attendance;
pub mod audit;
pub mod notification;
pub mod room;
pub mod used_token;
pub mod user;
