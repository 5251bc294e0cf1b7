//! # dormhub-entity
//!
//! Domain entity models for DormHub. Every struct in this crate represents
//! a database table row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and database entities
//! additionally derive `sqlx::FromRow`.

pub mod allocation;
pub mod attendance;
pub mod audit;
pub mod notification;
pub mod room;
pub mod user;
