//! Room administration.

pub mod service;

pub use service::RoomService;
