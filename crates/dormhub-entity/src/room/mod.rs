//! Room entity: model, status enum, and status derivation.

pub mod model;
pub mod status;

pub use model::{CreateRoom, Room};
pub use status::{RoomStatus, derive_room_status};
