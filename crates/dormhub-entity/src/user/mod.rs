//! User entity: model and role enumeration.

pub mod model;
pub mod role;

pub use model::User;
pub use role::UserRole;
