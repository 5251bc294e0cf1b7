//! Shared value types used across DormHub crates.

pub mod pagination;
