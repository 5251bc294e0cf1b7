//! # dormhub-database
//!
//! PostgreSQL connection management, migrations, and repository
//! implementations for DormHub.
//!
//! Every mutation that can race (lock fields, occupancy, presence, nonce
//! consumption) is a single conditional statement whose predicate encodes
//! the expected prior state; zero affected rows means another writer won.

pub mod connection;
pub mod migration;
pub mod repositories;
