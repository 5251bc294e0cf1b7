//! Integration tests exercising the HTTP surface against a real
//! PostgreSQL instance.
//!
//! Every test is `#[ignore]`d by default because it needs the database
//! named in `config/test.toml` to be provisioned. Run them with
//! `cargo test --test integration -- --ignored --test-threads=1`
//! (single-threaded: each test wipes the shared database).

mod helpers;

mod allocation_test;
mod attendance_test;
mod lock_test;
