//! # dormhub-api
//!
//! HTTP API layer for DormHub built on Axum: application state, request
//! extractors, DTOs, route handlers, and the server bootstrap.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;
