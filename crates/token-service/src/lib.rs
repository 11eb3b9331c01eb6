//! Room Token Service Library
//!
//! Issues short-lived access tokens that let a participant join a room on the
//! real-time media server.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `errors` - Error types and their HTTP mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP middleware
//! - `models` - Request/response types
//! - `observability` - Metrics and log-safe hashing
//! - `routes` - Router and shared state
//! - `services` - Token issuance

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
