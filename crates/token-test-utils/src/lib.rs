//! # Token Test Utilities
//!
//! Shared test utilities for the token service and its clients.
//!
//! This crate provides:
//! - Deterministic configuration fixtures (fixed API key and secret)
//! - Server test harness (TestTokenServer for E2E tests)
//! - Custom assertions (TokenAssertions trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use token_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestTokenServer::spawn(test_config()?).await?;
//!     let body: serde_json::Value = reqwest::get(server.token_url("team-sync", "alice")?)
//!         .await?
//!         .json()
//!         .await?;
//!
//!     body["token"]
//!         .as_str()
//!         .unwrap()
//!         .assert_valid_jwt()
//!         .assert_for_identity("alice");
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod server_harness;

pub use assertions::*;
pub use fixtures::*;
pub use server_harness::*;
