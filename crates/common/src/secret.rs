//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports the [`secrecy`] types used for the signing secret and any other
//! credential material that flows through the token service.
//!
//! `SecretString` implements `Debug` with redaction, so a struct that derives
//! `Debug` while holding one is safe to pass to `tracing` or `{:?}`. The inner
//! value is zeroized on drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct SigningConfig {
//!     api_key: String,
//!     api_secret: SecretString,
//! }
//!
//! let config = SigningConfig {
//!     api_key: "APIdevkey".to_string(),
//!     api_secret: SecretString::from("devsecret"),
//! };
//!
//! // The secret is redacted here.
//! println!("{:?}", config);
//!
//! // Access requires an explicit call.
//! let secret: &str = config.api_secret.expose_secret();
//! # assert_eq!(secret, "devsecret");
//! ```

pub use secrecy::{ExposeSecret, SecretBox, SecretString};
