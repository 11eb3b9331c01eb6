//! Common types shared by the room token service and its clients.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for room access tokens (claims, grants, signing, verification)
pub mod access_token;
