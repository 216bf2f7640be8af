/// Statements and the balance derived from them.
/// New statements are accepted or rejected against the current [`statement::Balance`].
pub mod statement;

/// Registered users.
pub mod user;

/// Validated use-case input, later handled by [`statement`] and [`service`].
pub mod command;

/// User and statement store interfaces, plus "in memory" implementations.
pub mod store;

/// Password hashing and session tokens.
pub mod auth;

/// Command line and runtime configuration.
pub mod config;

/// Use cases exposed to callers. Services receive their stores and token
/// issuer from outside, so the same code runs against any backend.
pub mod service;

/// Ideally, this module should exist in its own crate, as a way to
/// bootstrap core logic. However, the integration tests drive it too,
/// so it lives here.
pub mod bin_utils;
