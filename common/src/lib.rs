//! # Hostalias Common
//!
//! Shared data model for the hostalias workspace.
//!
//! * **[`config`]**: The explicit configuration handed to the coordinator.
//! * **[`error`]**: The error taxonomy every crate reports through.
//! * **[`network`]**: Hosts-file entries, loopback aliases and platform detection.

pub mod config;
pub mod error;
pub mod network;

pub use config::AliasConfig;
pub use error::AliasError;
