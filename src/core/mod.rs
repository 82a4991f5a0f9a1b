//! core
//!
//! Core domain types and pure logic for the connector.
//!
//! # Modules
//!
//! - [`types`] - Request and connector configuration types
//! - [`response`] - Validation verdict returned to the caller
//! - [`verify`] - Structural checks on connector configuration
//! - [`config`] - Runtime settings schema and loading
//!
//! # Design Principles
//!
//! - Auth dimensions are closed enums with an explicit unsupported arm
//! - Nothing here performs network I/O
//! - Secrets never appear in `Debug` output

pub mod config;
pub mod response;
pub mod types;
pub mod verify;
