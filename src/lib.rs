//! git-connector - validate git repository credentials over CGI
//!
//! The connector receives a connector configuration (repository URL, HTTP or
//! SSH credentials, optional provider API credentials), proves the
//! credentials grant access by performing a minimal read-only probe, and
//! answers with a structured verdict.
//!
//! # Architecture
//!
//! - [`cli`] - Process entry (flags, settings, logging, CGI I/O)
//! - [`cgi`] - CGI request/response envelope
//! - [`handler`] - Request decoding and dispatch
//! - [`validate`] - Orchestrates API and repository access validation
//! - [`core`] - Request types, structural verification, settings, response
//! - [`auth`] - GitHub App installation token exchange
//! - [`forge`] - Provider API clients (GitHub)
//! - [`git`] - Git transport remote listing
//! - [`probe`] - Access probes over the API and the git transport
//!
//! # Invariants
//!
//! 1. Verification runs before any network call of the same phase
//! 2. The first failure ends a validation run
//! 3. Probes only enumerate; nothing is fetched or written
//! 4. Secrets never appear in logs, errors or `Debug` output

pub mod auth;
pub mod cgi;
pub mod cli;
pub mod core;
pub mod forge;
pub mod git;
pub mod handler;
pub mod probe;
pub mod validate;
