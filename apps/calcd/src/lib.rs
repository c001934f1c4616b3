//! # calcd
//!
//! Library side of the calcd binary: HTTP API, CLI and configuration.
//! Exposed as a library so the integration tests can build the router.

pub mod api;
pub mod cli;
pub mod config;
