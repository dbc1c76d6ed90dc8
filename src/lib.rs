//! prescan - license pre-validation for pull requests
//!
//! This library provides the core functionality for turning forge webhooks
//! into durable scan jobs, driving an external license scanner over the
//! pull-request snapshot, and classifying detected licenses against a
//! conflict policy.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod api;
pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod forge;
pub mod models;
pub mod output;
pub mod paths;
pub mod pipeline;
pub mod policy;
pub mod queue;
pub mod report;
pub mod scanner;
pub mod server;
pub mod storage;
