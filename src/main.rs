//! prescan - license pre-validation for pull requests
//!
//! The binary wires the CLI to the library: `serve` runs the webhook
//! server plus the scan worker pool, `scan` runs a one-off local scan,
//! `policy` inspects the loaded license policy.

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
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

/// Main entry point for the prescan CLI
fn main() {
    if let Err(e) = prescan::cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
