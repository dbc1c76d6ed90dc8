//! HTTP server adapters
//!
//! Adapters translating between HTTP frameworks and the HTTP-agnostic
//! API layer. Currently only `tiny_http`, which is all a single-node
//! webhook receiver needs.

pub mod tiny_http;
