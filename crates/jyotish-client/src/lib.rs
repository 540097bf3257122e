//! Reqwest-backed client for the remote Jyotish API.
//!
//! Exposes the three call wrappers that are the application's only entry
//! points into networking: read a URL as an XML tree (with JSON fallback),
//! write a document and take the reply as raw bytes, and write a document
//! and take the reply as XML while waiting indefinitely. Every wrapper goes
//! through the admission gate defined in `jyotish-core`.

pub mod client;
pub mod config;

pub use client::ApiClient;
