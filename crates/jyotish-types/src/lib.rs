//! Shared types for the Jyotish API client.
//!
//! This crate contains the error taxonomy and configuration types used
//! across the client workspace.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
