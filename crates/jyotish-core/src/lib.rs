//! Domain logic for the Jyotish API client.
//!
//! This crate holds everything that does not touch the network: the
//! admission gate that softly limits outbound calls to one at a time, the
//! owned XML document tree with its JSON fallback conversion, the two-stage
//! reply decoder, and the connectivity-probe trait that hosts implement.
//! The reqwest-backed client lives in `jyotish-client`.

pub mod gate;
pub mod probe;
pub mod reply;
pub mod xml;
