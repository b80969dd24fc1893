//! Data models for the RSVP backend.
//!
//! Field names match the JSON contract consumed by the RSVP frontends.

mod afterparty;
mod wedding;

pub use afterparty::*;
pub use wedding::*;
