//! Seeded randomness for reconciliation trials.
//!
//! Every trial draws from its own [`source::Source`], seeded explicitly so
//! that a run is reproducible regardless of how trials are scheduled.

pub mod errors;
pub mod source;
