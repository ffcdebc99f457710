//! Error-tolerance schedules for block-wise secret-key reconciliation.
//!
//! Two parties hold `q`-ary keys of `L·M` symbols that disagree on each
//! symbol with probability `p_err`. A pruning decoder grows candidate keys
//! block by block and drops a candidate once its mismatches exceed a radius.
//! This crate derives those radii so that the correct key survives with a
//! requested probability, and evaluates candidates against them.
//!
//! # Module overview
//!
//! | Module | Responsibility |
//! |---|---|
//! | apportion | Splitting a total or a probability target over bins with two adjacent values |
//! | oracle | Binomial CDF and quantile queries |
//! | radius | Per-block and cumulative prefix radii |
//! | acceptance | Fixed and adaptive acceptance predicates, distance metrics |
//! | encodings | Per-block parity-check counts |
//! | capacity | Theoretic key rate of the channel |
//! | strategy | Selectors for the encode/decode harness |
//! | config | [`Config`] and its builder |
//! | simulation | Sampled acceptance rate of the correct key |
//!
//! # Failure budget
//!
//! Of the allowed failure probability `1 - success_rate`, one half funds the
//! per-block radii (jointly, under the chosen [`Combination`]) and the other
//! half is split evenly over the `M` prefix checks.

mod acceptance;
mod apportion;
mod capacity;
mod config;
mod encodings;
mod error;
mod oracle;
mod radius;
mod simulation;
mod strategy;

pub use acceptance::*;
pub use apportion::*;
pub use capacity::*;
pub use config::*;
pub use encodings::*;
pub use error::*;
pub use oracle::{BinomialOracle, StatrsBinomial};
pub use radius::*;
pub use simulation::*;
pub use strategy::*;
