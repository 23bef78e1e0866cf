//! Profile resolution.
//!
//! The aggregator turns an identifier into a complete profile record; the
//! pacer spaces its outbound calls.

pub mod aggregator;
pub mod pacing;

pub use aggregator::{AggregatorConfig, FanOut, ProfileAggregator};
