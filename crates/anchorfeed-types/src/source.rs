//! Traits abstracting the data sources behind the oracles.
//!
//! The anchored view reads cumulative ticks from anchor markets; the feed
//! oracle reads signed values from external feeds. Both are behind traits
//! so tests and alternative backends can plug in without touching the
//! pricing logic.

use crate::{FeedRef, MarketRef};

/// Errors surfaced by a backing market or feed.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The source could not be reached or has no data for the reference.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The source returned data outside its documented shape.
    #[error("source returned malformed data: {0}")]
    Malformed(String),
}

/// A pair of cumulative tick readings spaced one observation window apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickWindow {
    /// Cumulative tick at the start of the window.
    pub cumulative_start: i64,
    /// Cumulative tick at the end of the window.
    pub cumulative_end: i64,
}

/// A market that exposes time-weighted cumulative ticks.
pub trait AnchorSource {
    /// Read the cumulative ticks bracketing the trailing window of
    /// `window_secs` seconds on `market`.
    fn observe(&self, market: MarketRef, window_secs: u32) -> Result<TickWindow, SourceError>;
}

/// An external feed of signed fixed-point values.
pub trait FeedSource {
    /// The decimal width the feed reports at. Queried once, when the feed
    /// is attached to a configuration.
    fn decimals(&self, feed: FeedRef) -> Result<u32, SourceError>;

    /// The latest value published by the feed. May be zero or negative.
    fn latest_value(&self, feed: FeedRef) -> Result<i128, SourceError>;
}
