//! # anchorfeed-oracle
//!
//! The anchored price validation and normalization engine.
//!
//! A registered asset carries a primary reporter price and an independent
//! time-weighted anchor price. Reports that deviate from the anchor beyond
//! configured bounds are rejected; when failover is active the anchor
//! replaces the reporter entirely.
//!
//! ## Modules
//!
//! - [`config`] — per-asset price source configuration and deployment parameters
//! - [`anchor`] — time-weighted anchor price computation
//! - [`bounds`] — reporter-versus-anchor ratio bounds
//! - [`failover`] — per-asset failover state
//! - [`view`] — the public read/write surface

pub mod anchor;
pub mod bounds;
pub mod config;
pub mod failover;
pub mod view;

pub use bounds::AnchorBounds;
pub use config::{AssetConfig, PriceSource, ViewParameters};
pub use failover::PriceState;
pub use view::AnchoredPriceView;

use anchorfeed_math::MathError;
use anchorfeed_types::ownership::OwnershipError;
use anchorfeed_types::source::SourceError;

/// Errors from configuration, report submission, and price queries.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// A configuration has an empty symbol.
    #[error("asset config has no symbol")]
    MissingAsset,

    /// Two configurations share a symbol key.
    #[error("duplicate asset symbol")]
    DuplicateAsset,

    /// The base unit of an asset is zero.
    #[error("base unit must be a nonzero power of ten")]
    InvalidBaseUnit,

    /// A reporter-sourced asset has no anchor market reference.
    #[error("reporter-sourced asset requires an anchor market")]
    AnchorRequired,

    /// A reporter-sourced asset has no reporter reference.
    #[error("reporter-sourced asset requires a reporter")]
    ReporterRequired,

    /// A fixed-price asset supplies an anchor market reference.
    #[error("fixed-price asset must not carry an anchor market")]
    AnchorNotAllowed,

    /// A fixed-price asset supplies a reporter reference.
    #[error("fixed-price asset must not carry a reporter")]
    ReporterNotAllowed,

    /// A fixed-price asset has a zero fixed price.
    #[error("fixed-price asset requires a nonzero fixed price")]
    FixedPriceRequired,

    /// A reporter-sourced asset supplies a fixed price.
    #[error("reporter-sourced asset must not carry a fixed price")]
    FixedPriceNotAllowed,

    /// The anchor observation period is zero.
    #[error("anchor period must be nonzero")]
    InvalidAnchorPeriod,

    /// No configuration exists for the queried key.
    #[error("asset not found")]
    AssetNotFound,

    /// No asset is bound to the submitting reporter.
    #[error("unknown reporter")]
    UnknownReporter,

    /// A raw report carried a negative price.
    #[error("reported price is negative")]
    NegativePrice,

    /// A failover operation targeted a non-reporter asset.
    #[error("asset is not reporter-sourced")]
    NotReporterAsset,

    /// Failover is already active for this asset.
    #[error("failover already active")]
    AlreadyActive,

    /// Failover is not active for this asset.
    #[error("failover not active")]
    NotActive,

    /// A decimal width exceeds the safe multiplier bound.
    #[error("precision overflow at {decimals} decimals")]
    PrecisionOverflow {
        /// The offending decimal exponent.
        decimals: u32,
    },

    /// The time-weighted average tick cannot be priced.
    #[error("anchor tick {tick} out of range")]
    AnchorTickOutOfRange {
        /// The offending tick value.
        tick: i64,
    },

    /// An intermediate price computation does not fit the result type.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// An ownership check failed.
    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    /// The anchor source failed; fail-closed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The deployment parameters file could not be parsed.
    #[error("invalid parameters file: {0}")]
    Parameters(#[from] toml::de::Error),
}

impl From<MathError> for OracleError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::PrecisionOverflow { decimals } => Self::PrecisionOverflow { decimals },
            MathError::TickOutOfRange { tick } => Self::AnchorTickOutOfRange { tick },
            MathError::Overflow | MathError::DivisionByZero | MathError::EmptyWindow => {
                Self::ArithmeticOverflow
            }
        }
    }
}

/// Convenience result type for oracle operations.
pub type Result<T> = std::result::Result<T, OracleError>;
