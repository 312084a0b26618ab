//! # anchorfeed-feed
//!
//! The simpler fixed-or-feed price oracle.
//!
//! Each registered asset carries either a static price or a reference to an
//! external feed whose readings are rescaled to one combined 36-decimal
//! denominator. Unlike the anchored view, the config set is mutable via
//! owner-gated CRUD.

mod oracle;

pub use oracle::{FeedConfig, FeedOracle};

use anchorfeed_math::MathError;
use anchorfeed_types::ownership::OwnershipError;
use anchorfeed_types::source::SourceError;

/// Errors from feed oracle configuration and reads.
#[derive(Debug, thiserror::Error)]
pub enum FeedOracleError {
    /// The asset id is all zeroes.
    #[error("asset id must be nonzero")]
    MissingAssetId,

    /// Not exactly one of feed reference and fixed price is set.
    #[error("exactly one of feed and fixed price must be set")]
    InvalidPriceConfig,

    /// The underlying decimal width is outside [0, 30].
    #[error("underlying decimals must be at most 30")]
    InvalidDecimals,

    /// A configuration already exists for this asset id.
    #[error("duplicate config")]
    DuplicateConfig,

    /// No configuration exists for this asset id.
    #[error("config not found")]
    ConfigNotFound,

    /// The new feed reference equals the current one.
    #[error("price feed unchanged")]
    UnchangedPriceFeed,

    /// The new fixed price equals the current one.
    #[error("fixed price unchanged")]
    UnchangedFixedPrice,

    /// The feed reference is all zeroes.
    #[error("price feed must be nonzero")]
    InvalidPriceFeed,

    /// The fixed price is zero.
    #[error("fixed price must be nonzero")]
    InvalidFixedPrice,

    /// A decimal width exceeds the safe multiplier bound.
    #[error("precision overflow at {decimals} decimals")]
    PrecisionOverflow {
        /// The offending decimal exponent.
        decimals: u32,
    },

    /// An intermediate price computation does not fit the result type.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// An ownership check failed.
    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    /// The feed source failed; fail-closed.
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl From<MathError> for FeedOracleError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::PrecisionOverflow { decimals } => Self::PrecisionOverflow { decimals },
            _ => Self::ArithmeticOverflow,
        }
    }
}

/// Convenience result type for feed oracle operations.
pub type Result<T> = std::result::Result<T, FeedOracleError>;
