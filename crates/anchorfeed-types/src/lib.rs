//! # anchorfeed-types
//!
//! Shared domain types used across the anchorfeed workspace.
//!
//! ## Modules
//!
//! - [`events`] — structured notifications emitted by price operations
//! - [`ownership`] — two-step administrative ownership handoff
//! - [`registry`] — keyed configuration storage with a mutability capability
//! - [`source`] — traits abstracting anchor markets and external feeds

pub mod events;
pub mod ownership;
pub mod registry;
pub mod source;

/// Common type aliases.
pub type SymbolKey = [u8; 32];
pub type AssetId = [u8; 20];
pub type MarketRef = [u8; 20];
pub type ReporterRef = [u8; 20];
pub type FeedRef = [u8; 20];
pub type AccountId = [u8; 20];

/// Decimal width of the canonical internal price representation.
pub const CANONICAL_DECIMALS: u32 = 18;

/// Fixed-point denominator of canonical prices (10^18).
pub const CANONICAL_SCALE: u128 = 1_000_000_000_000_000_000;

/// Decimal width of the quote currency used by reporters.
pub const QUOTE_DECIMALS: u32 = 6;

/// Fixed-point denominator of quote-currency values (10^6).
pub const QUOTE_SCALE: u128 = 1_000_000;

/// Denominator of reporter-to-anchor ratios in bounds checks (10^18).
pub const RATIO_SCALE: u128 = 1_000_000_000_000_000_000;

/// Total decimal width of externally served prices (price plus base unit).
pub const TARGET_TOTAL_DECIMALS: u32 = 36;

/// Derive the storage key for a symbol string.
///
/// Keys are content-addressed so that configurations and reports agree on
/// the identity of a symbol without carrying the string around.
pub fn symbol_key(symbol: &str) -> SymbolKey {
    *blake3::hash(symbol.as_bytes()).as_bytes()
}
