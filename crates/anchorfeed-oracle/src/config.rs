//! Per-asset price source configuration and deployment parameters.
//!
//! Configurations are validated once, at view construction, and are
//! immutable afterwards. Each validation failure carries its own reason so
//! a misconfigured deployment points at the exact field.

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use anchorfeed_math::scale::pow10;
use anchorfeed_types::{
    symbol_key, AssetId, MarketRef, ReporterRef, SymbolKey, CANONICAL_DECIMALS, QUOTE_DECIMALS,
};

use crate::{OracleError, Result};

/// Where an asset's price comes from.
///
/// Fixed after registration; the resolver matches on it exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// A constant price quoted against the canonical 18-decimal asset.
    FixedToEth,
    /// A constant price quoted against the quote currency.
    FixedToUsd,
    /// A live reporter validated against an anchor market.
    Reporter,
}

impl PriceSource {
    pub fn is_reporter(self) -> bool {
        matches!(self, Self::Reporter)
    }
}

/// Configuration for one tracked asset.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Human-readable symbol; the storage key is its hash.
    pub symbol: String,
    /// External identifier consumers use for reverse lookup.
    #[serde_as(as = "serde_with::hex::Hex")]
    pub external_asset_id: AssetId,
    /// Power-of-ten scale of the asset's native precision.
    pub base_unit: u128,
    pub price_source: PriceSource,
    /// Canonical fixed price; nonzero iff the source is fixed.
    #[serde(default)]
    pub fixed_price: u128,
    /// Anchor market reference; present iff the source is `Reporter`.
    #[serde(default)]
    #[serde_as(as = "Option<serde_with::hex::Hex>")]
    pub anchor_market: Option<MarketRef>,
    /// Reporter reference; present iff the source is `Reporter`.
    #[serde(default)]
    #[serde_as(as = "Option<serde_with::hex::Hex>")]
    pub reporter: Option<ReporterRef>,
    /// Multiplier taking a raw report to canonical precision.
    #[serde(default)]
    pub reporter_multiplier: u128,
    /// Whether the anchor market quotes the pair inverted.
    #[serde(default)]
    pub is_market_reversed: bool,
}

impl AssetConfig {
    /// The storage key for this configuration.
    pub fn symbol_key(&self) -> SymbolKey {
        symbol_key(&self.symbol)
    }

    /// Check the source/field consistency invariants.
    ///
    /// Exactly one of {fixed price, anchor market + reporter} must be set,
    /// matching the declared source.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.is_empty() {
            return Err(OracleError::MissingAsset);
        }
        if self.base_unit == 0 {
            return Err(OracleError::InvalidBaseUnit);
        }
        if self.price_source.is_reporter() {
            if self.anchor_market.is_none() {
                return Err(OracleError::AnchorRequired);
            }
            if self.reporter.is_none() {
                return Err(OracleError::ReporterRequired);
            }
            if self.fixed_price != 0 {
                return Err(OracleError::FixedPriceNotAllowed);
            }
            if self.reporter_multiplier == 0
                || self.reporter_multiplier > pow10(anchorfeed_math::scale::MAX_DECIMAL_DIGITS)?
            {
                return Err(OracleError::PrecisionOverflow {
                    decimals: anchorfeed_math::scale::MAX_DECIMAL_DIGITS + 1,
                });
            }
        } else {
            if self.anchor_market.is_some() {
                return Err(OracleError::AnchorNotAllowed);
            }
            if self.reporter.is_some() {
                return Err(OracleError::ReporterNotAllowed);
            }
            if self.fixed_price == 0 {
                return Err(OracleError::FixedPriceRequired);
            }
        }
        Ok(())
    }
}

/// Multiplier taking a raw report at `decimals` onto canonical precision.
///
/// Raw reports are quoted in the quote currency, so the exponent is the
/// canonical width plus the quote width minus the reporter's own width.
///
/// # Errors
///
/// - [`OracleError::PrecisionOverflow`] if `decimals` exceeds the combined width
pub fn reporter_multiplier_for_decimals(decimals: u32) -> Result<u128> {
    let combined = CANONICAL_DECIMALS + QUOTE_DECIMALS;
    if decimals > combined {
        return Err(OracleError::PrecisionOverflow { decimals });
    }
    Ok(pow10(combined - decimals)?)
}

/// Deployment parameters for an anchored view.
///
/// A thin boundary helper; validation happens at view construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ViewParameters {
    /// Maximum fractional deviation from the anchor, at a 1e18 denominator.
    pub anchor_tolerance: u128,
    /// Width of the anchor observation window in seconds.
    pub anchor_period_secs: u32,
    /// The asset universe, fixed for the lifetime of the view.
    pub assets: Vec<AssetConfig>,
}

impl ViewParameters {
    /// Parse parameters from a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}
