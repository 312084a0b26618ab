//! Structured notifications emitted by price operations.
//!
//! Events are plain serializable records. Byte keys render as hex and
//! 128-bit prices as decimal strings so the JSON form survives consumers
//! limited to 64-bit numbers.

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::{AccountId, AssetId, FeedRef, SymbolKey};

/// Outcome of submitting a reporter price.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PriceEvent {
    /// The report passed the anchor guard and was stored.
    Updated(PriceUpdated),
    /// The report fell outside the anchor bounds and was discarded.
    Guarded(PriceGuarded),
}

/// A new price was accepted and stored for a symbol.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdated {
    #[serde_as(as = "serde_with::hex::Hex")]
    pub symbol_key: SymbolKey,
    /// Canonical 18-decimal price.
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub price: u128,
}

/// A reported price was rejected by the anchor bounds check.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceGuarded {
    #[serde_as(as = "serde_with::hex::Hex")]
    pub symbol_key: SymbolKey,
    /// The reporter's canonical price that was rejected.
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub reporter_price: u128,
    /// The anchor price it was compared against.
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub anchor_price: u128,
}

/// Failover was switched on for a reporter-sourced symbol.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailoverActivated {
    #[serde_as(as = "serde_with::hex::Hex")]
    pub symbol_key: SymbolKey,
}

/// Failover was switched off for a reporter-sourced symbol.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailoverDeactivated {
    #[serde_as(as = "serde_with::hex::Hex")]
    pub symbol_key: SymbolKey,
}

/// A new asset configuration was registered in the feed oracle.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigAdded {
    #[serde_as(as = "serde_with::hex::Hex")]
    pub asset_id: AssetId,
    #[serde_as(as = "Option<serde_with::hex::Hex>")]
    pub feed: Option<FeedRef>,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub fixed_price: u128,
}

/// The feed reference of an existing configuration changed.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFeedUpdated {
    #[serde_as(as = "serde_with::hex::Hex")]
    pub asset_id: AssetId,
    #[serde_as(as = "Option<serde_with::hex::Hex>")]
    pub old_feed: Option<FeedRef>,
    #[serde_as(as = "serde_with::hex::Hex")]
    pub feed: FeedRef,
}

/// The fixed price of an existing configuration changed.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFixedPriceUpdated {
    #[serde_as(as = "serde_with::hex::Hex")]
    pub asset_id: AssetId,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub old_fixed_price: u128,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub fixed_price: u128,
}

/// An asset configuration was removed from the feed oracle.
///
/// Carries the removed values so state history can be replayed from a log.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRemoved {
    #[serde_as(as = "serde_with::hex::Hex")]
    pub asset_id: AssetId,
    #[serde_as(as = "Option<serde_with::hex::Hex>")]
    pub feed: Option<FeedRef>,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub fixed_price: u128,
}

/// The current owner nominated a successor.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTransferRequested {
    #[serde_as(as = "serde_with::hex::Hex")]
    pub from: AccountId,
    #[serde_as(as = "serde_with::hex::Hex")]
    pub to: AccountId,
}

/// A nominated successor accepted ownership.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTransferred {
    #[serde_as(as = "serde_with::hex::Hex")]
    pub from: AccountId,
    #[serde_as(as = "serde_with::hex::Hex")]
    pub to: AccountId,
}
