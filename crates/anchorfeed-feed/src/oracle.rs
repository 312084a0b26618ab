//! Config CRUD and price reads for the fixed-or-feed oracle.

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use anchorfeed_math::scale::{scale, MAX_DECIMAL_DIGITS};
use anchorfeed_types::events::{
    ConfigAdded, ConfigFeedUpdated, ConfigFixedPriceUpdated, ConfigRemoved,
    OwnershipTransferRequested, OwnershipTransferred,
};
use anchorfeed_types::ownership::Ownable;
use anchorfeed_types::registry::{Registry, RegistryError};
use anchorfeed_types::source::FeedSource;
use anchorfeed_types::{AccountId, AssetId, FeedRef, TARGET_TOTAL_DECIMALS};

use crate::{FeedOracleError, Result};

/// Widest allowed native decimal width for an underlying asset.
const MAX_UNDERLYING_DECIMALS: u32 = 30;

/// Configuration for one asset in the feed oracle.
///
/// Exactly one of `feed` and `fixed_price` is set. `feed_decimals` is
/// cached from the feed at configuration time so the precision check runs
/// before any read.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde_as(as = "serde_with::hex::Hex")]
    pub asset_id: AssetId,
    /// Native decimal width of the underlying asset, at most 30.
    pub underlying_decimals: u32,
    #[serde_as(as = "Option<serde_with::hex::Hex>")]
    pub feed: Option<FeedRef>,
    /// Decimal width the feed reports at; zero for fixed-price configs.
    pub feed_decimals: u32,
    /// Price at the combined 36-decimal denominator; zero for feed configs.
    pub fixed_price: u128,
}

/// The mutable fixed-or-feed oracle.
pub struct FeedOracle<F> {
    source: F,
    configs: Registry<AssetId, FeedConfig>,
    ownership: Ownable,
}

impl<F: FeedSource> FeedOracle<F> {
    pub fn new(source: F, owner: AccountId) -> Self {
        Self {
            source,
            configs: Registry::new(true),
            ownership: Ownable::new(owner),
        }
    }

    /// Register a new asset. Owner only.
    ///
    /// Exactly one of `feed` and `fixed_price` must be set. When a feed is
    /// given, its decimal width is queried and checked against the safe
    /// multiplier bound immediately.
    pub fn add_config(
        &mut self,
        caller: AccountId,
        asset_id: AssetId,
        underlying_decimals: u32,
        feed: Option<FeedRef>,
        fixed_price: u128,
    ) -> Result<ConfigAdded> {
        self.ownership.ensure_owner(caller)?;
        if asset_id == [0u8; 20] {
            return Err(FeedOracleError::MissingAssetId);
        }
        if underlying_decimals > MAX_UNDERLYING_DECIMALS {
            return Err(FeedOracleError::InvalidDecimals);
        }
        if feed.is_some() == (fixed_price != 0) {
            return Err(FeedOracleError::InvalidPriceConfig);
        }
        let feed_decimals = match feed {
            Some(feed_ref) => {
                if feed_ref == [0u8; 20] {
                    return Err(FeedOracleError::InvalidPriceFeed);
                }
                let decimals = self.source.decimals(feed_ref)?;
                check_feed_precision(decimals, underlying_decimals)?;
                decimals
            }
            None => 0,
        };
        let config = FeedConfig {
            asset_id,
            underlying_decimals,
            feed,
            feed_decimals,
            fixed_price,
        };
        self.configs.insert(asset_id, config).map_err(|err| match err {
            RegistryError::DuplicateKey => FeedOracleError::DuplicateConfig,
            RegistryError::NotFound | RegistryError::Immutable => FeedOracleError::ConfigNotFound,
        })?;
        tracing::info!(
            asset = %hex::encode(asset_id),
            fixed_price,
            has_feed = feed.is_some(),
            "config added"
        );
        Ok(ConfigAdded {
            asset_id,
            feed,
            fixed_price,
        })
    }

    /// Point an existing config at a new feed. Owner only.
    ///
    /// Clears any fixed price; the config becomes feed-sourced.
    pub fn update_config_feed(
        &mut self,
        caller: AccountId,
        asset_id: AssetId,
        feed: FeedRef,
    ) -> Result<ConfigFeedUpdated> {
        self.ownership.ensure_owner(caller)?;
        if feed == [0u8; 20] {
            return Err(FeedOracleError::InvalidPriceFeed);
        }
        let current = self.config(asset_id)?;
        if current.feed == Some(feed) {
            return Err(FeedOracleError::UnchangedPriceFeed);
        }
        let old_feed = current.feed;
        let underlying_decimals = current.underlying_decimals;
        let decimals = self.source.decimals(feed)?;
        check_feed_precision(decimals, underlying_decimals)?;

        let config = self
            .configs
            .get_mut(&asset_id)
            .map_err(|_| FeedOracleError::ConfigNotFound)?;
        config.feed = Some(feed);
        config.feed_decimals = decimals;
        config.fixed_price = 0;
        tracing::info!(
            asset = %hex::encode(asset_id),
            feed = %hex::encode(feed),
            "config feed updated"
        );
        Ok(ConfigFeedUpdated {
            asset_id,
            old_feed,
            feed,
        })
    }

    /// Set a new fixed price on an existing config. Owner only.
    ///
    /// Clears any feed reference; the config becomes fixed-price.
    pub fn update_config_fixed_price(
        &mut self,
        caller: AccountId,
        asset_id: AssetId,
        fixed_price: u128,
    ) -> Result<ConfigFixedPriceUpdated> {
        self.ownership.ensure_owner(caller)?;
        if fixed_price == 0 {
            return Err(FeedOracleError::InvalidFixedPrice);
        }
        let config = self
            .configs
            .get_mut(&asset_id)
            .map_err(|_| FeedOracleError::ConfigNotFound)?;
        if config.fixed_price == fixed_price {
            return Err(FeedOracleError::UnchangedFixedPrice);
        }
        let old_fixed_price = config.fixed_price;
        config.fixed_price = fixed_price;
        config.feed = None;
        config.feed_decimals = 0;
        tracing::info!(
            asset = %hex::encode(asset_id),
            old_fixed_price,
            fixed_price,
            "config fixed price updated"
        );
        Ok(ConfigFixedPriceUpdated {
            asset_id,
            old_fixed_price,
            fixed_price,
        })
    }

    /// Remove a config. Owner only.
    pub fn remove_config(&mut self, caller: AccountId, asset_id: AssetId) -> Result<ConfigRemoved> {
        self.ownership.ensure_owner(caller)?;
        let removed = self
            .configs
            .remove(&asset_id)
            .map_err(|_| FeedOracleError::ConfigNotFound)?;
        tracing::info!(asset = %hex::encode(asset_id), "config removed");
        Ok(ConfigRemoved {
            asset_id,
            feed: removed.feed,
            fixed_price: removed.fixed_price,
        })
    }

    /// Look up a config.
    pub fn config(&self, asset_id: AssetId) -> Result<&FeedConfig> {
        self.configs
            .get(&asset_id)
            .map_err(|_| FeedOracleError::ConfigNotFound)
    }

    /// The asset's price at the combined 36-decimal denominator.
    ///
    /// Fixed prices are returned as configured. Feed readings that are zero
    /// or negative degrade to a zero-price sentinel rather than failing the
    /// caller; positive readings are rescaled from the feed's width to
    /// `36 - underlying_decimals`.
    pub fn get_underlying_price(&self, asset_id: AssetId) -> Result<u128> {
        let config = self.config(asset_id)?;
        if config.fixed_price != 0 {
            return Ok(config.fixed_price);
        }
        let feed = config.feed.ok_or(FeedOracleError::InvalidPriceConfig)?;
        let value = self.source.latest_value(feed)?;
        if value <= 0 {
            tracing::warn!(
                asset = %hex::encode(asset_id),
                value,
                "non-positive feed reading, degrading to zero price"
            );
            return Ok(0);
        }
        let raw = u128::try_from(value).map_err(|_| FeedOracleError::ArithmeticOverflow)?;
        let target = TARGET_TOTAL_DECIMALS - config.underlying_decimals;
        Ok(scale(raw, config.feed_decimals, target)?)
    }

    pub fn owner(&self) -> AccountId {
        self.ownership.owner()
    }

    /// Nominate a successor owner.
    pub fn transfer_ownership(
        &mut self,
        caller: AccountId,
        to: AccountId,
    ) -> Result<OwnershipTransferRequested> {
        Ok(self.ownership.transfer(caller, to)?)
    }

    /// Accept a pending ownership transfer.
    pub fn accept_ownership(&mut self, caller: AccountId) -> Result<OwnershipTransferred> {
        Ok(self.ownership.accept(caller)?)
    }
}

/// Check that rescaling from the feed's width to the combined target never
/// needs a power of ten beyond the safe bound.
fn check_feed_precision(feed_decimals: u32, underlying_decimals: u32) -> Result<()> {
    let target = TARGET_TOTAL_DECIMALS - underlying_decimals;
    if target.abs_diff(feed_decimals) > MAX_DECIMAL_DIGITS {
        return Err(FeedOracleError::PrecisionOverflow {
            decimals: feed_decimals,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorfeed_types::source::SourceError;
    use std::collections::BTreeMap;

    const OWNER: AccountId = [0x01; 20];
    const OUTSIDER: AccountId = [0x09; 20];
    const ASSET: AssetId = [0xAA; 20];
    const FEED_8: FeedRef = [0xF8; 20];
    const FEED_26: FeedRef = [0xF2; 20];
    const FEED_75: FeedRef = [0xF7; 20];
    const FEED_45: FeedRef = [0xF4; 20];

    struct MapSource {
        feeds: BTreeMap<FeedRef, (u32, i128)>,
    }

    impl MapSource {
        fn standard() -> Self {
            let mut feeds = BTreeMap::new();
            feeds.insert(FEED_8, (8, 181_217_576_125)); // 1812.17576125
            feeds.insert(FEED_26, (26, 1_250_000_000_000_000));
            feeds.insert(FEED_75, (75, 1));
            feeds.insert(FEED_45, (45, 1));
            Self { feeds }
        }

        fn set_value(&mut self, feed: FeedRef, value: i128) {
            if let Some(entry) = self.feeds.get_mut(&feed) {
                entry.1 = value;
            }
        }
    }

    impl FeedSource for MapSource {
        fn decimals(&self, feed: FeedRef) -> std::result::Result<u32, SourceError> {
            self.feeds
                .get(&feed)
                .map(|(d, _)| *d)
                .ok_or_else(|| SourceError::Unavailable("unknown feed".into()))
        }

        fn latest_value(&self, feed: FeedRef) -> std::result::Result<i128, SourceError> {
            self.feeds
                .get(&feed)
                .map(|(_, v)| *v)
                .ok_or_else(|| SourceError::Unavailable("unknown feed".into()))
        }
    }

    fn oracle() -> FeedOracle<MapSource> {
        FeedOracle::new(MapSource::standard(), OWNER)
    }

    #[test]
    fn test_fixed_price_returned_directly() {
        let mut oracle = oracle();
        oracle
            .add_config(OWNER, ASSET, 18, None, 10u128.pow(18))
            .expect("add");
        assert_eq!(
            oracle.get_underlying_price(ASSET).expect("price"),
            10u128.pow(18)
        );
    }

    #[test]
    fn test_feed_reading_scaled_up() {
        let mut oracle = oracle();
        // 8-decimal feed, 18-decimal asset: target 18, scale up by 1e10
        oracle
            .add_config(OWNER, ASSET, 18, Some(FEED_8), 0)
            .expect("add");
        assert_eq!(
            oracle.get_underlying_price(ASSET).expect("price"),
            1_812_175_761_250_000_000_000
        );
    }

    #[test]
    fn test_feed_reading_scaled_up_for_low_precision_asset() {
        let mut oracle = oracle();
        // 8-decimal feed, 6-decimal asset: target 30, scale up by 1e22
        oracle
            .add_config(OWNER, ASSET, 6, Some(FEED_8), 0)
            .expect("add");
        assert_eq!(
            oracle.get_underlying_price(ASSET).expect("price"),
            181_217_576_125 * 10u128.pow(22)
        );
    }

    #[test]
    fn test_feed_reading_scaled_down() {
        let mut oracle = oracle();
        // 26-decimal feed, 18-decimal asset: target 18, scale down by 1e8
        oracle
            .add_config(OWNER, ASSET, 18, Some(FEED_26), 0)
            .expect("add");
        assert_eq!(oracle.get_underlying_price(ASSET).expect("price"), 12_500_000);
    }

    #[test]
    fn test_non_positive_reading_degrades_to_zero() {
        let mut oracle = oracle();
        oracle
            .add_config(OWNER, ASSET, 18, Some(FEED_8), 0)
            .expect("add");
        oracle.source.set_value(FEED_8, 0);
        assert_eq!(oracle.get_underlying_price(ASSET).expect("zero"), 0);
        oracle.source.set_value(FEED_8, -5);
        assert_eq!(oracle.get_underlying_price(ASSET).expect("negative"), 0);
    }

    #[test]
    fn test_implausible_feed_decimals_rejected_at_add() {
        let mut oracle = oracle();
        let err = oracle
            .add_config(OWNER, ASSET, 18, Some(FEED_75), 0)
            .unwrap_err();
        assert!(matches!(
            err,
            FeedOracleError::PrecisionOverflow { decimals: 75 }
        ));
        // 45-decimal feed with a 30-decimal asset needs a 1e39 divisor
        let err = oracle
            .add_config(OWNER, ASSET, 30, Some(FEED_45), 0)
            .unwrap_err();
        assert!(matches!(
            err,
            FeedOracleError::PrecisionOverflow { decimals: 45 }
        ));
    }

    #[test]
    fn test_add_validation() {
        let mut oracle = oracle();
        assert!(matches!(
            oracle.add_config(OWNER, [0u8; 20], 18, None, 1),
            Err(FeedOracleError::MissingAssetId)
        ));
        assert!(matches!(
            oracle.add_config(OWNER, ASSET, 31, None, 1),
            Err(FeedOracleError::InvalidDecimals)
        ));
        // Both set
        assert!(matches!(
            oracle.add_config(OWNER, ASSET, 18, Some(FEED_8), 1),
            Err(FeedOracleError::InvalidPriceConfig)
        ));
        // Neither set
        assert!(matches!(
            oracle.add_config(OWNER, ASSET, 18, None, 0),
            Err(FeedOracleError::InvalidPriceConfig)
        ));
        assert!(matches!(
            oracle.add_config(OWNER, ASSET, 18, Some([0u8; 20]), 0),
            Err(FeedOracleError::InvalidPriceFeed)
        ));
    }

    #[test]
    fn test_duplicate_add_rejected() {
        let mut oracle = oracle();
        oracle.add_config(OWNER, ASSET, 18, None, 1).expect("add");
        assert!(matches!(
            oracle.add_config(OWNER, ASSET, 18, None, 2),
            Err(FeedOracleError::DuplicateConfig)
        ));
    }

    #[test]
    fn test_update_feed_clears_fixed_price() {
        let mut oracle = oracle();
        oracle
            .add_config(OWNER, ASSET, 18, None, 10u128.pow(18))
            .expect("add");
        let event = oracle
            .update_config_feed(OWNER, ASSET, FEED_8)
            .expect("update");
        assert_eq!(event.old_feed, None);
        assert_eq!(event.feed, FEED_8);
        let config = oracle.config(ASSET).expect("config");
        assert_eq!(config.fixed_price, 0);
        assert_eq!(config.feed_decimals, 8);
        // Reads now come from the feed
        assert_eq!(
            oracle.get_underlying_price(ASSET).expect("price"),
            1_812_175_761_250_000_000_000
        );
    }

    #[test]
    fn test_update_fixed_price_clears_feed() {
        let mut oracle = oracle();
        oracle
            .add_config(OWNER, ASSET, 18, Some(FEED_8), 0)
            .expect("add");
        let event = oracle
            .update_config_fixed_price(OWNER, ASSET, 42)
            .expect("update");
        assert_eq!(event.old_fixed_price, 0);
        assert_eq!(event.fixed_price, 42);
        let config = oracle.config(ASSET).expect("config");
        assert_eq!(config.feed, None);
        assert_eq!(oracle.get_underlying_price(ASSET).expect("price"), 42);
    }

    #[test]
    fn test_no_op_updates_rejected() {
        let mut oracle = oracle();
        oracle
            .add_config(OWNER, ASSET, 18, Some(FEED_8), 0)
            .expect("add");
        assert!(matches!(
            oracle.update_config_feed(OWNER, ASSET, FEED_8),
            Err(FeedOracleError::UnchangedPriceFeed)
        ));

        oracle
            .update_config_fixed_price(OWNER, ASSET, 42)
            .expect("switch to fixed");
        assert!(matches!(
            oracle.update_config_fixed_price(OWNER, ASSET, 42),
            Err(FeedOracleError::UnchangedFixedPrice)
        ));
    }

    #[test]
    fn test_update_validation() {
        let mut oracle = oracle();
        oracle.add_config(OWNER, ASSET, 18, None, 1).expect("add");
        assert!(matches!(
            oracle.update_config_feed(OWNER, ASSET, [0u8; 20]),
            Err(FeedOracleError::InvalidPriceFeed)
        ));
        assert!(matches!(
            oracle.update_config_fixed_price(OWNER, ASSET, 0),
            Err(FeedOracleError::InvalidFixedPrice)
        ));
        assert!(matches!(
            oracle.update_config_feed(OWNER, [0x33; 20], FEED_8),
            Err(FeedOracleError::ConfigNotFound)
        ));
    }

    #[test]
    fn test_remove_then_re_add() {
        let mut oracle = oracle();
        oracle.add_config(OWNER, ASSET, 18, None, 1).expect("add");
        let removed = oracle.remove_config(OWNER, ASSET).expect("remove");
        assert_eq!(removed.fixed_price, 1);
        assert!(matches!(
            oracle.get_underlying_price(ASSET),
            Err(FeedOracleError::ConfigNotFound)
        ));
        // Re-adding is independent of the removed config's history.
        oracle
            .add_config(OWNER, ASSET, 6, Some(FEED_8), 0)
            .expect("re-add");
        assert_eq!(oracle.config(ASSET).expect("config").underlying_decimals, 6);
    }

    #[test]
    fn test_crud_requires_owner() {
        let mut oracle = oracle();
        oracle.add_config(OWNER, ASSET, 18, None, 1).expect("add");
        assert!(matches!(
            oracle.add_config(OUTSIDER, [0x33; 20], 18, None, 1),
            Err(FeedOracleError::Ownership(_))
        ));
        assert!(matches!(
            oracle.update_config_fixed_price(OUTSIDER, ASSET, 2),
            Err(FeedOracleError::Ownership(_))
        ));
        assert!(matches!(
            oracle.remove_config(OUTSIDER, ASSET),
            Err(FeedOracleError::Ownership(_))
        ));
    }

    #[test]
    fn test_ownership_handoff() {
        let mut oracle = oracle();
        oracle.transfer_ownership(OWNER, OUTSIDER).expect("nominate");
        oracle.accept_ownership(OUTSIDER).expect("accept");
        assert_eq!(oracle.owner(), OUTSIDER);
        oracle
            .add_config(OUTSIDER, ASSET, 18, None, 1)
            .expect("new owner adds");
        assert!(matches!(
            oracle.remove_config(OWNER, ASSET),
            Err(FeedOracleError::Ownership(_))
        ));
    }

    #[test]
    fn test_unknown_feed_is_fatal_at_add() {
        let mut oracle = oracle();
        let err = oracle
            .add_config(OWNER, ASSET, 18, Some([0x66; 20]), 0)
            .unwrap_err();
        assert!(matches!(err, FeedOracleError::Source(_)));
    }
}
