//! The public read/write surface of the anchored oracle.
//!
//! All state lives here: the immutable config registry, per-asset price
//! states, reverse indexes, and the ownership machine. Every operation is
//! synchronous and atomic from the caller's point of view.

use std::collections::BTreeMap;

use anchorfeed_math::scale::mul_div;
use anchorfeed_types::events::{
    FailoverActivated, FailoverDeactivated, OwnershipTransferRequested, OwnershipTransferred,
    PriceEvent, PriceGuarded, PriceUpdated,
};
use anchorfeed_types::ownership::Ownable;
use anchorfeed_types::registry::{Registry, RegistryError};
use anchorfeed_types::source::AnchorSource;
use anchorfeed_types::{
    symbol_key, AccountId, AssetId, ReporterRef, SymbolKey, CANONICAL_SCALE, QUOTE_SCALE,
};

use crate::anchor::anchor_price;
use crate::bounds::AnchorBounds;
use crate::config::{AssetConfig, PriceSource, ViewParameters};
use crate::failover::PriceState;
use crate::{OracleError, Result};

/// The anchored price view over a fixed asset universe.
#[derive(Debug)]
pub struct AnchoredPriceView<A> {
    source: A,
    bounds: AnchorBounds,
    anchor_period_secs: u32,
    configs: Registry<SymbolKey, AssetConfig>,
    by_reporter: BTreeMap<ReporterRef, SymbolKey>,
    by_asset: BTreeMap<AssetId, SymbolKey>,
    states: BTreeMap<SymbolKey, PriceState>,
    ownership: Ownable,
}

impl<A: AnchorSource> AnchoredPriceView<A> {
    /// Build a view from deployment parameters.
    ///
    /// Every configuration is validated here; the asset universe is
    /// immutable afterwards.
    pub fn new(source: A, params: ViewParameters, owner: AccountId) -> Result<Self> {
        if params.anchor_period_secs == 0 {
            return Err(OracleError::InvalidAnchorPeriod);
        }
        let bounds = AnchorBounds::from_tolerance(params.anchor_tolerance);
        let mut configs = Registry::new(false);
        let mut by_reporter = BTreeMap::new();
        let mut by_asset = BTreeMap::new();
        let mut states = BTreeMap::new();
        for config in params.assets {
            config.validate()?;
            let key = config.symbol_key();
            if let Some(reporter) = config.reporter {
                by_reporter.insert(reporter, key);
                states.insert(key, PriceState::new());
            }
            by_asset.insert(config.external_asset_id, key);
            configs.insert(key, config).map_err(|err| match err {
                RegistryError::DuplicateKey => OracleError::DuplicateAsset,
                RegistryError::NotFound | RegistryError::Immutable => OracleError::AssetNotFound,
            })?;
        }
        Ok(Self {
            source,
            bounds,
            anchor_period_secs: params.anchor_period_secs,
            configs,
            by_reporter,
            by_asset,
            states,
            ownership: Ownable::new(owner),
        })
    }

    /// Submit a raw reporter price.
    ///
    /// The raw value is scaled to canonical precision and checked against a
    /// freshly computed anchor. Out-of-bounds reports are a soft rejection:
    /// stored state is untouched and a guarded record is returned. While
    /// failover is active the report is ignored for storage and the anchor
    /// price is stored instead; the guard still runs for telemetry.
    pub fn submit_report(&mut self, reporter: ReporterRef, raw_price: i128) -> Result<PriceEvent> {
        let key = *self
            .by_reporter
            .get(&reporter)
            .ok_or(OracleError::UnknownReporter)?;
        let raw = u128::try_from(raw_price).map_err(|_| OracleError::NegativePrice)?;
        let config = self
            .configs
            .get(&key)
            .map_err(|_| OracleError::AssetNotFound)?
            .clone();
        let canonical = mul_div(raw, config.reporter_multiplier, QUOTE_SCALE)?;
        let anchor = self.live_anchor(&config)?;
        let within = self.bounds.within(canonical, anchor)?;
        let state = self
            .states
            .get_mut(&key)
            .ok_or(OracleError::NotReporterAsset)?;

        if state.failover_active {
            if !within {
                tracing::warn!(
                    symbol = %config.symbol,
                    reporter_price = canonical,
                    anchor_price = anchor,
                    "reporter price outside bounds during failover"
                );
            }
            state.price = anchor;
            tracing::info!(symbol = %config.symbol, price = anchor, "anchor price stored during failover");
            return Ok(PriceEvent::Updated(PriceUpdated {
                symbol_key: key,
                price: anchor,
            }));
        }

        if within {
            state.price = canonical;
            tracing::info!(symbol = %config.symbol, price = canonical, "price updated");
            Ok(PriceEvent::Updated(PriceUpdated {
                symbol_key: key,
                price: canonical,
            }))
        } else {
            tracing::warn!(
                symbol = %config.symbol,
                reporter_price = canonical,
                anchor_price = anchor,
                "price guarded"
            );
            Ok(PriceEvent::Guarded(PriceGuarded {
                symbol_key: key,
                reporter_price: canonical,
                anchor_price: anchor,
            }))
        }
    }

    /// The canonical price for a symbol key.
    ///
    /// Fixed sources answer their configured price. Reporter sources answer
    /// a live anchor while failed over, else the stored price.
    pub fn price(&self, key: &SymbolKey) -> Result<u128> {
        let config = self.configs.get(key).map_err(|_| OracleError::AssetNotFound)?;
        match config.price_source {
            PriceSource::FixedToEth | PriceSource::FixedToUsd => Ok(config.fixed_price),
            PriceSource::Reporter => {
                let state = self.states.get(key).ok_or(OracleError::AssetNotFound)?;
                if state.failover_active {
                    self.live_anchor(config)
                } else {
                    Ok(state.price)
                }
            }
        }
    }

    /// The canonical price for a symbol string.
    pub fn price_by_symbol(&self, symbol: &str) -> Result<u128> {
        self.price(&symbol_key(symbol))
    }

    /// The stored snapshot for a reporter-sourced asset.
    ///
    /// Unlike [`AnchoredPriceView::price`], this does not recompute the
    /// anchor during failover; it answers the possibly-poked snapshot.
    pub fn stored_price(&self, key: &SymbolKey) -> Result<u128> {
        let config = self.configs.get(key).map_err(|_| OracleError::AssetNotFound)?;
        if !config.price_source.is_reporter() {
            return Err(OracleError::NotReporterAsset);
        }
        let state = self.states.get(key).ok_or(OracleError::AssetNotFound)?;
        Ok(state.price)
    }

    /// The price for an external asset id, rescaled by the asset's base
    /// unit onto one combined 36-decimal denominator.
    pub fn underlying_price(&self, asset_id: AssetId) -> Result<u128> {
        let key = *self
            .by_asset
            .get(&asset_id)
            .ok_or(OracleError::AssetNotFound)?;
        let config = self.configs.get(&key).map_err(|_| OracleError::AssetNotFound)?;
        let canonical = self.price(&key)?;
        Ok(mul_div(canonical, CANONICAL_SCALE, config.base_unit)?)
    }

    /// Switch failover on for a reporter-sourced asset. Owner only.
    pub fn activate_failover(
        &mut self,
        caller: AccountId,
        key: &SymbolKey,
    ) -> Result<FailoverActivated> {
        self.ownership.ensure_owner(caller)?;
        let config = self.configs.get(key).map_err(|_| OracleError::AssetNotFound)?;
        if !config.price_source.is_reporter() {
            return Err(OracleError::NotReporterAsset);
        }
        let symbol = config.symbol.clone();
        let state = self.states.get_mut(key).ok_or(OracleError::AssetNotFound)?;
        state.activate()?;
        tracing::warn!(symbol = %symbol, "failover activated");
        Ok(FailoverActivated { symbol_key: *key })
    }

    /// Switch failover off. Owner only.
    pub fn deactivate_failover(
        &mut self,
        caller: AccountId,
        key: &SymbolKey,
    ) -> Result<FailoverDeactivated> {
        self.ownership.ensure_owner(caller)?;
        let config = self.configs.get(key).map_err(|_| OracleError::AssetNotFound)?;
        if !config.price_source.is_reporter() {
            return Err(OracleError::NotReporterAsset);
        }
        let symbol = config.symbol.clone();
        let state = self.states.get_mut(key).ok_or(OracleError::AssetNotFound)?;
        state.deactivate()?;
        tracing::info!(symbol = %symbol, "failover deactivated");
        Ok(FailoverDeactivated { symbol_key: *key })
    }

    /// Store a fresh anchor snapshot while failed over. Open to anyone.
    pub fn poke_failed_over_price(&mut self, key: &SymbolKey) -> Result<PriceUpdated> {
        let config = self
            .configs
            .get(key)
            .map_err(|_| OracleError::AssetNotFound)?
            .clone();
        if !config.price_source.is_reporter() {
            return Err(OracleError::NotReporterAsset);
        }
        let active = self
            .states
            .get(key)
            .ok_or(OracleError::AssetNotFound)?
            .failover_active;
        if !active {
            return Err(OracleError::NotActive);
        }
        let anchor = self.live_anchor(&config)?;
        let state = self.states.get_mut(key).ok_or(OracleError::AssetNotFound)?;
        state.price = anchor;
        tracing::info!(symbol = %config.symbol, price = anchor, "failed-over price poked");
        Ok(PriceUpdated {
            symbol_key: *key,
            price: anchor,
        })
    }

    /// The configuration for a symbol key.
    pub fn config(&self, key: &SymbolKey) -> Result<&AssetConfig> {
        self.configs.get(key).map_err(|_| OracleError::AssetNotFound)
    }

    pub fn bounds(&self) -> AnchorBounds {
        self.bounds
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

    fn live_anchor(&self, config: &AssetConfig) -> Result<u128> {
        let market = config.anchor_market.ok_or(OracleError::AnchorRequired)?;
        let window = self.source.observe(market, self.anchor_period_secs)?;
        anchor_price(
            &window,
            self.anchor_period_secs,
            config.base_unit,
            config.is_market_reversed,
        )
    }
}
