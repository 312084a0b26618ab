//! Per-asset failover state.
//!
//! One instance per reporter-sourced asset. The price is initialized to a
//! sentinel of 1, not 0, so "never reported" stays distinguishable from a
//! reported zero and guard comparisons keep a nonzero denominator.

use serde::{Deserialize, Serialize};

use crate::{OracleError, Result};

/// Sentinel stored before any successful report.
pub const UNINITIALIZED_PRICE: u128 = 1;

/// Stored price and failover flag for one reporter-sourced asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceState {
    /// Last accepted canonical price, or the sentinel.
    pub price: u128,
    /// Whether the anchor currently substitutes for the reporter.
    pub failover_active: bool,
}

impl PriceState {
    pub fn new() -> Self {
        Self {
            price: UNINITIALIZED_PRICE,
            failover_active: false,
        }
    }

    /// Switch failover on.
    pub fn activate(&mut self) -> Result<()> {
        if self.failover_active {
            return Err(OracleError::AlreadyActive);
        }
        self.failover_active = true;
        Ok(())
    }

    /// Switch failover off.
    pub fn deactivate(&mut self) -> Result<()> {
        if !self.failover_active {
            return Err(OracleError::NotActive);
        }
        self.failover_active = false;
        Ok(())
    }
}

impl Default for PriceState {
    fn default() -> Self {
        Self::new()
    }
}
