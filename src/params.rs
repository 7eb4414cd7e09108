//! Bounded parameter store. Only governance may change a value, and only
//! within the range its key allows.

use crate::error::StakeError;
use crate::math::ONE_TOKEN;
use crate::state::StakingParams;

pub const DEFAULT_MAX_LEVERAGE: u64 = 10;
pub const DEFAULT_MIN_STAKE: u64 = ONE_TOKEN;
pub const DEFAULT_MIN_ALLOCATION: u64 = ONE_TOKEN;
pub const DEFAULT_MIN_DEALLOCATION: u64 = ONE_TOKEN;
pub const DEFAULT_LOCK_TIME: u64 = 90 * 24 * 60 * 60; // 90 days
pub const DEFAULT_CYCLE_BUDGET: u64 = 256;

pub const MAX_LEVERAGE_CAP: u64 = 100;
pub const MAX_MIN_AMOUNT: u64 = 1_000_000 * ONE_TOKEN;
pub const MAX_LOCK_TIME: u64 = 365 * 24 * 60 * 60;
pub const MAX_CYCLE_BUDGET: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ParamKey {
    MaxLeverage = 0,
    MinStake = 1,
    MinAllocation = 2,
    MinDeallocation = 3,
    LockTime = 4,
    CycleBudget = 5,
}

impl TryFrom<u8> for ParamKey {
    type Error = StakeError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::MaxLeverage),
            1 => Ok(Self::MinStake),
            2 => Ok(Self::MinAllocation),
            3 => Ok(Self::MinDeallocation),
            4 => Ok(Self::LockTime),
            5 => Ok(Self::CycleBudget),
            _ => Err(StakeError::InvalidParameter),
        }
    }
}

impl ParamKey {
    /// Inclusive range a value must fall in.
    pub fn bounds(self) -> (u64, u64) {
        match self {
            Self::MaxLeverage => (1, MAX_LEVERAGE_CAP),
            Self::MinStake | Self::MinAllocation | Self::MinDeallocation => (0, MAX_MIN_AMOUNT),
            Self::LockTime => (0, MAX_LOCK_TIME),
            // A zero budget would stall the scheduler forever
            Self::CycleBudget => (1, MAX_CYCLE_BUDGET),
        }
    }
}

impl Default for StakingParams {
    fn default() -> Self {
        Self {
            max_leverage: DEFAULT_MAX_LEVERAGE,
            min_stake: DEFAULT_MIN_STAKE,
            min_allocation: DEFAULT_MIN_ALLOCATION,
            min_deallocation: DEFAULT_MIN_DEALLOCATION,
            lock_time: DEFAULT_LOCK_TIME,
            cycle_budget: DEFAULT_CYCLE_BUDGET,
        }
    }
}

impl StakingParams {
    pub fn get(&self, key: ParamKey) -> u64 {
        match key {
            ParamKey::MaxLeverage => self.max_leverage,
            ParamKey::MinStake => self.min_stake,
            ParamKey::MinAllocation => self.min_allocation,
            ParamKey::MinDeallocation => self.min_deallocation,
            ParamKey::LockTime => self.lock_time,
            ParamKey::CycleBudget => self.cycle_budget,
        }
    }

    /// Set one parameter after checking its bounds. Leaves `self` untouched on error.
    pub fn set(&mut self, key: ParamKey, value: u64) -> Result<(), StakeError> {
        let (lo, hi) = key.bounds();
        if value < lo || value > hi {
            return Err(StakeError::ParameterOutOfRange);
        }
        let slot = match key {
            ParamKey::MaxLeverage => &mut self.max_leverage,
            ParamKey::MinStake => &mut self.min_stake,
            ParamKey::MinAllocation => &mut self.min_allocation,
            ParamKey::MinDeallocation => &mut self.min_deallocation,
            ParamKey::LockTime => &mut self.lock_time,
            ParamKey::CycleBudget => &mut self.cycle_budget,
        };
        *slot = value;
        Ok(())
    }
}
