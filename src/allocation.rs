//! Stake, unstake and allocation updates.

use solana_program::{msg, pubkey::Pubkey};

use crate::access::{Role, Roles};
use crate::custody::TokenCustody;
use crate::engine::{custody_result, PooledStaking};
use crate::error::StakeError;
use crate::events::StakingEvent;
use crate::math;

impl<R: Roles, T: TokenCustody> PooledStaking<R, T> {
    /// Pull `amount` tokens from the caller and add them to its stake.
    pub fn stake(&mut self, caller: &Pubkey, amount: u64) -> Result<(), StakeError> {
        self.non_reentrant(|engine| {
            engine.require(Role::Member, caller)?;
            if amount == 0 {
                return Err(StakeError::ZeroAmount);
            }
            let staked = engine
                .staked(caller)
                .checked_add(amount)
                .ok_or(StakeError::Overflow)?;
            if staked < engine.params.min_stake {
                return Err(StakeError::StakeBelowMinimum);
            }

            custody_result(engine.custody.transfer_from(caller, amount))?;
            engine.ledger.add_stake(caller, amount)?;

            msg!("Staked {} for {}, total {}", amount, caller, staked);
            engine.emit(StakingEvent::Staked { staker: *caller, amount });
            Ok(())
        })
    }

    /// Return unallocated stake to the caller.
    ///
    /// Only `staked - max(allocations)` can leave; burns must be processed first.
    pub fn unstake(&mut self, caller: &Pubkey, amount: u64) -> Result<(), StakeError> {
        self.non_reentrant(|engine| {
            engine.require(Role::Member, caller)?;
            if amount == 0 {
                return Err(StakeError::ZeroAmount);
            }
            engine.require_no_pending_burns()?;

            let record = engine.ledger.staker(caller).ok_or(StakeError::ZeroStake)?;
            if amount > record.max_unstakable() {
                return Err(StakeError::ExceedsMaxUnstakable);
            }
            let remaining = record.staked - amount;
            if !math::zero_or_at_least(remaining, engine.params.min_stake) {
                return Err(StakeError::StakeBelowMinimum);
            }

            custody_result(engine.custody.transfer(caller, amount))?;
            engine.ledger.remove_stake(caller, amount)?;

            msg!("Unstaked {} for {}, remaining {}", amount, caller, remaining);
            engine.emit(StakingEvent::Unstaked { staker: *caller, amount });
            Ok(())
        })
    }

    /// Re-submit the caller's allocation table.
    ///
    /// `contracts` must start with the staker's current contracts in order and
    /// may append new ones. Allocations can only go up here; lowering one goes
    /// through `request_deallocation`.
    pub fn set_allocations(
        &mut self,
        caller: &Pubkey,
        contracts: &[Pubkey],
        allocations: &[u64],
    ) -> Result<(), StakeError> {
        self.non_reentrant(|engine| {
            engine.require(Role::Member, caller)?;
            if contracts.len() != allocations.len() {
                return Err(StakeError::LengthMismatch);
            }
            engine.require_no_pending_actions()?;

            let record = engine.ledger.staker(caller).ok_or(StakeError::ZeroStake)?;
            if record.staked == 0 {
                return Err(StakeError::ZeroStake);
            }

            let existing = &record.contracts;
            if contracts.len() < existing.len() {
                return Err(StakeError::FewerContractsNotAllowed);
            }
            if existing.iter().zip(contracts).any(|(old, new)| old != new) {
                return Err(StakeError::UnexpectedContractOrder);
            }
            for i in existing.len()..contracts.len() {
                if contracts[..i].contains(&contracts[i]) {
                    return Err(StakeError::DuplicateContract);
                }
            }

            let mut total: u128 = 0;
            for (contract, &amount) in contracts.iter().zip(allocations) {
                let current = record.allocation(contract);
                if amount < current {
                    return Err(StakeError::AllocationDecreaseNotAllowed);
                }
                if amount != current && !math::zero_or_at_least(amount, engine.params.min_allocation) {
                    return Err(StakeError::AllocationMinimumNotMet);
                }
                if amount > record.staked {
                    return Err(StakeError::AllocationAbove100Percent);
                }
                total += amount as u128;
            }
            if !math::within_leverage(total, record.staked, engine.params.max_leverage) {
                return Err(StakeError::LeverageExceeded);
            }

            engine.ledger.apply_allocations(caller, contracts, allocations);

            msg!("Allocations updated for {}: {} contracts, {} total", caller, contracts.len(), total);
            engine.emit(StakingEvent::AllocationsUpdated {
                staker: *caller,
                contracts: contracts.to_vec(),
                allocations: allocations.to_vec(),
            });
            Ok(())
        })
    }
}
