//! Deallocation requests: validated, time-locked, spliced into the sorted queue.

use solana_program::{clock::UnixTimestamp, msg, pubkey::Pubkey};

use crate::access::{Role, Roles};
use crate::custody::TokenCustody;
use crate::engine::PooledStaking;
use crate::error::StakeError;
use crate::events::StakingEvent;
use crate::math;
use crate::state::Deallocation;

impl<R: Roles, T: TokenCustody> PooledStaking<R, T> {
    /// Request that `amounts[i]` of the caller's allocation on `contracts[i]`
    /// be released once the lock time has passed.
    ///
    /// The first entry is spliced after `insert_after`; each following entry
    /// goes right after the previous one, since they share a maturity.
    /// Returns the ids of the new queue nodes.
    pub fn request_deallocation(
        &mut self,
        caller: &Pubkey,
        contracts: &[Pubkey],
        amounts: &[u64],
        insert_after: u64,
        now: UnixTimestamp,
    ) -> Result<Vec<u64>, StakeError> {
        self.non_reentrant(|engine| {
            engine.require(Role::Member, caller)?;
            if contracts.len() != amounts.len() {
                return Err(StakeError::LengthMismatch);
            }
            engine.require_no_pending_actions()?;
            if contracts.is_empty() {
                return Ok(Vec::new());
            }

            let lock_time = UnixTimestamp::try_from(engine.params.lock_time).map_err(|_| StakeError::Overflow)?;
            let matures_at = now.checked_add(lock_time).ok_or(StakeError::Overflow)?;

            engine.validate_deallocations(caller, contracts, amounts)?;
            engine.deallocations.check_insertion(insert_after, matures_at)?;

            let mut ids = Vec::with_capacity(contracts.len());
            let mut anchor = insert_after;
            for (contract, &amount) in contracts.iter().zip(amounts) {
                let id = engine
                    .deallocations
                    .insert_after(anchor, Deallocation::new(caller, contract, amount, matures_at))?;
                engine.ledger.add_pending(caller, contract, amount);

                msg!("Deallocation #{} of {} on {} matures at {}", id, amount, contract, matures_at);
                engine.emit(StakingEvent::DeallocationRequested {
                    id,
                    staker: *caller,
                    contract: *contract,
                    amount,
                    matures_at,
                });
                ids.push(id);
                anchor = id;
            }
            Ok(ids)
        })
    }

    /// Valid `insert_after` for a deallocation requested at `now`.
    pub fn insertion_hint(&self, now: UnixTimestamp) -> u64 {
        let lock_time = UnixTimestamp::try_from(self.params.lock_time).unwrap_or(UnixTimestamp::MAX);
        self.deallocations.insertion_hint(now.saturating_add(lock_time))
    }

    fn validate_deallocations(&self, who: &Pubkey, contracts: &[Pubkey], amounts: &[u64]) -> Result<(), StakeError> {
        let record = self.ledger.staker(who).ok_or(StakeError::NothingToDeallocate)?;
        for (i, (contract, &amount)) in contracts.iter().zip(amounts).enumerate() {
            if contracts[..i].contains(contract) {
                return Err(StakeError::DuplicateContract);
            }
            if amount == 0 {
                return Err(StakeError::ZeroAmount);
            }

            let allocation = record.allocation(contract);
            let available = math::deallocatable(allocation, record.pending_deallocation(contract));
            if available == 0 {
                return Err(StakeError::NothingToDeallocate);
            }
            if amount > available {
                return Err(StakeError::DeallocationExceedsAllocation);
            }
            if amount < self.params.min_deallocation {
                return Err(StakeError::DeallocationBelowMinimum);
            }

            let remaining = allocation - record.pending_deallocation(contract) - amount;
            if !math::zero_or_at_least(remaining, self.params.min_allocation) {
                return Err(StakeError::FinalAllocationBelowMinimum);
            }
        }
        Ok(())
    }
}
