//! Burn requests and the per-staker burn step.

use solana_program::{clock::UnixTimestamp, msg, pubkey::Pubkey};

use crate::access::{Role, Roles};
use crate::custody::TokenCustody;
use crate::engine::{custody_result, PooledStaking};
use crate::error::StakeError;
use crate::events::StakingEvent;
use crate::math;
use crate::state::ContractAction;

impl<R: Roles, T: TokenCustody> PooledStaking<R, T> {
    /// Queue a burn of `amount` against everyone staked on `contract`.
    pub fn push_burn(
        &mut self,
        caller: &Pubkey,
        contract: &Pubkey,
        amount: u64,
        now: UnixTimestamp,
    ) -> Result<u64, StakeError> {
        self.non_reentrant(|engine| {
            engine.require(Role::RiskModule, caller)?;
            if amount == 0 {
                return Err(StakeError::ZeroAmount);
            }
            let staked_on_contract = engine.contract(contract).map(|c| c.total_allocated).unwrap_or(0);
            if amount > staked_on_contract {
                msg!("Error: burn {} exceeds {} staked on {}", amount, staked_on_contract, contract);
                return Err(StakeError::BurnExceedsContractStake);
            }

            let id = engine.burns.push(ContractAction::new(contract, amount, now));

            msg!("Burn #{} of {} queued on {}", id, amount, contract);
            engine.emit(StakingEvent::BurnRequested { id, contract: *contract, amount });
            Ok(id)
        })
    }

    /// Burn one staker's share of the burn at the head of the queue.
    ///
    /// Returns the share burned. The cursor is advanced only after custody
    /// accepted the burn and the ledger was updated. Queued deallocations
    /// shed whatever pending amount the burn cut, so each request only ever
    /// releases what is still pending for it.
    pub(crate) fn burn_next_staker(&mut self, contract: &Pubkey, staker: &Pubkey) -> Result<u64, StakeError> {
        let progress = self.burn_progress;
        let allocation = self.allocation(staker, contract);
        let share = math::pro_rata_share(progress.snapshot_amount, allocation, progress.snapshot_total)
            .unwrap_or(0)
            .min(allocation);

        if share > 0 {
            custody_result(self.custody.burn(share))?;
            for (trimmed, cut) in self.ledger.apply_burn_share(staker, contract, share) {
                self.deallocations.trim(staker, &trimmed, cut);
            }
        }

        self.burn_progress.next_staker_index += 1;
        self.burn_progress.distributed = self.burn_progress.distributed.saturating_add(share);
        Ok(share)
    }
}
