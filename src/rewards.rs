//! Reward funding, the per-staker reward step and reward payouts.

use solana_program::{clock::UnixTimestamp, msg, pubkey::Pubkey};

use crate::access::{Role, Roles};
use crate::custody::TokenCustody;
use crate::engine::{custody_result, PooledStaking};
use crate::error::StakeError;
use crate::events::StakingEvent;
use crate::math;
use crate::state::ContractAction;

impl<R: Roles, T: TokenCustody> PooledStaking<R, T> {
    /// Pull `amount` from `source` and queue it as a reward for `contract`'s stakers.
    pub fn push_reward(
        &mut self,
        caller: &Pubkey,
        contract: &Pubkey,
        amount: u64,
        source: &Pubkey,
        now: UnixTimestamp,
    ) -> Result<u64, StakeError> {
        self.non_reentrant(|engine| {
            engine.require(Role::RiskModule, caller)?;
            if amount == 0 {
                return Err(StakeError::ZeroAmount);
            }

            custody_result(engine.custody.transfer_from(source, amount))?;
            let id = engine.rewards.push(ContractAction::new(contract, amount, now));

            msg!("Reward #{} of {} queued on {}", id, amount, contract);
            engine.emit(StakingEvent::RewardRequested { id, contract: *contract, amount });
            Ok(id)
        })
    }

    /// Pay out up to the reward owed to `staker`. Anyone may trigger the
    /// payout; tokens always go to the staker.
    pub fn withdraw_reward(&mut self, caller: &Pubkey, staker: &Pubkey, amount: u64) -> Result<(), StakeError> {
        self.non_reentrant(|engine| {
            if amount == 0 {
                return Err(StakeError::ZeroAmount);
            }
            if amount > engine.reward_owed(staker) {
                return Err(StakeError::ExceedsAvailableReward);
            }

            custody_result(engine.custody.transfer(staker, amount))?;
            let remaining = engine.ledger.debit_reward(staker, amount)?;

            msg!("Reward of {} paid to {} by {}, {} still owed", amount, staker, caller, remaining);
            engine.emit(StakingEvent::RewardWithdrawn { staker: *staker, caller: *caller, amount });
            Ok(())
        })
    }

    /// Credit one staker's share of the reward at the head of the queue.
    /// Rounding dust stays in custody undistributed.
    pub(crate) fn reward_next_staker(&mut self, contract: &Pubkey, staker: &Pubkey) -> Result<u64, StakeError> {
        let progress = self.reward_progress;
        let allocation = self.allocation(staker, contract);
        let share = math::pro_rata_share(progress.snapshot_amount, allocation, progress.snapshot_total)
            .unwrap_or(0);

        if share > 0 {
            self.ledger.credit_reward(staker, contract, share)?;
        }

        self.reward_progress.next_staker_index += 1;
        self.reward_progress.distributed = self.reward_progress.distributed.saturating_add(share);
        Ok(share)
    }
}
