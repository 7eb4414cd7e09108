//! Budgeted, resumable processing of the burn, reward and deallocation queues.
//!
//! Each call spends at most `cycle_budget` work units. One unit is one
//! staker's share of a burn or reward, or one matured deallocation. A unit is
//! either applied completely or not started, and the continuation lives in
//! the queue heads plus `DistributionProgress`, so any later caller resumes
//! exactly where the previous one stopped.

use bytemuck::Zeroable;
use solana_program::{clock::UnixTimestamp, msg};

use crate::access::Roles;
use crate::custody::TokenCustody;
use crate::engine::PooledStaking;
use crate::error::StakeError;
use crate::events::StakingEvent;
use crate::math;
use crate::state::DistributionProgress;

/// Cost of one staker share or one deallocation.
pub const UNIT_COST: u64 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// All three queues are drained of actionable work
    pub finished: bool,
    pub units_spent: u64,
    /// Burn entries fully applied during this call
    pub burns_completed: u64,
    /// Reward entries fully credited during this call
    pub rewards_completed: u64,
    pub deallocations_processed: u64,
}

#[derive(Clone, Copy, Debug)]
struct WorkBudget {
    remaining: u64,
    spent: u64,
}

impl WorkBudget {
    fn new(limit: u64) -> Self {
        Self { remaining: limit, spent: 0 }
    }

    /// Reserve one unit; false once the budget cannot cover it.
    fn try_spend(&mut self) -> bool {
        if self.remaining < UNIT_COST {
            return false;
        }
        self.remaining -= UNIT_COST;
        self.spent += UNIT_COST;
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Completed,
    OutOfBudget,
}

#[derive(Clone, Copy)]
enum Distribution {
    Burn,
    Reward,
}

impl<R: Roles, T: TokenCustody> PooledStaking<R, T> {
    /// Advance pending work. Callable by anyone, any number of times.
    ///
    /// Returns `finished = false` when the budget ran out first. The only
    /// error is custody refusing a burn; units applied before it stay applied.
    pub fn process_pending_actions(&mut self, now: UnixTimestamp) -> Result<ProcessOutcome, StakeError> {
        self.non_reentrant(|engine| {
            let mut budget = WorkBudget::new(engine.params.cycle_budget);
            let mut outcome = ProcessOutcome::default();

            let result = engine.drain_queues(now, &mut budget, &mut outcome);
            outcome.units_spent = budget.spent;
            result?;

            outcome.finished = !engine.has_pending_actions() && !engine.has_matured_deallocation(now);
            msg!(
                "Processed {} units: {} burns, {} rewards, {} deallocations, finished={}",
                outcome.units_spent,
                outcome.burns_completed,
                outcome.rewards_completed,
                outcome.deallocations_processed,
                outcome.finished
            );
            Ok(outcome)
        })
    }

    fn drain_queues(
        &mut self,
        now: UnixTimestamp,
        budget: &mut WorkBudget,
        outcome: &mut ProcessOutcome,
    ) -> Result<(), StakeError> {
        while self.has_pending_burns() {
            if self.advance_distribution(Distribution::Burn, budget)? == Step::OutOfBudget {
                return Ok(());
            }
            outcome.burns_completed += 1;
        }

        while self.has_pending_rewards() {
            if self.advance_distribution(Distribution::Reward, budget)? == Step::OutOfBudget {
                return Ok(());
            }
            outcome.rewards_completed += 1;
        }

        while self.has_matured_deallocation(now) {
            if !budget.try_spend() {
                return Ok(());
            }
            self.process_first_deallocation();
            outcome.deallocations_processed += 1;
        }
        Ok(())
    }

    fn has_matured_deallocation(&self, now: UnixTimestamp) -> bool {
        self.deallocations
            .head()
            .map(|(_, node)| node.matures_at <= now)
            .unwrap_or(false)
    }

    fn progress_mut(&mut self, kind: Distribution) -> &mut DistributionProgress {
        match kind {
            Distribution::Burn => &mut self.burn_progress,
            Distribution::Reward => &mut self.reward_progress,
        }
    }

    /// Apply (or resume) the entry at the head of the burn or reward queue.
    fn advance_distribution(&mut self, kind: Distribution, budget: &mut WorkBudget) -> Result<Step, StakeError> {
        let queue = match kind {
            Distribution::Burn => &self.burns,
            Distribution::Reward => &self.rewards,
        };
        let Some((id, entry)) = queue.front() else {
            return Ok(Step::Completed);
        };
        let contract = entry.contract_pubkey();
        let requested = entry.amount;

        if !self.progress_mut(kind).is_active() {
            let total = self.contract(&contract).map(|c| c.total_allocated).unwrap_or(0);
            let amount = match kind {
                Distribution::Burn => math::effective_burn(requested, total),
                Distribution::Reward => requested,
            };
            *self.progress_mut(kind) = DistributionProgress::start(total, amount);
        }

        loop {
            let index = self.progress_mut(kind).next_staker_index;
            let Some(staker) = self.ledger.staker_at(&contract, index) else {
                break;
            };
            if !budget.try_spend() {
                msg!("Budget exhausted at staker {} of entry #{}", index, id);
                return Ok(Step::OutOfBudget);
            }
            match kind {
                Distribution::Burn => self.burn_next_staker(&contract, &staker)?,
                Distribution::Reward => self.reward_next_staker(&contract, &staker)?,
            };
        }

        let distributed = self.progress_mut(kind).distributed;
        *self.progress_mut(kind) = DistributionProgress::zeroed();
        match kind {
            Distribution::Burn => {
                self.burns.pop_front();
                msg!("Burn #{} done: {} of {} burned on {}", id, distributed, requested, contract);
                self.emit(StakingEvent::Burned { contract, requested, burned: distributed });
            }
            Distribution::Reward => {
                self.rewards.pop_front();
                msg!("Reward #{} done: {} of {} credited on {}", id, distributed, requested, contract);
                self.emit(StakingEvent::Rewarded { contract, amount: requested, distributed });
            }
        }
        Ok(Step::Completed)
    }

    /// Release the earliest matured deallocation. Callers check maturity.
    fn process_first_deallocation(&mut self) {
        let Some(node) = self.deallocations.pop_head() else {
            return;
        };
        let staker = node.staker_pubkey();
        let contract = node.contract_pubkey();
        let released = self.ledger.release_allocation(&staker, &contract, node.amount);

        msg!("Deallocation of {} for {} on {} released {}", node.amount, staker, contract, released);
        self.emit(StakingEvent::DeallocationProcessed {
            staker,
            contract,
            requested: node.amount,
            released,
        });
    }
}
