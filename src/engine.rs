//! The engine: one owned store holding the ledger, the three work queues and
//! the scheduler's continuation state. Every entry point takes `&mut self`
//! and runs under the reentrancy guard, so a call either completes or
//! commits nothing.

use bytemuck::Zeroable;
use solana_program::{entrypoint::ProgramResult, msg, pubkey::Pubkey};

use crate::access::{require_role, Role, Roles};
use crate::custody::TokenCustody;
use crate::error::StakeError;
use crate::events::StakingEvent;
use crate::ledger::{ContractRecord, Ledger, StakerRecord};
use crate::params::ParamKey;
use crate::queue::{ActionQueue, DeallocationQueue};
use crate::state::{Cursors, DistributionProgress, StakingParams};

#[derive(Debug, Clone)]
pub struct PooledStaking<R, T> {
    pub(crate) roles: R,
    pub(crate) custody: T,
    pub(crate) params: StakingParams,
    pub(crate) ledger: Ledger,
    pub(crate) burns: ActionQueue,
    pub(crate) rewards: ActionQueue,
    pub(crate) deallocations: DeallocationQueue,
    pub(crate) burn_progress: DistributionProgress,
    pub(crate) reward_progress: DistributionProgress,
    events: Vec<StakingEvent>,
    entered: bool,
}

impl<R: Roles, T: TokenCustody> PooledStaking<R, T> {
    pub fn new(roles: R, custody: T) -> Self {
        Self::with_params(roles, custody, StakingParams::default())
    }

    pub fn with_params(roles: R, custody: T, params: StakingParams) -> Self {
        Self {
            roles,
            custody,
            params,
            ledger: Ledger::new(),
            burns: ActionQueue::new(),
            rewards: ActionQueue::new(),
            deallocations: DeallocationQueue::new(),
            burn_progress: DistributionProgress::zeroed(),
            reward_progress: DistributionProgress::zeroed(),
            events: Vec::new(),
            entered: false,
        }
    }

    // ── Collaborators ──

    pub fn roles(&self) -> &R {
        &self.roles
    }

    pub fn roles_mut(&mut self) -> &mut R {
        &mut self.roles
    }

    pub fn custody(&self) -> &T {
        &self.custody
    }

    pub fn custody_mut(&mut self) -> &mut T {
        &mut self.custody
    }

    // ── Views ──

    pub fn params(&self) -> &StakingParams {
        &self.params
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn burns(&self) -> &ActionQueue {
        &self.burns
    }

    pub fn rewards(&self) -> &ActionQueue {
        &self.rewards
    }

    pub fn deallocations(&self) -> &DeallocationQueue {
        &self.deallocations
    }

    pub fn staker(&self, who: &Pubkey) -> Option<&StakerRecord> {
        self.ledger.staker(who)
    }

    pub fn contract(&self, contract: &Pubkey) -> Option<&ContractRecord> {
        self.ledger.contract(contract)
    }

    pub fn staked(&self, who: &Pubkey) -> u64 {
        self.staker(who).map(|s| s.staked).unwrap_or(0)
    }

    pub fn allocation(&self, who: &Pubkey, contract: &Pubkey) -> u64 {
        self.staker(who).map(|s| s.allocation(contract)).unwrap_or(0)
    }

    pub fn pending_deallocation(&self, who: &Pubkey, contract: &Pubkey) -> u64 {
        self.staker(who).map(|s| s.pending_deallocation(contract)).unwrap_or(0)
    }

    pub fn reward_owed(&self, who: &Pubkey) -> u64 {
        self.staker(who).map(|s| s.reward_owed).unwrap_or(0)
    }

    pub fn max_unstakable(&self, who: &Pubkey) -> u64 {
        self.staker(who).map(|s| s.max_unstakable()).unwrap_or(0)
    }

    pub fn has_pending_burns(&self) -> bool {
        !self.burns.is_empty()
    }

    pub fn has_pending_rewards(&self) -> bool {
        !self.rewards.is_empty()
    }

    pub fn has_pending_actions(&self) -> bool {
        self.has_pending_burns() || self.has_pending_rewards()
    }

    pub fn cursors(&self) -> Cursors {
        Cursors {
            first_burn: self.burns.first(),
            last_burn_id: self.burns.last_id(),
            first_reward: self.rewards.first(),
            last_reward_id: self.rewards.last_id(),
            first_deallocation: self.deallocations.first(),
            last_deallocation_id: self.deallocations.last_id(),
            burn: self.burn_progress,
            reward: self.reward_progress,
        }
    }

    pub fn events(&self) -> &[StakingEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<StakingEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Governance ──

    pub fn update_parameter(&mut self, caller: &Pubkey, key: ParamKey, value: u64) -> Result<(), StakeError> {
        self.non_reentrant(|engine| {
            engine.require(Role::Governance, caller)?;
            engine.params.set(key, value)?;
            msg!("Parameter {:?} set to {}", key, value);
            engine.emit(StakingEvent::ParameterUpdated { key, value });
            Ok(())
        })
    }

    // ── Internals shared by the operation modules ──

    pub(crate) fn non_reentrant<O, F>(&mut self, f: F) -> Result<O, StakeError>
    where
        F: FnOnce(&mut Self) -> Result<O, StakeError>,
    {
        if self.entered {
            msg!("Error: reentrant call rejected");
            return Err(StakeError::Reentrancy);
        }
        self.entered = true;
        let result = f(self);
        self.entered = false;
        result
    }

    pub(crate) fn require(&self, role: Role, who: &Pubkey) -> Result<(), StakeError> {
        require_role(&self.roles, role, who)
    }

    pub(crate) fn require_no_pending_actions(&self) -> Result<(), StakeError> {
        if self.has_pending_actions() {
            return Err(StakeError::PendingActions);
        }
        Ok(())
    }

    pub(crate) fn require_no_pending_burns(&self) -> Result<(), StakeError> {
        if self.has_pending_burns() {
            return Err(StakeError::PendingBurns);
        }
        Ok(())
    }

    pub(crate) fn emit(&mut self, event: StakingEvent) {
        self.events.push(event);
    }
}

/// Map a custody failure into the engine's error space.
pub(crate) fn custody_result(result: ProgramResult) -> Result<(), StakeError> {
    result.map_err(|e| {
        msg!("Error: token custody failed: {}", e);
        StakeError::TokenTransferFailed
    })
}
