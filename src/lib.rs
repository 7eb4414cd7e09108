//! Pooled staking accounting engine for an insurance protocol.
//!
//! Members stake a token and allocate it, with leverage, across insured
//! contracts. Risk modules push burns (loss events) and rewards against a
//! contract; both are shared pro rata by the contract's stakers. Lowering an
//! allocation goes through a time-locked deallocation queue kept sorted by
//! maturity.
//!
//! Burns, rewards and matured deallocations are applied by a budgeted
//! scheduler. Each call spends at most `cycle_budget` work units and leaves
//! its cursors so any later caller resumes exactly where it stopped.
//!
//! Architecture:
//! - `PooledStaking` owns the ledger, the three queues and the cursors
//! - Queues are arenas of fixed-size Pod nodes linked by id (0 = sentinel)
//! - Roles and token custody are collaborators behind the `Roles` and
//!   `TokenCustody` traits
//! - Every state-mutating call is guarded against reentrancy and validates
//!   before it mutates
//!
//! Instructions:
//!   0 - Stake:                 Pull tokens into custody, raise stake
//!   1 - Unstake:               Return unallocated stake
//!   2 - SetAllocations:        Re-submit the allocation table (append-only)
//!   3 - RequestDeallocation:   Queue time-locked allocation decreases
//!   4 - PushBurn:              Risk module queues a pro-rata burn
//!   5 - PushReward:            Risk module funds a pro-rata reward
//!   6 - WithdrawReward:        Pay owed rewards to a staker
//!   7 - ProcessPendingActions: Advance burns, rewards, deallocations
//!   8 - UpdateParameter:       Governance sets a bounded parameter

pub mod access;
pub mod allocation;
pub mod burns;
pub mod custody;
pub mod deallocation;
pub mod engine;
pub mod error;
pub mod events;
pub mod instruction;
pub mod ledger;
pub mod math;
pub mod params;
pub mod processor;
pub mod queue;
pub mod rewards;
pub mod scheduler;
pub mod state;

pub use access::{Role, RoleRegistry, Roles};
pub use custody::{TokenCustody, Vault};
pub use engine::PooledStaking;
pub use error::StakeError;
pub use events::StakingEvent;
pub use params::ParamKey;
pub use scheduler::ProcessOutcome;
