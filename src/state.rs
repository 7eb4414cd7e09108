use bytemuck::{Pod, Zeroable};
use solana_program::{clock::UnixTimestamp, pubkey::Pubkey};

/// Id 0 terminates every queue. For deallocations it is also the head node.
pub const SENTINEL: u64 = 0;

/// Queued burn or reward against one contract.
///
/// Burns and rewards live in separate FIFO queues but share this layout.
/// A processed entry is zeroed in place, so `amount == 0` marks a dead slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct ContractAction {
    /// Tokens to burn from / reward to the contract's stakers
    pub amount: u64,

    /// Target contract
    pub contract: [u8; 32],

    /// Unix timestamp of the push
    pub requested_at: UnixTimestamp,

    /// Id of the next entry, or SENTINEL
    pub next: u64,
}

/// Size of ContractAction in bytes
pub const CONTRACT_ACTION_SIZE: usize = core::mem::size_of::<ContractAction>();

impl ContractAction {
    pub fn new(contract: &Pubkey, amount: u64, requested_at: UnixTimestamp) -> Self {
        Self {
            amount,
            contract: contract.to_bytes(),
            requested_at,
            next: SENTINEL,
        }
    }

    pub fn contract_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.contract)
    }
}

/// Pending deallocation, kept sorted by `matures_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Deallocation {
    /// Allocation to release once matured
    pub amount: u64,

    /// Staker releasing the allocation
    pub staker: [u8; 32],

    /// Contract the allocation is released from
    pub contract: [u8; 32],

    /// Unix timestamp after which the scheduler may apply it
    pub matures_at: UnixTimestamp,

    /// Id of the next entry, or SENTINEL
    pub next: u64,
}

/// Size of Deallocation in bytes
pub const DEALLOCATION_SIZE: usize = core::mem::size_of::<Deallocation>();

impl Deallocation {
    pub fn new(staker: &Pubkey, contract: &Pubkey, amount: u64, matures_at: UnixTimestamp) -> Self {
        Self {
            amount,
            staker: staker.to_bytes(),
            contract: contract.to_bytes(),
            matures_at,
            next: SENTINEL,
        }
    }

    pub fn staker_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.staker)
    }

    pub fn contract_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.contract)
    }
}

/// Governance-tunable engine parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct StakingParams {
    /// Sum of a staker's allocations may reach stake × max_leverage
    pub max_leverage: u64,

    /// Smallest non-zero stake (base units)
    pub min_stake: u64,

    /// Smallest non-zero allocation on a contract (base units)
    pub min_allocation: u64,

    /// Smallest deallocation request (base units)
    pub min_deallocation: u64,

    /// Seconds between a deallocation request and its maturity
    pub lock_time: u64,

    /// Work units one scheduler invocation may spend
    pub cycle_budget: u64,
}

/// Size of StakingParams in bytes
pub const STAKING_PARAMS_SIZE: usize = core::mem::size_of::<StakingParams>();

/// Progress through the entry at the head of the burn or reward queue.
///
/// The snapshot is taken when the first staker of an entry is handled and
/// stays fixed until the entry completes, whatever happens to the contract
/// total in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct DistributionProgress {
    /// 1 while an entry is partially distributed
    pub active: u8,

    /// Padding for alignment
    pub _padding: [u8; 7],

    /// Index into the contract's staker set of the next staker to handle
    pub next_staker_index: u64,

    /// Contract total allocation at the start of the entry
    pub snapshot_total: u64,

    /// Amount being distributed (burns are capped at snapshot_total)
    pub snapshot_amount: u64,

    /// Sum of the shares applied so far
    pub distributed: u64,
}

/// Size of DistributionProgress in bytes
pub const DISTRIBUTION_PROGRESS_SIZE: usize = core::mem::size_of::<DistributionProgress>();

impl DistributionProgress {
    pub fn is_active(&self) -> bool {
        self.active == 1
    }

    pub fn start(snapshot_total: u64, snapshot_amount: u64) -> Self {
        Self {
            active: 1,
            snapshot_total,
            snapshot_amount,
            ..Self::zeroed()
        }
    }
}

/// Everything the scheduler needs to resume, as one serializable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Cursors {
    pub first_burn: u64,
    pub last_burn_id: u64,
    pub first_reward: u64,
    pub last_reward_id: u64,
    pub first_deallocation: u64,
    pub last_deallocation_id: u64,
    pub burn: DistributionProgress,
    pub reward: DistributionProgress,
}

/// Size of Cursors in bytes
pub const CURSORS_SIZE: usize = core::mem::size_of::<Cursors>();
