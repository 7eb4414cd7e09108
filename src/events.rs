use solana_program::{clock::UnixTimestamp, pubkey::Pubkey};

use crate::params::ParamKey;

/// Events emitted by the engine, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakingEvent {
    Staked {
        staker: Pubkey,
        amount: u64,
    },
    Unstaked {
        staker: Pubkey,
        amount: u64,
    },
    AllocationsUpdated {
        staker: Pubkey,
        contracts: Vec<Pubkey>,
        allocations: Vec<u64>,
    },
    BurnRequested {
        id: u64,
        contract: Pubkey,
        amount: u64,
    },
    /// A burn entry has been applied to every staker on the contract
    Burned {
        contract: Pubkey,
        requested: u64,
        burned: u64,
    },
    RewardRequested {
        id: u64,
        contract: Pubkey,
        amount: u64,
    },
    /// A reward entry has been credited to every staker on the contract
    Rewarded {
        contract: Pubkey,
        amount: u64,
        distributed: u64,
    },
    RewardWithdrawn {
        staker: Pubkey,
        /// Key that triggered the payout; tokens still go to `staker`
        caller: Pubkey,
        amount: u64,
    },
    DeallocationRequested {
        id: u64,
        staker: Pubkey,
        contract: Pubkey,
        amount: u64,
        matures_at: UnixTimestamp,
    },
    DeallocationProcessed {
        staker: Pubkey,
        contract: Pubkey,
        requested: u64,
        released: u64,
    },
    ParameterUpdated {
        key: ParamKey,
        value: u64,
    },
}
