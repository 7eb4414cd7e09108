use core::fmt;

use solana_program::program_error::ProgramError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum StakeError {
    /// Caller is not a recognized member
    NotAMember = 0,
    /// Caller is not a recognized risk module
    NotRiskModule = 1,
    /// Caller is not governance
    NotGovernance = 2,
    /// Nested call into a state-mutating entry point
    Reentrancy = 3,
    /// Zero amount
    ZeroAmount = 4,
    /// Contracts and amounts have different lengths
    LengthMismatch = 5,
    /// Unknown parameter key
    InvalidParameter = 6,
    /// Parameter value outside its allowed range
    ParameterOutOfRange = 7,
    /// Re-submission drops contracts the staker already allocated to
    FewerContractsNotAllowed = 8,
    /// Re-submission reorders or replaces an existing contract
    UnexpectedContractOrder = 9,
    /// Same contract listed twice
    DuplicateContract = 10,
    /// Non-zero allocation below the configured minimum
    AllocationMinimumNotMet = 11,
    /// Single allocation above the staker's total stake
    AllocationAbove100Percent = 12,
    /// Allocations can only be lowered through a deallocation request
    AllocationDecreaseNotAllowed = 13,
    /// Sum of allocations above stake × max leverage
    LeverageExceeded = 14,
    /// Staker has nothing staked
    ZeroStake = 15,
    /// Resulting stake is non-zero and below the configured minimum
    StakeBelowMinimum = 16,
    /// Unstake would cut into allocated stake
    ExceedsMaxUnstakable = 17,
    /// Withdrawal above the reward owed
    ExceedsAvailableReward = 18,
    /// Burn larger than the stake backing the contract
    BurnExceedsContractStake = 19,
    /// No allocation left to deallocate on this contract
    NothingToDeallocate = 20,
    /// Deallocation above allocation minus already pending
    DeallocationExceedsAllocation = 21,
    /// Deallocation below the configured minimum
    DeallocationBelowMinimum = 22,
    /// Allocation left after the deallocation is non-zero and below minimum
    FinalAllocationBelowMinimum = 23,
    /// insert_after does not name a live deallocation
    InvalidInsertionPoint = 24,
    /// insert_after matures later than the new deallocation
    InsertionPointMaturesLater = 25,
    /// Successor of insert_after matures earlier than the new deallocation
    SuccessorMaturesEarlier = 26,
    /// Burns are waiting to be processed
    PendingBurns = 27,
    /// Burns or rewards are waiting to be processed
    PendingActions = 28,
    /// Arithmetic overflow
    Overflow = 29,
    /// Token custody refused a transfer or burn
    TokenTransferFailed = 30,
    /// Ledger totals disagree with per-staker records
    InvariantBroken = 31,
}

/// Coarse failure classes. Every error in a class fails the whole call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authorization,
    InputValidation,
    InvariantViolation,
    InsufficientBalance,
}

impl StakeError {
    pub fn category(self) -> ErrorCategory {
        use StakeError::*;
        match self {
            NotAMember | NotRiskModule | NotGovernance | Reentrancy => ErrorCategory::Authorization,
            ZeroAmount | LengthMismatch | InvalidParameter | ParameterOutOfRange
            | FewerContractsNotAllowed | UnexpectedContractOrder | DuplicateContract
            | AllocationMinimumNotMet | AllocationDecreaseNotAllowed | ZeroStake
            | StakeBelowMinimum | DeallocationBelowMinimum | FinalAllocationBelowMinimum
            | InvalidInsertionPoint | Overflow => ErrorCategory::InputValidation,
            AllocationAbove100Percent | LeverageExceeded | BurnExceedsContractStake
            | NothingToDeallocate | DeallocationExceedsAllocation | InsertionPointMaturesLater
            | SuccessorMaturesEarlier | PendingBurns | PendingActions | InvariantBroken => {
                ErrorCategory::InvariantViolation
            }
            ExceedsMaxUnstakable | ExceedsAvailableReward | TokenTransferFailed => {
                ErrorCategory::InsufficientBalance
            }
        }
    }
}

impl fmt::Display for StakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use StakeError::*;
        let msg = match self {
            NotAMember => "caller is not a member",
            NotRiskModule => "caller is not a risk module",
            NotGovernance => "caller is not governance",
            Reentrancy => "reentrant call",
            ZeroAmount => "amount must be greater than zero",
            LengthMismatch => "contracts and amounts length mismatch",
            InvalidParameter => "unknown parameter",
            ParameterOutOfRange => "parameter value out of range",
            FewerContractsNotAllowed => "Allocating to fewer contracts is not allowed",
            UnexpectedContractOrder => "Unexpected contract",
            DuplicateContract => "contract listed more than once",
            AllocationMinimumNotMet => "allocation below minimum",
            AllocationAbove100Percent => "allocation cannot exceed total stake",
            AllocationDecreaseNotAllowed => "allocation can only be lowered by a deallocation request",
            LeverageExceeded => "total allocation exceeds maximum leverage",
            ZeroStake => "nothing staked",
            StakeBelowMinimum => "stake below minimum",
            ExceedsMaxUnstakable => "amount exceeds max unstakable",
            ExceedsAvailableReward => "amount exceeds available reward",
            BurnExceedsContractStake => "burn exceeds total staked on contract",
            NothingToDeallocate => "nothing to deallocate",
            DeallocationExceedsAllocation => "cannot deallocate more than allocated",
            DeallocationBelowMinimum => "deallocation below minimum",
            FinalAllocationBelowMinimum => "final allocation below minimum",
            InvalidInsertionPoint => "invalid insert_after index",
            InsertionPointMaturesLater => "insert_after entry matures after the new deallocation",
            SuccessorMaturesEarlier => "entry after insert_after matures before the new deallocation",
            PendingBurns => "unable to execute request with unprocessed burns",
            PendingActions => "unable to execute request with unprocessed actions",
            Overflow => "arithmetic overflow",
            TokenTransferFailed => "token transfer failed",
            InvariantBroken => "ledger invariant broken",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for StakeError {}

impl From<StakeError> for ProgramError {
    fn from(e: StakeError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
