//! Error code uniqueness, ordering and category tests.

use pooled_staking::error::{ErrorCategory, StakeError};
use solana_program::program_error::ProgramError;

const ALL_ERRORS: [StakeError; 32] = [
    StakeError::NotAMember,
    StakeError::NotRiskModule,
    StakeError::NotGovernance,
    StakeError::Reentrancy,
    StakeError::ZeroAmount,
    StakeError::LengthMismatch,
    StakeError::InvalidParameter,
    StakeError::ParameterOutOfRange,
    StakeError::FewerContractsNotAllowed,
    StakeError::UnexpectedContractOrder,
    StakeError::DuplicateContract,
    StakeError::AllocationMinimumNotMet,
    StakeError::AllocationAbove100Percent,
    StakeError::AllocationDecreaseNotAllowed,
    StakeError::LeverageExceeded,
    StakeError::ZeroStake,
    StakeError::StakeBelowMinimum,
    StakeError::ExceedsMaxUnstakable,
    StakeError::ExceedsAvailableReward,
    StakeError::BurnExceedsContractStake,
    StakeError::NothingToDeallocate,
    StakeError::DeallocationExceedsAllocation,
    StakeError::DeallocationBelowMinimum,
    StakeError::FinalAllocationBelowMinimum,
    StakeError::InvalidInsertionPoint,
    StakeError::InsertionPointMaturesLater,
    StakeError::SuccessorMaturesEarlier,
    StakeError::PendingBurns,
    StakeError::PendingActions,
    StakeError::Overflow,
    StakeError::TokenTransferFailed,
    StakeError::InvariantBroken,
];

#[test]
fn test_all_error_codes_unique() {
    let codes: Vec<u32> = ALL_ERRORS.iter().map(|e| *e as u32).collect();

    let mut sorted = codes.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), codes.len(), "Duplicate error codes detected!");

    // Check sequential (0..31)
    for (i, &code) in codes.iter().enumerate() {
        assert_eq!(code, i as u32, "Error code {} expected {}, got {}", i, i, code);
    }
}

#[test]
fn test_error_to_program_error() {
    let err: ProgramError = StakeError::NotGovernance.into();
    match err {
        ProgramError::Custom(code) => assert_eq!(code, 2),
        _ => panic!("Expected Custom error"),
    }
}

#[test]
fn test_all_errors_are_custom() {
    for err in &ALL_ERRORS {
        let pe: ProgramError = (*err).into();
        assert!(matches!(pe, ProgramError::Custom(_)));
    }
}

#[test]
fn test_categories() {
    assert_eq!(StakeError::NotRiskModule.category(), ErrorCategory::Authorization);
    assert_eq!(StakeError::LengthMismatch.category(), ErrorCategory::InputValidation);
    assert_eq!(StakeError::LeverageExceeded.category(), ErrorCategory::InvariantViolation);
    assert_eq!(StakeError::SuccessorMaturesEarlier.category(), ErrorCategory::InvariantViolation);
    assert_eq!(StakeError::ExceedsMaxUnstakable.category(), ErrorCategory::InsufficientBalance);
    assert_eq!(StakeError::ExceedsAvailableReward.category(), ErrorCategory::InsufficientBalance);
}

#[test]
fn test_messages_are_distinct() {
    let mut messages: Vec<String> = ALL_ERRORS.iter().map(|e| e.to_string()).collect();
    assert!(messages.iter().all(|m| !m.is_empty()));
    messages.sort();
    messages.dedup();
    assert_eq!(messages.len(), ALL_ERRORS.len());
}
