//! Struct layout verification tests.
//!
//! Ensures bytemuck Pod compliance and that queue node, parameter and cursor
//! sizes don't accidentally change (would break serialized state).

use bytemuck::{Pod, Zeroable};
use pooled_staking::state::{
    ContractAction, Cursors, Deallocation, DistributionProgress, StakingParams, CONTRACT_ACTION_SIZE,
    CURSORS_SIZE, DEALLOCATION_SIZE, DISTRIBUTION_PROGRESS_SIZE, STAKING_PARAMS_SIZE,
};
use solana_program::pubkey::Pubkey;

#[test]
fn test_contract_action_size_is_56() {
    // If this changes, persisted queues become unreadable.
    assert_eq!(CONTRACT_ACTION_SIZE, 56);
    assert_eq!(std::mem::size_of::<ContractAction>(), 56);
}

#[test]
fn test_deallocation_size_is_88() {
    assert_eq!(DEALLOCATION_SIZE, 88);
    assert_eq!(std::mem::size_of::<Deallocation>(), 88);
}

#[test]
fn test_staking_params_size_is_48() {
    assert_eq!(STAKING_PARAMS_SIZE, 48);
}

#[test]
fn test_progress_and_cursors_sizes() {
    assert_eq!(DISTRIBUTION_PROGRESS_SIZE, 40);
    assert_eq!(CURSORS_SIZE, 128);
}

#[test]
fn test_alignment() {
    assert_eq!(std::mem::align_of::<ContractAction>(), 8);
    assert_eq!(std::mem::align_of::<Deallocation>(), 8);
    assert_eq!(std::mem::align_of::<StakingParams>(), 8);
    assert_eq!(std::mem::align_of::<Cursors>(), 8);
}

#[test]
fn test_zeroed_nodes_are_dead() {
    let action = ContractAction::zeroed();
    assert_eq!(action.amount, 0);
    assert_eq!(action.next, 0);

    let node = Deallocation::zeroed();
    assert_eq!(node.amount, 0);
    assert_eq!(node.matures_at, 0);

    let progress = DistributionProgress::zeroed();
    assert!(!progress.is_active());
    assert_eq!(progress.next_staker_index, 0);
}

#[test]
fn test_bytemuck_roundtrip_deallocation() {
    let (staker, contract) = (Pubkey::new_unique(), Pubkey::new_unique());
    let mut node = Deallocation::new(&staker, &contract, 2_000, 7_776_000);
    node.next = 9;

    let bytes: &[u8] = bytemuck::bytes_of(&node);
    assert_eq!(bytes.len(), DEALLOCATION_SIZE);

    let recovered: &Deallocation = bytemuck::from_bytes(bytes);
    assert_eq!(recovered.staker_pubkey(), staker);
    assert_eq!(recovered.contract_pubkey(), contract);
    assert_eq!(recovered.amount, 2_000);
    assert_eq!(recovered.matures_at, 7_776_000);
    assert_eq!(recovered.next, 9);
}

#[test]
fn test_pod_zeroable_impls() {
    fn assert_pod<T: Pod + Zeroable>() {}
    assert_pod::<ContractAction>();
    assert_pod::<Deallocation>();
    assert_pod::<StakingParams>();
    assert_pod::<DistributionProgress>();
    assert_pod::<Cursors>();
}

/// Field offset verification, no hidden padding
#[test]
fn test_deallocation_field_offsets() {
    let node = Deallocation::zeroed();
    let base = &node as *const _ as usize;

    assert_eq!(&node.amount as *const _ as usize - base, 0);
    assert_eq!(&node.staker as *const _ as usize - base, 8);
    assert_eq!(&node.contract as *const _ as usize - base, 40);
    assert_eq!(&node.matures_at as *const _ as usize - base, 72);
    assert_eq!(&node.next as *const _ as usize - base, 80);
}

#[test]
fn test_progress_field_offsets() {
    let progress = DistributionProgress::zeroed();
    let base = &progress as *const _ as usize;

    assert_eq!(&progress.active as *const _ as usize - base, 0);
    assert_eq!(&progress.next_staker_index as *const _ as usize - base, 8);
    assert_eq!(&progress.snapshot_total as *const _ as usize - base, 16);
    assert_eq!(&progress.snapshot_amount as *const _ as usize - base, 24);
    assert_eq!(&progress.distributed as *const _ as usize - base, 32);
}
