//! Fixed-point ledger and allocation table.
//!
//! All balances are u64 token base units. The methods that move balances are
//! the units of work the scheduler applies; each one leaves every invariant
//! checked by `check_invariants` intact.

use std::collections::BTreeMap;

use solana_program::pubkey::Pubkey;

use crate::error::StakeError;
use crate::math;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StakerRecord {
    /// Tokens staked (allocations are backed by this)
    pub staked: u64,

    /// Rewards credited and not yet withdrawn
    pub reward_owed: u64,

    /// Stake lost to burns, lifetime
    pub burned: u64,

    /// Contracts in the order the staker first listed them, no duplicates
    pub contracts: Vec<Pubkey>,

    pub allocations: BTreeMap<Pubkey, u64>,

    pub pending_deallocations: BTreeMap<Pubkey, u64>,
}

impl StakerRecord {
    pub fn allocation(&self, contract: &Pubkey) -> u64 {
        self.allocations.get(contract).copied().unwrap_or(0)
    }

    pub fn pending_deallocation(&self, contract: &Pubkey) -> u64 {
        self.pending_deallocations.get(contract).copied().unwrap_or(0)
    }

    pub fn max_allocation(&self) -> u64 {
        self.allocations.values().copied().max().unwrap_or(0)
    }

    pub fn total_allocated(&self) -> u128 {
        self.allocations.values().map(|a| *a as u128).sum()
    }

    pub fn max_unstakable(&self) -> u64 {
        math::max_unstakable(self.staked, self.max_allocation())
    }

    fn set_allocation(&mut self, contract: &Pubkey, amount: u64) {
        if amount == 0 {
            self.allocations.remove(contract);
        } else {
            self.allocations.insert(*contract, amount);
        }
    }

    fn set_pending(&mut self, contract: &Pubkey, amount: u64) {
        if amount == 0 {
            self.pending_deallocations.remove(contract);
        } else {
            self.pending_deallocations.insert(*contract, amount);
        }
    }

    /// Keep pending ≤ allocation on one contract after the allocation shrank.
    /// Returns how much pending was cut.
    fn clamp_pending(&mut self, contract: &Pubkey) -> u64 {
        let allocation = self.allocation(contract);
        let pending = self.pending_deallocation(contract);
        if pending <= allocation {
            return 0;
        }
        self.set_pending(contract, allocation);
        pending - allocation
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractRecord {
    pub total_allocated: u64,
    pub total_burned: u64,
    pub total_rewarded: u64,

    /// Stakers in the order their allocation first became non-zero
    pub stakers: Vec<Pubkey>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    stakers: BTreeMap<Pubkey, StakerRecord>,
    contracts: BTreeMap<Pubkey, ContractRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn staker(&self, who: &Pubkey) -> Option<&StakerRecord> {
        self.stakers.get(who)
    }

    pub fn contract(&self, contract: &Pubkey) -> Option<&ContractRecord> {
        self.contracts.get(contract)
    }

    pub fn stakers(&self) -> impl Iterator<Item = (&Pubkey, &StakerRecord)> {
        self.stakers.iter()
    }

    /// Staker at `index` in a contract's staker set.
    pub fn staker_at(&self, contract: &Pubkey, index: u64) -> Option<Pubkey> {
        self.contracts.get(contract)?.stakers.get(index as usize).copied()
    }

    pub(crate) fn add_stake(&mut self, who: &Pubkey, amount: u64) -> Result<u64, StakeError> {
        let record = self.stakers.entry(*who).or_default();
        record.staked = record.staked.checked_add(amount).ok_or(StakeError::Overflow)?;
        Ok(record.staked)
    }

    pub(crate) fn remove_stake(&mut self, who: &Pubkey, amount: u64) -> Result<u64, StakeError> {
        let record = self.stakers.get_mut(who).ok_or(StakeError::ZeroStake)?;
        if amount > record.max_unstakable() {
            return Err(StakeError::ExceedsMaxUnstakable);
        }
        record.staked -= amount;
        Ok(record.staked)
    }

    /// Replace a staker's contract list and raise allocations to `allocations`.
    ///
    /// Callers validate the whole submission first; allocations never go down here.
    pub(crate) fn apply_allocations(&mut self, who: &Pubkey, contracts: &[Pubkey], allocations: &[u64]) {
        let record = self.stakers.entry(*who).or_default();
        for (contract, &amount) in contracts.iter().zip(allocations) {
            let old = record.allocation(contract);
            let delta = amount.saturating_sub(old);
            record.set_allocation(contract, amount);
            if amount == 0 {
                continue;
            }

            let contract_record = self.contracts.entry(*contract).or_default();
            contract_record.total_allocated = contract_record.total_allocated.saturating_add(delta);
            if old == 0 && !contract_record.stakers.contains(who) {
                contract_record.stakers.push(*who);
            }
        }
        record.contracts = contracts.to_vec();
    }

    pub(crate) fn add_pending(&mut self, who: &Pubkey, contract: &Pubkey, amount: u64) {
        if let Some(record) = self.stakers.get_mut(who) {
            let pending = record.pending_deallocation(contract).saturating_add(amount);
            record.set_pending(contract, pending);
        }
    }

    /// Burn `share` of a staker's stake through its allocation on `contract`.
    ///
    /// The staker's other allocations are clamped to the reduced stake so no
    /// single allocation exceeds 100% of stake afterwards. Returns the pending
    /// deallocation cut on each contract, which the queued entries must shed.
    pub(crate) fn apply_burn_share(&mut self, who: &Pubkey, contract: &Pubkey, share: u64) -> Vec<(Pubkey, u64)> {
        let mut pending_cuts = Vec::new();
        let Some(record) = self.stakers.get_mut(who) else {
            return pending_cuts;
        };
        let allocation = record.allocation(contract);
        let share = share.min(allocation);

        record.staked = record.staked.saturating_sub(share);
        record.burned = record.burned.saturating_add(share);
        record.set_allocation(contract, allocation - share);
        let cut = record.clamp_pending(contract);
        if cut > 0 {
            pending_cuts.push((*contract, cut));
        }

        if let Some(contract_record) = self.contracts.get_mut(contract) {
            contract_record.total_allocated = contract_record.total_allocated.saturating_sub(share);
            contract_record.total_burned = contract_record.total_burned.saturating_add(share);
        }

        let staked = record.staked;
        let over: Vec<(Pubkey, u64)> = record
            .allocations
            .iter()
            .filter(|(_, a)| **a > staked)
            .map(|(c, a)| (*c, *a))
            .collect();
        for (other, allocation) in over {
            let (clamped, reduction) = math::clamp_to_stake(allocation, staked);
            record.set_allocation(&other, clamped);
            let cut = record.clamp_pending(&other);
            if cut > 0 {
                pending_cuts.push((other, cut));
            }
            if let Some(other_record) = self.contracts.get_mut(&other) {
                other_record.total_allocated = other_record.total_allocated.saturating_sub(reduction);
            }
        }
        pending_cuts
    }

    pub(crate) fn credit_reward(&mut self, who: &Pubkey, contract: &Pubkey, share: u64) -> Result<(), StakeError> {
        let record = self.stakers.get_mut(who).ok_or(StakeError::InvariantBroken)?;
        record.reward_owed = record.reward_owed.checked_add(share).ok_or(StakeError::Overflow)?;
        if let Some(contract_record) = self.contracts.get_mut(contract) {
            contract_record.total_rewarded = contract_record.total_rewarded.saturating_add(share);
        }
        Ok(())
    }

    pub(crate) fn debit_reward(&mut self, who: &Pubkey, amount: u64) -> Result<u64, StakeError> {
        let record = self.stakers.get_mut(who).ok_or(StakeError::ExceedsAvailableReward)?;
        if amount > record.reward_owed {
            return Err(StakeError::ExceedsAvailableReward);
        }
        record.reward_owed -= amount;
        Ok(record.reward_owed)
    }

    /// Apply a matured deallocation and return how much allocation was released.
    ///
    /// Burns may have shrunk the allocation since the request, so the release
    /// is capped by what is still pending. A contract left with nothing
    /// allocated or pending is dropped from both sides of the table.
    pub(crate) fn release_allocation(&mut self, who: &Pubkey, contract: &Pubkey, amount: u64) -> u64 {
        let Some(record) = self.stakers.get_mut(who) else {
            return 0;
        };
        let pending = record.pending_deallocation(contract);
        let allocation = record.allocation(contract);
        let released = amount.min(pending).min(allocation);

        record.set_allocation(contract, allocation - released);
        record.set_pending(contract, pending.saturating_sub(amount));
        record.clamp_pending(contract);

        let emptied = record.allocation(contract) == 0 && record.pending_deallocation(contract) == 0;
        if emptied {
            record.contracts.retain(|c| c != contract);
        }

        if let Some(contract_record) = self.contracts.get_mut(contract) {
            contract_record.total_allocated = contract_record.total_allocated.saturating_sub(released);
            if emptied {
                contract_record.stakers.retain(|s| s != who);
            }
        }
        released
    }

    /// Verify the allocation table against its totals.
    ///
    /// - every allocation ≤ stake, pending ≤ allocation
    /// - Σ allocations ≤ stake × max_leverage
    /// - contract total == Σ allocations of the stakers in its set
    /// - every non-zero allocation is listed in the contract's staker set
    pub fn check_invariants(&self, max_leverage: u64) -> Result<(), StakeError> {
        for (who, record) in &self.stakers {
            if !math::within_leverage(record.total_allocated(), record.staked, max_leverage) {
                return Err(StakeError::InvariantBroken);
            }
            for (contract, &allocation) in &record.allocations {
                if allocation > record.staked || record.pending_deallocation(contract) > allocation {
                    return Err(StakeError::InvariantBroken);
                }
                let listed = self
                    .contracts
                    .get(contract)
                    .map(|c| c.stakers.contains(who))
                    .unwrap_or(false);
                if !listed {
                    return Err(StakeError::InvariantBroken);
                }
            }
        }
        for (contract, record) in &self.contracts {
            let mut sum: u128 = 0;
            for (i, who) in record.stakers.iter().enumerate() {
                if record.stakers[..i].contains(who) {
                    return Err(StakeError::InvariantBroken);
                }
                sum += self.stakers.get(who).map(|s| s.allocation(contract)).unwrap_or(0) as u128;
            }
            if sum != record.total_allocated as u128 {
                return Err(StakeError::InvariantBroken);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocations_and_totals() {
        let (alice, bob) = (Pubkey::new_unique(), Pubkey::new_unique());
        let contract = Pubkey::new_unique();
        let mut ledger = Ledger::new();
        ledger.add_stake(&alice, 10).unwrap();
        ledger.add_stake(&bob, 10).unwrap();

        ledger.apply_allocations(&alice, &[contract], &[4]);
        ledger.apply_allocations(&bob, &[contract], &[6]);

        let record = ledger.contract(&contract).unwrap();
        assert_eq!(record.total_allocated, 10);
        assert_eq!(record.stakers, vec![alice, bob]);
        assert!(ledger.check_invariants(10).is_ok());
    }

    #[test]
    fn test_burn_clamps_other_allocations() {
        let alice = Pubkey::new_unique();
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let mut ledger = Ledger::new();
        ledger.add_stake(&alice, 10).unwrap();
        ledger.apply_allocations(&alice, &[a, b], &[10, 8]);
        ledger.add_pending(&alice, &b, 8);

        let cuts = ledger.apply_burn_share(&alice, &a, 5);
        assert_eq!(cuts, vec![(b, 3)]);

        let record = ledger.staker(&alice).unwrap();
        assert_eq!(record.staked, 5);
        assert_eq!(record.allocation(&a), 5);
        assert_eq!(record.allocation(&b), 5);
        assert_eq!(record.pending_deallocation(&b), 5);
        assert_eq!(ledger.contract(&b).unwrap().total_allocated, 5);
        assert_eq!(ledger.contract(&a).unwrap().total_burned, 5);
        assert!(ledger.check_invariants(10).is_ok());
    }

    #[test]
    fn test_release_prunes_empty_contract() {
        let alice = Pubkey::new_unique();
        let contract = Pubkey::new_unique();
        let mut ledger = Ledger::new();
        ledger.add_stake(&alice, 10).unwrap();
        ledger.apply_allocations(&alice, &[contract], &[4]);
        ledger.add_pending(&alice, &contract, 4);

        assert_eq!(ledger.release_allocation(&alice, &contract, 4), 4);
        assert!(ledger.staker(&alice).unwrap().contracts.is_empty());
        assert!(ledger.contract(&contract).unwrap().stakers.is_empty());
        assert!(ledger.check_invariants(10).is_ok());
    }

    #[test]
    fn test_remove_stake_respects_allocation() {
        let alice = Pubkey::new_unique();
        let contract = Pubkey::new_unique();
        let mut ledger = Ledger::new();
        ledger.add_stake(&alice, 10).unwrap();
        ledger.apply_allocations(&alice, &[contract], &[7]);
        assert_eq!(ledger.remove_stake(&alice, 4), Err(StakeError::ExceedsMaxUnstakable));
        assert_eq!(ledger.remove_stake(&alice, 3), Ok(7));
    }

    #[test]
    fn test_check_invariants_detects_bad_total() {
        let alice = Pubkey::new_unique();
        let contract = Pubkey::new_unique();
        let mut ledger = Ledger::new();
        ledger.add_stake(&alice, 10).unwrap();
        ledger.apply_allocations(&alice, &[contract], &[4]);
        ledger.contracts.get_mut(&contract).unwrap().total_allocated = 5;
        assert_eq!(ledger.check_invariants(10), Err(StakeError::InvariantBroken));
    }
}
