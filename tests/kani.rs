//! Kani formal verification proofs for the staking math.
//!
//! Proves safety properties of the PURE MATH layer used by the scheduler:
//! 1. Pro-rata shares never exceed the distributed amount
//! 2. Two-staker distributions conserve the amount (loss < 2 base units)
//! 3. Leverage and clamp arithmetic cannot overflow or panic
//! 4. Burns are capped by the contract total
//! 5. Deallocation bounds keep pending ≤ allocation
//!
//! Run all:  cargo kani --tests
//! Run one:  cargo kani --harness <name>

#[cfg(kani)]
mod kani_proofs {
    use pooled_staking::math::{
        clamp_to_stake, deallocatable, effective_burn, max_unstakable, pro_rata_share, within_leverage,
        zero_or_at_least,
    };

    // ═══════════════════════════════════════════════════════════
    // 1. Pro-rata bounds
    // ═══════════════════════════════════════════════════════════

    /// PROOF: A staker's share never exceeds the amount distributed.
    #[kani::proof]
    fn proof_share_bounded_by_amount() {
        let amount: u64 = kani::any();
        let part: u64 = kani::any();
        let total: u64 = kani::any();
        kani::assume(total > 0);
        kani::assume(part <= total);
        // Keep bounded to avoid solver timeout
        kani::assume(amount <= 1_000_000_000_000);
        kani::assume(total <= 1_000_000_000_000);

        let share = pro_rata_share(amount, part, total).unwrap();
        assert!(share <= amount, "share {} above amount {}", share, amount);
    }

    /// PROOF: Zero total yields no share (no division by zero).
    #[kani::proof]
    fn proof_zero_total_is_none() {
        let amount: u64 = kani::any();
        let part: u64 = kani::any();
        assert!(pro_rata_share(amount, part, 0).is_none());
    }

    /// PROOF: Full ownership receives the full amount.
    #[kani::proof]
    fn proof_sole_staker_gets_everything() {
        let amount: u64 = kani::any();
        let total: u64 = kani::any();
        kani::assume(total > 0);
        kani::assume(amount <= 1_000_000_000_000);
        kani::assume(total <= 1_000_000_000_000);

        assert_eq!(pro_rata_share(amount, total, total), Some(amount));
    }

    // ═══════════════════════════════════════════════════════════
    // 2. Conservation
    // ═══════════════════════════════════════════════════════════

    /// PROOF: Two stakers splitting an amount never receive more than it,
    /// and lose strictly less than two base units to rounding.
    #[kani::proof]
    fn proof_two_staker_conservation() {
        let amount: u64 = kani::any();
        let a: u64 = kani::any();
        let b: u64 = kani::any();
        kani::assume(a > 0 && b > 0);
        kani::assume(amount <= 1_000_000);
        kani::assume(a <= 1_000_000 && b <= 1_000_000);

        let total = a + b;
        let sa = pro_rata_share(amount, a, total).unwrap();
        let sb = pro_rata_share(amount, b, total).unwrap();
        assert!(sa + sb <= amount);
        assert!(amount - (sa + sb) < 2);
    }

    // ═══════════════════════════════════════════════════════════
    // 3. Allocation arithmetic
    // ═══════════════════════════════════════════════════════════

    /// PROOF: Leverage check is total (u128, no overflow) and accepts
    /// any single allocation ≤ stake when leverage ≥ 1.
    #[kani::proof]
    fn proof_leverage_no_overflow() {
        let staked: u64 = kani::any();
        let leverage: u64 = kani::any();
        let allocation: u64 = kani::any();
        kani::assume(leverage >= 1);
        kani::assume(allocation <= staked);

        assert!(within_leverage(allocation as u128, staked, leverage));
    }

    /// PROOF: Clamping never leaves an allocation above stake and loses nothing.
    #[kani::proof]
    fn proof_clamp_to_stake() {
        let allocation: u64 = kani::any();
        let staked: u64 = kani::any();
        let (clamped, reduction) = clamp_to_stake(allocation, staked);
        assert!(clamped <= staked);
        assert!(clamped <= allocation);
        assert_eq!(clamped as u128 + reduction as u128, allocation as u128);
    }

    /// PROOF: Unstaking max_unstakable leaves at least the largest allocation.
    #[kani::proof]
    fn proof_unstake_keeps_backing() {
        let staked: u64 = kani::any();
        let largest: u64 = kani::any();
        kani::assume(largest <= staked);
        let free = max_unstakable(staked, largest);
        assert!(staked - free >= largest);
    }

    // ═══════════════════════════════════════════════════════════
    // 4. Burn bounds
    // ═══════════════════════════════════════════════════════════

    /// PROOF: A burn never takes more than the contract holds, and every
    /// staker's share of it fits inside their allocation.
    #[kani::proof]
    fn proof_burn_share_within_allocation() {
        let requested: u64 = kani::any();
        let total: u64 = kani::any();
        let allocation: u64 = kani::any();
        kani::assume(total > 0 && allocation <= total);
        kani::assume(requested <= 1_000_000_000_000);
        kani::assume(total <= 1_000_000_000_000);

        let burn = effective_burn(requested, total);
        assert!(burn <= total);
        let share = pro_rata_share(burn, allocation, total).unwrap();
        assert!(share <= allocation);
    }

    // ═══════════════════════════════════════════════════════════
    // 5. Deallocation bounds
    // ═══════════════════════════════════════════════════════════

    /// PROOF: A request within `deallocatable` keeps pending ≤ allocation.
    #[kani::proof]
    fn proof_deallocation_keeps_pending_bounded() {
        let allocation: u64 = kani::any();
        let pending: u64 = kani::any();
        let amount: u64 = kani::any();
        kani::assume(pending <= allocation);
        kani::assume(amount <= deallocatable(allocation, pending));

        assert!(pending + amount <= allocation);
    }

    /// PROOF: zero_or_at_least accepts zero and exactly the minimum.
    #[kani::proof]
    fn proof_zero_or_at_least() {
        let min: u64 = kani::any();
        let value: u64 = kani::any();
        assert!(zero_or_at_least(0, min));
        assert!(zero_or_at_least(min, min));
        if value > 0 && value < min {
            assert!(!zero_or_at_least(value, min));
        }
    }
}
