//! Kani formal verification for pooled-staking distribution math.
//!
//! ZERO dependencies. Pure Rust. CBMC-friendly.
//!
//! KEY DESIGN DECISION: Functions use u32 inputs / u64 intermediates.
//! The production code uses u64/u128, but the arithmetic properties
//! (conservation, monotonicity, bounds) are scale-invariant.
//! u32 keeps SAT formulas tractable for CBMC (<60s per proof).
//!
//! Run all:   cargo kani --lib
//! Run one:   cargo kani --harness proof_share_bounded_by_amount

// ═══════════════════════════════════════════════════════════════
// Staking Math (u32/u64 mirror of pooled-staking/src/math.rs)
// Arithmetic is IDENTICAL, just narrower types for CBMC tractability.
// ═══════════════════════════════════════════════════════════════

/// Pro-rata share: floor(amount * part / total). None on zero total.
pub fn pro_rata_share(amount: u32, part: u32, total: u32) -> Option<u32> {
    if total == 0 {
        return None;
    }
    let share = (amount as u64)
        .checked_mul(part as u64)?
        .checked_div(total as u64)?;
    if share > u32::MAX as u64 {
        None
    } else {
        Some(share as u32)
    }
}

/// Σ allocations ≤ staked × max_leverage, computed wide.
pub fn within_leverage(total_allocated: u64, staked: u32, max_leverage: u32) -> bool {
    total_allocated <= (staked as u64) * (max_leverage as u64)
}

/// (new_allocation, reduction) after clamping to stake.
pub fn clamp_to_stake(allocation: u32, staked: u32) -> (u32, u32) {
    if allocation > staked {
        (staked, allocation - staked)
    } else {
        (allocation, 0)
    }
}

/// Queued burn capped at what the contract still holds.
pub fn effective_burn(amount: u32, contract_total: u32) -> u32 {
    amount.min(contract_total)
}

/// Allocation not yet requested for deallocation.
pub fn deallocatable(allocation: u32, pending: u32) -> u32 {
    allocation.saturating_sub(pending)
}

/// Stake above the largest allocation.
pub fn max_unstakable(staked: u32, max_allocation: u32) -> u32 {
    staked.saturating_sub(max_allocation)
}

// ═══════════════════════════════════════════════════════════════
// KANI PROOFS
// ═══════════════════════════════════════════════════════════════

#[cfg(kani)]
mod proofs {
    use super::*;

    // ── 1. Share Bounds ──

    /// A share never exceeds the amount when part ≤ total.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_share_bounded_by_amount() {
        let amount: u32 = kani::any();
        let part: u32 = kani::any();
        let total: u32 = kani::any();
        kani::assume(total > 0 && total < 1_000);
        kani::assume(part <= total);
        kani::assume(amount < 1_000);

        let share = pro_rata_share(amount, part, total).unwrap();
        assert!(share <= amount);
    }

    /// Sole staker receives the whole amount.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_full_part_gets_all() {
        let amount: u32 = kani::any();
        let total: u32 = kani::any();
        kani::assume(total > 0 && total < 1_000);
        kani::assume(amount < 1_000);
        assert_eq!(pro_rata_share(amount, total, total), Some(amount));
    }

    /// Zero part → zero share.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_zero_part_zero_share() {
        let amount: u32 = kani::any();
        let total: u32 = kani::any();
        kani::assume(total > 0 && total < 1_000);
        kani::assume(amount < 1_000);
        assert_eq!(pro_rata_share(amount, 0, total), Some(0));
    }

    // ── 2. Conservation ──

    /// Three stakers: distributed ≤ amount, dust < 3.
    /// Tight bounds: 3x u64 division calls (heaviest proof).
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_three_staker_conservation() {
        let amount: u32 = kani::any();
        let a: u32 = kani::any();
        let b: u32 = kani::any();
        let c: u32 = kani::any();
        kani::assume(amount < 100);
        kani::assume(a > 0 && a < 50);
        kani::assume(b < 50 && c < 50);

        let total = a + b + c;
        let sa = pro_rata_share(amount, a, total).unwrap();
        let sb = pro_rata_share(amount, b, total).unwrap();
        let sc = pro_rata_share(amount, c, total).unwrap();
        let distributed = sa + sb + sc;
        assert!(distributed <= amount);
        assert!(amount - distributed < 3);
    }

    // ── 3. Arithmetic Safety ──

    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_share_no_panic() {
        let _ = pro_rata_share(kani::any(), kani::any(), kani::any());
    }

    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_leverage_no_panic() {
        let _ = within_leverage(kani::any(), kani::any(), kani::any());
    }

    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_clamp_no_panic() {
        let _ = clamp_to_stake(kani::any(), kani::any());
    }

    // ── 4. Monotonicity ──

    /// Larger allocation → ≥ share.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_larger_part_larger_share() {
        let amount: u32 = kani::any();
        let total: u32 = kani::any();
        let sm: u32 = kani::any();
        let lg: u32 = kani::any();
        kani::assume(amount < 100);
        kani::assume(total > 0 && total < 100);
        kani::assume(sm < lg && lg <= total);

        match (pro_rata_share(amount, sm, total), pro_rata_share(amount, lg, total)) {
            (Some(s), Some(l)) => assert!(l >= s),
            _ => {}
        }
    }

    /// Larger amount → ≥ share.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_larger_amount_larger_share() {
        let part: u32 = kani::any();
        let total: u32 = kani::any();
        let sm: u32 = kani::any();
        let lg: u32 = kani::any();
        kani::assume(total > 0 && total < 100);
        kani::assume(part <= total);
        kani::assume(sm < lg && lg < 100);

        match (pro_rata_share(sm, part, total), pro_rata_share(lg, part, total)) {
            (Some(s), Some(l)) => assert!(l >= s),
            _ => {}
        }
    }

    // ── 5. Burn Bounds ──

    /// Effective burn ≤ both the request and the contract total.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_effective_burn_bounded() {
        let amount: u32 = kani::any();
        let total: u32 = kani::any();
        let burn = effective_burn(amount, total);
        assert!(burn <= amount && burn <= total);
    }

    /// A staker's burn share fits inside its allocation.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_burn_share_within_allocation() {
        let requested: u32 = kani::any();
        let total: u32 = kani::any();
        let allocation: u32 = kani::any();
        kani::assume(total > 0 && total < 1_000);
        kani::assume(allocation <= total);
        kani::assume(requested < 1_000);

        let burn = effective_burn(requested, total);
        let share = pro_rata_share(burn, allocation, total).unwrap();
        assert!(share <= allocation);
    }

    /// Clamping keeps allocation ≤ stake and accounts for every unit.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_clamp_conserves() {
        let allocation: u32 = kani::any();
        let staked: u32 = kani::any();
        let (clamped, reduction) = clamp_to_stake(allocation, staked);
        assert!(clamped <= staked);
        assert_eq!(clamped as u64 + reduction as u64, allocation as u64);
    }

    // ── 6. Leverage ──

    /// Any single allocation ≤ stake passes when leverage ≥ 1.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_single_allocation_within_leverage() {
        let staked: u32 = kani::any();
        let allocation: u32 = kani::any();
        let leverage: u32 = kani::any();
        kani::assume(leverage >= 1);
        kani::assume(allocation <= staked);
        assert!(within_leverage(allocation as u64, staked, leverage));
    }

    // ── 7. Deallocation / Unstake Bounds ──

    /// pending + request ≤ allocation whenever request ≤ deallocatable.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_deallocation_bounded() {
        let allocation: u32 = kani::any();
        let pending: u32 = kani::any();
        let amount: u32 = kani::any();
        kani::assume(pending <= allocation);
        kani::assume(amount <= deallocatable(allocation, pending));
        assert!(pending as u64 + amount as u64 <= allocation as u64);
    }

    /// Unstaking the max leaves the largest allocation backed.
    #[kani::proof]
    #[kani::unwind(33)]
    fn proof_unstake_keeps_backing() {
        let staked: u32 = kani::any();
        let largest: u32 = kani::any();
        kani::assume(largest <= staked);
        assert!(staked - max_unstakable(staked, largest) >= largest);
    }
}
