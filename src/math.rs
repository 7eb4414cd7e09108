//! Pure staking math, extracted for Kani formal verification.
//!
//! No ledger or Pubkey dependencies. Just arithmetic on token base units.
//! Every division rounds DOWN, so distributions never exceed what was pushed.

/// One whole token in base units.
pub const ONE_TOKEN: u64 = 1_000_000_000;

/// Share of a pro-rata distribution.
///
/// # Arguments
/// * `amount` - Total being distributed (burn or reward)
/// * `part` - The staker's allocation on the contract
/// * `total` - The contract's total allocation when distribution started
///
/// # Returns
/// * `Some(share)` - `floor(amount * part / total)`
/// * `None` - Zero total or overflow
///
/// # Invariant
/// `part <= total` implies `share <= amount`.
pub fn pro_rata_share(amount: u64, part: u64, total: u64) -> Option<u64> {
    if total == 0 {
        return None;
    }
    let share = (amount as u128)
        .checked_mul(part as u128)?
        .checked_div(total as u128)?;
    if share > u64::MAX as u128 {
        None
    } else {
        Some(share as u64)
    }
}

/// Whether a set of allocations stays under the leverage cap.
///
/// Computed in u128 so `staked * max_leverage` cannot overflow.
pub fn within_leverage(total_allocated: u128, staked: u64, max_leverage: u64) -> bool {
    total_allocated <= (staked as u128) * (max_leverage as u128)
}

/// Stake a staker may withdraw: everything above its largest allocation.
pub fn max_unstakable(staked: u64, max_allocation: u64) -> u64 {
    staked.saturating_sub(max_allocation)
}

/// Allocation still free to be requested for deallocation.
pub fn deallocatable(allocation: u64, pending: u64) -> u64 {
    allocation.saturating_sub(pending)
}

/// A resulting balance is valid when it is fully closed or at least `min`.
pub fn zero_or_at_least(value: u64, min: u64) -> bool {
    value == 0 || value >= min
}

/// Amount a queued burn can actually take from a contract.
///
/// A burn validated at push time may exceed the stake left on the contract
/// once earlier burns have been processed.
pub fn effective_burn(amount: u64, contract_total: u64) -> u64 {
    amount.min(contract_total)
}

/// Clamp an allocation to the staker's stake.
///
/// # Returns
/// (new_allocation, reduction)
pub fn clamp_to_stake(allocation: u64, staked: u64) -> (u64, u64) {
    if allocation > staked {
        (staked, allocation - staked)
    } else {
        (allocation, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Pro-rata shares ──

    #[test]
    fn test_share_half() {
        // 7 allocated out of 7, burn 3.5 tokens
        assert_eq!(
            pro_rata_share(3_500_000_000, 7 * ONE_TOKEN, 7 * ONE_TOKEN),
            Some(3_500_000_000)
        );
    }

    #[test]
    fn test_share_two_stakers() {
        let total = 10 * ONE_TOKEN;
        assert_eq!(pro_rata_share(5 * ONE_TOKEN, 4 * ONE_TOKEN, total), Some(2 * ONE_TOKEN));
        assert_eq!(pro_rata_share(5 * ONE_TOKEN, 6 * ONE_TOKEN, total), Some(3 * ONE_TOKEN));
    }

    #[test]
    fn test_share_rounds_down() {
        // 10 * 1 / 3 = 3.33 → 3
        assert_eq!(pro_rata_share(10, 1, 3), Some(3));
        assert!(3u128 * 3 <= 10 * 1);
    }

    #[test]
    fn test_share_zero_total_none() {
        assert_eq!(pro_rata_share(100, 0, 0), None);
    }

    #[test]
    fn test_share_zero_part() {
        assert_eq!(pro_rata_share(100, 0, 50), Some(0));
    }

    #[test]
    fn test_share_u64_max() {
        assert_eq!(pro_rata_share(u64::MAX, u64::MAX, u64::MAX), Some(u64::MAX));
    }

    #[test]
    fn test_share_part_above_total_overflows_u64() {
        assert_eq!(pro_rata_share(u64::MAX, 2, 1), None);
    }

    // ── Conservation ──

    #[test]
    fn test_three_way_split_loses_at_most_two_units() {
        let parts = [1u64, 1, 1];
        let total: u64 = parts.iter().sum();
        let sum: u64 = parts.iter().map(|p| pro_rata_share(100, *p, total).unwrap()).sum();
        assert_eq!(sum, 99);
        assert!(100 - sum < parts.len() as u64);
    }

    // ── Leverage ──

    #[test]
    fn test_leverage_at_cap() {
        assert!(within_leverage(100, 10, 10));
        assert!(!within_leverage(101, 10, 10));
    }

    #[test]
    fn test_leverage_no_overflow() {
        assert!(within_leverage(u64::MAX as u128 * 2, u64::MAX, 2));
    }

    // ── Unstake / deallocation bounds ──

    #[test]
    fn test_max_unstakable() {
        assert_eq!(max_unstakable(10, 7), 3);
        assert_eq!(max_unstakable(5, 7), 0);
    }

    #[test]
    fn test_deallocatable() {
        assert_eq!(deallocatable(7, 2), 5);
        assert_eq!(deallocatable(2, 7), 0);
    }

    #[test]
    fn test_zero_or_at_least() {
        assert!(zero_or_at_least(0, 5));
        assert!(zero_or_at_least(5, 5));
        assert!(!zero_or_at_least(4, 5));
    }

    #[test]
    fn test_effective_burn_capped() {
        assert_eq!(effective_burn(10, 4), 4);
        assert_eq!(effective_burn(3, 4), 3);
    }

    #[test]
    fn test_clamp_to_stake() {
        assert_eq!(clamp_to_stake(8, 6), (6, 2));
        assert_eq!(clamp_to_stake(5, 6), (5, 0));
    }
}
