//! Token custody seam. The engine never touches token balances directly; it
//! asks custody to pull, pay out or burn, and only then updates the ledger.

use std::collections::BTreeMap;

use solana_program::{entrypoint::ProgramResult, msg, program_error::ProgramError, pubkey::Pubkey};

pub trait TokenCustody {
    /// Pull `amount` from `from` into the engine's custody.
    fn transfer_from(&mut self, from: &Pubkey, amount: u64) -> ProgramResult;

    /// Pay `amount` out of custody to `to`.
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> ProgramResult;

    /// Destroy `amount` held in custody.
    fn burn(&mut self, amount: u64) -> ProgramResult;
}

/// In-memory token ledger: wallet balances plus the engine's custody account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vault {
    balances: BTreeMap<Pubkey, u64>,
    custody: u64,
    burned: u64,
}

impl Vault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint_to(&mut self, to: &Pubkey, amount: u64) -> ProgramResult {
        let balance = self.balances.entry(*to).or_default();
        *balance = balance.checked_add(amount).ok_or(ProgramError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn balance_of(&self, who: &Pubkey) -> u64 {
        self.balances.get(who).copied().unwrap_or(0)
    }

    /// Tokens currently held by the engine.
    pub fn custody_balance(&self) -> u64 {
        self.custody
    }

    /// Tokens destroyed by burns so far.
    pub fn total_burned(&self) -> u64 {
        self.burned
    }
}

impl TokenCustody for Vault {
    fn transfer_from(&mut self, from: &Pubkey, amount: u64) -> ProgramResult {
        let balance = self.balance_of(from);
        if balance < amount {
            msg!("Error: {} holds {} tokens, {} requested", from, balance, amount);
            return Err(ProgramError::InsufficientFunds);
        }
        let custody = self.custody.checked_add(amount).ok_or(ProgramError::ArithmeticOverflow)?;
        self.balances.insert(*from, balance - amount);
        self.custody = custody;
        Ok(())
    }

    fn transfer(&mut self, to: &Pubkey, amount: u64) -> ProgramResult {
        if self.custody < amount {
            return Err(ProgramError::InsufficientFunds);
        }
        self.mint_to(to, amount)?;
        self.custody -= amount;
        Ok(())
    }

    fn burn(&mut self, amount: u64) -> ProgramResult {
        if self.custody < amount {
            return Err(ProgramError::InsufficientFunds);
        }
        self.custody -= amount;
        self.burned = self.burned.saturating_add(amount);
        Ok(())
    }
}
