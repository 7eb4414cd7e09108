use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use crate::error::StakeError;
use crate::params::ParamKey;

/// Instructions for the pooled staking engine.
///
/// Every instruction is executed on behalf of the signing caller passed to
/// `processor::process`; role checks happen inside the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakingInstruction {
    /// Stake tokens from the caller's balance.
    ///
    /// Caller: member
    Stake { amount: u64 },

    /// Withdraw unallocated stake.
    ///
    /// Caller: member
    Unstake { amount: u64 },

    /// Re-submit the caller's allocation table. Existing contracts must be
    /// repeated in order; new contracts are appended.
    ///
    /// Caller: member
    SetAllocations {
        contracts: Vec<Pubkey>,
        allocations: Vec<u64>,
    },

    /// Queue time-locked deallocations, spliced after queue node `insert_after`.
    ///
    /// Caller: member
    RequestDeallocation {
        contracts: Vec<Pubkey>,
        amounts: Vec<u64>,
        insert_after: u64,
    },

    /// Queue a pro-rata burn against a contract's stakers.
    ///
    /// Caller: risk module
    PushBurn { contract: Pubkey, amount: u64 },

    /// Pull tokens from `source` and queue them as a reward for a contract.
    ///
    /// Caller: risk module
    PushReward {
        contract: Pubkey,
        amount: u64,
        source: Pubkey,
    },

    /// Pay owed rewards to `staker`. Permissionless.
    WithdrawReward { staker: Pubkey, amount: u64 },

    /// Advance queued burns, rewards and matured deallocations within the
    /// configured budget. Permissionless.
    ProcessPendingActions,

    /// Caller: governance
    UpdateParameter { key: ParamKey, value: u64 },
}

/// Little-endian cursor over instruction data.
struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ProgramError> {
        if self.data.len() < len {
            return Err(ProgramError::InvalidInstructionData);
        }
        let (head, rest) = self.data.split_at(len);
        self.data = rest;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8, ProgramError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, ProgramError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn u64(&mut self) -> Result<u64, ProgramError> {
        let bytes = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(buf))
    }

    fn pubkey(&mut self) -> Result<Pubkey, ProgramError> {
        Pubkey::try_from(self.take(32)?).map_err(|_| ProgramError::InvalidInstructionData)
    }

    fn pubkeys(&mut self) -> Result<Vec<Pubkey>, ProgramError> {
        let count = self.u16()? as usize;
        (0..count).map(|_| self.pubkey()).collect()
    }

    fn amounts(&mut self) -> Result<Vec<u64>, ProgramError> {
        let count = self.u16()? as usize;
        (0..count).map(|_| self.u64()).collect()
    }

    fn finish(self) -> Result<(), ProgramError> {
        if self.data.is_empty() {
            Ok(())
        } else {
            Err(ProgramError::InvalidInstructionData)
        }
    }
}

impl StakingInstruction {
    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let (&tag, rest) = data.split_first().ok_or(ProgramError::InvalidInstructionData)?;
        let mut reader = Reader::new(rest);

        let instruction = match tag {
            0 => Self::Stake { amount: reader.u64()? },
            1 => Self::Unstake { amount: reader.u64()? },
            2 => Self::SetAllocations {
                contracts: reader.pubkeys()?,
                allocations: reader.amounts()?,
            },
            3 => Self::RequestDeallocation {
                contracts: reader.pubkeys()?,
                amounts: reader.amounts()?,
                insert_after: reader.u64()?,
            },
            4 => Self::PushBurn {
                contract: reader.pubkey()?,
                amount: reader.u64()?,
            },
            5 => Self::PushReward {
                contract: reader.pubkey()?,
                amount: reader.u64()?,
                source: reader.pubkey()?,
            },
            6 => Self::WithdrawReward {
                staker: reader.pubkey()?,
                amount: reader.u64()?,
            },
            7 => Self::ProcessPendingActions,
            8 => {
                let key = ParamKey::try_from(reader.u8()?).map_err(ProgramError::from)?;
                Self::UpdateParameter { key, value: reader.u64()? }
            }
            _ => return Err(ProgramError::InvalidInstructionData),
        };
        reader.finish()?;
        Ok(instruction)
    }

    /// Encode into the layout `unpack` reads.
    pub fn pack(&self) -> Result<Vec<u8>, ProgramError> {
        let mut buf = Vec::new();
        match self {
            Self::Stake { amount } => {
                buf.push(0);
                buf.extend_from_slice(&amount.to_le_bytes());
            }
            Self::Unstake { amount } => {
                buf.push(1);
                buf.extend_from_slice(&amount.to_le_bytes());
            }
            Self::SetAllocations { contracts, allocations } => {
                buf.push(2);
                put_pubkeys(&mut buf, contracts)?;
                put_amounts(&mut buf, allocations)?;
            }
            Self::RequestDeallocation { contracts, amounts, insert_after } => {
                buf.push(3);
                put_pubkeys(&mut buf, contracts)?;
                put_amounts(&mut buf, amounts)?;
                buf.extend_from_slice(&insert_after.to_le_bytes());
            }
            Self::PushBurn { contract, amount } => {
                buf.push(4);
                buf.extend_from_slice(contract.as_ref());
                buf.extend_from_slice(&amount.to_le_bytes());
            }
            Self::PushReward { contract, amount, source } => {
                buf.push(5);
                buf.extend_from_slice(contract.as_ref());
                buf.extend_from_slice(&amount.to_le_bytes());
                buf.extend_from_slice(source.as_ref());
            }
            Self::WithdrawReward { staker, amount } => {
                buf.push(6);
                buf.extend_from_slice(staker.as_ref());
                buf.extend_from_slice(&amount.to_le_bytes());
            }
            Self::ProcessPendingActions => buf.push(7),
            Self::UpdateParameter { key, value } => {
                buf.push(8);
                buf.push(*key as u8);
                buf.extend_from_slice(&value.to_le_bytes());
            }
        }
        Ok(buf)
    }
}

fn put_len(buf: &mut Vec<u8>, len: usize) -> Result<(), ProgramError> {
    let len = u16::try_from(len).map_err(|_| ProgramError::from(StakeError::LengthMismatch))?;
    buf.extend_from_slice(&len.to_le_bytes());
    Ok(())
}

fn put_pubkeys(buf: &mut Vec<u8>, keys: &[Pubkey]) -> Result<(), ProgramError> {
    put_len(buf, keys.len())?;
    for key in keys {
        buf.extend_from_slice(key.as_ref());
    }
    Ok(())
}

fn put_amounts(buf: &mut Vec<u8>, amounts: &[u64]) -> Result<(), ProgramError> {
    put_len(buf, amounts.len())?;
    for amount in amounts {
        buf.extend_from_slice(&amount.to_le_bytes());
    }
    Ok(())
}
