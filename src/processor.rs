use solana_program::{clock::UnixTimestamp, entrypoint::ProgramResult, msg, pubkey::Pubkey};

use crate::access::Roles;
use crate::custody::TokenCustody;
use crate::engine::PooledStaking;
use crate::instruction::StakingInstruction;

/// Decode `instruction_data` and run it against `engine` as `caller` at `now`.
pub fn process<R: Roles, T: TokenCustody>(
    engine: &mut PooledStaking<R, T>,
    caller: &Pubkey,
    now: UnixTimestamp,
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = StakingInstruction::unpack(instruction_data)?;

    match instruction {
        StakingInstruction::Stake { amount } => {
            msg!("Instruction: Stake");
            engine.stake(caller, amount)?;
        }
        StakingInstruction::Unstake { amount } => {
            msg!("Instruction: Unstake");
            engine.unstake(caller, amount)?;
        }
        StakingInstruction::SetAllocations { contracts, allocations } => {
            msg!("Instruction: SetAllocations");
            engine.set_allocations(caller, &contracts, &allocations)?;
        }
        StakingInstruction::RequestDeallocation { contracts, amounts, insert_after } => {
            msg!("Instruction: RequestDeallocation");
            engine.request_deallocation(caller, &contracts, &amounts, insert_after, now)?;
        }
        StakingInstruction::PushBurn { contract, amount } => {
            msg!("Instruction: PushBurn");
            engine.push_burn(caller, &contract, amount, now)?;
        }
        StakingInstruction::PushReward { contract, amount, source } => {
            msg!("Instruction: PushReward");
            engine.push_reward(caller, &contract, amount, &source, now)?;
        }
        StakingInstruction::WithdrawReward { staker, amount } => {
            msg!("Instruction: WithdrawReward");
            engine.withdraw_reward(caller, &staker, amount)?;
        }
        StakingInstruction::ProcessPendingActions => {
            msg!("Instruction: ProcessPendingActions");
            let outcome = engine.process_pending_actions(now)?;
            if !outcome.finished {
                msg!("Pending work remains after {} units", outcome.units_spent);
            }
        }
        StakingInstruction::UpdateParameter { key, value } => {
            msg!("Instruction: UpdateParameter");
            engine.update_parameter(caller, key, value)?;
        }
    }
    Ok(())
}
