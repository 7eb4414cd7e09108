//! Arena-backed singly linked queues.
//!
//! Nodes live in a `Vec` indexed by id; `next` fields are ids, id 0 is the
//! sentinel. Processed nodes are zeroed in place and ids are never reused.

use bytemuck::Zeroable;
use solana_program::{clock::UnixTimestamp, pubkey::Pubkey};

use crate::error::StakeError;
use crate::state::{ContractAction, Deallocation, SENTINEL};

/// FIFO of pushed burns or rewards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionQueue {
    entries: Vec<ContractAction>,
    first: u64,
    last: u64,
    len: u64,
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self {
            entries: vec![ContractAction::zeroed()],
            first: SENTINEL,
            last: SENTINEL,
            len: 0,
        }
    }
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its id.
    pub fn push(&mut self, mut entry: ContractAction) -> u64 {
        let id = self.entries.len() as u64;
        entry.next = SENTINEL;
        self.entries.push(entry);
        if self.first == SENTINEL {
            self.first = id;
        } else {
            self.entries[self.last as usize].next = id;
        }
        self.last = id;
        self.len += 1;
        id
    }

    pub fn front(&self) -> Option<(u64, &ContractAction)> {
        self.get(self.first).map(|entry| (self.first, entry))
    }

    /// Remove the oldest entry, zeroing its slot.
    pub fn pop_front(&mut self) -> Option<ContractAction> {
        if self.first == SENTINEL {
            return None;
        }
        let slot = &mut self.entries[self.first as usize];
        let entry = *slot;
        *slot = ContractAction::zeroed();
        self.first = entry.next;
        self.len -= 1;
        Some(entry)
    }

    pub fn get(&self, id: u64) -> Option<&ContractAction> {
        if id == SENTINEL {
            return None;
        }
        self.entries.get(id as usize).filter(|e| e.amount > 0)
    }

    pub fn first(&self) -> u64 {
        self.first
    }

    /// Id of the most recently pushed entry (0 before the first push).
    pub fn last_id(&self) -> u64 {
        self.last
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.first == SENTINEL
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &ContractAction)> + '_ {
        let mut id = self.first;
        std::iter::from_fn(move || {
            if id == SENTINEL {
                return None;
            }
            let current = id;
            let entry = &self.entries[current as usize];
            id = entry.next;
            Some((current, entry))
        })
    }
}

/// Deallocations sorted by maturity, with caller-hinted insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeallocationQueue {
    /// nodes[0] is the head; its `next` is the first real entry
    nodes: Vec<Deallocation>,
    last: u64,
    len: u64,
}

impl Default for DeallocationQueue {
    fn default() -> Self {
        Self {
            nodes: vec![Deallocation::zeroed()],
            last: SENTINEL,
            len: 0,
        }
    }
}

impl DeallocationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first(&self) -> u64 {
        self.nodes[0].next
    }

    /// Id of the most recently inserted entry (0 before the first insert).
    pub fn last_id(&self) -> u64 {
        self.last
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.first() == SENTINEL
    }

    pub fn get(&self, id: u64) -> Option<&Deallocation> {
        if id == SENTINEL {
            return None;
        }
        self.nodes.get(id as usize).filter(|n| n.amount > 0)
    }

    pub fn head(&self) -> Option<(u64, &Deallocation)> {
        let first = self.first();
        self.get(first).map(|node| (first, node))
    }

    /// Check that a node maturing at `matures_at` belongs right after `insert_after`.
    pub fn check_insertion(&self, insert_after: u64, matures_at: UnixTimestamp) -> Result<(), StakeError> {
        let anchor = if insert_after == SENTINEL {
            &self.nodes[0]
        } else {
            let node = self.get(insert_after).ok_or(StakeError::InvalidInsertionPoint)?;
            if node.matures_at > matures_at {
                return Err(StakeError::InsertionPointMaturesLater);
            }
            node
        };
        if let Some(successor) = self.get(anchor.next) {
            if successor.matures_at < matures_at {
                return Err(StakeError::SuccessorMaturesEarlier);
            }
        }
        Ok(())
    }

    /// Splice `entry` in after `insert_after` and return its id.
    pub fn insert_after(&mut self, insert_after: u64, mut entry: Deallocation) -> Result<u64, StakeError> {
        self.check_insertion(insert_after, entry.matures_at)?;
        let id = self.nodes.len() as u64;
        entry.next = self.nodes[insert_after as usize].next;
        self.nodes.push(entry);
        self.nodes[insert_after as usize].next = id;
        self.last = id;
        self.len += 1;
        Ok(id)
    }

    /// Remove the earliest-maturing entry, zeroing its slot.
    pub fn pop_head(&mut self) -> Option<Deallocation> {
        let first = self.first();
        if first == SENTINEL {
            return None;
        }
        let slot = &mut self.nodes[first as usize];
        let node = *slot;
        *slot = Deallocation::zeroed();
        self.nodes[0].next = node.next;
        self.len -= 1;
        Some(node)
    }

    /// Cut `amount` from one staker's entries on `contract`, latest maturity
    /// first. Entries cut to zero are unlinked. Returns the amount cut.
    pub fn trim(&mut self, staker: &Pubkey, contract: &Pubkey, amount: u64) -> u64 {
        let (staker, contract) = (staker.to_bytes(), contract.to_bytes());
        let ids: Vec<u64> = self
            .iter()
            .filter(|(_, node)| node.staker == staker && node.contract == contract)
            .map(|(id, _)| id)
            .collect();

        let mut remaining = amount;
        for id in ids.into_iter().rev() {
            if remaining == 0 {
                break;
            }
            let node = &mut self.nodes[id as usize];
            let cut = remaining.min(node.amount);
            node.amount -= cut;
            remaining -= cut;
            if node.amount == 0 {
                self.unlink(id);
            }
        }
        amount - remaining
    }

    fn unlink(&mut self, id: u64) {
        let mut prev = SENTINEL;
        while self.nodes[prev as usize].next != id {
            prev = self.nodes[prev as usize].next;
            if prev == SENTINEL {
                return;
            }
        }
        self.nodes[prev as usize].next = self.nodes[id as usize].next;
        self.nodes[id as usize] = Deallocation::zeroed();
        self.len -= 1;
    }

    /// Last id after which a node maturing at `matures_at` may be inserted.
    pub fn insertion_hint(&self, matures_at: UnixTimestamp) -> u64 {
        let mut hint = SENTINEL;
        for (id, node) in self.iter() {
            if node.matures_at > matures_at {
                break;
            }
            hint = id;
        }
        hint
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &Deallocation)> + '_ {
        let mut id = self.first();
        std::iter::from_fn(move || {
            if id == SENTINEL {
                return None;
            }
            let current = id;
            let node = &self.nodes[current as usize];
            id = node.next;
            Some((current, node))
        })
    }

    pub fn is_sorted(&self) -> bool {
        let mut prev = UnixTimestamp::MIN;
        self.iter().all(|(_, node)| {
            let ok = node.matures_at >= prev;
            prev = node.matures_at;
            ok
        })
    }
}
