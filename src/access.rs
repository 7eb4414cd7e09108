//! Role checks. Membership and module registration live outside the engine;
//! it only asks the oracle whether a caller holds a role.

use std::collections::BTreeSet;

use solana_program::pubkey::Pubkey;

use crate::error::StakeError;

/// Role oracle consulted on every state-mutating call.
pub trait Roles {
    fn is_member(&self, who: &Pubkey) -> bool;
    fn is_risk_module(&self, who: &Pubkey) -> bool;
    fn is_governance(&self, who: &Pubkey) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Member,
    RiskModule,
    Governance,
}

impl Role {
    fn denied(self) -> StakeError {
        match self {
            Role::Member => StakeError::NotAMember,
            Role::RiskModule => StakeError::NotRiskModule,
            Role::Governance => StakeError::NotGovernance,
        }
    }
}

pub fn require_role<R: Roles + ?Sized>(roles: &R, role: Role, who: &Pubkey) -> Result<(), StakeError> {
    let granted = match role {
        Role::Member => roles.is_member(who),
        Role::RiskModule => roles.is_risk_module(who),
        Role::Governance => roles.is_governance(who),
    };
    if granted {
        Ok(())
    } else {
        Err(role.denied())
    }
}

/// In-memory role oracle for hosts without an external registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRegistry {
    members: BTreeSet<Pubkey>,
    risk_modules: BTreeSet<Pubkey>,
    governance: BTreeSet<Pubkey>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, role: Role, who: Pubkey) {
        self.set_for(role).insert(who);
    }

    pub fn revoke(&mut self, role: Role, who: &Pubkey) {
        self.set_for(role).remove(who);
    }

    fn set_for(&mut self, role: Role) -> &mut BTreeSet<Pubkey> {
        match role {
            Role::Member => &mut self.members,
            Role::RiskModule => &mut self.risk_modules,
            Role::Governance => &mut self.governance,
        }
    }
}

impl Roles for RoleRegistry {
    fn is_member(&self, who: &Pubkey) -> bool {
        self.members.contains(who)
    }

    fn is_risk_module(&self, who: &Pubkey) -> bool {
        self.risk_modules.contains(who)
    }

    fn is_governance(&self, who: &Pubkey) -> bool {
        self.governance.contains(who)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_and_revoke() {
        let who = Pubkey::new_unique();
        let mut roles = RoleRegistry::new();
        assert_eq!(require_role(&roles, Role::Member, &who), Err(StakeError::NotAMember));

        roles.grant(Role::Member, who);
        assert!(require_role(&roles, Role::Member, &who).is_ok());
        assert_eq!(require_role(&roles, Role::RiskModule, &who), Err(StakeError::NotRiskModule));
        assert_eq!(require_role(&roles, Role::Governance, &who), Err(StakeError::NotGovernance));

        roles.revoke(Role::Member, &who);
        assert!(!roles.is_member(&who));
    }
}
