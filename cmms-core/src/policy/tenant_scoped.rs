//! The generic tenant-then-role policy every resource type is built from.
//!
//! Evaluation order is fixed:
//!
//! 1. hard guards (e.g. "nobody deletes their own account") deny first,
//! 2. a super admin is allowed,
//! 3. a resource from another tenant is denied,
//! 4. the ability's role gate is checked, then the ownership predicate if
//!    the rule accepts owners.
//!
//! An ability without a rule is denied.

use super::role::{Actor, Role};

/// Anything partitioned by company. `None` means the row is not attached to
/// a tenant; only a super admin may act on such rows.
pub trait TenantOwned {
    fn tenant_id(&self) -> Option<i32>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    ViewAny,
    View,
    Create,
    Update,
    Delete,
    Assign,
    Complete,
    Import,
}

impl Ability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ability::ViewAny => "viewAny",
            Ability::View => "view",
            Ability::Create => "create",
            Ability::Update => "update",
            Ability::Delete => "delete",
            Ability::Assign => "assign",
            Ability::Complete => "complete",
            Ability::Import => "import",
        }
    }
}

/// Minimum role an ability requires, before ownership is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGate {
    Anyone,
    Technician,
    Manager,
    /// Only the super admin short-circuit can pass.
    Nobody,
}

impl RoleGate {
    pub fn admits(self, role: Role) -> bool {
        match self {
            RoleGate::Anyone => true,
            RoleGate::Technician => role.can_act_as_technician(),
            RoleGate::Manager => role.can_act_as_manager(),
            RoleGate::Nobody => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub gate: RoleGate,
    pub or_owner: bool,
}

impl Rule {
    pub const fn gate(gate: RoleGate) -> Self {
        Rule { gate, or_owner: false }
    }

    /// Passes the gate, or the policy's ownership predicate.
    pub const fn gate_or_owner(gate: RoleGate) -> Self {
        Rule { gate, or_owner: true }
    }
}

pub type OwnershipCheck<T> = fn(&Actor, &T) -> bool;
pub type Guard<T> = fn(&Actor, Ability, &T) -> bool;

pub struct TenantScopedPolicy<T> {
    pub(super) resource: &'static str,
    pub(super) rules: &'static [(Ability, Rule)],
    pub(super) owner: Option<OwnershipCheck<T>>,
    pub(super) guard: Option<Guard<T>>,
}

impl<T: TenantOwned> TenantScopedPolicy<T> {
    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub fn rule(&self, ability: Ability) -> Option<Rule> {
        self.rules
            .iter()
            .find(|(a, _)| *a == ability)
            .map(|(_, rule)| *rule)
    }

    /// Decides whether `actor` may perform `ability`, optionally on a
    /// concrete `resource`. Never panics and never errors.
    pub fn allows(&self, actor: &Actor, ability: Ability, resource: Option<&T>) -> bool {
        if let (Some(guard), Some(res)) = (self.guard, resource) {
            if !guard(actor, ability, res) {
                return false;
            }
        }

        if actor.role.is_super_admin() {
            return true;
        }

        if let Some(res) = resource {
            if res.tenant_id() != Some(actor.company_id) {
                return false;
            }
        }

        let Some(rule) = self.rule(ability) else {
            return false;
        };

        if rule.gate.admits(actor.role) {
            return true;
        }

        match (rule.or_owner, self.owner, resource) {
            (true, Some(is_owner), Some(res)) => is_owner(actor, res),
            _ => false,
        }
    }

    pub fn view_any(&self, actor: &Actor) -> bool {
        self.allows(actor, Ability::ViewAny, None)
    }

    pub fn view(&self, actor: &Actor, resource: &T) -> bool {
        self.allows(actor, Ability::View, Some(resource))
    }

    pub fn create(&self, actor: &Actor) -> bool {
        self.allows(actor, Ability::Create, None)
    }

    pub fn update(&self, actor: &Actor, resource: &T) -> bool {
        self.allows(actor, Ability::Update, Some(resource))
    }

    pub fn delete(&self, actor: &Actor, resource: &T) -> bool {
        self.allows(actor, Ability::Delete, Some(resource))
    }

    /// Resource-specific actions (`assign`, `complete`, `import`).
    pub fn perform(&self, actor: &Actor, ability: Ability, resource: Option<&T>) -> bool {
        self.allows(actor, ability, resource)
    }
}
