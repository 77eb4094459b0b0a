use serde::{Deserialize, Serialize};

/// The closed set of roles. Hierarchy for "can act as" checks is
/// `SuperAdmin ⊇ Manager ⊇ Technician ⊇ Operator`; the exact-equality
/// helpers (`is_*`) exist for the rare rule that targets one role only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "operator")]
    Operator,
    #[serde(rename = "technician")]
    Technician,
    #[serde(rename = "manager")]
    Manager,
    #[serde(rename = "super_admin")]
    SuperAdmin,
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "operator" => Ok(Role::Operator),
            "technician" => Ok(Role::Technician),
            "manager" => Ok(Role::Manager),
            "super_admin" => Ok(Role::SuperAdmin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Operator, Role::Technician, Role::Manager, Role::SuperAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operator => "operator",
            Role::Technician => "technician",
            Role::Manager => "manager",
            Role::SuperAdmin => "super_admin",
        }
    }

    pub fn is_super_admin(self) -> bool {
        self == Role::SuperAdmin
    }

    pub fn is_manager(self) -> bool {
        self == Role::Manager
    }

    pub fn is_technician(self) -> bool {
        self == Role::Technician
    }

    pub fn is_operator(self) -> bool {
        self == Role::Operator
    }

    pub fn can_act_as_manager(self) -> bool {
        matches!(self, Role::Manager | Role::SuperAdmin)
    }

    pub fn can_act_as_technician(self) -> bool {
        matches!(self, Role::Technician | Role::Manager | Role::SuperAdmin)
    }
}

/// The authenticated user an operation runs on behalf of. Immutable for the
/// lifetime of a request or job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i32,
    pub company_id: i32,
    pub role: Role,
}

impl Actor {
    pub fn new(id: i32, company_id: i32, role: Role) -> Self {
        Self { id, company_id, role }
    }

    /// The company filter to apply to queries made for this actor. `None`
    /// means unrestricted, which only a super admin gets.
    pub fn tenant_filter(&self) -> Option<i32> {
        if self.role.is_super_admin() {
            None
        } else {
            Some(self.company_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy_helpers() {
        assert!(Role::SuperAdmin.can_act_as_manager());
        assert!(Role::Manager.can_act_as_manager());
        assert!(!Role::Technician.can_act_as_manager());
        assert!(!Role::Operator.can_act_as_manager());

        assert!(Role::SuperAdmin.can_act_as_technician());
        assert!(Role::Manager.can_act_as_technician());
        assert!(Role::Technician.can_act_as_technician());
        assert!(!Role::Operator.can_act_as_technician());
    }

    #[test]
    fn test_exact_role_checks() {
        assert!(Role::Manager.is_manager());
        assert!(!Role::SuperAdmin.is_manager());
        assert!(Role::Technician.is_technician());
        assert!(!Role::Manager.is_technician());
        assert!(Role::Operator.is_operator());
        assert!(Role::SuperAdmin.is_super_admin());
    }

    #[test]
    fn test_role_parsing() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert_eq!("super-admin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!("Manager".parse::<Role>().unwrap(), Role::Manager);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_tenant_filter() {
        assert_eq!(Actor::new(1, 7, Role::Manager).tenant_filter(), Some(7));
        assert_eq!(Actor::new(1, 7, Role::SuperAdmin).tenant_filter(), None);
    }
}
