//! Per-resource policies.
//!
//! Each constant is a [`TenantScopedPolicy`] whose rules read like the
//! access table the product team maintains. Resources that live outside
//! this crate (locations, planning, webhooks...) are represented by small
//! tenant-owned descriptors so callers can still ask the same questions.

use super::role::Actor;
use super::tenant_scoped::{Ability, Rule, RoleGate, TenantOwned, TenantScopedPolicy};
use crate::models::{
    EntityActivity, Machine, PreventiveTask, PurchaseOrder, SparePart, Supplier,
    TechnicianAvailability, User, WorkOrder,
};

use Ability::*;
use RoleGate::{Anyone, Manager, Nobody, Technician};

/// Declares a lightweight tenant-owned descriptor for a resource whose
/// storage is handled elsewhere.
macro_rules! tenant_resource {
    ($(#[$meta:meta])* $name:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub id: i32,
            pub company_id: i32,
            $(pub $field: $ty,)*
        }

        impl TenantOwned for $name {
            fn tenant_id(&self) -> Option<i32> {
                Some(self.company_id)
            }
        }
    };
}

/// Implements [`TenantOwned`] for a Diesel model with a `company_id` column.
macro_rules! tenant_model {
    ($($model:ty),* $(,)?) => {
        $(
            impl TenantOwned for $model {
                fn tenant_id(&self) -> Option<i32> {
                    Some(self.company_id)
                }
            }
        )*
    };
}

tenant_resource!(Location {});
tenant_resource!(PlannedShutdown { machine_id: Option<i32> });
tenant_resource!(CauseCategory {});
tenant_resource!(PlanningSlot { technician_id: Option<i32> });
tenant_resource!(PlanningTemplate {});
tenant_resource!(WebhookEndpoint {});

tenant_model!(
    Machine,
    WorkOrder,
    PreventiveTask,
    TechnicianAvailability,
    User,
    SparePart,
    Supplier,
    PurchaseOrder,
);

impl TenantOwned for EntityActivity {
    fn tenant_id(&self) -> Option<i32> {
        self.company_id
    }
}

/// Role rules shared by reference data every role reads and managers edit.
const MANAGER_MAINTAINED: &[(Ability, Rule)] = &[
    (ViewAny, Rule::gate(Anyone)),
    (View, Rule::gate(Anyone)),
    (Create, Rule::gate(Manager)),
    (Update, Rule::gate(Manager)),
    (Delete, Rule::gate(Manager)),
];

/// Rules for planning data: technicians read, managers edit.
const PLANNING: &[(Ability, Rule)] = &[
    (ViewAny, Rule::gate(Technician)),
    (View, Rule::gate(Technician)),
    (Create, Rule::gate(Manager)),
    (Update, Rule::gate(Manager)),
    (Delete, Rule::gate(Manager)),
];

fn created_work_order(actor: &Actor, work_order: &WorkOrder) -> bool {
    work_order.created_by == Some(actor.id)
}

fn owns_availability(actor: &Actor, availability: &TechnicianAvailability) -> bool {
    availability.technician_id == actor.id
}

fn is_self(actor: &Actor, user: &User) -> bool {
    user.id == actor.id
}

fn never_delete_self(actor: &Actor, ability: Ability, user: &User) -> bool {
    !(ability == Delete && user.id == actor.id)
}

pub const MACHINE: TenantScopedPolicy<Machine> = TenantScopedPolicy {
    resource: "machine",
    rules: &[
        (ViewAny, Rule::gate(Anyone)),
        (View, Rule::gate(Anyone)),
        (Create, Rule::gate(Technician)),
        (Update, Rule::gate(Technician)),
        (Delete, Rule::gate(Manager)),
        (Import, Rule::gate(Manager)),
    ],
    owner: None,
    guard: None,
};

/// Operators see and edit only the work orders they reported; everyone
/// from technician up works with the whole tenant's list.
pub const WORK_ORDER: TenantScopedPolicy<WorkOrder> = TenantScopedPolicy {
    resource: "work_order",
    rules: &[
        (ViewAny, Rule::gate(Anyone)),
        (View, Rule::gate_or_owner(Technician)),
        (Create, Rule::gate(Anyone)),
        (Update, Rule::gate_or_owner(Technician)),
        (Delete, Rule::gate(Manager)),
        (Assign, Rule::gate(Manager)),
        (Complete, Rule::gate(Technician)),
    ],
    owner: Some(created_work_order),
    guard: None,
};

pub const PREVENTIVE_TASK: TenantScopedPolicy<PreventiveTask> = TenantScopedPolicy {
    resource: "preventive_task",
    rules: PLANNING,
    owner: None,
    guard: None,
};

pub const LOCATION: TenantScopedPolicy<Location> = TenantScopedPolicy {
    resource: "location",
    rules: MANAGER_MAINTAINED,
    owner: None,
    guard: None,
};

pub const PLANNED_SHUTDOWN: TenantScopedPolicy<PlannedShutdown> = TenantScopedPolicy {
    resource: "planned_shutdown",
    rules: MANAGER_MAINTAINED,
    owner: None,
    guard: None,
};

pub const CAUSE_CATEGORY: TenantScopedPolicy<CauseCategory> = TenantScopedPolicy {
    resource: "cause_category",
    rules: MANAGER_MAINTAINED,
    owner: None,
    guard: None,
};

/// Technicians maintain their own availability; managers maintain anyone's.
pub const TECHNICIAN_AVAILABILITY: TenantScopedPolicy<TechnicianAvailability> = TenantScopedPolicy {
    resource: "technician_availability",
    rules: &[
        (ViewAny, Rule::gate(Technician)),
        (View, Rule::gate(Technician)),
        (Create, Rule::gate(Technician)),
        (Update, Rule::gate_or_owner(Manager)),
        (Delete, Rule::gate_or_owner(Manager)),
    ],
    owner: Some(owns_availability),
    guard: None,
};

pub const PLANNING_SLOT: TenantScopedPolicy<PlanningSlot> = TenantScopedPolicy {
    resource: "planning_slot",
    rules: PLANNING,
    owner: None,
    guard: None,
};

pub const PLANNING_TEMPLATE: TenantScopedPolicy<PlanningTemplate> = TenantScopedPolicy {
    resource: "planning_template",
    rules: PLANNING,
    owner: None,
    guard: None,
};

pub const WEBHOOK_ENDPOINT: TenantScopedPolicy<WebhookEndpoint> = TenantScopedPolicy {
    resource: "webhook_endpoint",
    rules: &[
        (ViewAny, Rule::gate(Manager)),
        (View, Rule::gate(Manager)),
        (Create, Rule::gate(Manager)),
        (Update, Rule::gate(Manager)),
        (Delete, Rule::gate(Manager)),
    ],
    owner: None,
    guard: None,
};

/// The audit log is append-only from the application's point of view.
pub const AUDIT_LOG: TenantScopedPolicy<EntityActivity> = TenantScopedPolicy {
    resource: "audit_log",
    rules: &[
        (ViewAny, Rule::gate(Manager)),
        (View, Rule::gate(Manager)),
        (Create, Rule::gate(Nobody)),
        (Update, Rule::gate(Nobody)),
        (Delete, Rule::gate(Nobody)),
    ],
    owner: None,
    guard: None,
};

/// Users may read and edit their own profile. Nobody, super admins
/// included, may delete their own account.
pub const USER: TenantScopedPolicy<User> = TenantScopedPolicy {
    resource: "user",
    rules: &[
        (ViewAny, Rule::gate(Manager)),
        (View, Rule::gate_or_owner(Manager)),
        (Create, Rule::gate(Manager)),
        (Update, Rule::gate_or_owner(Manager)),
        (Delete, Rule::gate(Manager)),
    ],
    owner: Some(is_self),
    guard: Some(never_delete_self),
};

pub const SPARE_PART: TenantScopedPolicy<SparePart> = TenantScopedPolicy {
    resource: "spare_part",
    rules: &[
        (ViewAny, Rule::gate(Anyone)),
        (View, Rule::gate(Anyone)),
        (Create, Rule::gate(Manager)),
        (Update, Rule::gate(Manager)),
        (Delete, Rule::gate(Manager)),
        (Import, Rule::gate(Manager)),
    ],
    owner: None,
    guard: None,
};

pub const SUPPLIER: TenantScopedPolicy<Supplier> = TenantScopedPolicy {
    resource: "supplier",
    rules: PLANNING,
    owner: None,
    guard: None,
};

pub const PURCHASE_ORDER: TenantScopedPolicy<PurchaseOrder> = TenantScopedPolicy {
    resource: "purchase_order",
    rules: PLANNING,
    owner: None,
    guard: None,
};
