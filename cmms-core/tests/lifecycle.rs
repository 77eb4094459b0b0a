//! tests/lifecycle.rs

mod common;

use cmms_core::Error;
use cmms_core::clock::FixedClock;
use cmms_core::jobs::{JobControl, PreventiveOptions, generate_preventive_work_orders};
use cmms_core::lifecycle::*;
use cmms_core::models::{WorkOrderInput, WorkOrderType};
use cmms_core::orm::entity_activity::get_entity_activity_history;
use cmms_core::orm::preventive_task::get_preventive_task;
use cmms_core::orm::work_order::{get_work_orders_for_task, list_work_orders};
use common::*;

fn input(machine_id: i32, work_order_type: WorkOrderType) -> WorkOrderInput {
    WorkOrderInput {
        machine_id,
        work_order_type,
        title: "Hydraulic leak".to_string(),
        description: Some("Oil under the press".to_string()),
        assigned_to: None,
    }
}

#[test]
fn test_completing_preventive_work_order_advances_task() {
    let mut conn = setup_test_db();
    let acme = seed_tenant(&mut conn, "Acme");
    let machine = seed_machine(&mut conn, acme.id(), "Press");
    let task = seed_task(&mut conn, &machine, date(2025, 3, 2), Some(acme.technician.id));

    let morning = FixedClock(at(2025, 3, 1, 5));
    let options = PreventiveOptions {
        days_ahead: 3,
        company_id: None,
        system_user_id: None,
    };
    generate_preventive_work_orders(&mut conn, &morning, &options, &JobControl::default()).unwrap();
    let wo = get_work_orders_for_task(&mut conn, task.id).unwrap().remove(0);

    let later = FixedClock(at(2025, 3, 4, 15));
    start_work_order(&mut conn, &later, &acme.technician, wo.id).unwrap();
    let done = complete_work_order(&mut conn, &later, &acme.technician, wo.id).unwrap();
    assert_eq!(done.status, "completed");
    assert_eq!(done.completed_at, Some(at(2025, 3, 4, 15)));

    // interval is 14 days, counted from the completion date
    let task = get_preventive_task(&mut conn, task.id).unwrap().unwrap();
    assert_eq!(task.next_due_date, date(2025, 3, 18));
    assert_eq!(get_entity_activity_history(&mut conn, "preventive_tasks", task.id).unwrap().len(), 1);

    // nothing is due again until the new date enters the window
    let summary = generate_preventive_work_orders(&mut conn, &later, &options, &JobControl::default()).unwrap();
    assert_eq!(summary.generated, 0);
    let two_weeks = FixedClock(at(2025, 3, 15, 5));
    let summary = generate_preventive_work_orders(&mut conn, &two_weeks, &options, &JobControl::default()).unwrap();
    assert_eq!(summary.generated, 1);
}

#[test]
fn test_operator_can_only_report_breakdowns() {
    let mut conn = setup_test_db();
    let acme = seed_tenant(&mut conn, "Acme");
    let machine = seed_machine(&mut conn, acme.id(), "Press");
    let clock = FixedClock(at(2025, 3, 1, 8));

    for forbidden in [WorkOrderType::Preventive, WorkOrderType::Corrective, WorkOrderType::Improvement] {
        let result = create_work_order(&mut conn, &clock, &acme.operator, input(machine.id, forbidden));
        assert!(matches!(result, Err(Error::Forbidden)), "{:?}", forbidden);
    }
    assert_eq!(count_work_orders(&mut conn), 0);

    create_work_order(&mut conn, &clock, &acme.operator, input(machine.id, WorkOrderType::Breakdown)).unwrap();
    create_work_order(&mut conn, &clock, &acme.technician, input(machine.id, WorkOrderType::Corrective)).unwrap();
    assert_eq!(count_work_orders(&mut conn), 2);
}

#[test]
fn test_forbidden_calls_leave_no_trace() {
    let mut conn = setup_test_db();
    let acme = seed_tenant(&mut conn, "Acme");
    let globex = seed_tenant(&mut conn, "Globex");
    let machine = seed_machine(&mut conn, acme.id(), "Press");
    let clock = FixedClock(at(2025, 3, 1, 8));

    let wo = create_work_order(&mut conn, &clock, &acme.operator, input(machine.id, WorkOrderType::Breakdown)).unwrap();
    let audit_before = get_entity_activity_history(&mut conn, "work_orders", wo.id).unwrap().len();

    assert!(matches!(
        complete_work_order(&mut conn, &clock, &globex.manager, wo.id),
        Err(Error::Forbidden)
    ));
    assert!(matches!(
        assign_work_order(&mut conn, &clock, &acme.technician, wo.id, Some(acme.technician.id)),
        Err(Error::Forbidden)
    ));
    assert!(matches!(
        complete_work_order(&mut conn, &clock, &acme.operator, wo.id),
        Err(Error::Forbidden)
    ));

    let unchanged = list_work_orders(&mut conn, None, None).unwrap().remove(0);
    assert_eq!(unchanged.status, "open");
    assert_eq!(unchanged.assigned_to, None);
    assert_eq!(
        get_entity_activity_history(&mut conn, "work_orders", wo.id).unwrap().len(),
        audit_before
    );
}

#[test]
fn test_listing_is_scoped_to_actor() {
    let mut conn = setup_test_db();
    let acme = seed_tenant(&mut conn, "Acme");
    let globex = seed_tenant(&mut conn, "Globex");
    let acme_press = seed_machine(&mut conn, acme.id(), "Press");
    let globex_mill = seed_machine(&mut conn, globex.id(), "Mill");
    let clock = FixedClock(at(2025, 3, 1, 8));

    create_work_order(&mut conn, &clock, &acme.operator, input(acme_press.id, WorkOrderType::Breakdown)).unwrap();
    create_work_order(&mut conn, &clock, &acme.technician, input(acme_press.id, WorkOrderType::Corrective)).unwrap();
    create_work_order(&mut conn, &clock, &globex.manager, input(globex_mill.id, WorkOrderType::Improvement)).unwrap();

    assert_eq!(list_work_orders_for(&mut conn, &acme.operator).unwrap().len(), 1);
    assert_eq!(list_work_orders_for(&mut conn, &acme.manager).unwrap().len(), 2);
    assert_eq!(list_work_orders_for(&mut conn, &globex.technician).unwrap().len(), 1);
    assert!(
        list_machines_for(&mut conn, &acme.operator)
            .unwrap()
            .iter()
            .all(|m| m.company_id == acme.id())
    );
}

#[test]
fn test_audit_log_visible_to_managers_only() {
    let mut conn = setup_test_db();
    let acme = seed_tenant(&mut conn, "Acme");
    let globex = seed_tenant(&mut conn, "Globex");
    let machine = seed_machine(&mut conn, acme.id(), "Press");
    let clock = FixedClock(at(2025, 3, 1, 8));
    create_work_order(&mut conn, &clock, &acme.operator, input(machine.id, WorkOrderType::Breakdown)).unwrap();

    assert_eq!(list_activity_for(&mut conn, &acme.manager, 50).unwrap().len(), 1);
    assert!(list_activity_for(&mut conn, &globex.manager, 50).unwrap().is_empty());
    assert!(matches!(
        list_activity_for(&mut conn, &acme.technician, 50),
        Err(Error::Forbidden)
    ));
}
