use chrono::NaiveDateTime;
use diesel::prelude::*;
use tracing::info;

use super::record;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::models::{NewTechnicianAvailability, TechnicianAvailability, UpdateTechnicianAvailability};
use crate::orm::technician_availability::{
    delete_availability, get_availability, insert_availability, update_availability,
};
use crate::orm::user::get_user;
use crate::policy::{Actor, TECHNICIAN_AVAILABILITY, authorize};
use crate::tenant::require;

fn check_window(starts_at: NaiveDateTime, ends_at: NaiveDateTime) -> Result<()> {
    if ends_at <= starts_at {
        return Err(Error::Validation("availability must end after it starts".to_string()));
    }
    Ok(())
}

/// Records availability for `technician_id`. Technicians record their own;
/// managers may record anyone's in their company.
pub fn create_availability_as(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    actor: &Actor,
    technician_id: i32,
    starts_at: NaiveDateTime,
    ends_at: NaiveDateTime,
    note: Option<String>,
) -> Result<TechnicianAvailability> {
    authorize(TECHNICIAN_AVAILABILITY.create(actor))?;
    if technician_id != actor.id {
        authorize(actor.role.can_act_as_manager())?;
    }

    let technician = require(get_user(conn, technician_id)?, "user", technician_id)?;
    if !actor.role.is_super_admin() && technician.company_id != actor.company_id {
        return Err(Error::Forbidden);
    }
    check_window(starts_at, ends_at)?;

    conn.transaction::<_, Error, _>(|conn| {
        let created = insert_availability(
            conn,
            NewTechnicianAvailability {
                company_id: technician.company_id,
                technician_id,
                starts_at,
                ends_at,
                note,
            },
        )?;
        record(conn, clock, actor, created.company_id, "technician_availabilities", created.id, "create")?;
        Ok(created)
    })
}

/// Applies `changes` when the actor manages the company or owns the record.
pub fn update_availability_as(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    actor: &Actor,
    availability_id: i32,
    changes: UpdateTechnicianAvailability,
) -> Result<TechnicianAvailability> {
    let current = require(
        get_availability(conn, availability_id)?,
        "technician_availability",
        availability_id,
    )?;
    authorize(TECHNICIAN_AVAILABILITY.update(actor, &current))?;

    if changes.starts_at.is_none() && changes.ends_at.is_none() && changes.note.is_none() {
        return Ok(current);
    }
    check_window(
        changes.starts_at.unwrap_or(current.starts_at),
        changes.ends_at.unwrap_or(current.ends_at),
    )?;

    conn.transaction::<_, Error, _>(|conn| {
        let updated = update_availability(conn, current.id, &changes)?;
        record(conn, clock, actor, updated.company_id, "technician_availabilities", updated.id, "update")?;
        info!(availability_id = updated.id, actor_id = actor.id, "Availability updated");
        Ok(updated)
    })
}

pub fn delete_availability_as(
    conn: &mut SqliteConnection,
    clock: &impl Clock,
    actor: &Actor,
    availability_id: i32,
) -> Result<()> {
    let current = require(
        get_availability(conn, availability_id)?,
        "technician_availability",
        availability_id,
    )?;
    authorize(TECHNICIAN_AVAILABILITY.delete(actor, &current))?;

    conn.transaction::<_, Error, _>(|conn| {
        delete_availability(conn, current.id)?;
        record(conn, clock, actor, current.company_id, "technician_availabilities", current.id, "delete")?;
        info!(availability_id = current.id, actor_id = actor.id, "Availability deleted");
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::orm::testing::*;
    use crate::policy::Role;

    #[test]
    fn test_owner_edits_peer_cannot() {
        let mut conn = setup_test_db();
        let company = create_company(&mut conn, "Acme");
        let tech = create_actor(&mut conn, company.id, Role::Technician, "t1@acme.test");
        let peer = create_actor(&mut conn, company.id, Role::Technician, "t2@acme.test");
        let clock = FixedClock(at(2025, 3, 1, 8));

        let slot = create_availability_as(&mut conn, &clock, &tech, tech.id, at(2025, 3, 3, 7), at(2025, 3, 3, 15), None)
            .unwrap();

        let changes = || UpdateTechnicianAvailability {
            note: Some(Some("dentist at 14:00".to_string())),
            ..Default::default()
        };
        assert!(matches!(
            update_availability_as(&mut conn, &clock, &peer, slot.id, changes()),
            Err(Error::Forbidden)
        ));
        let updated = update_availability_as(&mut conn, &clock, &tech, slot.id, changes()).unwrap();
        assert_eq!(updated.note.as_deref(), Some("dentist at 14:00"));

        assert!(matches!(delete_availability_as(&mut conn, &clock, &peer, slot.id), Err(Error::Forbidden)));
        delete_availability_as(&mut conn, &clock, &tech, slot.id).unwrap();
        assert!(get_availability(&mut conn, slot.id).unwrap().is_none());
    }

    #[test]
    fn test_technician_cannot_book_a_peer() {
        let mut conn = setup_test_db();
        let company = create_company(&mut conn, "Acme");
        let tech = create_actor(&mut conn, company.id, Role::Technician, "t1@acme.test");
        let peer = create_actor(&mut conn, company.id, Role::Technician, "t2@acme.test");
        let manager = create_actor(&mut conn, company.id, Role::Manager, "m@acme.test");
        let clock = FixedClock(at(2025, 3, 1, 8));

        let window = (at(2025, 3, 3, 7), at(2025, 3, 3, 15));
        assert!(matches!(
            create_availability_as(&mut conn, &clock, &tech, peer.id, window.0, window.1, None),
            Err(Error::Forbidden)
        ));
        assert!(create_availability_as(&mut conn, &clock, &manager, peer.id, window.0, window.1, None).is_ok());
    }

    #[test]
    fn test_inverted_window_rejected() {
        let mut conn = setup_test_db();
        let company = create_company(&mut conn, "Acme");
        let tech = create_actor(&mut conn, company.id, Role::Technician, "t@acme.test");
        let clock = FixedClock(at(2025, 3, 1, 8));
        let result = create_availability_as(&mut conn, &clock, &tech, tech.id, at(2025, 3, 3, 15), at(2025, 3, 3, 7), None);
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
