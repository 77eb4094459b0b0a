use diesel::prelude::*;

use super::db::last_insert_id;
use crate::models::{NewTechnicianAvailability, TechnicianAvailability, UpdateTechnicianAvailability};

pub fn insert_availability(
    conn: &mut SqliteConnection,
    new_availability: NewTechnicianAvailability,
) -> Result<TechnicianAvailability, diesel::result::Error> {
    use crate::schema::technician_availabilities::dsl::*;

    diesel::insert_into(technician_availabilities)
        .values(&new_availability)
        .execute(conn)?;

    let last_id = last_insert_id(conn)?;
    technician_availabilities
        .filter(id.eq(last_id))
        .first::<TechnicianAvailability>(conn)
}

pub fn get_availability(
    conn: &mut SqliteConnection,
    availability_id: i32,
) -> Result<Option<TechnicianAvailability>, diesel::result::Error> {
    use crate::schema::technician_availabilities::dsl::*;
    technician_availabilities
        .filter(id.eq(availability_id))
        .first::<TechnicianAvailability>(conn)
        .optional()
}

pub fn update_availability(
    conn: &mut SqliteConnection,
    availability_id: i32,
    changes: &UpdateTechnicianAvailability,
) -> Result<TechnicianAvailability, diesel::result::Error> {
    use crate::schema::technician_availabilities::dsl::*;

    diesel::update(technician_availabilities.filter(id.eq(availability_id)))
        .set(changes)
        .execute(conn)?;
    technician_availabilities
        .filter(id.eq(availability_id))
        .first::<TechnicianAvailability>(conn)
}

pub fn delete_availability(
    conn: &mut SqliteConnection,
    availability_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::technician_availabilities::dsl::*;
    diesel::delete(technician_availabilities.filter(id.eq(availability_id))).execute(conn)
}
