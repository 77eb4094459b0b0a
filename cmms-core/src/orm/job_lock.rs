use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::models::JobLock;

/// Result of trying to take a job lock.
#[derive(Debug, Clone)]
pub enum LockAttempt {
    Acquired,
    /// Someone else holds a lock that is not stale yet.
    HeldBy(JobLock),
}

/// Takes the lock for `name` unless a live one exists. A lock acquired at
/// or before `stale_before` is removed first, so a run that crashed without
/// releasing does not block the job forever.
pub fn try_acquire_lock(
    conn: &mut SqliteConnection,
    name: &str,
    owner_val: &str,
    now: NaiveDateTime,
    stale_before: NaiveDateTime,
) -> Result<LockAttempt, diesel::result::Error> {
    use crate::schema::job_locks::dsl::*;

    conn.immediate_transaction(|conn| {
        diesel::delete(
            job_locks
                .filter(job_name.eq(name))
                .filter(acquired_at.le(stale_before)),
        )
        .execute(conn)?;

        let lock = JobLock {
            job_name: name.to_string(),
            owner: owner_val.to_string(),
            acquired_at: now,
        };
        let inserted = diesel::insert_or_ignore_into(job_locks)
            .values(&lock)
            .execute(conn)?;

        if inserted == 1 {
            Ok(LockAttempt::Acquired)
        } else {
            let holder = job_locks.filter(job_name.eq(name)).first::<JobLock>(conn)?;
            Ok(LockAttempt::HeldBy(holder))
        }
    })
}

/// Releases the lock if `owner_val` still holds it. Returns true when a
/// row was removed.
pub fn release_lock(
    conn: &mut SqliteConnection,
    name: &str,
    owner_val: &str,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::job_locks::dsl::*;

    let removed = diesel::delete(
        job_locks
            .filter(job_name.eq(name))
            .filter(owner.eq(owner_val)),
    )
    .execute(conn)?;
    Ok(removed == 1)
}

/// Removes the lock regardless of owner.
pub fn force_release_lock(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::job_locks::dsl::*;
    let removed = diesel::delete(job_locks.filter(job_name.eq(name))).execute(conn)?;
    Ok(removed == 1)
}

pub fn list_locks(conn: &mut SqliteConnection) -> Result<Vec<JobLock>, diesel::result::Error> {
    use crate::schema::job_locks::dsl::*;
    job_locks.order(job_name.asc()).load::<JobLock>(conn)
}
