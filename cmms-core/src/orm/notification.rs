use chrono::NaiveDate;
use diesel::dsl::exists;
use diesel::prelude::*;

use crate::models::{NewNotification, Notification, NotificationKind};

/// Records a notification unless one with the same kind, subject,
/// recipient and day already exists. Returns true when a row was written.
pub fn insert_notification_if_absent(
    conn: &mut SqliteConnection,
    new_notification: &NewNotification,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::notifications::dsl::*;

    let inserted = diesel::insert_or_ignore_into(notifications)
        .values(new_notification)
        .execute(conn)?;
    Ok(inserted == 1)
}

pub fn notification_exists(
    conn: &mut SqliteConnection,
    kind_val: NotificationKind,
    subject: i32,
    recipient: i32,
    day: NaiveDate,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::notifications::dsl::*;

    diesel::select(exists(
        notifications
            .filter(kind.eq(kind_val.as_str()))
            .filter(subject_id.eq(subject))
            .filter(recipient_id.eq(recipient))
            .filter(notified_on.eq(day)),
    ))
    .get_result(conn)
}

/// A user's notifications, newest first.
pub fn get_notifications_for_recipient(
    conn: &mut SqliteConnection,
    recipient: i32,
) -> Result<Vec<Notification>, diesel::result::Error> {
    use crate::schema::notifications::dsl::*;
    notifications
        .filter(recipient_id.eq(recipient))
        .order(id.desc())
        .load::<Notification>(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::*;
    use crate::policy::Role;

    #[test]
    fn test_duplicate_same_day_is_ignored() {
        let mut conn = setup_test_db();
        let company = create_company(&mut conn, "Acme");
        let manager = create_user(&mut conn, company.id, Role::Manager, "m@acme.test");

        let mut row = NewNotification {
            company_id: company.id,
            recipient_id: manager.id,
            kind: NotificationKind::PreventiveTaskOverdue.as_str().to_string(),
            subject_id: 42,
            payload: "{}".to_string(),
            notified_on: date(2025, 3, 1),
            created_at: at(2025, 3, 1, 6),
        };

        assert!(insert_notification_if_absent(&mut conn, &row).unwrap());
        assert!(!insert_notification_if_absent(&mut conn, &row).unwrap());
        assert!(notification_exists(
            &mut conn,
            NotificationKind::PreventiveTaskOverdue,
            42,
            manager.id,
            date(2025, 3, 1)
        )
        .unwrap());

        row.notified_on = date(2025, 3, 2);
        assert!(insert_notification_if_absent(&mut conn, &row).unwrap());
        assert_eq!(get_notifications_for_recipient(&mut conn, manager.id).unwrap().len(), 2);
    }
}
