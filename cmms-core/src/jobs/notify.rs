use chrono::NaiveDateTime;
use diesel::sqlite::SqliteConnection;

use crate::error::{Error, Result};
use crate::models::{NewNotification, NotificationKind};
use crate::orm::notification::insert_notification_if_absent;

/// One message for one recipient. `at` decides the notification day used
/// for de-duplication.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub company_id: i32,
    pub recipient_id: i32,
    pub kind: NotificationKind,
    pub subject_id: i32,
    pub payload: serde_json::Value,
    pub at: NaiveDateTime,
}

/// Delivery seam for job notifications. Returns `Ok(true)` when a new
/// notification was recorded and `Ok(false)` when the same one was already
/// sent today. Jobs log errors and move on; nothing is retried.
pub trait Notifier {
    fn notify(&mut self, conn: &mut SqliteConnection, request: &NotificationRequest) -> Result<bool>;
}

/// Stores notifications in the `notifications` table, where the in-app
/// inbox and the mail relay pick them up.
#[derive(Debug, Default)]
pub struct DatabaseNotifier;

impl Notifier for DatabaseNotifier {
    fn notify(&mut self, conn: &mut SqliteConnection, request: &NotificationRequest) -> Result<bool> {
        let row = NewNotification {
            company_id: request.company_id,
            recipient_id: request.recipient_id,
            kind: request.kind.as_str().to_string(),
            subject_id: request.subject_id,
            payload: serde_json::to_string(&request.payload)?,
            notified_on: request.at.date(),
            created_at: request.at,
        };
        insert_notification_if_absent(conn, &row).map_err(|e| Error::Notification(e.to_string()))
    }
}
