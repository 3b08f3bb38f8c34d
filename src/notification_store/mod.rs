mod schema;
mod sqlite_notification_store;

pub use schema::NOTIFICATION_VERSIONED_SCHEMAS;
pub use sqlite_notification_store::SqliteNotificationStore;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::notifications::{
    AccountId, ActivityRef, Notification, NotificationId, NotificationRangeQuery, StatusFetcher,
};

/// Persistent notification records.
///
/// Also serves as the range query and status lookup backend of the feed.
pub trait NotificationStore: NotificationRangeQuery + StatusFetcher {
    /// Records a notification for `recipient` created now, without a group key.
    fn create_notification(&self, recipient: AccountId, activity: &ActivityRef)
        -> Result<Notification>;

    fn create_notification_at(
        &self,
        recipient: AccountId,
        activity: &ActivityRef,
        created_at: DateTime<Utc>,
        group_key: Option<&str>,
    ) -> Result<Notification>;

    /// Records a notification created now, keyed for grouping when its type
    /// is groupable.
    fn create_grouped_notification(
        &self,
        recipient: AccountId,
        activity: &ActivityRef,
    ) -> Result<Notification>;

    fn get_notification(&self, id: NotificationId) -> Result<Option<Notification>>;

    /// Marks a notification read, once. Returns None when `id` doesn't exist
    /// or belongs to another account.
    fn mark_notification_read(
        &self,
        id: NotificationId,
        recipient: AccountId,
    ) -> Result<Option<Notification>>;

    fn get_unread_count(&self, recipient: AccountId) -> Result<usize>;

    /// Returns false when no notification has this id.
    fn set_group_key(&self, id: NotificationId, group_key: Option<&str>) -> Result<bool>;

    /// Deletes notifications created before `cutoff`. Returns the number deleted.
    fn delete_notifications_before(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}
