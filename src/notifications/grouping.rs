//! Group identity and group key derivation.

use chrono::{DateTime, Utc};

use super::models::{Notification, NotificationId, NotificationType, StatusId};

/// Default span, in hours, of the time bucket used by [`group_key_for`].
pub const DEFAULT_GROUP_SPAN_HOURS: u64 = 12;

/// Largest bucket span, one year. Longer spans are treated as this one.
pub const MAX_GROUP_SPAN_HOURS: u64 = 24 * 365;

/// The group a notification belongs to for pagination.
///
/// Notifications without a group key are singleton groups, so an
/// `Ungrouped` identity never equals a `Keyed` one nor another
/// notification's `Ungrouped` identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupIdentity {
    Keyed(String),
    Ungrouped(NotificationId),
}

impl Notification {
    pub fn group_identity(&self) -> GroupIdentity {
        match &self.group_key {
            Some(key) => GroupIdentity::Keyed(key.clone()),
            None => GroupIdentity::Ungrouped(self.id),
        }
    }
}

/// Whether notifications of this type collapse into groups.
pub fn is_groupable(notification_type: NotificationType) -> bool {
    matches!(
        notification_type,
        NotificationType::Favourite | NotificationType::Reblog | NotificationType::Follow
    )
}

/// Derives the group key for a new notification.
///
/// Favourites and reblogs group per target status, follows group together;
/// in all cases only within the same `span_hours` time bucket, clamped to
/// `1..=MAX_GROUP_SPAN_HOURS`. Other types get no key.
pub fn group_key_for(
    notification_type: NotificationType,
    target_status_id: Option<StatusId>,
    created_at: DateTime<Utc>,
    span_hours: u64,
) -> Option<String> {
    if !is_groupable(notification_type) {
        return None;
    }
    let span_hours = span_hours.clamp(1, MAX_GROUP_SPAN_HOURS);
    let span_secs = i64::try_from(span_hours * 3600).unwrap_or(i64::MAX);
    let bucket = created_at.timestamp().div_euclid(span_secs);
    match (notification_type, target_status_id) {
        (NotificationType::Follow, _) => Some(format!("follow-{}", bucket)),
        (_, Some(status_id)) => Some(format!(
            "{}-{}-{}",
            notification_type.as_str(),
            status_id,
            bucket
        )),
        (_, None) => None,
    }
}
