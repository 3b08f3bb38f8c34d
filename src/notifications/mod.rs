//! Per-account notifications.
//!
//! Covers type resolution, target status lookup with a per-notification
//! cache, batch preloading of target statuses and grouped cursor pagination.

mod error;
mod grouping;
mod models;
mod paginator;
mod preloader;
mod target_status;
mod trait_def;
mod type_resolver;

pub use error::NotificationError;
pub use grouping::{
    group_key_for, is_groupable, GroupIdentity, DEFAULT_GROUP_SPAN_HOURS, MAX_GROUP_SPAN_HOURS,
};
pub use models::{
    Account, AccountId, ActivityKind, ActivityRef, Notification, NotificationId,
    NotificationType, Status, StatusId, StatusRef,
};
pub use paginator::{GroupedCursorPaginator, PaginationSettings};
pub use preloader::preload;
pub use target_status::resolve_status;
pub use trait_def::{NotificationRangeQuery, RangeQuery, SortOrder, StatusFetcher};
#[cfg(feature = "mock")]
pub use trait_def::{MockNotificationRangeQuery, MockStatusFetcher};
pub use type_resolver::{acting_account, classify};
