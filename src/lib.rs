//! Notification Feed Library
//!
//! Per-account notifications with grouped cursor pagination and batched
//! target status preloading, backed by SQLite.

pub mod config;
pub mod notification_store;
pub mod notifications;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use notification_store::{NotificationStore, SqliteNotificationStore};
pub use notifications::{
    classify, preload, resolve_status, GroupedCursorPaginator, Notification, NotificationError,
    NotificationType, PaginationSettings,
};
