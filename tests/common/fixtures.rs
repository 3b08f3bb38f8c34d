//! Test fixture creation

use super::constants::*;
use anyhow::Result;
use chrono::Utc;
use notification_feed::notifications::{
    AccountId, GroupedCursorPaginator, Notification, NotificationId, Status, StatusFetcher,
    StatusId,
};
use notification_feed::{NotificationStore, SqliteNotificationStore};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use tempfile::TempDir;

/// A notification database in a temporary directory with three accounts.
pub struct TestFeed {
    pub store: SqliteNotificationStore,
    pub recipient: AccountId,
    pub sender: AccountId,
    pub other_sender: AccountId,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestFeed {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteNotificationStore::new(temp_dir.path().join("notifications.db")).unwrap();
        let recipient = store.create_account(RECIPIENT_USERNAME).unwrap();
        let sender = store.create_account(SENDER_USERNAME).unwrap();
        let other_sender = store.create_account(OTHER_SENDER_USERNAME).unwrap();
        Self {
            store,
            recipient,
            sender,
            other_sender,
            _temp_dir: temp_dir,
        }
    }

    /// Eight follow notifications for the recipient, keyed by
    /// [`GROUP_FIXTURE_KEYS`]. The 5th notification comes from `other_sender`,
    /// all the others from `sender`.
    pub fn with_group_fixture() -> Self {
        let feed = Self::new();
        let from_sender = feed.store.create_follow(feed.sender, feed.recipient).unwrap();
        let from_other = feed
            .store
            .create_follow(feed.other_sender, feed.recipient)
            .unwrap();
        for (i, key) in GROUP_FIXTURE_KEYS.iter().enumerate() {
            let activity = if i == 4 { &from_other } else { &from_sender };
            let notification = feed
                .store
                .create_notification_at(feed.recipient, activity, Utc::now(), *key)
                .unwrap();
            assert_eq!(notification.id, NotificationId(i as i64 + 1));
        }
        feed
    }

    pub fn paginator(&self) -> GroupedCursorPaginator<'_> {
        GroupedCursorPaginator::new(&self.store, self.recipient)
    }
}

/// Delegates to a status fetcher and records every batch requested.
pub struct CountingFetcher<'a> {
    inner: &'a dyn StatusFetcher,
    pub batches: Mutex<Vec<BTreeSet<StatusId>>>,
}

#[allow(dead_code)]
impl<'a> CountingFetcher<'a> {
    pub fn new(inner: &'a dyn StatusFetcher) -> Self {
        Self {
            inner,
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    pub fn last_batch(&self) -> Option<BTreeSet<StatusId>> {
        self.batches.lock().unwrap().last().cloned()
    }
}

impl StatusFetcher for CountingFetcher<'_> {
    fn fetch_by_ids(&self, ids: &BTreeSet<StatusId>) -> Result<HashMap<StatusId, Status>> {
        self.batches.lock().unwrap().push(ids.clone());
        self.inner.fetch_by_ids(ids)
    }
}

#[allow(dead_code)]
pub fn ids(notifications: &[Notification]) -> Vec<i64> {
    notifications.iter().map(|n| n.id.0).collect()
}
