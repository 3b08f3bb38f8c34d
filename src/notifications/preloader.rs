//! Batched target status preloading.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::debug;

use super::error::NotificationError;
use super::models::{ActivityKind, Notification, StatusId};
use super::target_status::resolve_status;
use super::trait_def::StatusFetcher;

/// Resolves and caches the target status of every notification in
/// `notifications` with a single call to `fetcher`.
///
/// Notifications that already hold a cached value are left untouched; when
/// none of them needs a status the fetcher isn't called at all. Statuses
/// missing from the fetch result are cached as "no status". If the fetch
/// fails nothing is cached.
///
/// Returns `notifications` so calls can be chained.
pub fn preload<'a>(
    notifications: &'a [Notification],
    fetcher: &dyn StatusFetcher,
) -> Result<&'a [Notification], NotificationError> {
    // Pending notifications bucketed by activity kind; every kind that
    // points at a status shares the one fetch below.
    let mut with_target: BTreeMap<ActivityKind, Vec<(&Notification, StatusId)>> = BTreeMap::new();
    let mut without_target: Vec<&Notification> = Vec::new();

    for notification in notifications {
        if notification.cached_target_status().is_some() {
            continue;
        }
        match resolve_status(notification.activity()) {
            Some(status_id) => with_target
                .entry(notification.activity().kind())
                .or_default()
                .push((notification, status_id)),
            None => without_target.push(notification),
        }
    }

    let status_ids: BTreeSet<StatusId> = with_target
        .values()
        .flatten()
        .map(|(_, status_id)| *status_id)
        .collect();

    let mut statuses = if status_ids.is_empty() {
        Default::default()
    } else {
        for (kind, pending) in &with_target {
            debug!("Preloading {} {} notification(s)", pending.len(), kind.as_str());
        }
        fetcher.fetch_by_ids(&status_ids)?
    };

    debug!(
        "Fetched {} of {} target status(es), {} notification(s) without target",
        statuses.len(),
        status_ids.len(),
        without_target.len()
    );

    let resolved: BTreeMap<StatusId, Arc<_>> = status_ids
        .iter()
        .filter_map(|id| statuses.remove(id).map(|status| (*id, Arc::new(status))))
        .collect();

    for (notification, status_id) in with_target.values().flatten() {
        notification.cache_target_status(resolved.get(status_id).cloned());
    }
    for notification in without_target {
        notification.cache_target_status(None);
    }

    Ok(notifications)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::models::{Account, AccountId, ActivityRef, NotificationId, Status, StatusRef};
    use anyhow::{anyhow, Result};
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Fetcher over a fixed set of statuses that records every call.
    struct RecordingFetcher {
        statuses: HashMap<StatusId, Status>,
        calls: Mutex<Vec<BTreeSet<StatusId>>>,
        fail: bool,
    }

    impl RecordingFetcher {
        fn new(ids: &[i64]) -> Self {
            let statuses = ids
                .iter()
                .map(|id| {
                    (
                        StatusId(*id),
                        Status {
                            id: StatusId(*id),
                            account: Account {
                                id: AccountId(*id * 10),
                                username: format!("user{}", id),
                                suspended: false,
                            },
                            text: String::new(),
                            reblog_of_id: None,
                            created_at: Utc::now(),
                        },
                    )
                })
                .collect();
            Self {
                statuses,
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(&[])
            }
        }

        fn calls(&self) -> Vec<BTreeSet<StatusId>> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl StatusFetcher for RecordingFetcher {
        fn fetch_by_ids(&self, ids: &BTreeSet<StatusId>) -> Result<HashMap<StatusId, Status>> {
            self.calls.lock().unwrap().push(ids.clone());
            if self.fail {
                return Err(anyhow!("database is locked"));
            }
            Ok(ids
                .iter()
                .filter_map(|id| self.statuses.get(id).map(|s| (*id, s.clone())))
                .collect())
        }
    }

    fn status_ref(id: i64) -> StatusRef {
        StatusRef {
            id: StatusId(id),
            account_id: AccountId(id * 10),
        }
    }

    fn notifications(activities: Vec<ActivityRef>) -> Vec<Notification> {
        activities
            .into_iter()
            .enumerate()
            .map(|(i, activity)| {
                Notification::new(NotificationId(i as i64 + 1), AccountId(1), activity, None, Utc::now())
            })
            .collect()
    }

    fn mixed_activities() -> Vec<ActivityRef> {
        vec![
            ActivityRef::Mention {
                id: 1,
                status: status_ref(1),
            },
            ActivityRef::Status {
                status: status_ref(2),
                reblog_of: None,
            },
            ActivityRef::Status {
                status: status_ref(4),
                reblog_of: Some(status_ref(3)),
            },
            ActivityRef::Follow {
                id: 1,
                account_id: AccountId(5),
            },
            ActivityRef::FollowRequest {
                id: 1,
                account_id: AccountId(6),
            },
            ActivityRef::Favourite {
                id: 1,
                account_id: AccountId(77),
                status: status_ref(1),
            },
            ActivityRef::Poll {
                id: 1,
                status: status_ref(5),
            },
        ]
    }

    fn cached_id(notification: &Notification) -> Option<StatusId> {
        notification
            .cached_target_status()
            .expect("target status should be cached")
            .map(|status| status.id)
    }

    #[test]
    fn test_preload_resolves_every_kind_with_one_fetch() {
        let fetcher = RecordingFetcher::new(&[1, 2, 3, 5]);
        let notifications = notifications(mixed_activities());

        let result = preload(&notifications, &fetcher).unwrap();

        assert_eq!(result.len(), 7);
        assert_eq!(cached_id(&result[0]), Some(StatusId(1)));
        assert_eq!(cached_id(&result[1]), Some(StatusId(2)));
        assert_eq!(cached_id(&result[2]), Some(StatusId(3)));
        assert_eq!(cached_id(&result[3]), None);
        assert_eq!(cached_id(&result[4]), None);
        assert_eq!(cached_id(&result[5]), Some(StatusId(1)));
        assert_eq!(cached_id(&result[6]), Some(StatusId(5)));

        let author = result[2].cached_target_status().unwrap().unwrap();
        assert_eq!(author.account.id, AccountId(30));

        let calls = fetcher.calls();
        assert_eq!(calls.len(), 1);
        // Mention and favourite share status 1; the fetch sees it once.
        assert_eq!(
            calls[0],
            BTreeSet::from([StatusId(1), StatusId(2), StatusId(3), StatusId(5)])
        );
    }

    #[test]
    fn test_preload_caches_none_for_deleted_status() {
        let fetcher = RecordingFetcher::new(&[]);
        let notifications = notifications(vec![ActivityRef::Favourite {
            id: 1,
            account_id: AccountId(77),
            status: status_ref(8),
        }]);

        preload(&notifications, &fetcher).unwrap();

        assert_eq!(notifications[0].cached_target_status(), Some(None));
    }

    #[test]
    fn test_preload_is_idempotent() {
        let fetcher = RecordingFetcher::new(&[1, 2, 3, 5]);
        let notifications = notifications(mixed_activities());

        preload(&notifications, &fetcher).unwrap();
        let first: Vec<_> = notifications.iter().map(cached_id).collect();
        preload(&notifications, &fetcher).unwrap();
        let second: Vec<_> = notifications.iter().map(cached_id).collect();

        assert_eq!(first, second);
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[test]
    fn test_preload_without_targets_skips_fetch() {
        let fetcher = RecordingFetcher::new(&[]);
        let notifications = notifications(vec![
            ActivityRef::Follow {
                id: 1,
                account_id: AccountId(2),
            },
            ActivityRef::Report {
                id: 1,
                account_id: AccountId(3),
            },
        ]);

        preload(&notifications, &fetcher).unwrap();

        assert!(fetcher.calls().is_empty());
        assert!(notifications
            .iter()
            .all(|n| n.cached_target_status() == Some(None)));
    }

    #[test]
    fn test_preload_failure_caches_nothing() {
        let fetcher = RecordingFetcher::failing();
        let notifications = notifications(mixed_activities());

        let result = preload(&notifications, &fetcher);

        assert!(matches!(result, Err(NotificationError::StorageUnavailable(_))));
        assert!(notifications.iter().all(|n| n.cached_target_status().is_none()));
    }

    #[test]
    fn test_preload_empty_collection() {
        let fetcher = RecordingFetcher::new(&[]);
        let result = preload(&[], &fetcher).unwrap();
        assert!(result.is_empty());
        assert!(fetcher.calls().is_empty());
    }
}
