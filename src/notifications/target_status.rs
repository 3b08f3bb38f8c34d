//! Target status resolution and the per-notification cache slot.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use super::error::NotificationError;
use super::models::{ActivityRef, Notification, Status, StatusId};
use super::trait_def::StatusFetcher;

/// Returns the id of the status a client should render for `activity`.
pub fn resolve_status(activity: &ActivityRef) -> Option<StatusId> {
    match activity {
        ActivityRef::Status {
            reblog_of: Some(original),
            ..
        } => Some(original.id),
        ActivityRef::Status {
            status,
            reblog_of: None,
        } => Some(status.id),
        ActivityRef::Mention { status, .. }
        | ActivityRef::Favourite { status, .. }
        | ActivityRef::Poll { status, .. } => Some(status.id),
        ActivityRef::Follow { .. }
        | ActivityRef::FollowRequest { .. }
        | ActivityRef::Report { .. }
        | ActivityRef::AccountWarning { .. }
        | ActivityRef::DirectAccount { .. } => None,
    }
}

impl Notification {
    pub fn target_status_id(&self) -> Option<StatusId> {
        resolve_status(self.activity())
    }

    /// Reads the cache slot without doing any I/O.
    ///
    /// `None` when nothing has been resolved yet, `Some(None)` when the
    /// notification resolved to no status.
    pub fn cached_target_status(&self) -> Option<Option<&Arc<Status>>> {
        self.target_status.get().map(Option::as_ref)
    }

    /// Returns the target status, fetching it on first access.
    pub fn target_status(
        &self,
        fetcher: &dyn StatusFetcher,
    ) -> Result<Option<Arc<Status>>, NotificationError> {
        if let Some(cached) = self.target_status.get() {
            return Ok(cached.clone());
        }

        let resolved = match self.target_status_id() {
            Some(status_id) => {
                debug!(
                    "Fetching target status {} for notification {}",
                    status_id, self.id
                );
                let mut statuses = fetcher.fetch_by_ids(&BTreeSet::from([status_id]))?;
                statuses.remove(&status_id).map(Arc::new)
            }
            None => None,
        };

        Ok(self.cache_target_status(resolved).clone())
    }

    /// Stores `resolved` unless a value is already cached, and returns
    /// whichever value ends up in the slot.
    pub(super) fn cache_target_status(&self, resolved: Option<Arc<Status>>) -> &Option<Arc<Status>> {
        self.target_status.get_or_init(|| resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::models::{Account, AccountId, NotificationId, StatusRef};
    use anyhow::Result;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct CountingFetcher {
        statuses: HashMap<StatusId, Status>,
        calls: Mutex<Vec<BTreeSet<StatusId>>>,
    }

    impl CountingFetcher {
        fn with_statuses(ids: &[i64]) -> Self {
            let statuses = ids
                .iter()
                .map(|id| {
                    let status = Status {
                        id: StatusId(*id),
                        account: Account {
                            id: AccountId(100 + id),
                            username: format!("author{}", id),
                            suspended: false,
                        },
                        text: format!("status {}", id),
                        reblog_of_id: None,
                        created_at: Utc::now(),
                    };
                    (status.id, status)
                })
                .collect();
            Self {
                statuses,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl StatusFetcher for CountingFetcher {
        fn fetch_by_ids(&self, ids: &BTreeSet<StatusId>) -> Result<HashMap<StatusId, Status>> {
            self.calls.lock().unwrap().push(ids.clone());
            Ok(ids
                .iter()
                .filter_map(|id| self.statuses.get(id).map(|s| (*id, s.clone())))
                .collect())
        }
    }

    fn status_ref(id: i64) -> StatusRef {
        StatusRef {
            id: StatusId(id),
            account_id: AccountId(100 + id),
        }
    }

    fn notification(activity: ActivityRef) -> Notification {
        Notification::new(NotificationId(1), AccountId(1), activity, None, Utc::now())
    }

    #[test]
    fn test_resolve_status_per_case() {
        assert_eq!(
            resolve_status(&ActivityRef::Status {
                status: status_ref(2),
                reblog_of: Some(status_ref(1)),
            }),
            Some(StatusId(1))
        );
        assert_eq!(
            resolve_status(&ActivityRef::Status {
                status: status_ref(2),
                reblog_of: None,
            }),
            Some(StatusId(2))
        );
        assert_eq!(
            resolve_status(&ActivityRef::Mention {
                id: 1,
                status: status_ref(3)
            }),
            Some(StatusId(3))
        );
        assert_eq!(
            resolve_status(&ActivityRef::Favourite {
                id: 1,
                account_id: AccountId(77),
                status: status_ref(4)
            }),
            Some(StatusId(4))
        );
        assert_eq!(
            resolve_status(&ActivityRef::Poll {
                id: 1,
                status: status_ref(5)
            }),
            Some(StatusId(5))
        );
        assert_eq!(
            resolve_status(&ActivityRef::Follow {
                id: 1,
                account_id: AccountId(1)
            }),
            None
        );
        assert_eq!(
            resolve_status(&ActivityRef::AccountWarning {
                id: 1,
                target_account_id: AccountId(1)
            }),
            None
        );
    }

    #[test]
    fn test_lazy_target_status_fetches_once() {
        let fetcher = CountingFetcher::with_statuses(&[3]);
        let notification = notification(ActivityRef::Mention {
            id: 1,
            status: status_ref(3),
        });
        assert!(notification.cached_target_status().is_none());

        let first = notification.target_status(&fetcher).unwrap().unwrap();
        let second = notification.target_status(&fetcher).unwrap().unwrap();

        assert_eq!(first.id, StatusId(3));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fetcher.call_count(), 1);
    }

    #[test]
    fn test_lazy_target_status_without_target_skips_fetch() {
        let fetcher = CountingFetcher::with_statuses(&[]);
        let notification = notification(ActivityRef::Follow {
            id: 1,
            account_id: AccountId(8),
        });

        assert!(notification.target_status(&fetcher).unwrap().is_none());
        assert_eq!(notification.cached_target_status(), Some(None));
        assert_eq!(fetcher.call_count(), 0);
    }

    #[test]
    fn test_missing_status_caches_none() {
        let fetcher = CountingFetcher::with_statuses(&[]);
        let notification = notification(ActivityRef::Favourite {
            id: 1,
            account_id: AccountId(77),
            status: status_ref(9),
        });

        assert!(notification.target_status(&fetcher).unwrap().is_none());
        assert!(notification.target_status(&fetcher).unwrap().is_none());
        assert_eq!(fetcher.call_count(), 1);
    }

    #[test]
    fn test_cache_slot_keeps_first_value() {
        let notification = notification(ActivityRef::Poll {
            id: 1,
            status: status_ref(5),
        });
        notification.cache_target_status(None);
        let fetcher = CountingFetcher::with_statuses(&[5]);

        assert!(notification.target_status(&fetcher).unwrap().is_none());
        assert_eq!(fetcher.call_count(), 0);
    }
}
