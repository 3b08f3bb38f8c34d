//! Grouped cursor pagination.
//!
//! A page holds at most one notification per group: the newest member of
//! each group within the cursor bounds when paging by `max_id`, the oldest
//! when paging by `min_id`. Notifications without a group key each form
//! their own group.
//!
//! When the store can answer a "distinct on group" query the page comes
//! from that single query. Otherwise rows are scanned in windows that
//! start at `max(initial_window, 2 * limit)` and grow geometrically up to
//! `max_window`, with the cursor moving past every row already seen. A page
//! therefore reads each row between the two cursors at most once, using
//! at most `log_g(max_window / first_window) + rows / max_window + 1` range
//! queries, where `g` is the growth factor.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::error::NotificationError;
use super::grouping::GroupIdentity;
use super::models::{AccountId, Notification, NotificationId};
use super::trait_def::{NotificationRangeQuery, RangeQuery, SortOrder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationSettings {
    /// Minimum size of the first scan window.
    pub initial_window: usize,
    /// Multiplier applied to the window after each full window.
    pub window_growth_factor: usize,
    /// Upper bound of the scan window.
    pub max_window: usize,
    /// Requests for larger pages are clamped to this.
    pub max_limit: usize,
    /// Ask the store for group heads before falling back to scanning.
    pub use_store_grouping: bool,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            initial_window: 40,
            window_growth_factor: 2,
            max_window: 1000,
            max_limit: 80,
            use_store_grouping: true,
        }
    }
}

impl PaginationSettings {
    fn first_window(&self, limit: usize) -> usize {
        self.initial_window
            .max(limit.saturating_mul(2))
            .min(self.max_window)
            .max(1)
    }

    fn next_window(&self, window: usize) -> usize {
        window
            .saturating_mul(self.window_growth_factor)
            .min(self.max_window)
            .max(1)
    }
}

/// Pages over the notifications of one account.
pub struct GroupedCursorPaginator<'a> {
    store: &'a dyn NotificationRangeQuery,
    scope: AccountId,
    exclude_suspended_senders: bool,
    settings: PaginationSettings,
}

impl<'a> GroupedCursorPaginator<'a> {
    /// Creates a paginator that skips notifications from suspended senders.
    pub fn new(store: &'a dyn NotificationRangeQuery, scope: AccountId) -> Self {
        Self {
            store,
            scope,
            exclude_suspended_senders: true,
            settings: PaginationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: PaginationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn include_suspended_senders(mut self, include: bool) -> Self {
        self.exclude_suspended_senders = !include;
        self
    }

    /// Newest-first page of notifications with `since_id < id < max_id`.
    pub fn paginate_groups_by_max_id(
        &self,
        limit: usize,
        since_id: Option<NotificationId>,
        max_id: Option<NotificationId>,
    ) -> Result<Vec<Notification>, NotificationError> {
        self.paginate(limit, SortOrder::Descending, since_id, max_id)
    }

    /// Oldest-first page of notifications with `min_id < id < max_id`.
    pub fn paginate_groups_by_min_id(
        &self,
        limit: usize,
        max_id: Option<NotificationId>,
        min_id: Option<NotificationId>,
    ) -> Result<Vec<Notification>, NotificationError> {
        self.paginate(limit, SortOrder::Ascending, min_id, max_id)
    }

    fn paginate(
        &self,
        limit: usize,
        order: SortOrder,
        lower_bound: Option<NotificationId>,
        upper_bound: Option<NotificationId>,
    ) -> Result<Vec<Notification>, NotificationError> {
        if limit == 0 {
            return Err(NotificationError::InvalidArgument(
                "limit must be greater than zero".to_string(),
            ));
        }
        let max_limit = self.settings.max_limit.max(1);
        if limit > max_limit {
            warn!(
                "Requested limit {} exceeds max_limit {}, returning at most {}",
                limit, max_limit, max_limit
            );
        }
        let limit = limit.min(max_limit);
        debug!(
            "Grouped page for account {}: limit {}, {:?}, after {:?}, before {:?}",
            self.scope, limit, order, lower_bound, upper_bound
        );

        let query = RangeQuery {
            scope: self.scope,
            lower_bound,
            upper_bound,
            exclude_suspended_senders: self.exclude_suspended_senders,
            order,
            limit,
        };

        if self.settings.use_store_grouping {
            if let Some(page) = self.store.query_group_heads(&query)? {
                debug!(
                    "Store-side grouped page for account {}: {} notification(s)",
                    self.scope,
                    page.len()
                );
                return Ok(page);
            }
        }

        self.scan(query)
    }

    fn scan(&self, mut query: RangeQuery) -> Result<Vec<Notification>, NotificationError> {
        let limit = query.limit;
        let mut page = Vec::with_capacity(limit);
        let mut emitted_groups: HashSet<GroupIdentity> = HashSet::new();
        let mut window = self.settings.first_window(limit);
        let mut rows_examined = 0usize;
        let mut queries = 0usize;

        'scan: loop {
            query.limit = window;
            let rows = self.store.query_range(&query)?;
            queries += 1;
            let exhausted = rows.len() < window;

            for notification in rows {
                rows_examined += 1;
                match query.order {
                    SortOrder::Descending => query.upper_bound = Some(notification.id),
                    SortOrder::Ascending => query.lower_bound = Some(notification.id),
                }
                if emitted_groups.insert(notification.group_identity()) {
                    page.push(notification);
                    if page.len() == limit {
                        break 'scan;
                    }
                }
            }

            if exhausted {
                break;
            }
            window = self.settings.next_window(window);
        }

        debug!(
            "Grouped scan for account {}: {} notification(s) from {} row(s) in {} quer{}",
            self.scope,
            page.len(),
            rows_examined,
            queries,
            if queries == 1 { "y" } else { "ies" }
        );
        Ok(page)
    }
}


#[cfg(all(test, feature = "mock"))]
mod mock_tests {
    use super::*;
    use crate::notifications::trait_def::MockNotificationRangeQuery;

    #[test]
    fn test_store_grouping_skips_scanning() {
        let mut store = MockNotificationRangeQuery::new();
        store
            .expect_query_group_heads()
            .withf(|q| q.order == SortOrder::Ascending && q.limit == 5)
            .times(1)
            .returning(|_| Ok(Some(Vec::new())));
        store.expect_query_range().times(0);

        let paginator = GroupedCursorPaginator::new(&store, AccountId(1));
        let page = paginator.paginate_groups_by_min_id(5, None, None).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn test_falls_back_to_scanning_when_store_cannot_group() {
        let mut store = MockNotificationRangeQuery::new();
        store
            .expect_query_group_heads()
            .times(1)
            .returning(|_| Ok(None));
        store
            .expect_query_range()
            .withf(|q| q.order == SortOrder::Descending && q.limit == 40)
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let paginator = GroupedCursorPaginator::new(&store, AccountId(1));
        let page = paginator.paginate_groups_by_max_id(3, None, None).unwrap();
        assert!(page.is_empty());
    }
}
