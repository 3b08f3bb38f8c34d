//! Storage collaborators consumed by the paginator and the preloader.

use anyhow::Result;
use std::collections::{BTreeSet, HashMap};

use super::models::{AccountId, Notification, NotificationId, Status, StatusId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// A window over one account's notifications.
///
/// Both bounds are exclusive. `limit` caps the number of rows returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    pub scope: AccountId,
    pub lower_bound: Option<NotificationId>,
    pub upper_bound: Option<NotificationId>,
    pub exclude_suspended_senders: bool,
    pub order: SortOrder,
    pub limit: usize,
}

impl RangeQuery {
    /// Whether `id` lies strictly between the bounds.
    pub fn contains(&self, id: NotificationId) -> bool {
        self.lower_bound.map_or(true, |lower| id > lower)
            && self.upper_bound.map_or(true, |upper| id < upper)
    }
}

/// Ordered range queries over notifications.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait NotificationRangeQuery: Send + Sync {
    /// Returns up to `query.limit` notifications of `query.scope` inside the
    /// bounds, sorted by id in `query.order`.
    fn query_range(&self, query: &RangeQuery) -> Result<Vec<Notification>>;

    /// Store-side "distinct on group identity" query.
    ///
    /// Returns, in `query.order`, the first member of each group found inside
    /// the bounds, at most `query.limit` of them. Ok(None) means the store
    /// can't answer this and callers must scan with [`query_range`].
    ///
    /// [`query_range`]: NotificationRangeQuery::query_range
    fn query_group_heads(&self, _query: &RangeQuery) -> Result<Option<Vec<Notification>>> {
        Ok(None)
    }
}

/// Batched status lookup.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait StatusFetcher: Send + Sync {
    /// Returns the statuses found among `ids`, each with its author attached.
    /// Ids that no longer exist are simply missing from the result.
    fn fetch_by_ids(&self, ids: &BTreeSet<StatusId>) -> Result<HashMap<StatusId, Status>>;
}
