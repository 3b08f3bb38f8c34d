use super::schema::NOTIFICATION_VERSIONED_SCHEMAS;
use super::NotificationStore;
use crate::notifications::{
    classify, group_key_for, resolve_status, Account, AccountId, ActivityKind, ActivityRef,
    Notification, NotificationId, NotificationRangeQuery, RangeQuery, Status, StatusFetcher,
    StatusId, StatusRef, DEFAULT_GROUP_SPAN_HOURS, MAX_GROUP_SPAN_HOURS,
};
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, Params, Row};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Upper bound of ids bound into a single `IN (...)` list.
const MAX_IDS_PER_QUERY: usize = 500;

const NOTIFICATION_COLUMNS: &str = "
    n.id AS id,
    n.account_id AS account_id,
    n.from_account_id AS from_account_id,
    n.activity_type AS activity_type,
    n.activity_id AS activity_id,
    n.group_key AS group_key,
    n.created_at AS created_at,
    n.read_at AS read_at,
    s.account_id AS status_account_id,
    s.reblog_of_id AS reblog_of_id,
    rs.account_id AS reblog_account_id,
    ts.id AS target_status_id,
    ts.account_id AS target_status_account_id,
    COALESCE(fo.account_id, fr.account_id, f.account_id, aw.target_account_id) AS activity_account_id";

const NOTIFICATION_JOINS: &str = "
    FROM notifications n
    LEFT JOIN statuses s ON n.activity_type = 'Status' AND s.id = n.activity_id
    LEFT JOIN statuses rs ON rs.id = s.reblog_of_id
    LEFT JOIN mentions m ON n.activity_type = 'Mention' AND m.id = n.activity_id
    LEFT JOIN favourites f ON n.activity_type = 'Favourite' AND f.id = n.activity_id
    LEFT JOIN polls p ON n.activity_type = 'Poll' AND p.id = n.activity_id
    LEFT JOIN statuses ts ON ts.id = COALESCE(m.status_id, f.status_id, p.status_id)
    LEFT JOIN follows fo ON n.activity_type = 'Follow' AND fo.id = n.activity_id
    LEFT JOIN follow_requests fr ON n.activity_type = 'FollowRequest' AND fr.id = n.activity_id
    LEFT JOIN reports r ON n.activity_type = 'Report' AND r.id = n.activity_id
    LEFT JOIN account_warnings aw ON n.activity_type = 'AccountWarning' AND aw.id = n.activity_id
    LEFT JOIN accounts da ON n.activity_type = 'Account' AND da.id = n.activity_id
    LEFT JOIN accounts actor ON actor.id = CASE n.activity_type
        WHEN 'Favourite' THEN f.account_id
        WHEN 'Status' THEN s.account_id
        ELSE n.from_account_id
    END";

/// True when the activity row a notification points at still exists.
/// Unknown activity types pass so that they surface as errors when mapped.
const ACTIVITY_PRESENT: &str = "
    CASE n.activity_type
        WHEN 'Status' THEN s.id IS NOT NULL AND (s.reblog_of_id IS NULL OR rs.id IS NOT NULL)
        WHEN 'Mention' THEN m.id IS NOT NULL AND ts.id IS NOT NULL
        WHEN 'Favourite' THEN f.id IS NOT NULL AND ts.id IS NOT NULL
        WHEN 'Poll' THEN p.id IS NOT NULL AND ts.id IS NOT NULL
        WHEN 'Follow' THEN fo.id IS NOT NULL
        WHEN 'FollowRequest' THEN fr.id IS NOT NULL
        WHEN 'Report' THEN r.id IS NOT NULL
        WHEN 'AccountWarning' THEN aw.id IS NOT NULL
        WHEN 'Account' THEN da.id IS NOT NULL
        ELSE 1
    END";

/// Range filter; binds ?1 scope, ?2 lower bound, ?3 upper bound and
/// ?4 whether suspended senders are excluded. Suspension is checked on the
/// acting account (see [`crate::notifications::acting_account`]), which for
/// favourites and reblogs is not the stored `from_account_id`.
const RANGE_FILTER: &str = "
    WHERE n.account_id = ?1
        AND (?2 IS NULL OR n.id > ?2)
        AND (?3 IS NULL OR n.id < ?3)
        AND (?4 = 0 OR actor.suspended_at IS NULL)";

pub struct SqliteNotificationStore {
    conn: Arc<Mutex<Connection>>,
    group_span_hours: u64,
}

impl SqliteNotificationStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let is_new_db = !path.exists();

        let mut conn = Connection::open(path).context("Failed to open notification database")?;
        conn.execute("PRAGMA foreign_keys = ON;", [])?;

        let latest_schema = NOTIFICATION_VERSIONED_SCHEMAS
            .last()
            .context("No notification schema defined")?;

        if is_new_db {
            info!("Creating new notification database at {:?}", path);
            latest_schema.create(&conn)?;
        } else {
            let raw_version: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
            let db_version = raw_version - BASE_DB_VERSION as i64;

            if db_version < 1 {
                bail!(
                    "Notification database version {} is invalid (expected >= 1)",
                    db_version
                );
            }

            let schema = NOTIFICATION_VERSIONED_SCHEMAS
                .iter()
                .find(|s| s.version as i64 == db_version)
                .with_context(|| format!("Unknown notification database version {}", db_version))?;
            schema.validate(&conn).with_context(|| {
                format!(
                    "Notification database schema validation failed for version {}",
                    db_version
                )
            })?;

            if (db_version as usize) < latest_schema.version {
                info!(
                    "Migrating notification database from version {} to {}",
                    db_version, latest_schema.version
                );
                Self::migrate(&mut conn, db_version as usize)?;
            }
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            group_span_hours: DEFAULT_GROUP_SPAN_HOURS,
        })
    }

    /// Sets the time bucket span used by [`NotificationStore::create_grouped_notification`].
    pub fn with_group_span_hours(mut self, hours: u64) -> Self {
        self.group_span_hours = hours.clamp(1, MAX_GROUP_SPAN_HOURS);
        self
    }

    fn migrate(conn: &mut Connection, from_version: usize) -> Result<()> {
        let tx = conn.transaction()?;
        let mut latest = from_version;
        for schema in NOTIFICATION_VERSIONED_SCHEMAS
            .iter()
            .filter(|s| s.version > from_version)
        {
            debug!(
                "Running notification database migration from version {} to {}",
                latest, schema.version
            );
            if let Some(migration_fn) = schema.migration {
                migration_fn(&tx).with_context(|| {
                    format!("Failed to run migration to version {}", schema.version)
                })?;
            }
            latest = schema.version;
        }
        tx.execute(
            &format!("PRAGMA user_version = {}", BASE_DB_VERSION + latest),
            [],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Notification database lock poisoned"))
    }

    fn query_notifications<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Notification>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, NotificationRow::read)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(NotificationRow::into_notification).collect()
    }

    fn range_params(query: &RangeQuery) -> (i64, Option<i64>, Option<i64>, bool, i64) {
        (
            query.scope.0,
            query.lower_bound.map(|id| id.0),
            query.upper_bound.map(|id| id.0),
            query.exclude_suspended_senders,
            i64::try_from(query.limit).unwrap_or(i64::MAX),
        )
    }

    // =========================================================================
    // Accounts and activities
    // =========================================================================

    pub fn create_account(&self, username: &str) -> Result<AccountId> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO accounts (username) VALUES (?1)",
            params![username],
        )
        .with_context(|| format!("Failed to create account {}", username))?;
        Ok(AccountId(conn.last_insert_rowid()))
    }

    pub fn suspend_account(&self, account_id: AccountId) -> Result<bool> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE accounts SET suspended_at = ?1 WHERE id = ?2 AND suspended_at IS NULL",
            params![Utc::now().timestamp(), account_id.0],
        )?;
        if updated > 0 {
            info!("Suspended account {}", account_id);
        }
        Ok(updated > 0)
    }

    pub fn unsuspend_account(&self, account_id: AccountId) -> Result<bool> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE accounts SET suspended_at = NULL WHERE id = ?1 AND suspended_at IS NOT NULL",
            params![account_id.0],
        )?;
        Ok(updated > 0)
    }

    /// Deletes an account along with everything it authored or received.
    pub fn delete_account(&self, account_id: AccountId) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM accounts WHERE id = ?1", params![account_id.0])?;
        Ok(deleted > 0)
    }

    pub fn create_status(&self, author: AccountId, text: &str) -> Result<StatusRef> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO statuses (account_id, text, created_at) VALUES (?1, ?2, ?3)",
            params![author.0, text, Utc::now().timestamp()],
        )?;
        Ok(StatusRef {
            id: StatusId(conn.last_insert_rowid()),
            account_id: author,
        })
    }

    /// Reblogs `original` as `account`. The returned activity is the reblog status.
    pub fn create_reblog(&self, account: AccountId, original: StatusRef) -> Result<ActivityRef> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO statuses (account_id, text, reblog_of_id, created_at) VALUES (?1, '', ?2, ?3)",
            params![account.0, original.id.0, Utc::now().timestamp()],
        )?;
        Ok(ActivityRef::Status {
            status: StatusRef {
                id: StatusId(conn.last_insert_rowid()),
                account_id: account,
            },
            reblog_of: Some(original),
        })
    }

    pub fn delete_status(&self, status_id: StatusId) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM statuses WHERE id = ?1", params![status_id.0])?;
        Ok(deleted > 0)
    }

    pub fn create_mention(&self, status: StatusRef, mentioned: AccountId) -> Result<ActivityRef> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO mentions (status_id, account_id) VALUES (?1, ?2)",
            params![status.id.0, mentioned.0],
        )?;
        Ok(ActivityRef::Mention {
            id: conn.last_insert_rowid(),
            status,
        })
    }

    pub fn create_favourite(&self, account: AccountId, status: StatusRef) -> Result<ActivityRef> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO favourites (account_id, status_id) VALUES (?1, ?2)",
            params![account.0, status.id.0],
        )?;
        Ok(ActivityRef::Favourite {
            id: conn.last_insert_rowid(),
            account_id: account,
            status,
        })
    }

    pub fn delete_favourite(&self, favourite_id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM favourites WHERE id = ?1", params![favourite_id])?;
        Ok(deleted > 0)
    }

    pub fn create_follow(&self, follower: AccountId, target: AccountId) -> Result<ActivityRef> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO follows (account_id, target_account_id) VALUES (?1, ?2)",
            params![follower.0, target.0],
        )?;
        Ok(ActivityRef::Follow {
            id: conn.last_insert_rowid(),
            account_id: follower,
        })
    }

    pub fn create_follow_request(
        &self,
        requester: AccountId,
        target: AccountId,
    ) -> Result<ActivityRef> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO follow_requests (account_id, target_account_id) VALUES (?1, ?2)",
            params![requester.0, target.0],
        )?;
        Ok(ActivityRef::FollowRequest {
            id: conn.last_insert_rowid(),
            account_id: requester,
        })
    }

    pub fn create_poll(&self, status: StatusRef) -> Result<ActivityRef> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO polls (status_id) VALUES (?1)", params![status.id.0])?;
        Ok(ActivityRef::Poll {
            id: conn.last_insert_rowid(),
            status,
        })
    }

    pub fn create_report(&self, reporter: AccountId, target: AccountId) -> Result<ActivityRef> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO reports (account_id, target_account_id) VALUES (?1, ?2)",
            params![reporter.0, target.0],
        )?;
        Ok(ActivityRef::Report {
            id: conn.last_insert_rowid(),
            account_id: reporter,
        })
    }

    pub fn create_account_warning(&self, target: AccountId, text: &str) -> Result<ActivityRef> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO account_warnings (target_account_id, text) VALUES (?1, ?2)",
            params![target.0, text],
        )?;
        Ok(ActivityRef::AccountWarning {
            id: conn.last_insert_rowid(),
            target_account_id: target,
        })
    }
}

/// A joined notification row before it is turned into an [`ActivityRef`].
struct NotificationRow {
    id: i64,
    account_id: i64,
    from_account_id: i64,
    activity_type: String,
    activity_id: i64,
    group_key: Option<String>,
    created_at: i64,
    read_at: Option<i64>,
    status_account_id: Option<i64>,
    reblog_of_id: Option<i64>,
    reblog_account_id: Option<i64>,
    target_status_id: Option<i64>,
    target_status_account_id: Option<i64>,
    activity_account_id: Option<i64>,
}

impl NotificationRow {
    fn read(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            account_id: row.get("account_id")?,
            from_account_id: row.get("from_account_id")?,
            activity_type: row.get("activity_type")?,
            activity_id: row.get("activity_id")?,
            group_key: row.get("group_key")?,
            created_at: row.get("created_at")?,
            read_at: row.get("read_at")?,
            status_account_id: row.get("status_account_id")?,
            reblog_of_id: row.get("reblog_of_id")?,
            reblog_account_id: row.get("reblog_account_id")?,
            target_status_id: row.get("target_status_id")?,
            target_status_account_id: row.get("target_status_account_id")?,
            activity_account_id: row.get("activity_account_id")?,
        })
    }

    fn into_notification(self) -> Result<Notification> {
        let kind = ActivityKind::parse(&self.activity_type).ok_or_else(|| {
            anyhow!(
                "Notification {} has unknown activity type '{}'",
                self.id,
                self.activity_type
            )
        })?;
        let missing = |what: &str| {
            anyhow!(
                "Notification {} ({}) is missing its {}",
                self.id,
                self.activity_type,
                what
            )
        };
        let target_status = || -> Result<StatusRef> {
            Ok(StatusRef {
                id: StatusId(self.target_status_id.ok_or_else(|| missing("status"))?),
                account_id: AccountId(
                    self.target_status_account_id
                        .ok_or_else(|| missing("status author"))?,
                ),
            })
        };
        let activity_account =
            || -> Result<AccountId> { Ok(AccountId(self.activity_account_id.ok_or_else(|| missing("account"))?)) };

        let activity = match kind {
            ActivityKind::Status => ActivityRef::Status {
                status: StatusRef {
                    id: StatusId(self.activity_id),
                    account_id: AccountId(
                        self.status_account_id
                            .ok_or_else(|| missing("status author"))?,
                    ),
                },
                reblog_of: match self.reblog_of_id {
                    Some(original_id) => Some(StatusRef {
                        id: StatusId(original_id),
                        account_id: AccountId(
                            self.reblog_account_id
                                .ok_or_else(|| missing("reblogged status"))?,
                        ),
                    }),
                    None => None,
                },
            },
            ActivityKind::Mention => ActivityRef::Mention {
                id: self.activity_id,
                status: target_status()?,
            },
            ActivityKind::Favourite => ActivityRef::Favourite {
                id: self.activity_id,
                account_id: activity_account()?,
                status: target_status()?,
            },
            ActivityKind::Poll => ActivityRef::Poll {
                id: self.activity_id,
                status: target_status()?,
            },
            ActivityKind::Follow => ActivityRef::Follow {
                id: self.activity_id,
                account_id: activity_account()?,
            },
            ActivityKind::FollowRequest => ActivityRef::FollowRequest {
                id: self.activity_id,
                account_id: activity_account()?,
            },
            ActivityKind::Report => ActivityRef::Report {
                id: self.activity_id,
                account_id: AccountId(self.from_account_id),
            },
            ActivityKind::AccountWarning => ActivityRef::AccountWarning {
                id: self.activity_id,
                target_account_id: activity_account()?,
            },
            ActivityKind::Account => ActivityRef::DirectAccount {
                account_id: AccountId(self.activity_id),
            },
        };

        let read_at = self.read_at.map(timestamp).transpose()?;
        Ok(Notification::new(
            NotificationId(self.id),
            AccountId(self.account_id),
            activity,
            self.group_key.clone(),
            timestamp(self.created_at)?,
        )
        .with_read_at(read_at))
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).with_context(|| format!("Invalid timestamp {}", secs))
}

impl NotificationRangeQuery for SqliteNotificationStore {
    fn query_range(&self, query: &RangeQuery) -> Result<Vec<Notification>> {
        let sql = format!(
            "SELECT {} {} {} AND {} ORDER BY n.id {} LIMIT ?5",
            NOTIFICATION_COLUMNS,
            NOTIFICATION_JOINS,
            RANGE_FILTER,
            ACTIVITY_PRESENT,
            query.order.as_sql()
        );
        self.query_notifications(&sql, Self::range_params(query))
    }

    fn query_group_heads(&self, query: &RangeQuery) -> Result<Option<Vec<Notification>>> {
        // Ungrouped notifications are partitioned on their own id, and the
        // IS NULL term keeps a group key from colliding with an id.
        let sql = format!(
            "SELECT * FROM (
                SELECT {columns}, ROW_NUMBER() OVER (
                    PARTITION BY n.group_key IS NULL, COALESCE(n.group_key, n.id)
                    ORDER BY n.id {order}
                ) AS group_rank
                {joins} {filter} AND {present}
            )
            WHERE group_rank = 1
            ORDER BY id {order}
            LIMIT ?5",
            columns = NOTIFICATION_COLUMNS,
            joins = NOTIFICATION_JOINS,
            filter = RANGE_FILTER,
            present = ACTIVITY_PRESENT,
            order = query.order.as_sql()
        );
        self.query_notifications(&sql, Self::range_params(query))
            .map(Some)
    }
}

impl StatusFetcher for SqliteNotificationStore {
    fn fetch_by_ids(&self, ids: &BTreeSet<StatusId>) -> Result<HashMap<StatusId, Status>> {
        let mut statuses = HashMap::with_capacity(ids.len());
        if ids.is_empty() {
            return Ok(statuses);
        }

        let ids: Vec<i64> = ids.iter().map(|id| id.0).collect();
        let conn = self.conn()?;
        for chunk in ids.chunks(MAX_IDS_PER_QUERY) {
            let sql = format!(
                "SELECT s.id, s.text, s.reblog_of_id, s.created_at,
                        a.id AS author_id, a.username, a.suspended_at
                 FROM statuses s
                 JOIN accounts a ON a.id = s.account_id
                 WHERE s.id IN ({})",
                vec!["?"; chunk.len()].join(", ")
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
                let created_at: i64 = row.get("created_at")?;
                Ok(Status {
                    id: StatusId(row.get("id")?),
                    account: Account {
                        id: AccountId(row.get("author_id")?),
                        username: row.get("username")?,
                        suspended: row.get::<_, Option<i64>>("suspended_at")?.is_some(),
                    },
                    text: row.get("text")?,
                    reblog_of_id: row.get::<_, Option<i64>>("reblog_of_id")?.map(StatusId),
                    created_at: DateTime::from_timestamp(created_at, 0)
                        .ok_or(rusqlite::Error::IntegralValueOutOfRange(3, created_at))?,
                })
            })?;
            for status in rows {
                let status = status?;
                statuses.insert(status.id, status);
            }
        }
        debug!("Fetched {} of {} requested statuses", statuses.len(), ids.len());
        Ok(statuses)
    }
}

impl NotificationStore for SqliteNotificationStore {
    fn create_notification(
        &self,
        recipient: AccountId,
        activity: &ActivityRef,
    ) -> Result<Notification> {
        self.create_notification_at(recipient, activity, Utc::now(), None)
    }

    fn create_notification_at(
        &self,
        recipient: AccountId,
        activity: &ActivityRef,
        created_at: DateTime<Utc>,
        group_key: Option<&str>,
    ) -> Result<Notification> {
        let (notification_type, from_account_id) = classify(activity);
        // Stored with second precision.
        let created_at = timestamp(created_at.timestamp())?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO notifications
                (account_id, from_account_id, activity_type, activity_id,
                 notification_type, group_key, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                recipient.0,
                from_account_id.0,
                activity.kind().as_str(),
                activity.activity_id(),
                notification_type.as_str(),
                group_key,
                created_at.timestamp(),
            ],
        )
        .with_context(|| {
            format!(
                "Failed to create {} notification for account {}",
                notification_type.as_str(),
                recipient
            )
        })?;
        let id = NotificationId(conn.last_insert_rowid());
        debug!(
            "Created {} notification {} for account {}",
            notification_type.as_str(),
            id,
            recipient
        );

        Ok(Notification::new(
            id,
            recipient,
            activity.clone(),
            group_key.map(str::to_string),
            created_at,
        ))
    }

    fn create_grouped_notification(
        &self,
        recipient: AccountId,
        activity: &ActivityRef,
    ) -> Result<Notification> {
        let created_at = Utc::now();
        let (notification_type, _) = classify(activity);
        let group_key = group_key_for(
            notification_type,
            resolve_status(activity),
            created_at,
            self.group_span_hours,
        );
        self.create_notification_at(recipient, activity, created_at, group_key.as_deref())
    }

    fn get_notification(&self, id: NotificationId) -> Result<Option<Notification>> {
        let sql = format!(
            "SELECT {} {} WHERE n.id = ?1 AND {}",
            NOTIFICATION_COLUMNS, NOTIFICATION_JOINS, ACTIVITY_PRESENT
        );
        Ok(self.query_notifications(&sql, params![id.0])?.pop())
    }

    fn mark_notification_read(
        &self,
        id: NotificationId,
        recipient: AccountId,
    ) -> Result<Option<Notification>> {
        {
            let conn = self.conn()?;
            conn.execute(
                "UPDATE notifications SET read_at = ?1
                 WHERE id = ?2 AND account_id = ?3 AND read_at IS NULL",
                params![Utc::now().timestamp(), id.0, recipient.0],
            )?;
        }
        Ok(self
            .get_notification(id)?
            .filter(|notification| notification.account_id == recipient))
    }

    fn get_unread_count(&self, recipient: AccountId) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE account_id = ?1 AND read_at IS NULL",
            params![recipient.0],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn set_group_key(&self, id: NotificationId, group_key: Option<&str>) -> Result<bool> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE notifications SET group_key = ?1 WHERE id = ?2",
            params![group_key, id.0],
        )?;
        Ok(updated > 0)
    }

    fn delete_notifications_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM notifications WHERE created_at < ?1",
            params![cutoff.timestamp()],
        )?;
        if deleted > 0 {
            info!("Deleted {} notifications created before {}", deleted, cutoff);
        }
        Ok(deleted)
    }
}
