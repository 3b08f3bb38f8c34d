//! SQLite schema for the notification database.
//!
//! Activity tables hold the records notifications point at. Deleting an
//! activity row removes the notifications referencing it through the
//! `trg_*_notifications` triggers, since `notifications.activity_id` is
//! polymorphic and can't carry a foreign key.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

const ACCOUNT_FK: ForeignKey = ForeignKey {
    foreign_table: "accounts",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const STATUS_FK: ForeignKey = ForeignKey {
    foreign_table: "statuses",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

// =============================================================================
// Version 1 - Accounts, activities and notifications
// =============================================================================

const ACCOUNTS_TABLE_V1: Table = Table {
    name: "accounts",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("username", &SqlType::Text, non_null = true, is_unique = true),
        // Unix seconds; NULL while the account is active.
        sqlite_column!("suspended_at", &SqlType::Integer),
    ],
    indices: &[],
    unique_constraints: &[],
    triggers: &[(
        "trg_accounts_notifications",
        "AFTER DELETE ON accounts BEGIN
            DELETE FROM notifications WHERE activity_type = 'Account' AND activity_id = OLD.id;
        END",
    )],
};

const STATUSES_TABLE_V1: Table = Table {
    name: "statuses",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "account_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
        sqlite_column!("text", &SqlType::Text, non_null = true),
        sqlite_column!("reblog_of_id", &SqlType::Integer, foreign_key = Some(&STATUS_FK)),
        sqlite_column!("created_at", &SqlType::Integer, non_null = true),
    ],
    indices: &[
        ("idx_statuses_account_id", "account_id"),
        ("idx_statuses_reblog_of_id", "reblog_of_id"),
    ],
    unique_constraints: &[],
    triggers: &[(
        "trg_statuses_notifications",
        "AFTER DELETE ON statuses BEGIN
            DELETE FROM notifications WHERE activity_type = 'Status' AND activity_id = OLD.id;
        END",
    )],
};

const MENTIONS_TABLE_V1: Table = Table {
    name: "mentions",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "status_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&STATUS_FK)
        ),
        sqlite_column!(
            "account_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
    ],
    indices: &[("idx_mentions_status_id", "status_id")],
    unique_constraints: &[&["status_id", "account_id"]],
    triggers: &[(
        "trg_mentions_notifications",
        "AFTER DELETE ON mentions BEGIN
            DELETE FROM notifications WHERE activity_type = 'Mention' AND activity_id = OLD.id;
        END",
    )],
};

const FAVOURITES_TABLE_V1: Table = Table {
    name: "favourites",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "account_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
        sqlite_column!(
            "status_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&STATUS_FK)
        ),
    ],
    indices: &[("idx_favourites_status_id", "status_id")],
    unique_constraints: &[&["account_id", "status_id"]],
    triggers: &[(
        "trg_favourites_notifications",
        "AFTER DELETE ON favourites BEGIN
            DELETE FROM notifications WHERE activity_type = 'Favourite' AND activity_id = OLD.id;
        END",
    )],
};

const FOLLOWS_TABLE_V1: Table = Table {
    name: "follows",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "account_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
        sqlite_column!(
            "target_account_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
    ],
    indices: &[("idx_follows_target_account_id", "target_account_id")],
    unique_constraints: &[&["account_id", "target_account_id"]],
    triggers: &[(
        "trg_follows_notifications",
        "AFTER DELETE ON follows BEGIN
            DELETE FROM notifications WHERE activity_type = 'Follow' AND activity_id = OLD.id;
        END",
    )],
};

const FOLLOW_REQUESTS_TABLE_V1: Table = Table {
    name: "follow_requests",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "account_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
        sqlite_column!(
            "target_account_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
    ],
    indices: &[("idx_follow_requests_target_account_id", "target_account_id")],
    unique_constraints: &[&["account_id", "target_account_id"]],
    triggers: &[(
        "trg_follow_requests_notifications",
        "AFTER DELETE ON follow_requests BEGIN
            DELETE FROM notifications WHERE activity_type = 'FollowRequest' AND activity_id = OLD.id;
        END",
    )],
};

const POLLS_TABLE_V1: Table = Table {
    name: "polls",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "status_id",
            &SqlType::Integer,
            non_null = true,
            is_unique = true,
            foreign_key = Some(&STATUS_FK)
        ),
    ],
    indices: &[],
    unique_constraints: &[],
    triggers: &[(
        "trg_polls_notifications",
        "AFTER DELETE ON polls BEGIN
            DELETE FROM notifications WHERE activity_type = 'Poll' AND activity_id = OLD.id;
        END",
    )],
};

const REPORTS_TABLE_V1: Table = Table {
    name: "reports",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "account_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
        sqlite_column!(
            "target_account_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
    ],
    indices: &[("idx_reports_target_account_id", "target_account_id")],
    unique_constraints: &[],
    triggers: &[(
        "trg_reports_notifications",
        "AFTER DELETE ON reports BEGIN
            DELETE FROM notifications WHERE activity_type = 'Report' AND activity_id = OLD.id;
        END",
    )],
};

const ACCOUNT_WARNINGS_TABLE_V1: Table = Table {
    name: "account_warnings",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "target_account_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
        sqlite_column!("text", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_account_warnings_target_account_id", "target_account_id")],
    unique_constraints: &[],
    triggers: &[(
        "trg_account_warnings_notifications",
        "AFTER DELETE ON account_warnings BEGIN
            DELETE FROM notifications WHERE activity_type = 'AccountWarning' AND activity_id = OLD.id;
        END",
    )],
};

const NOTIFICATIONS_TABLE_V1: Table = Table {
    name: "notifications",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "account_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
        sqlite_column!(
            "from_account_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
        sqlite_column!("activity_type", &SqlType::Text, non_null = true),
        sqlite_column!("activity_id", &SqlType::Integer, non_null = true),
        sqlite_column!("notification_type", &SqlType::Text, non_null = true),
        sqlite_column!("group_key", &SqlType::Text),
        sqlite_column!("created_at", &SqlType::Integer, non_null = true),
    ],
    indices: &[
        ("idx_notifications_account_id_id", "account_id, id"),
        ("idx_notifications_activity", "activity_type, activity_id"),
        ("idx_notifications_account_id_group_key", "account_id, group_key"),
        ("idx_notifications_created_at", "created_at"),
    ],
    unique_constraints: &[],
    triggers: &[],
};

// =============================================================================
// Version 2 - Read state
// =============================================================================

const NOTIFICATIONS_TABLE_V2: Table = Table {
    name: "notifications",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "account_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
        sqlite_column!(
            "from_account_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
        sqlite_column!("activity_type", &SqlType::Text, non_null = true),
        sqlite_column!("activity_id", &SqlType::Integer, non_null = true),
        sqlite_column!("notification_type", &SqlType::Text, non_null = true),
        sqlite_column!("group_key", &SqlType::Text),
        sqlite_column!("created_at", &SqlType::Integer, non_null = true),
        // Unix seconds; NULL while unread.
        sqlite_column!("read_at", &SqlType::Integer),
    ],
    indices: &[
        ("idx_notifications_account_id_id", "account_id, id"),
        ("idx_notifications_activity", "activity_type, activity_id"),
        ("idx_notifications_account_id_group_key", "account_id, group_key"),
        ("idx_notifications_created_at", "created_at"),
        ("idx_notifications_unread", "account_id, read_at"),
    ],
    unique_constraints: &[],
    triggers: &[],
};

/// Migration from version 1 to version 2: add read state to notifications
fn migrate_v1_to_v2(conn: &rusqlite::Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "ALTER TABLE notifications ADD COLUMN read_at INTEGER;
         CREATE INDEX idx_notifications_unread ON notifications(account_id, read_at);",
    )?;
    Ok(())
}

// =============================================================================
// Version 3 - Notification ids are never reused
// =============================================================================

const NOTIFICATIONS_TABLE_V3: Table = Table {
    name: "notifications",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_autoincrement = true
        ),
        sqlite_column!(
            "account_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
        sqlite_column!(
            "from_account_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACCOUNT_FK)
        ),
        sqlite_column!("activity_type", &SqlType::Text, non_null = true),
        sqlite_column!("activity_id", &SqlType::Integer, non_null = true),
        sqlite_column!("notification_type", &SqlType::Text, non_null = true),
        sqlite_column!("group_key", &SqlType::Text),
        sqlite_column!("created_at", &SqlType::Integer, non_null = true),
        sqlite_column!("read_at", &SqlType::Integer),
    ],
    indices: &[
        ("idx_notifications_account_id_id", "account_id, id"),
        ("idx_notifications_activity", "activity_type, activity_id"),
        ("idx_notifications_account_id_group_key", "account_id, group_key"),
        ("idx_notifications_created_at", "created_at"),
        ("idx_notifications_unread", "account_id, read_at"),
    ],
    unique_constraints: &[],
    triggers: &[],
};

/// Migration from version 2 to version 3: rebuild notifications with an
/// AUTOINCREMENT key so cursors never see a pruned id handed out again.
///
/// The activity triggers name `notifications`, so the rename runs with
/// `legacy_alter_table` on; otherwise SQLite re-parses them while the table
/// is missing and refuses the rename.
fn migrate_v2_to_v3(conn: &rusqlite::Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "PRAGMA legacy_alter_table = ON;
         CREATE TABLE notifications_v3 (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
            from_account_id INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
            activity_type TEXT NOT NULL,
            activity_id INTEGER NOT NULL,
            notification_type TEXT NOT NULL,
            group_key TEXT,
            created_at INTEGER NOT NULL,
            read_at INTEGER
         );
         INSERT INTO notifications_v3
            (id, account_id, from_account_id, activity_type, activity_id,
             notification_type, group_key, created_at, read_at)
            SELECT id, account_id, from_account_id, activity_type, activity_id,
                   notification_type, group_key, created_at, read_at
            FROM notifications;
         DROP TABLE notifications;
         ALTER TABLE notifications_v3 RENAME TO notifications;
         PRAGMA legacy_alter_table = OFF;
         CREATE INDEX idx_notifications_account_id_id ON notifications(account_id, id);
         CREATE INDEX idx_notifications_activity ON notifications(activity_type, activity_id);
         CREATE INDEX idx_notifications_account_id_group_key ON notifications(account_id, group_key);
         CREATE INDEX idx_notifications_created_at ON notifications(created_at);
         CREATE INDEX idx_notifications_unread ON notifications(account_id, read_at);",
    )?;
    Ok(())
}

pub const NOTIFICATION_VERSIONED_SCHEMAS: &[VersionedSchema] = &[
    VersionedSchema {
        version: 1,
        tables: &[
            ACCOUNTS_TABLE_V1,
            STATUSES_TABLE_V1,
            MENTIONS_TABLE_V1,
            FAVOURITES_TABLE_V1,
            FOLLOWS_TABLE_V1,
            FOLLOW_REQUESTS_TABLE_V1,
            POLLS_TABLE_V1,
            REPORTS_TABLE_V1,
            ACCOUNT_WARNINGS_TABLE_V1,
            NOTIFICATIONS_TABLE_V1,
        ],
        migration: None,
    },
    VersionedSchema {
        version: 2,
        tables: &[
            ACCOUNTS_TABLE_V1,
            STATUSES_TABLE_V1,
            MENTIONS_TABLE_V1,
            FAVOURITES_TABLE_V1,
            FOLLOWS_TABLE_V1,
            FOLLOW_REQUESTS_TABLE_V1,
            POLLS_TABLE_V1,
            REPORTS_TABLE_V1,
            ACCOUNT_WARNINGS_TABLE_V1,
            NOTIFICATIONS_TABLE_V2,
        ],
        migration: Some(migrate_v1_to_v2),
    },
    VersionedSchema {
        version: 3,
        tables: &[
            ACCOUNTS_TABLE_V1,
            STATUSES_TABLE_V1,
            MENTIONS_TABLE_V1,
            FAVOURITES_TABLE_V1,
            FOLLOWS_TABLE_V1,
            FOLLOW_REQUESTS_TABLE_V1,
            POLLS_TABLE_V1,
            REPORTS_TABLE_V1,
            ACCOUNT_WARNINGS_TABLE_V1,
            NOTIFICATIONS_TABLE_V3,
        ],
        migration: Some(migrate_v2_to_v3),
    },
];
