//! Notification data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Notification identifier. Higher ids are more recent.
    NotificationId
);
id_type!(AccountId);
id_type!(StatusId);

/// An account, as attached to fetched statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub suspended: bool,
}

/// A status together with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: StatusId,
    pub account: Account,
    pub text: String,
    pub reblog_of_id: Option<StatusId>,
    pub created_at: DateTime<Utc>,
}

/// Minimal reference to a status: its id and its author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusRef {
    pub id: StatusId,
    pub account_id: AccountId,
}

/// Storage discriminator of the record a notification points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActivityKind {
    Status,
    Mention,
    Favourite,
    Follow,
    FollowRequest,
    Poll,
    Report,
    AccountWarning,
    Account,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Status => "Status",
            ActivityKind::Mention => "Mention",
            ActivityKind::Favourite => "Favourite",
            ActivityKind::Follow => "Follow",
            ActivityKind::FollowRequest => "FollowRequest",
            ActivityKind::Poll => "Poll",
            ActivityKind::Report => "Report",
            ActivityKind::AccountWarning => "AccountWarning",
            ActivityKind::Account => "Account",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Status" => Some(ActivityKind::Status),
            "Mention" => Some(ActivityKind::Mention),
            "Favourite" => Some(ActivityKind::Favourite),
            "Follow" => Some(ActivityKind::Follow),
            "FollowRequest" => Some(ActivityKind::FollowRequest),
            "Poll" => Some(ActivityKind::Poll),
            "Report" => Some(ActivityKind::Report),
            "AccountWarning" => Some(ActivityKind::AccountWarning),
            "Account" => Some(ActivityKind::Account),
            _ => None,
        }
    }
}

/// The activity a notification refers to.
///
/// Each case carries just enough to work out the account shown as the
/// sender and, where there is one, the status a client should render.
/// Row ids (`id`) identify the underlying activity record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityRef {
    /// A status; a reblog when `reblog_of` is set.
    Status {
        status: StatusRef,
        reblog_of: Option<StatusRef>,
    },
    Mention {
        id: i64,
        status: StatusRef,
    },
    /// `account_id` is the favouriting account.
    Favourite {
        id: i64,
        account_id: AccountId,
        status: StatusRef,
    },
    /// `account_id` is the follower.
    Follow {
        id: i64,
        account_id: AccountId,
    },
    /// `account_id` is the requesting account.
    FollowRequest {
        id: i64,
        account_id: AccountId,
    },
    Poll {
        id: i64,
        status: StatusRef,
    },
    /// `account_id` is the account carried by the notification (the reporter).
    Report {
        id: i64,
        account_id: AccountId,
    },
    AccountWarning {
        id: i64,
        target_account_id: AccountId,
    },
    /// An account-level event (e.g. a sign-up) about `account_id`.
    DirectAccount {
        account_id: AccountId,
    },
}

impl ActivityRef {
    pub fn kind(&self) -> ActivityKind {
        match self {
            ActivityRef::Status { .. } => ActivityKind::Status,
            ActivityRef::Mention { .. } => ActivityKind::Mention,
            ActivityRef::Favourite { .. } => ActivityKind::Favourite,
            ActivityRef::Follow { .. } => ActivityKind::Follow,
            ActivityRef::FollowRequest { .. } => ActivityKind::FollowRequest,
            ActivityRef::Poll { .. } => ActivityKind::Poll,
            ActivityRef::Report { .. } => ActivityKind::Report,
            ActivityRef::AccountWarning { .. } => ActivityKind::AccountWarning,
            ActivityRef::DirectAccount { .. } => ActivityKind::Account,
        }
    }

    /// Id of the activity row in the table matching [`ActivityRef::kind`].
    pub fn activity_id(&self) -> i64 {
        match self {
            ActivityRef::Status { status, .. } => status.id.0,
            ActivityRef::Mention { id, .. }
            | ActivityRef::Favourite { id, .. }
            | ActivityRef::Follow { id, .. }
            | ActivityRef::FollowRequest { id, .. }
            | ActivityRef::Poll { id, .. }
            | ActivityRef::Report { id, .. }
            | ActivityRef::AccountWarning { id, .. } => *id,
            ActivityRef::DirectAccount { account_id } => account_id.0,
        }
    }
}

/// Notification type tag, as exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Reblog,
    Mention,
    Favourite,
    Follow,
    FollowRequest,
    Poll,
    Report,
    ModerationWarning,
    Status,
    Account,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Reblog => "reblog",
            NotificationType::Mention => "mention",
            NotificationType::Favourite => "favourite",
            NotificationType::Follow => "follow",
            NotificationType::FollowRequest => "follow_request",
            NotificationType::Poll => "poll",
            NotificationType::Report => "report",
            NotificationType::ModerationWarning => "moderation_warning",
            NotificationType::Status => "status",
            NotificationType::Account => "account",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "reblog" => Some(NotificationType::Reblog),
            "mention" => Some(NotificationType::Mention),
            "favourite" => Some(NotificationType::Favourite),
            "follow" => Some(NotificationType::Follow),
            "follow_request" => Some(NotificationType::FollowRequest),
            "poll" => Some(NotificationType::Poll),
            "report" => Some(NotificationType::Report),
            "moderation_warning" => Some(NotificationType::ModerationWarning),
            "status" => Some(NotificationType::Status),
            "account" => Some(NotificationType::Account),
            _ => None,
        }
    }
}

/// A notification delivered to `account_id`.
///
/// `activity` is fixed at construction. The target status slot is a
/// process-local cache that is written at most once.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub account_id: AccountId,
    pub group_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    activity: ActivityRef,
    pub(super) target_status: OnceLock<Option<Arc<Status>>>,
}

impl Notification {
    pub fn new(
        id: NotificationId,
        account_id: AccountId,
        activity: ActivityRef,
        group_key: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            account_id,
            group_key,
            created_at,
            read_at: None,
            activity,
            target_status: OnceLock::new(),
        }
    }

    pub fn with_read_at(mut self, read_at: Option<DateTime<Utc>>) -> Self {
        self.read_at = read_at;
        self
    }

    pub fn activity(&self) -> &ActivityRef {
        &self.activity
    }

    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}
