//! Maps an activity to its notification type and sender account.

use super::models::{AccountId, ActivityRef, Notification, NotificationType};

/// Returns the notification type and the account shown as the sender.
///
/// Statuses, mentions, favourites and polls are attributed to the author
/// of the status they point at (the reblogged status for reblogs). Follows
/// and follow requests are attributed to the account they carry, warnings
/// to the warned account, and reports and account events to the account
/// stored on the notification.
pub fn classify(activity: &ActivityRef) -> (NotificationType, AccountId) {
    match activity {
        ActivityRef::Status {
            reblog_of: Some(original),
            ..
        } => (NotificationType::Reblog, original.account_id),
        ActivityRef::Status {
            status,
            reblog_of: None,
        } => (NotificationType::Status, status.account_id),
        ActivityRef::Mention { status, .. } => (NotificationType::Mention, status.account_id),
        ActivityRef::Favourite { status, .. } => (NotificationType::Favourite, status.account_id),
        ActivityRef::Follow { account_id, .. } => (NotificationType::Follow, *account_id),
        ActivityRef::FollowRequest { account_id, .. } => {
            (NotificationType::FollowRequest, *account_id)
        }
        ActivityRef::Poll { status, .. } => (NotificationType::Poll, status.account_id),
        ActivityRef::Report { account_id, .. } => (NotificationType::Report, *account_id),
        ActivityRef::AccountWarning {
            target_account_id, ..
        } => (NotificationType::ModerationWarning, *target_account_id),
        ActivityRef::DirectAccount { account_id } => (NotificationType::Account, *account_id),
    }
}

/// Returns the account that performed the activity.
///
/// Differs from the sender only where the sender is the recipient's own
/// status author: favourites are acted by the favouriting account and
/// reblogs by the account that reblogged. Suspension filtering goes by
/// this account.
pub fn acting_account(activity: &ActivityRef) -> AccountId {
    match activity {
        ActivityRef::Status { status, .. } => status.account_id,
        ActivityRef::Favourite { account_id, .. } => *account_id,
        _ => classify(activity).1,
    }
}

impl Notification {
    pub fn notification_type(&self) -> NotificationType {
        classify(self.activity()).0
    }

    pub fn from_account_id(&self) -> AccountId {
        classify(self.activity()).1
    }

    pub fn acting_account_id(&self) -> AccountId {
        acting_account(self.activity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::models::{StatusId, StatusRef};

    fn status(id: i64, account: i64) -> StatusRef {
        StatusRef {
            id: StatusId(id),
            account_id: AccountId(account),
        }
    }

    #[test]
    fn test_reblog_and_plain_status() {
        let reblog = ActivityRef::Status {
            status: status(2, 20),
            reblog_of: Some(status(1, 10)),
        };
        assert_eq!(classify(&reblog), (NotificationType::Reblog, AccountId(10)));

        let plain = ActivityRef::Status {
            status: status(2, 20),
            reblog_of: None,
        };
        assert_eq!(classify(&plain), (NotificationType::Status, AccountId(20)));
    }

    #[test]
    fn test_status_backed_activities_use_status_author() {
        let target = status(5, 50);
        assert_eq!(
            classify(&ActivityRef::Mention { id: 1, status: target }),
            (NotificationType::Mention, AccountId(50))
        );
        assert_eq!(
            classify(&ActivityRef::Favourite {
                id: 1,
                account_id: AccountId(60),
                status: target
            }),
            (NotificationType::Favourite, AccountId(50))
        );
        assert_eq!(
            classify(&ActivityRef::Poll { id: 1, status: target }),
            (NotificationType::Poll, AccountId(50))
        );
    }

    #[test]
    fn test_account_backed_activities() {
        assert_eq!(
            classify(&ActivityRef::Follow {
                id: 1,
                account_id: AccountId(3)
            }),
            (NotificationType::Follow, AccountId(3))
        );
        assert_eq!(
            classify(&ActivityRef::FollowRequest {
                id: 1,
                account_id: AccountId(4)
            }),
            (NotificationType::FollowRequest, AccountId(4))
        );
        assert_eq!(
            classify(&ActivityRef::Report {
                id: 1,
                account_id: AccountId(5)
            }),
            (NotificationType::Report, AccountId(5))
        );
        assert_eq!(
            classify(&ActivityRef::AccountWarning {
                id: 1,
                target_account_id: AccountId(6)
            }),
            (NotificationType::ModerationWarning, AccountId(6))
        );
        assert_eq!(
            classify(&ActivityRef::DirectAccount {
                account_id: AccountId(7)
            }),
            (NotificationType::Account, AccountId(7))
        );
    }

    #[test]
    fn test_classify_is_repeatable() {
        let activity = ActivityRef::Favourite {
            id: 9,
            account_id: AccountId(40),
            status: status(3, 30),
        };
        assert_eq!(classify(&activity), classify(&activity));
    }

    #[test]
    fn test_acting_account_of_favourites_and_reblogs() {
        let favourite = ActivityRef::Favourite {
            id: 1,
            account_id: AccountId(40),
            status: status(3, 30),
        };
        assert_eq!(classify(&favourite).1, AccountId(30));
        assert_eq!(acting_account(&favourite), AccountId(40));

        let reblog = ActivityRef::Status {
            status: status(2, 20),
            reblog_of: Some(status(1, 10)),
        };
        assert_eq!(classify(&reblog).1, AccountId(10));
        assert_eq!(acting_account(&reblog), AccountId(20));
    }

    #[test]
    fn test_acting_account_matches_sender_elsewhere() {
        let activities = [
            ActivityRef::Status {
                status: status(2, 20),
                reblog_of: None,
            },
            ActivityRef::Mention {
                id: 1,
                status: status(5, 50),
            },
            ActivityRef::Follow {
                id: 1,
                account_id: AccountId(3),
            },
            ActivityRef::Report {
                id: 1,
                account_id: AccountId(5),
            },
            ActivityRef::DirectAccount {
                account_id: AccountId(7),
            },
        ];
        for activity in &activities {
            assert_eq!(acting_account(activity), classify(activity).1, "{:?}", activity);
        }
    }
}
