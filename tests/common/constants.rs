//! Test constants

/// Group keys of the eight-notification grouping fixture, oldest first.
/// Ids are assigned 1 through 8 in this order.
pub const GROUP_FIXTURE_KEYS: [Option<&str>; 8] = [
    Some("group-1"),
    Some("group-1"),
    None,
    Some("group-2"),
    None,
    Some("group-1"),
    Some("group-2"),
    Some("group-1"),
];

pub const RECIPIENT_USERNAME: &str = "alice";
pub const SENDER_USERNAME: &str = "bob";
pub const OTHER_SENDER_USERNAME: &str = "carol";
