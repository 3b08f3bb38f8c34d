//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestFeed, GROUP_FIXTURE_KEYS};
//!
//! #[test]
//! fn test_page() {
//!     let feed = TestFeed::with_group_fixture();
//!     let page = feed.paginator().paginate_groups_by_max_id(4, None, None).unwrap();
//!     assert_eq!(page.len(), 4);
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::{ids, CountingFetcher, TestFeed};
