use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use notification_feed::config::{AppConfig, CliConfig, FileConfig};
use notification_feed::notifications::{
    AccountId, GroupedCursorPaginator, Notification, NotificationId, NotificationType, StatusId,
};
use notification_feed::{preload, SqliteNotificationStore};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite notification database file.
    #[clap(value_parser = parse_path)]
    pub db: Option<PathBuf>,

    /// Account whose notifications are listed.
    #[clap(long)]
    pub account: i64,

    /// Maximum number of notifications on the page.
    #[clap(long)]
    pub limit: Option<usize>,

    /// Only return notifications older than this id.
    #[clap(long)]
    pub max_id: Option<i64>,

    /// Only return notifications newer than this id, newest first.
    #[clap(long)]
    pub since_id: Option<i64>,

    /// Only return notifications newer than this id, oldest first.
    #[clap(long)]
    pub min_id: Option<i64>,

    /// Include notifications from suspended accounts.
    #[clap(long)]
    pub include_suspended: bool,

    /// Load target statuses for the whole page in one query.
    #[clap(long)]
    pub preload: bool,

    /// Path to a TOML config file.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

#[derive(Serialize)]
struct FeedEntry<'a> {
    id: NotificationId,
    #[serde(rename = "type")]
    notification_type: NotificationType,
    from_account_id: AccountId,
    group_key: Option<&'a str>,
    created_at: String,
    read: bool,
    target_status_id: Option<StatusId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_status_author: Option<String>,
}

impl<'a> FeedEntry<'a> {
    fn new(notification: &'a Notification) -> Self {
        let target_status_author = notification
            .cached_target_status()
            .flatten()
            .map(|status| status.account.username.clone());
        Self {
            id: notification.id,
            notification_type: notification.notification_type(),
            from_account_id: notification.from_account_id(),
            group_key: notification.group_key.as_deref(),
            created_at: notification.created_at.to_rfc3339(),
            read: notification.is_read(),
            target_status_id: notification.target_status_id(),
            target_status_author,
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        db_path: cli_args.db.clone(),
        exclude_suspended: !cli_args.include_suspended,
        ..CliConfig::default()
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Opening notification database at {:?}...", config.db_path);
    let store = SqliteNotificationStore::new(&config.db_path)?
        .with_group_span_hours(config.group_span_hours);

    let account = AccountId(cli_args.account);
    let limit = cli_args.limit.unwrap_or(config.default_limit);
    let paginator = GroupedCursorPaginator::new(&store, account)
        .with_settings(config.pagination.clone())
        .include_suspended_senders(!config.exclude_suspended);

    let max_id = cli_args.max_id.map(NotificationId);
    let page = match cli_args.min_id {
        Some(min_id) => {
            if cli_args.since_id.is_some() {
                warn!("--since-id is ignored when --min-id is given");
            }
            paginator.paginate_groups_by_min_id(limit, max_id, Some(NotificationId(min_id)))?
        }
        None => paginator.paginate_groups_by_max_id(
            limit,
            cli_args.since_id.map(NotificationId),
            max_id,
        )?,
    };

    if cli_args.preload {
        preload(&page, &store)?;
    }

    for notification in &page {
        println!("{}", serde_json::to_string(&FeedEntry::new(notification))?);
    }
    info!(
        "Listed {} notification(s) for account {}",
        page.len(),
        account
    );
    Ok(())
}
