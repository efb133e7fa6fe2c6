//! One-off contact digest

use chrono::Utc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{NotificationService, mailer_from_config, scheduler::send_weekly_digest};

pub async fn cmd_send_digest(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let notifications = NotificationService::new(mailer_from_config(&config.email)?, config);

    let count = send_weekly_digest(
        &store,
        &notifications,
        Utc::now(),
        config.digest.window_days,
    )
    .await?;

    println!(
        "✓ Digest with {count} message(s) sent to {}",
        config.email.admin_email
    );
    Ok(())
}
