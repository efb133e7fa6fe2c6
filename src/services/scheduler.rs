use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::DigestConfig;
use crate::db::Store;
use crate::db::repositories::format_timestamp;
use crate::services::notifications::NotificationService;

/// Half-open `[start, end)` range of contact messages covered by one digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestWindow {
    pub start: String,
    pub end: String,
    pub start_label: String,
    pub end_label: String,
}

#[must_use]
pub fn digest_window(now: DateTime<Utc>, days: i64) -> DigestWindow {
    let start = now - Duration::days(days);
    DigestWindow {
        start: format_timestamp(start),
        end: format_timestamp(now),
        start_label: start.format("%Y-%m-%d").to_string(),
        end_label: now.format("%Y-%m-%d").to_string(),
    }
}

/// Collects the window's contact messages and mails the summary.
/// Returns the number of messages included.
pub async fn send_weekly_digest(
    store: &Store,
    notifications: &NotificationService,
    now: DateTime<Utc>,
    window_days: i64,
) -> Result<usize> {
    let window = digest_window(now, window_days);
    let messages = store
        .contact_messages()
        .list_between(&window.start, &window.end)
        .await?;

    notifications
        .weekly_digest(&messages, &window.start_label, &window.end_label)
        .await?;

    Ok(messages.len())
}

pub struct Scheduler {
    store: Store,
    notifications: Arc<NotificationService>,
    config: DigestConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    pub fn new(store: Store, notifications: Arc<NotificationService>, config: DigestConfig) -> Self {
        Self {
            store,
            notifications,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Runs until [`Scheduler::stop`] is called. Schedule state lives in memory only.
    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Weekly digest is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;

        let mut sched = JobScheduler::new().await?;

        let store = self.store.clone();
        let notifications = Arc::clone(&self.notifications);
        let running = Arc::clone(&self.running);
        let window_days = self.config.window_days;

        let job = Job::new_async(self.config.cron_expression.as_str(), move |_uuid, _lock| {
            let store = store.clone();
            let notifications = Arc::clone(&notifications);
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                let start = std::time::Instant::now();
                info!(event = "job_started", job_name = "weekly_digest", "Sending weekly contact digest");

                match send_weekly_digest(&store, &notifications, Utc::now(), window_days).await {
                    Ok(count) => info!(
                        event = "job_finished",
                        job_name = "weekly_digest",
                        messages = count,
                        duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                        "Weekly contact digest sent"
                    ),
                    Err(e) => error!(event = "job_failed", job_name = "weekly_digest", error = %e, "Weekly contact digest failed"),
                }
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Weekly digest scheduled: {}", self.config.cron_expression);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    pub async fn stop(&self) {
        info!("Stopping scheduler...");
        *self.running.write().await = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_digest_window_covers_previous_week() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let window = digest_window(now, 7);

        assert_eq!(window.start, "2026-02-23T09:00:00.000Z");
        assert_eq!(window.end, "2026-03-02T09:00:00.000Z");
        assert_eq!(window.start_label, "2026-02-23");
        assert_eq!(window.end_label, "2026-03-02");
    }

    #[tokio::test]
    async fn test_default_cron_parses() {
        let job = Job::new_async(DigestConfig::default().cron_expression.as_str(), |_, _| {
            Box::pin(async {})
        });
        assert!(job.is_ok());
    }
}
