use certification_tracker_domain::{ReminderOffsets, DEFAULT_REMINDER_OFFSETS};
use chrono_tz::Tz;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    /// Sent in the `certification-tracker-webhook-key` header so that the
    /// receiver can verify where the notification came from
    pub key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. The store is kept in memory when missing.
    pub database_url: Option<String>,
    /// Timezone in which calendar dates start and end. Reminders fire at
    /// the start of the day in this timezone.
    pub timezone: Tz,
    /// Reminder offsets used when a certification is created without any
    pub default_reminder_offsets: ReminderOffsets,
    /// How often the reminders of every active certification are reconciled.
    /// This picks up reminders that should be dropped because their time passed
    /// while the process was not running.
    pub reminder_refresh_interval_secs: u64,
    /// Where delivered notifications are posted. They are only logged when missing.
    pub notification_webhook: Option<WebhookConfig>,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    pub fn new() -> Self {
        let database_url = env_var("DATABASE_URL");
        if database_url.is_none() {
            info!("Did not find DATABASE_URL environment variable. Going to keep certifications in memory.");
        }

        let timezone = match env_var("TIMEZONE") {
            Some(tz) => match tz.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given TIMEZONE: {} is not valid, falling back to the default timezone: UTC.",
                        tz
                    );
                    Tz::UTC
                }
            },
            None => Tz::UTC,
        };

        let default_reminder_offsets = match env_var("DEFAULT_REMINDER_OFFSETS") {
            Some(offsets) => match ReminderOffsets::parse(&offsets) {
                Ok(parsed) if !parsed.is_empty() => parsed,
                _ => {
                    warn!(
                        "The given DEFAULT_REMINDER_OFFSETS: {} is not valid, falling back to the default offsets: {:?}.",
                        offsets, DEFAULT_REMINDER_OFFSETS
                    );
                    ReminderOffsets::from(DEFAULT_REMINDER_OFFSETS)
                }
            },
            None => ReminderOffsets::from(DEFAULT_REMINDER_OFFSETS),
        };

        let default_refresh_interval = 60 * 60 * 6;
        let reminder_refresh_interval_secs = match env_var("REMINDER_REFRESH_INTERVAL_SECS") {
            Some(secs) => match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    warn!(
                        "The given REMINDER_REFRESH_INTERVAL_SECS: {} is not valid, falling back to the default interval: {}.",
                        secs, default_refresh_interval
                    );
                    default_refresh_interval
                }
            },
            None => default_refresh_interval,
        };

        let notification_webhook = env_var("NOTIFICATION_WEBHOOK_URL").map(|url| WebhookConfig {
            url,
            key: env_var("NOTIFICATION_WEBHOOK_KEY"),
        });

        Self {
            database_url,
            timezone,
            default_reminder_offsets,
            reminder_refresh_interval_secs,
            notification_webhook,
        }
    }

    /// Configuration used by tests, it never reads the environment
    pub fn inmemory() -> Self {
        Self {
            database_url: None,
            timezone: Tz::UTC,
            default_reminder_offsets: ReminderOffsets::from(DEFAULT_REMINDER_OFFSETS),
            reminder_refresh_interval_secs: 60 * 60 * 6,
            notification_webhook: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
