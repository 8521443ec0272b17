use crate::config::WebhookConfig;
use certification_tracker_domain::ReminderPayload;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
    time::Duration,
};
use tracing::info;

/// Where a due notification ends up when it is delivered
#[async_trait::async_trait]
pub trait IDeliveryChannel: Send + Sync {
    async fn deliver(&self, payload: &ReminderPayload) -> anyhow::Result<()>;
}

/// Writes notifications to the log
pub struct LogDeliveryChannel {}

#[async_trait::async_trait]
impl IDeliveryChannel for LogDeliveryChannel {
    async fn deliver(&self, payload: &ReminderPayload) -> anyhow::Result<()> {
        info!(
            reminder_id = %payload.reminder_id,
            certification_id = %payload.certification_id,
            days_before_expiration = payload.days_before_expiration,
            "{}: {}",
            payload.title,
            payload.body
        );
        Ok(())
    }
}

/// Posts notifications as json to a webhook
pub struct WebhookDeliveryChannel {
    client: reqwest::Client,
    config: WebhookConfig,
}

impl WebhookDeliveryChannel {
    pub fn new(config: WebhookConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait::async_trait]
impl IDeliveryChannel for WebhookDeliveryChannel {
    async fn deliver(&self, payload: &ReminderPayload) -> anyhow::Result<()> {
        let mut req = self.client.post(&self.config.url).json(payload);
        if let Some(key) = &self.config.key {
            req = req.header("certification-tracker-webhook-key", key);
        }
        req.send().await?.error_for_status()?;
        Ok(())
    }
}

/// Keeps delivered notifications in memory, used for testing
#[derive(Default)]
pub struct InMemoryDeliveryChannel {
    delivered: Mutex<Vec<ReminderPayload>>,
    unavailable: AtomicBool,
}

impl InMemoryDeliveryChannel {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn delivered(&self) -> Vec<ReminderPayload> {
        self.delivered.lock().unwrap().clone()
    }

    /// Makes every following delivery fail until set back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl IDeliveryChannel for InMemoryDeliveryChannel {
    async fn deliver(&self, payload: &ReminderPayload) -> anyhow::Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(anyhow::Error::msg("Delivery channel is unavailable"));
        }
        self.delivered.lock().unwrap().push(payload.clone());
        Ok(())
    }
}
