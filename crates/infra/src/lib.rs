mod config;
mod locks;
mod notifier;
mod repos;
mod system;

pub use config::{Config, WebhookConfig};
pub use locks::CertificationLocks;
pub use notifier::{
    DeliveredNotification, IDeliveryChannel, INotifier, InMemoryDeliveryChannel, LocalNotifier,
    LogDeliveryChannel, PendingNotification, WebhookDeliveryChannel,
};
pub use repos::{DeleteResult, ICertificationRepo, IReminderRepo, Repos};
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::{info, warn};

#[derive(Clone)]
pub struct TrackerContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifier: Arc<dyn INotifier>,
    pub locks: Arc<CertificationLocks>,
}

impl TrackerContext {
    async fn create(config: Config) -> Self {
        let sys: Arc<dyn ISys> = Arc::new(RealSys {});
        let repos = match &config.database_url {
            Some(connection_string) => Repos::create_postgres(connection_string)
                .await
                .expect("Postgres credentials must be set and valid"),
            None => {
                warn!("Certifications and reminders are kept in memory and will be lost on shutdown");
                Repos::create_inmemory(sys.clone())
            }
        };
        let channel = create_delivery_channel(&config);
        Self {
            repos,
            config,
            sys,
            notifier: Arc::new(LocalNotifier::new(channel)),
            locks: Arc::new(CertificationLocks::new()),
        }
    }

    pub fn create_inmemory() -> Self {
        Self::create_inmemory_with(
            Arc::new(RealSys {}),
            Arc::new(LocalNotifier::new(Arc::new(LogDeliveryChannel {}))),
        )
    }

    /// In memory context with a custom clock and notifier, used for testing
    pub fn create_inmemory_with(sys: Arc<dyn ISys>, notifier: Arc<dyn INotifier>) -> Self {
        Self {
            repos: Repos::create_inmemory(sys.clone()),
            config: Config::inmemory(),
            sys,
            notifier,
            locks: Arc::new(CertificationLocks::new()),
        }
    }
}

fn create_delivery_channel(config: &Config) -> Arc<dyn IDeliveryChannel> {
    match &config.notification_webhook {
        Some(webhook) => match WebhookDeliveryChannel::new(webhook.clone()) {
            Ok(channel) => {
                info!("Notifications will be posted to: {}", webhook.url);
                Arc::new(channel)
            }
            Err(e) => {
                warn!(
                    "Unable to create the notification webhook client, notifications will only be logged. Err: {:?}",
                    e
                );
                Arc::new(LogDeliveryChannel {})
            }
        },
        None => Arc::new(LogDeliveryChannel {}),
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> TrackerContext {
    TrackerContext::create(Config::new()).await
}
