use certification_tracker_domain::{CertificationRecord, NewCertification, ReminderPayload};
use certification_tracker_infra::{
    IDeliveryChannel, InMemoryDeliveryChannel, LocalNotifier, StaticTimeSys, TrackerContext,
};
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tokio::sync::Notify;

// 2024-03-01T00:00:00Z
pub const NOW: i64 = 1_709_251_200_000;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd(2024, 3, 1)
}

pub struct TestContext {
    pub ctx: TrackerContext,
    pub sys: Arc<StaticTimeSys>,
    pub notifier: Arc<LocalNotifier>,
    pub channel: Arc<InMemoryDeliveryChannel>,
}

/// In memory context with the clock stopped at `NOW`
pub fn setup() -> TestContext {
    let sys = Arc::new(StaticTimeSys::new(NOW));
    let channel = Arc::new(InMemoryDeliveryChannel::new());
    let notifier = Arc::new(LocalNotifier::new(channel.clone()));
    let ctx = TrackerContext::create_inmemory_with(sys.clone(), notifier.clone());
    TestContext {
        ctx,
        sys,
        notifier,
        channel,
    }
}

pub async fn insert_certification(
    ctx: &TrackerContext,
    expires_in_days: i64,
    offsets: Vec<i64>,
) -> CertificationRecord {
    let cert = CertificationRecord::new(NewCertification {
        name: "CISSP".into(),
        issuing_organization: "ISC2".into(),
        expiration_date: Some(today() + Duration::days(expires_in_days)),
        reminder_offsets: Some(offsets),
        ..Default::default()
    })
    .unwrap();
    ctx.repos.certifications.insert(&cert).await.unwrap();
    cert
}

/// Holds every delivery until the test releases it
pub struct GatedDeliveryChannel {
    pub started: Notify,
    pub release: Notify,
    fail: bool,
}

impl GatedDeliveryChannel {
    pub fn new(fail: bool) -> Self {
        Self {
            started: Notify::new(),
            release: Notify::new(),
            fail,
        }
    }
}

#[async_trait::async_trait]
impl IDeliveryChannel for GatedDeliveryChannel {
    async fn deliver(&self, _payload: &ReminderPayload) -> anyhow::Result<()> {
        self.started.notify_one();
        self.release.notified().await;
        if self.fail {
            Err(anyhow::Error::msg("Delivery channel is unavailable"))
        } else {
            Ok(())
        }
    }
}

/// In memory context delivering through a `GatedDeliveryChannel`
pub fn setup_gated(
    fail: bool,
) -> (
    TrackerContext,
    Arc<StaticTimeSys>,
    Arc<LocalNotifier>,
    Arc<GatedDeliveryChannel>,
) {
    let sys = Arc::new(StaticTimeSys::new(NOW));
    let channel = Arc::new(GatedDeliveryChannel::new(fail));
    let notifier = Arc::new(LocalNotifier::new(channel.clone()));
    let ctx = TrackerContext::create_inmemory_with(sys.clone(), notifier.clone());
    (ctx, sys, notifier, channel)
}
