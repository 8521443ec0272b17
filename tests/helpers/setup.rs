use certification_tracker_api::Application;
use certification_tracker_infra::{
    InMemoryDeliveryChannel, LocalNotifier, Repos, StaticTimeSys, TrackerContext,
};
use std::sync::Arc;

// 2024-03-01T00:00:00Z
pub const NOW: i64 = 1_709_251_200_000;

pub struct TestApp {
    pub ctx: TrackerContext,
    pub sys: Arc<StaticTimeSys>,
    pub notifier: Arc<LocalNotifier>,
    pub channel: Arc<InMemoryDeliveryChannel>,
    pub application: Application,
}

/// Launch the application with an in memory store and a stopped clock
pub async fn spawn_app() -> TestApp {
    let sys = Arc::new(StaticTimeSys::new(NOW));
    let repos = Repos::create_inmemory(sys.clone());
    spawn_app_with(sys, repos).await
}

/// Launch the application on top of existing repos, like a restarted process would
pub async fn spawn_app_with(sys: Arc<StaticTimeSys>, repos: Repos) -> TestApp {
    let channel = Arc::new(InMemoryDeliveryChannel::new());
    let notifier = Arc::new(LocalNotifier::new(channel.clone()));
    let mut ctx = TrackerContext::create_inmemory_with(sys.clone(), notifier.clone());
    ctx.repos = repos;

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    TestApp {
        ctx,
        sys,
        notifier,
        channel,
        application,
    }
}
