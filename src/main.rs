mod telemetry;

use certification_tracker_api::Application;
use certification_tracker_infra::setup_context;
use std::io::{Error, ErrorKind};
use telemetry::{get_subscriber, init_subscriber};
use tracing::info;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("certification_tracker".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context().await;
    info!(
        "Starting certification tracker in timezone: {}",
        context.config.timezone
    );

    let app = Application::new(context)
        .await
        .map_err(|e| Error::new(ErrorKind::Other, e))?;
    app.start().await
}
