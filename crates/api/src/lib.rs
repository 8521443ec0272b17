pub mod certification;
mod error;
mod job_schedulers;
pub mod reminder;
mod shared;

use certification_tracker_infra::TrackerContext;
pub use error::TrackerError;
use job_schedulers::{start_deliver_reminders_job, start_refresh_reminders_job};
use reminder::restore_scheduled_reminders::RestoreScheduledRemindersUseCase;
pub use shared::usecase::{execute, Subscriber, UseCase};
use tokio::task::JoinHandle;
use tracing::info;

pub struct Application {
    context: TrackerContext,
    jobs: Vec<JoinHandle<()>>,
}

impl Application {
    /// Hands the stored reminders back to the notifier and starts the
    /// background jobs that refresh and deliver them
    pub async fn new(context: TrackerContext) -> Result<Self, TrackerError> {
        execute(RestoreScheduledRemindersUseCase, &context).await?;
        let jobs = Application::start_job_schedulers(context.clone());

        Ok(Self { context, jobs })
    }

    pub fn context(&self) -> &TrackerContext {
        &self.context
    }

    fn start_job_schedulers(context: TrackerContext) -> Vec<JoinHandle<()>> {
        vec![
            start_deliver_reminders_job(context.clone()),
            start_refresh_reminders_job(context),
        ]
    }

    /// Runs until ctrl-c is received
    pub async fn start(self) -> std::io::Result<()> {
        tokio::signal::ctrl_c().await?;
        info!("Shutting down");
        self.stop();
        Ok(())
    }

    pub fn stop(self) {
        for job in &self.jobs {
            job.abort();
        }
    }
}
