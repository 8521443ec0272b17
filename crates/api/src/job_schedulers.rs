use crate::{
    reminder::{
        deliver_due_reminders::DeliverDueRemindersUseCase,
        refresh_reminders::RefreshRemindersUseCase,
    },
    shared::usecase::execute,
};
use certification_tracker_infra::TrackerContext;
use std::time::Duration;
use tokio::{
    task::JoinHandle,
    time::{interval, sleep_until, Instant},
};
use tracing::{error, info};

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Reconciles the reminders of all active certifications, first right away
/// and then every `reminder_refresh_interval_secs`
pub fn start_refresh_reminders_job(ctx: TrackerContext) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval(Duration::from_secs(
            ctx.config.reminder_refresh_interval_secs,
        ));
        loop {
            interval.tick().await;

            match execute(RefreshRemindersUseCase, &ctx).await {
                Ok(summary) => info!(
                    "Refreshed reminders of {} certifications. Delivered: {}, created: {}, cancelled: {}, failed: {}",
                    summary.synced, summary.delivered, summary.created, summary.cancelled, summary.failed
                ),
                Err(e) => error!("Unable to refresh reminders. Err: {:?}", e),
            }
        }
    })
}

/// Delivers due reminders at the start of every minute
pub fn start_deliver_reminders_job(ctx: TrackerContext) -> JoinHandle<()> {
    tokio::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);

        sleep_until(start).await;
        let mut minutely_interval = interval(Duration::from_secs(60));
        loop {
            minutely_interval.tick().await;
            let context = ctx.clone();
            tokio::spawn(async move {
                if let Err(e) = execute(DeliverDueRemindersUseCase, &context).await {
                    error!("Unable to deliver due reminders. Err: {:?}", e);
                }
            });
        }
    })
}
