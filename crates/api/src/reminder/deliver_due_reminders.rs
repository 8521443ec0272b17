use crate::shared::usecase::UseCase;
use certification_tracker_domain::ReminderId;
use certification_tracker_infra::TrackerContext;
use tracing::{error, info};

/// Delivers the notifications that are due and marks their reminders as delivered
#[derive(Debug)]
pub struct DeliverDueRemindersUseCase;

#[derive(Debug, PartialEq)]
pub enum UseCaseError {}

#[async_trait::async_trait]
impl UseCase for DeliverDueRemindersUseCase {
    type Response = Vec<ReminderId>;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &TrackerContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let delivered = ctx.notifier.deliver_due(now).await;
        if delivered.is_empty() {
            return Ok(Vec::new());
        }
        info!("Delivered {} reminders", delivered.len());

        for notification in &delivered {
            // The reminder might have been deleted, or recreated for another
            // time, while it was being delivered
            match ctx
                .repos
                .reminders
                .mark_delivered(&notification.reminder_id, notification.fire_at)
                .await
            {
                Ok(true) => (),
                Ok(false) => info!(
                    "Delivered reminder: {} is no longer stored for that time",
                    notification.reminder_id
                ),
                Err(e) => error!(
                    "Unable to mark reminder: {} as delivered. Err: {:?}",
                    notification.reminder_id, e
                ),
            }
        }

        Ok(delivered.into_iter().map(|n| n.reminder_id).collect())
    }
}
