use crate::{error::TrackerError, shared::usecase::UseCase};
use certification_tracker_domain::{CertificationRecord, ReminderPayload, ID};
use certification_tracker_infra::TrackerContext;
use std::collections::HashMap;
use tracing::{error, info, warn};

/// Hands the stored reminders that are yet to fire back to the notifier.
/// Used on startup, as the notifier does not outlive the process.
#[derive(Debug)]
pub struct RestoreScheduledRemindersUseCase;

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
    NotifierError,
}

impl From<UseCaseError> for TrackerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::StoreUnavailable,
            UseCaseError::NotifierError => Self::NotifierUnavailable,
        }
    }
}

#[async_trait::async_trait]
impl UseCase for RestoreScheduledRemindersUseCase {
    /// Number of restored reminders
    type Response = usize;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &TrackerContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let reminders = ctx
            .repos
            .reminders
            .find_undelivered_after(now)
            .await
            .map_err(|e| {
                error!("Unable to get undelivered reminders. Err: {:?}", e);
                UseCaseError::StorageError
            })?;

        let mut certifications: HashMap<ID, Option<CertificationRecord>> = HashMap::new();
        let mut restored = 0;
        for reminder in &reminders {
            if !certifications.contains_key(&reminder.certification_id) {
                let certification = ctx
                    .repos
                    .certifications
                    .find(&reminder.certification_id)
                    .await;
                certifications.insert(reminder.certification_id, certification);
            }
            let certification = match certifications.get(&reminder.certification_id) {
                Some(Some(certification)) => certification,
                _ => {
                    warn!(
                        "Certification: {} of reminder: {} was not found",
                        reminder.certification_id, reminder.id
                    );
                    continue;
                }
            };

            let payload = ReminderPayload::new(certification, reminder);
            ctx.notifier
                .schedule_at(&reminder.id, reminder.fire_at, &payload)
                .await
                .map_err(|e| {
                    error!("Unable to schedule reminder: {}. Err: {:?}", reminder.id, e);
                    UseCaseError::NotifierError
                })?;
            restored += 1;
        }

        info!("Restored {} scheduled reminders", restored);
        Ok(restored)
    }
}
