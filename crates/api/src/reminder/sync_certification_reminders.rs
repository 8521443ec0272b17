use crate::{error::TrackerError, shared::usecase::UseCase};
use certification_tracker_domain::{reconcile, ReminderDiff, ReminderPayload, ID};
use certification_tracker_infra::TrackerContext;
use tracing::{error, info};

/// Brings the stored and scheduled reminders of a certification in line
/// with its expiration date, reminder offsets and active flag
#[derive(Debug)]
pub struct SyncCertificationRemindersUseCase {
    pub certification_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
    NotifierError,
}

impl From<UseCaseError> for TrackerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => Self::NotFound(format!(
                "The certification with id: {}, was not found.",
                id
            )),
            UseCaseError::StorageError => Self::StoreUnavailable,
            UseCaseError::NotifierError => Self::NotifierUnavailable,
        }
    }
}

#[async_trait::async_trait]
impl UseCase for SyncCertificationRemindersUseCase {
    type Response = ReminderDiff;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &TrackerContext) -> Result<Self::Response, Self::Errors> {
        // Held until the diff is applied so that two syncs of the same
        // certification never compute their diffs from the same state
        let _guard = ctx.locks.lock(&self.certification_id).await;

        let certification = ctx
            .repos
            .certifications
            .find(&self.certification_id)
            .await
            .ok_or(UseCaseError::NotFound(self.certification_id))?;
        let existing = ctx
            .repos
            .reminders
            .find_by_certification(&certification.id)
            .await
            .map_err(|e| {
                error!(
                    "Unable to get reminders of certification: {}. Err: {:?}",
                    certification.id, e
                );
                UseCaseError::StorageError
            })?;

        let now = ctx.sys.get_timestamp_millis();
        let diff = reconcile(&certification, &existing, now, &ctx.config.timezone);
        if diff.is_empty() {
            return Ok(diff);
        }

        for reminder_id in &diff.to_cancel {
            ctx.notifier.cancel(reminder_id).await.map_err(|e| {
                error!("Unable to cancel reminder: {}. Err: {:?}", reminder_id, e);
                UseCaseError::NotifierError
            })?;
            ctx.repos.reminders.delete(reminder_id).await.map_err(|e| {
                error!("Unable to delete reminder: {}. Err: {:?}", reminder_id, e);
                UseCaseError::StorageError
            })?;
        }

        for reminder in &diff.to_create {
            let payload = ReminderPayload::new(&certification, reminder);
            ctx.notifier
                .schedule_at(&reminder.id, reminder.fire_at, &payload)
                .await
                .map_err(|e| {
                    error!("Unable to schedule reminder: {}. Err: {:?}", reminder.id, e);
                    UseCaseError::NotifierError
                })?;
            ctx.repos.reminders.upsert(reminder).await.map_err(|e| {
                error!("Unable to store reminder: {}. Err: {:?}", reminder.id, e);
                UseCaseError::StorageError
            })?;
        }

        info!(
            "Synced reminders of certification: {}. Created: {}, cancelled: {}",
            certification.id,
            diff.to_create.len(),
            diff.to_cancel.len()
        );

        Ok(diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{
        testing::{insert_certification, setup, today, TestContext, NOW},
        usecase::execute,
    };
    use certification_tracker_domain::{ReminderId, MILLIS_PER_DAY};
    use chrono::Duration;

    #[tokio::test]
    async fn schedules_reminders_in_store_and_notifier() {
        let TestContext { ctx, notifier, .. } = setup();
        let cert = insert_certification(&ctx, 10, vec![14, 7, 1]).await;

        let diff = execute(
            SyncCertificationRemindersUseCase {
                certification_id: cert.id,
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(diff.to_create.len(), 2);
        assert!(diff.to_cancel.is_empty());

        let stored = ctx
            .repos
            .reminders
            .find_by_certification(&cert.id)
            .await
            .unwrap();
        let fire_ats = stored.iter().map(|r| r.fire_at).collect::<Vec<_>>();
        assert_eq!(fire_ats, vec![NOW + 3 * MILLIS_PER_DAY, NOW + 9 * MILLIS_PER_DAY]);

        let pending = notifier.pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].reminder_id, ReminderId::new(&cert.id, 7));
        assert_eq!(pending[0].payload.body, "Your CISSP certification expires in 7 days");
    }

    #[tokio::test]
    async fn syncing_twice_changes_nothing() {
        let TestContext { ctx, notifier, .. } = setup();
        let cert = insert_certification(&ctx, 100, vec![90, 60, 30, 7]).await;

        for _ in 0..2 {
            execute(
                SyncCertificationRemindersUseCase {
                    certification_id: cert.id,
                },
                &ctx,
            )
            .await
            .unwrap();
        }
        let diff = execute(
            SyncCertificationRemindersUseCase {
                certification_id: cert.id,
            },
            &ctx,
        )
        .await
        .unwrap();
        assert!(diff.is_empty());
        assert_eq!(notifier.pending().len(), 4);
    }

    #[tokio::test]
    async fn deactivation_cancels_reminders() {
        let TestContext { ctx, notifier, .. } = setup();
        let mut cert = insert_certification(&ctx, 100, vec![30, 7]).await;
        let mut usecase = SyncCertificationRemindersUseCase {
            certification_id: cert.id,
        };
        usecase.execute(&ctx).await.unwrap();
        assert_eq!(notifier.pending().len(), 2);

        cert.is_active = false;
        ctx.repos.certifications.save(&cert).await.unwrap();
        let diff = usecase.execute(&ctx).await.unwrap();
        assert_eq!(diff.to_cancel.len(), 2);
        assert!(notifier.pending().is_empty());
        assert!(ctx
            .repos
            .reminders
            .find_by_certification(&cert.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn moved_expiration_date_reschedules() {
        let TestContext { ctx, notifier, .. } = setup();
        let mut cert = insert_certification(&ctx, 100, vec![30]).await;
        let mut usecase = SyncCertificationRemindersUseCase {
            certification_id: cert.id,
        };
        usecase.execute(&ctx).await.unwrap();

        cert.expiration_date = Some(today() + Duration::days(200));
        ctx.repos.certifications.save(&cert).await.unwrap();
        let diff = usecase.execute(&ctx).await.unwrap();
        let id = ReminderId::new(&cert.id, 30);
        assert_eq!(diff.to_cancel, vec![id]);
        assert_eq!(diff.to_create.len(), 1);

        let pending = notifier.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].fire_at, NOW + 170 * MILLIS_PER_DAY);
        let stored = ctx
            .repos
            .reminders
            .find_by_certification(&cert.id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].fire_at, NOW + 170 * MILLIS_PER_DAY);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_syncs_schedule_each_reminder_once() {
        let TestContext { ctx, notifier, .. } = setup();
        let cert = insert_certification(&ctx, 100, vec![90, 60, 30, 7]).await;
        let certification_id = cert.id;

        let syncs = (0..8)
            .map(|_| {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    execute(
                        SyncCertificationRemindersUseCase { certification_id },
                        &ctx,
                    )
                    .await
                })
            })
            .collect::<Vec<_>>();
        let mut created = 0;
        for sync in futures::future::join_all(syncs).await {
            created += sync.unwrap().unwrap().to_create.len();
        }
        // Only the first sync to get the lock has anything to do
        assert_eq!(created, 4);
        assert_eq!(notifier.pending().len(), 4);
        assert_eq!(
            ctx.repos
                .reminders
                .find_by_certification(&cert.id)
                .await
                .unwrap()
                .len(),
            4
        );
    }

    #[tokio::test]
    async fn rejects_unknown_certification() {
        let TestContext { ctx, .. } = setup();
        let id = ID::new();
        let res = execute(SyncCertificationRemindersUseCase { certification_id: id }, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::NotFound(id));
    }
}
