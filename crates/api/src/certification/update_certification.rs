use super::subscribers::SyncRemindersOnCertificationUpdated;
use crate::{
    error::TrackerError,
    shared::usecase::{Subscriber, UseCase},
};
use certification_tracker_domain::{CertificationChanges, CertificationRecord, InvalidRecord, ID};
use certification_tracker_infra::TrackerContext;
use tracing::error;

#[derive(Debug)]
pub struct UpdateCertificationUseCase {
    pub certification_id: ID,
    pub changes: CertificationChanges,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidRecord(InvalidRecord),
    StorageError,
}

impl From<UseCaseError> for TrackerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => Self::NotFound(format!(
                "The certification with id: {}, was not found.",
                id
            )),
            UseCaseError::InvalidRecord(e) => Self::InvalidRecord(e),
            UseCaseError::StorageError => Self::StoreUnavailable,
        }
    }
}

#[async_trait::async_trait]
impl UseCase for UpdateCertificationUseCase {
    type Response = CertificationRecord;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &TrackerContext) -> Result<Self::Response, Self::Errors> {
        let mut certification = match ctx.repos.certifications.find(&self.certification_id).await {
            Some(certification) if certification.is_active => certification,
            _ => return Err(UseCaseError::NotFound(self.certification_id)),
        };

        certification
            .apply_changes(self.changes.clone())
            .map_err(UseCaseError::InvalidRecord)?;

        ctx.repos
            .certifications
            .save(&certification)
            .await
            .map_err(|e| {
                error!(
                    "Unable to save certification: {}. Err: {:?}",
                    certification.id, e
                );
                UseCaseError::StorageError
            })?;

        Ok(certification)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncRemindersOnCertificationUpdated)]
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
    async fn updates_certification_and_reschedules_reminders() {
        let TestContext { ctx, notifier, .. } = setup();
        let cert = insert_certification(&ctx, 100, vec![30]).await;

        let res = execute(
            UpdateCertificationUseCase {
                certification_id: cert.id,
                changes: CertificationChanges {
                    expiration_date: Some(Some(today() + Duration::days(50))),
                    reminder_offsets: Some(vec![30, 7]),
                    ..Default::default()
                },
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(res.expiration_date, Some(today() + Duration::days(50)));

        let pending = notifier.pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].reminder_id, ReminderId::new(&cert.id, 30));
        assert_eq!(pending[0].fire_at, NOW + 20 * MILLIS_PER_DAY);
        assert_eq!(pending[1].fire_at, NOW + 43 * MILLIS_PER_DAY);
    }

    #[tokio::test]
    async fn removing_expiration_date_cancels_reminders() {
        let TestContext { ctx, notifier, .. } = setup();
        let cert = insert_certification(&ctx, 100, vec![30, 7]).await;

        execute(
            UpdateCertificationUseCase {
                certification_id: cert.id,
                changes: CertificationChanges {
                    expiration_date: Some(None),
                    ..Default::default()
                },
            },
            &ctx,
        )
        .await
        .unwrap();
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
    async fn rejects_invalid_changes() {
        let TestContext { ctx, .. } = setup();
        let cert = insert_certification(&ctx, 100, vec![30]).await;

        let res = execute(
            UpdateCertificationUseCase {
                certification_id: cert.id,
                changes: CertificationChanges {
                    name: Some("  ".into()),
                    ..Default::default()
                },
            },
            &ctx,
        )
        .await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::InvalidRecord(InvalidRecord::EmptyName)
        );
        let stored = ctx.repos.certifications.find(&cert.id).await.unwrap();
        assert_eq!(stored.name, cert.name);
    }

    #[tokio::test]
    async fn rejects_unknown_certification() {
        let TestContext { ctx, .. } = setup();
        let id = ID::new();
        let res = execute(
            UpdateCertificationUseCase {
                certification_id: id,
                changes: Default::default(),
            },
            &ctx,
        )
        .await;
        assert_eq!(res.unwrap_err(), UseCaseError::NotFound(id));
    }
}
