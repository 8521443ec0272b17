use crate::{error::TrackerError, shared::usecase::UseCase};
use certification_tracker_domain::{CertificationRecord, ID};
use certification_tracker_infra::TrackerContext;
use tracing::error;

/// Permanently deletes a certification together with its reminders
#[derive(Debug)]
pub struct DeleteCertificationUseCase {
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
impl UseCase for DeleteCertificationUseCase {
    type Response = CertificationRecord;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &TrackerContext) -> Result<Self::Response, Self::Errors> {
        let _guard = ctx.locks.lock(&self.certification_id).await;

        if ctx
            .repos
            .certifications
            .find(&self.certification_id)
            .await
            .is_none()
        {
            return Err(UseCaseError::NotFound(self.certification_id));
        }

        let reminders = ctx
            .repos
            .reminders
            .find_by_certification(&self.certification_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        for reminder in &reminders {
            ctx.notifier.cancel(&reminder.id).await.map_err(|e| {
                error!("Unable to cancel reminder: {}. Err: {:?}", reminder.id, e);
                UseCaseError::NotifierError
            })?;
        }
        ctx.repos
            .reminders
            .delete_by_certification(&self.certification_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        ctx.repos
            .certifications
            .delete(&self.certification_id)
            .await
            .ok_or(UseCaseError::NotFound(self.certification_id))
    }
}
