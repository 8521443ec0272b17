use super::subscribers::CancelRemindersOnCertificationDeactivated;
use crate::{
    error::TrackerError,
    shared::usecase::{Subscriber, UseCase},
};
use certification_tracker_domain::{CertificationRecord, ID};
use certification_tracker_infra::TrackerContext;
use tracing::error;

/// Soft deletes a certification. It is kept in the store but no longer
/// listed and its reminders are cancelled.
#[derive(Debug)]
pub struct DeactivateCertificationUseCase {
    pub certification_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for TrackerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => Self::NotFound(format!(
                "The certification with id: {}, was not found.",
                id
            )),
            UseCaseError::StorageError => Self::StoreUnavailable,
        }
    }
}

#[async_trait::async_trait]
impl UseCase for DeactivateCertificationUseCase {
    type Response = CertificationRecord;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &TrackerContext) -> Result<Self::Response, Self::Errors> {
        let mut certification = ctx
            .repos
            .certifications
            .find(&self.certification_id)
            .await
            .ok_or(UseCaseError::NotFound(self.certification_id))?;

        if certification.is_active {
            certification.is_active = false;
            ctx.repos
                .certifications
                .save(&certification)
                .await
                .map_err(|e| {
                    error!(
                        "Unable to deactivate certification: {}. Err: {:?}",
                        certification.id, e
                    );
                    UseCaseError::StorageError
                })?;
        }

        Ok(certification)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(CancelRemindersOnCertificationDeactivated)]
    }
}
