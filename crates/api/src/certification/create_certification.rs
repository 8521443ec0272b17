use super::subscribers::CreateRemindersOnCertificationCreated;
use crate::{
    error::TrackerError,
    shared::usecase::{Subscriber, UseCase},
};
use certification_tracker_domain::{CertificationRecord, InvalidRecord, NewCertification};
use certification_tracker_infra::TrackerContext;
use tracing::error;

#[derive(Debug)]
pub struct CreateCertificationUseCase {
    pub certification: NewCertification,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidRecord(InvalidRecord),
    StorageError,
}

impl From<UseCaseError> for TrackerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidRecord(e) => Self::InvalidRecord(e),
            UseCaseError::StorageError => Self::StoreUnavailable,
        }
    }
}

/// Validates and stores a new certification, falling back to the
/// configured reminder offsets when none are given
pub(crate) async fn create_certification(
    mut input: NewCertification,
    ctx: &TrackerContext,
) -> Result<CertificationRecord, UseCaseError> {
    if input.reminder_offsets.is_none() {
        input.reminder_offsets = Some(
            ctx.config
                .default_reminder_offsets
                .iter()
                .map(i64::from)
                .collect(),
        );
    }
    let certification = CertificationRecord::new(input).map_err(UseCaseError::InvalidRecord)?;

    ctx.repos
        .certifications
        .insert(&certification)
        .await
        .map_err(|e| {
            error!(
                "Unable to store certification: {}. Err: {:?}",
                certification.id, e
            );
            UseCaseError::StorageError
        })?;

    // Get the timestamps set by the store
    Ok(ctx
        .repos
        .certifications
        .find(&certification.id)
        .await
        .unwrap_or(certification))
}

#[async_trait::async_trait]
impl UseCase for CreateCertificationUseCase {
    type Response = CertificationRecord;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &TrackerContext) -> Result<Self::Response, Self::Errors> {
        create_certification(self.certification.clone(), ctx).await
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(CreateRemindersOnCertificationCreated)]
    }
}
