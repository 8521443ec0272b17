use crate::{error::TrackerError, shared::usecase::UseCase};
use certification_tracker_domain::{CertificationRecord, InvalidRecord, ID};
use certification_tracker_infra::TrackerContext;
use tracing::error;

/// Adds earned continuing education units to a certification
#[derive(Debug)]
pub struct RecordCeuUseCase {
    pub certification_id: ID,
    pub earned: i64,
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
impl UseCase for RecordCeuUseCase {
    type Response = CertificationRecord;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &TrackerContext) -> Result<Self::Response, Self::Errors> {
        if self.earned < 0 {
            return Err(UseCaseError::InvalidRecord(InvalidRecord::NegativeCeu(
                self.earned,
            )));
        }

        let mut certification = match ctx.repos.certifications.find(&self.certification_id).await {
            Some(certification) if certification.is_active => certification,
            _ => return Err(UseCaseError::NotFound(self.certification_id)),
        };
        certification
            .add_ceu(self.earned)
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
}
