use crate::{error::TrackerError, shared::usecase::UseCase};
use certification_tracker_domain::{ScheduledReminder, ID};
use certification_tracker_infra::TrackerContext;

#[derive(Debug)]
pub struct GetCertificationRemindersUseCase {
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
impl UseCase for GetCertificationRemindersUseCase {
    type Response = Vec<ScheduledReminder>;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &TrackerContext) -> Result<Self::Response, Self::Errors> {
        if ctx
            .repos
            .certifications
            .find(&self.certification_id)
            .await
            .is_none()
        {
            return Err(UseCaseError::NotFound(self.certification_id));
        }
        ctx.repos
            .reminders
            .find_by_certification(&self.certification_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
