use super::CertificationWithStatus;
use crate::{error::TrackerError, shared::usecase::UseCase};
use certification_tracker_domain::ID;
use certification_tracker_infra::TrackerContext;

#[derive(Debug)]
pub struct GetCertificationUseCase {
    pub certification_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for TrackerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => Self::NotFound(format!(
                "The certification with id: {}, was not found.",
                id
            )),
        }
    }
}

#[async_trait::async_trait]
impl UseCase for GetCertificationUseCase {
    type Response = CertificationWithStatus;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &TrackerContext) -> Result<Self::Response, Self::Errors> {
        let certification = ctx
            .repos
            .certifications
            .find(&self.certification_id)
            .await
            .ok_or(UseCaseError::NotFound(self.certification_id))?;

        Ok(CertificationWithStatus::new(
            certification,
            ctx.sys.get_timestamp_millis(),
            &ctx.config.timezone,
        ))
    }
}
