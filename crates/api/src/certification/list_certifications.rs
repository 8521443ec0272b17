use super::CertificationWithStatus;
use crate::{error::TrackerError, shared::usecase::UseCase};
use certification_tracker_domain::CertificationStatus;
use certification_tracker_infra::TrackerContext;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusFilter {
    Active,
    ExpiringSoon,
    Expired,
}

impl StatusFilter {
    fn matches(&self, status: &CertificationStatus) -> bool {
        match self {
            Self::Active => status.is_active(),
            Self::ExpiringSoon => status.is_expiring_soon(),
            Self::Expired => status.is_expired(),
        }
    }
}

/// Lists the active certifications, the ones expiring first at the top
#[derive(Debug, Default)]
pub struct ListCertificationsUseCase {
    pub status: Option<StatusFilter>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for TrackerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::StoreUnavailable,
        }
    }
}

#[async_trait::async_trait]
impl UseCase for ListCertificationsUseCase {
    type Response = Vec<CertificationWithStatus>;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &TrackerContext) -> Result<Self::Response, Self::Errors> {
        let certifications = ctx
            .repos
            .certifications
            .find_active()
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let now = ctx.sys.get_timestamp_millis();
        Ok(certifications
            .into_iter()
            .map(|certification| {
                CertificationWithStatus::new(certification, now, &ctx.config.timezone)
            })
            .filter(|c| match &self.status {
                Some(filter) => filter.matches(&c.status),
                None => true,
            })
            .collect())
    }
}
