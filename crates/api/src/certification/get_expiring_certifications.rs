use super::CertificationWithStatus;
use crate::{error::TrackerError, shared::usecase::UseCase};
use certification_tracker_domain::{date_in_tz, EXPIRING_SOON_THRESHOLD_DAYS};
use certification_tracker_infra::TrackerContext;
use chrono::{naive::MAX_DATE, Duration};

/// Active certifications that expire from today up to `within_days` days from today
#[derive(Debug)]
pub struct GetExpiringCertificationsUseCase {
    pub within_days: u32,
}

impl Default for GetExpiringCertificationsUseCase {
    fn default() -> Self {
        Self {
            within_days: EXPIRING_SOON_THRESHOLD_DAYS as u32,
        }
    }
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
impl UseCase for GetExpiringCertificationsUseCase {
    type Response = Vec<CertificationWithStatus>;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &TrackerContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let tz = ctx.config.timezone;
        let today = date_in_tz(now, &tz);
        let end = today
            .checked_add_signed(Duration::days(self.within_days as i64))
            .unwrap_or(MAX_DATE);

        let certifications = ctx
            .repos
            .certifications
            .find_expiring_between(today, end)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(certifications
            .into_iter()
            .map(|certification| CertificationWithStatus::new(certification, now, &tz))
            .collect())
    }
}
