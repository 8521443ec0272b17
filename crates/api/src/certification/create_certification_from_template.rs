use super::{
    create_certification::{create_certification, UseCaseError as CreateError},
    subscribers::CreateRemindersOnCertificationCreated,
};
use crate::{
    error::TrackerError,
    shared::usecase::{Subscriber, UseCase},
};
use certification_tracker_domain::{find_template, CertificationRecord, InvalidRecord};
use certification_tracker_infra::TrackerContext;
use chrono::NaiveDate;

/// Creates a certification prefilled from one of the built in templates.
/// The expiration date follows from the issue date and the validity period.
#[derive(Debug)]
pub struct CreateCertificationFromTemplateUseCase {
    pub template_id: String,
    pub issue_date: NaiveDate,
    pub certification_number: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    TemplateNotFound(String),
    InvalidRecord(InvalidRecord),
    StorageError,
}

impl From<CreateError> for UseCaseError {
    fn from(e: CreateError) -> Self {
        match e {
            CreateError::InvalidRecord(e) => Self::InvalidRecord(e),
            CreateError::StorageError => Self::StorageError,
        }
    }
}

impl From<UseCaseError> for TrackerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::TemplateNotFound(id) => {
                Self::NotFound(format!("The template with id: {}, was not found.", id))
            }
            UseCaseError::InvalidRecord(e) => Self::InvalidRecord(e),
            UseCaseError::StorageError => Self::StoreUnavailable,
        }
    }
}

#[async_trait::async_trait]
impl UseCase for CreateCertificationFromTemplateUseCase {
    type Response = CertificationRecord;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &TrackerContext) -> Result<Self::Response, Self::Errors> {
        let template = find_template(&self.template_id)
            .ok_or_else(|| UseCaseError::TemplateNotFound(self.template_id.clone()))?;

        let mut input = template.new_certification(self.issue_date);
        input.certification_number = self.certification_number.clone();

        Ok(create_certification(input, ctx).await?)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(CreateRemindersOnCertificationCreated)]
    }
}
