use crate::shared::usecase::UseCase;
use certification_tracker_domain::{
    all_templates, popular_templates, template_categories, templates_by_category,
    CertificationTemplate,
};
use certification_tracker_infra::TrackerContext;

#[derive(Debug, Default)]
pub struct ListTemplatesUseCase {
    pub category: Option<String>,
    pub popular_only: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {}

#[async_trait::async_trait]
impl UseCase for ListTemplatesUseCase {
    type Response = Vec<&'static CertificationTemplate>;

    type Errors = UseCaseError;

    async fn execute(&mut self, _ctx: &TrackerContext) -> Result<Self::Response, Self::Errors> {
        let templates = match &self.category {
            Some(category) => templates_by_category(category),
            None if self.popular_only => popular_templates(),
            None => all_templates(),
        };
        Ok(templates
            .into_iter()
            .filter(|t| t.is_popular || !self.popular_only)
            .collect())
    }
}

#[derive(Debug)]
pub struct ListTemplateCategoriesUseCase;

#[async_trait::async_trait]
impl UseCase for ListTemplateCategoriesUseCase {
    type Response = Vec<&'static str>;

    type Errors = UseCaseError;

    async fn execute(&mut self, _ctx: &TrackerContext) -> Result<Self::Response, Self::Errors> {
        Ok(template_categories())
    }
}
