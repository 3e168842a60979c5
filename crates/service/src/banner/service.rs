use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use models::banner;

use crate::banner::{BannerRepository, TITLE_TAKEN};
use crate::errors::ServiceError;
use crate::validation::HtmlValidator;

pub const QUERY_PARAM_REQUIRED: &str = "At least one query parameter must be specified";

/// Create/update payload. The id is never client-supplied.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BannerInput {
    pub title: String,
    pub html: String,
}

impl BannerInput {
    pub fn validate(&self) -> Result<(), ServiceError> {
        banner::validate_title(&self.title)?;
        banner::validate_html(&self.html)?;
        Ok(())
    }
}

/// Application service encapsulating the banner business rules: uniqueness
/// checks, external HTML validation, and persistence, in that order.
pub struct BannerService {
    repo: Arc<dyn BannerRepository>,
    validator: Arc<dyn HtmlValidator>,
}

impl BannerService {
    pub fn new(repo: Arc<dyn BannerRepository>, validator: Arc<dyn HtmlValidator>) -> Self {
        Self { repo, validator }
    }

    /// List banners whose title contains the fragment. At least one non-blank
    /// criterion is required; an empty result set is a successful outcome.
    pub async fn query(&self, title: Option<&str>) -> Result<Vec<banner::Model>, ServiceError> {
        let fragment = match title {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(ServiceError::Validation(QUERY_PARAM_REQUIRED.into())),
        };
        self.repo.find_by_title_contains(fragment).await
    }

    pub async fn get(&self, id: i32) -> Result<banner::Model, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("banner"))
    }

    pub async fn get_html(&self, id: i32) -> Result<String, ServiceError> {
        Ok(self.get(id).await?.html)
    }

    pub async fn create(&self, input: BannerInput) -> Result<banner::Model, ServiceError> {
        input.validate()?;

        if self.repo.exists_by_title(&input.title, None).await? {
            return Err(ServiceError::Conflict(TITLE_TAKEN.into()));
        }

        let result = self.validator.validate(&input.html).await?;
        if !result.is_valid() {
            return Err(ServiceError::InvalidHtml(result));
        }

        let created = self.repo.insert(&input.title, &input.html).await?;
        info!(id = created.id, title = %created.title, "banner created");
        Ok(created)
    }

    /// Uniqueness is checked before existence, so updating a missing id with
    /// an already-used title reports the conflict, not the missing record.
    pub async fn update(&self, id: i32, input: BannerInput) -> Result<banner::Model, ServiceError> {
        input.validate()?;

        if self.repo.exists_by_title(&input.title, Some(id)).await? {
            return Err(ServiceError::Conflict(TITLE_TAKEN.into()));
        }

        if self.repo.find_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("banner"));
        }

        let result = self.validator.validate(&input.html).await?;
        if !result.is_valid() {
            return Err(ServiceError::InvalidHtml(result));
        }

        let updated = self
            .repo
            .update(id, &input.title, &input.html)
            .await?
            .ok_or_else(|| ServiceError::not_found("banner"))?;
        info!(id = updated.id, "banner updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("banner"));
        }
        info!(id, "banner deleted");
        Ok(())
    }
}
