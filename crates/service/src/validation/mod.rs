use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

pub mod client;
pub use client::HttpHtmlValidator;

/// Outcome of an HTML validation run. Valid means zero error messages;
/// warnings and info messages from the validator are not kept.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[async_trait]
pub trait HtmlValidator: Send + Sync {
    /// Submit raw HTML to the validation collaborator. `Unavailable` signals
    /// the collaborator itself failed; it is never folded into the result.
    async fn validate(&self, html: &str) -> Result<ValidationResult, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_iff_no_errors() {
        assert!(ValidationResult::default().is_valid());
        let r = ValidationResult { errors: vec!["bad tag".into()] };
        assert!(!r.is_valid());
    }
}
