//! Summary profile types and definitions

use thiserror::Error;

use crate::summary::{default_summary_fields, SummaryConfig};

/// Identifier of the profile built from the `formatter` settings section
pub const DEFAULT_PROFILE_ID: &str = "default";

const MAX_TEMPLATE_LEN: usize = 4096;

/// Profile-specific error type
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Profile already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid profile ID: {0}")]
    InvalidId(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
}

/// Result type for profile operations
pub type ProfileResult<T> = Result<T, ProfileError>;

/// A named summary setup: template plus fallback field list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryProfile {
    /// Unique profile identifier (alphanumeric, dash, underscore)
    pub id: String,

    /// Human-readable profile name
    pub name: String,

    /// Summary template (optional)
    pub template: Option<String>,

    /// Fields shown when the template does not apply
    pub summary_fields: Vec<String>,

    /// Profile description (optional)
    pub description: Option<String>,
}

impl SummaryProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            template: None,
            summary_fields: default_summary_fields(),
            description: None,
        }
    }

    /// Validate the profile
    pub fn validate(&self) -> ProfileResult<()> {
        if self.id.is_empty() || self.id.len() > 64 {
            return Err(ProfileError::InvalidId(
                "ID must be 1-64 characters".to_string(),
            ));
        }

        if !self
            .id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ProfileError::InvalidId(
                "ID must contain only alphanumeric, dash, or underscore".to_string(),
            ));
        }

        if self.name.is_empty() || self.name.len() > 256 {
            return Err(ProfileError::InvalidProfile(
                "Name must be 1-256 characters".to_string(),
            ));
        }

        if self
            .template
            .as_ref()
            .is_some_and(|t| t.len() > MAX_TEMPLATE_LEN)
        {
            return Err(ProfileError::InvalidProfile(format!(
                "Template must be at most {} characters",
                MAX_TEMPLATE_LEN
            )));
        }

        if self.summary_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ProfileError::InvalidProfile(
                "Summary fields must not be blank".to_string(),
            ));
        }

        Ok(())
    }

    /// Summary parameters for this profile
    pub fn summary_config(&self) -> SummaryConfig {
        SummaryConfig {
            template: self.template.clone(),
            fields: self.summary_fields.clone(),
        }
    }
}
