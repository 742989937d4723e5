use thiserror::Error;

use crate::profile::ProfileError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

impl AppError {
    /// Stable code for log fields
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Profile(ProfileError::NotFound(_)) => "PROFILE_NOT_FOUND",
            AppError::Profile(_) => "PROFILE_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
