//! Profile registry built from configuration

use dashmap::DashMap;

use super::types::{ProfileError, ProfileResult, SummaryProfile};

/// In-memory profile storage
pub struct ProfileStore {
    profiles: DashMap<String, SummaryProfile>,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore {
    /// Create a new profile store
    pub fn new() -> Self {
        Self {
            profiles: DashMap::new(),
        }
    }

    /// Create a new profile
    pub fn create(&self, profile: SummaryProfile) -> ProfileResult<SummaryProfile> {
        profile.validate()?;

        if self.profiles.contains_key(&profile.id) {
            return Err(ProfileError::AlreadyExists(profile.id));
        }

        tracing::debug!(profile_id = %profile.id, "Profile created");
        self.profiles.insert(profile.id.clone(), profile.clone());

        Ok(profile)
    }

    /// Get a profile by ID
    pub fn get(&self, id: &str) -> ProfileResult<SummaryProfile> {
        self.profiles
            .get(id)
            .map(|p| p.clone())
            .ok_or_else(|| ProfileError::NotFound(id.to_string()))
    }

    /// Get the number of profiles
    pub fn count(&self) -> usize {
        self.profiles.len()
    }
}
