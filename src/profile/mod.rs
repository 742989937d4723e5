//! Named summary profiles.
//!
//! This module provides:
//! - Profile definitions pairing a summary template with a fallback field list
//! - A validated in-memory registry of the configured profiles

mod store;
mod types;

pub use store::ProfileStore;
pub use types::{ProfileError, ProfileResult, SummaryProfile, DEFAULT_PROFILE_ID};
