// Template engine (core)
pub mod summary;
pub mod template;

// Formatting built on the engine
pub mod formatter;
pub mod pipeline;
pub mod profile;

// Supporting modules
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;
