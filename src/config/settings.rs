use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Deserializer};
use std::env;

use crate::profile::{ProfileError, ProfileStore, SummaryProfile, DEFAULT_PROFILE_ID};
use crate::summary::{default_summary_fields, parse_field_list};
use crate::template::{OutputMode, RenderOptions, DEFAULT_MAX_DEPTH};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub formatter: FormatterConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Additional named profiles
    #[serde(default)]
    pub profiles: Vec<ProfileConfig>,
    /// Profile used by the CLI
    #[serde(default = "default_active_profile")]
    pub active_profile: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormatterConfig {
    /// Summary template; unset means field-list summaries
    #[serde(default)]
    pub template: Option<String>,
    /// Top-level keys shown when no template applies
    #[serde(
        default = "default_summary_fields",
        deserialize_with = "deserialize_field_list"
    )]
    pub summary_fields: Vec<String>,
    /// Recursion cap for path resolution
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// `html` for markup output, `plain` for terminals
    #[serde(default)]
    pub mode: OutputMode,
    /// Print the pretty JSON under each summary (plain mode)
    #[serde(default)]
    pub show_details: bool,
    /// Echo lines that are not JSON
    #[serde(default = "default_passthrough")]
    pub passthrough: bool,
    /// Write Prometheus metrics to stderr on exit
    #[serde(default)]
    pub report_metrics: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(
        default = "default_summary_fields",
        deserialize_with = "deserialize_field_list"
    )]
    pub summary_fields: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldList {
    Text(String),
    List(Vec<String>),
}

/// Field lists may be a sequence or comma-separated text (`KJF_FORMATTER__SUMMARY_FIELDS`)
fn deserialize_field_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match FieldList::deserialize(deserializer)? {
        FieldList::Text(raw) => parse_field_list(&raw),
        FieldList::List(fields) => fields
            .iter()
            .map(|field| field.trim())
            .filter(|field| !field.is_empty())
            .map(String::from)
            .collect(),
    })
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_passthrough() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_active_profile() -> String {
    DEFAULT_PROFILE_ID.to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Self::with_defaults(Config::builder())?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // KJF_FORMATTER__TEMPLATE, KJF_OUTPUT__MODE, KJF_LOGGING__LEVEL, etc.
            .add_source(
                Environment::with_prefix("KJF")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Settings from a TOML document layered over the defaults
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Self::with_defaults(Config::builder())?
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("formatter.max_depth", DEFAULT_MAX_DEPTH as u64)?
            .set_default("output.mode", "html")?
            .set_default("output.passthrough", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("active_profile", DEFAULT_PROFILE_ID)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            mode: self.output.mode,
            max_depth: self.formatter.max_depth,
        }
    }

    /// Profile built from the `formatter` section
    pub fn default_profile(&self) -> SummaryProfile {
        let mut profile = SummaryProfile::new(DEFAULT_PROFILE_ID, "Default");
        profile.template = self.formatter.template.clone();
        profile.summary_fields = self.formatter.summary_fields.clone();
        profile
    }

    /// Store holding the default profile plus every configured one
    pub fn profile_store(&self) -> Result<ProfileStore, ProfileError> {
        let store = ProfileStore::new();
        store.create(self.default_profile())?;

        for configured in &self.profiles {
            let mut profile = SummaryProfile::new(&configured.id, &configured.name);
            profile.template = configured.template.clone();
            profile.summary_fields = configured.summary_fields.clone();
            profile.description = configured.description.clone();
            store.create(profile)?;
        }

        Ok(store)
    }
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            template: None,
            summary_fields: default_summary_fields(),
            max_depth: default_max_depth(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            show_details: false,
            passthrough: default_passthrough(),
            report_metrics: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}
