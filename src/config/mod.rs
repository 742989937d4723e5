mod settings;

pub use settings::{
    FormatterConfig, LogFormat, LoggingConfig, OutputConfig, ProfileConfig, Settings,
};
