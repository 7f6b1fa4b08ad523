pub mod config;
pub mod validate;

pub use config::{load_config, ConfigError, EngineConfig};
pub use validate::{validate_config, ValidationReport, ValidationSeverity};
