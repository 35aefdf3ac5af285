//! Run configuration: types, validation, and YAML file loading.

mod file;
mod types;
mod validation;

pub use file::{discover_config_file, load_config, load_or_default};
pub use types::{AppConfig, AppConfigBuilder, DiagnosticsConfig, PipelineConfig};
pub use validation::Validatable;
