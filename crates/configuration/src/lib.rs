use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::ReportSettings;

/// Looked up (with any supported extension) when no explicit file is given.
pub const DEFAULT_CONFIG_FILE: &str = "vista";

/// Environment variables with this prefix override file values, e.g. `VISTA_DESTINATION`.
pub const ENV_PREFIX: &str = "VISTA";

/// Loads and validates the report settings.
///
/// An explicit `path` must exist. Without one, `vista.toml` in the working directory
/// is used if present. Environment variables are layered on top; `VISTA_VIEW_ORDER`
/// takes a comma-separated list.
pub fn load_settings(path: Option<&Path>) -> Result<ReportSettings, ConfigError> {
    load_from(path, config::Environment::with_prefix(ENV_PREFIX))
}

fn load_from(
    path: Option<&Path>,
    environment: config::Environment,
) -> Result<ReportSettings, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            environment
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("view_order"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `ReportSettings` struct
    let settings = builder.try_deserialize::<ReportSettings>()?;
    settings.validate()?;

    tracing::debug!(?settings, "Report settings loaded.");
    Ok(settings)
}
