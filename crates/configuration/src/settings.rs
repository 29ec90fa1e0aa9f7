use crate::error::ConfigError;
use exporter::NameTemplate;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for report generation.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    /// Names of the views to include, in section order.
    #[serde(default)]
    pub view_order: Vec<String>,
    /// Artifact file name pattern; `{date}` becomes the generation date.
    #[serde(default = "default_name_template")]
    pub name_template: String,
    /// Directory the artifact is written to.
    #[serde(default = "default_destination")]
    pub destination: PathBuf,
    /// Upper bound on the export step before the run is failed.
    #[serde(default = "default_export_timeout", with = "humantime_serde")]
    pub export_timeout: Duration,
    /// Title printed at the top of every report.
    #[serde(default = "default_title")]
    pub title: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_name_template() -> String {
    exporter::DEFAULT_NAME_TEMPLATE.to_string()
}

fn default_destination() -> PathBuf {
    PathBuf::from("reports")
}

fn default_export_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_title() -> String {
    "Sales Report".to_string()
}

impl ReportSettings {
    /// Settings with defaults everywhere except the view order.
    pub fn new<I, S>(view_order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            view_order: view_order.into_iter().map(Into::into).collect(),
            name_template: default_name_template(),
            destination: default_destination(),
            export_timeout: default_export_timeout(),
            title: default_title(),
            log_dir: None,
        }
    }

    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.view_order.is_empty() {
            return Err(ConfigError::ValidationError(
                "view_order must name at least one view".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for name in &self.view_order {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "view_order contains a blank view name".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "view '{}' appears more than once in view_order",
                    name
                )));
            }
        }
        NameTemplate::parse(&self.name_template)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        if self.export_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "export_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
