use crate::state::RunState;
use assembler::AssemblyError;
use configuration::error::ConfigError;
use core_types::SchemaError;
use exporter::ExportError;
use formatter::FormatError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("A report run is already in progress (state: {0})")]
    Busy(RunState),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Configuration error: view '{view}' has a malformed schema: {source}")]
    InvalidSchema {
        view: String,
        #[source]
        source: SchemaError,
    },

    #[error("Configuration error: {0}")]
    Settings(#[from] ConfigError),

    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Formatting error: {0}")]
    Format(#[from] FormatError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl OrchestratorError {
    /// True for defects that will fail every run until the setup is fixed.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            OrchestratorError::Configuration(_)
                | OrchestratorError::InvalidSchema { .. }
                | OrchestratorError::Settings(_)
        )
    }
}
