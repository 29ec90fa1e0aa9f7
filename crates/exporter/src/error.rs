use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid file name template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("Destination '{path}' is not accessible: {source}")]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report to '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to publish report as '{path}': {source}")]
    Publish {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Export was abandoned before '{0}' was published")]
    Abandoned(PathBuf),

    #[error("Export did not finish within {0:?}")]
    TimedOut(Duration),

    #[error("Export task stopped unexpectedly: {0}")]
    Interrupted(String),
}
