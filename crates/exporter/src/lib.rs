//! # Vista Exporter
//!
//! Writes a formatted report to a date-stamped, fixed-layout text file.
//!
//! ## Architectural Principles
//!
//! - **Atomic Publish:** The artifact is staged in a temporary file inside the destination
//!   directory, synced to disk and renamed over the target in one step. Readers see either
//!   the previous artifact or the complete new one, never a partial write.
//! - **Overwrite, Never Merge:** A same-named artifact is replaced wholesale.
//! - **Report Date, Not Data Date:** The file name and the `Generated:` line carry the
//!   date the report was produced.
//! - **Publish or Abandon, Never Both:** A caller that stops waiting closes the
//!   `PublishGate`; the rename happens under the same gate, so a closed run never
//!   publishes late.
//!
//! ## Public API
//!
//! - `Exporter`: writes artifacts into a destination directory.
//! - `ArtifactWriter`: the seam the orchestrator exports through.
//! - `PublishGate`: decides whether a staged artifact may still be published.
//! - `NameTemplate`: validated `{date}` file name pattern.
//! - `ExportArtifact`: what was written and where.
//! - `ExportError`: the specific error types that can be returned from this crate.

use chrono::NaiveDate;
use formatter::FormattedDocument;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub mod error;
pub mod gate;
pub mod template;

pub use error::ExportError;
pub use gate::PublishGate;
pub use template::{DEFAULT_NAME_TEMPLATE, NameTemplate};

/// The file produced by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub path: PathBuf,
    pub file_name: String,
    pub bytes_written: u64,
    pub as_of: NaiveDate,
}

/// The exact bytes written for `doc` on `as_of`.
pub fn artifact_contents(doc: &FormattedDocument, as_of: NaiveDate) -> String {
    format!("Generated: {}\n{}", as_of.format("%Y-%m-%d"), doc.render())
}

/// Anything that can turn a formatted document into a published artifact.
pub trait ArtifactWriter: Send + Sync {
    /// Stages and publishes `doc`, unless `gate` is closed before the publish.
    fn write(
        &self,
        doc: &FormattedDocument,
        template: &NameTemplate,
        as_of: NaiveDate,
        gate: &PublishGate,
    ) -> Result<ExportArtifact, ExportError>;
}

/// Writes artifacts into one destination directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    destination: PathBuf,
}

impl Exporter {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Writes `doc` as `template` rendered for `as_of`, replacing any same-named file.
    pub fn export(
        &self,
        doc: &FormattedDocument,
        template: &NameTemplate,
        as_of: NaiveDate,
    ) -> Result<ExportArtifact, ExportError> {
        self.export_gated(doc, template, as_of, &PublishGate::new())
    }

    /// Like [`Exporter::export`], but discards the staged file instead of publishing
    /// it if `gate` has been closed by the time the write is complete.
    #[tracing::instrument(
        name = "export",
        skip(self, doc, template, gate),
        fields(destination = %self.destination.display(), template = %template)
    )]
    pub fn export_gated(
        &self,
        doc: &FormattedDocument,
        template: &NameTemplate,
        as_of: NaiveDate,
        gate: &PublishGate,
    ) -> Result<ExportArtifact, ExportError> {
        let file_name = template.file_name(as_of);
        let target = self.destination.join(&file_name);

        std::fs::create_dir_all(&self.destination).map_err(|source| {
            ExportError::Destination {
                path: self.destination.clone(),
                source,
            }
        })?;

        let mut staged = tempfile::Builder::new()
            .prefix(".vista-")
            .suffix(".partial")
            .tempfile_in(&self.destination)
            .map_err(|source| ExportError::Destination {
                path: self.destination.clone(),
                source,
            })?;

        let contents = artifact_contents(doc, as_of);
        write_staged(&mut staged, contents.as_bytes()).map_err(|source| ExportError::Write {
            path: target.clone(),
            source,
        })?;

        match gate.publish(|| staged.persist(&target)) {
            None => {
                tracing::warn!(path = %target.display(), "Export abandoned; staged file discarded.");
                return Err(ExportError::Abandoned(target));
            }
            Some(Err(e)) => {
                return Err(ExportError::Publish {
                    path: target.clone(),
                    source: e.error,
                });
            }
            Some(Ok(_)) => {}
        }

        let artifact = ExportArtifact {
            path: target,
            file_name,
            bytes_written: contents.len() as u64,
            as_of,
        };
        tracing::info!(
            path = %artifact.path.display(),
            bytes = artifact.bytes_written,
            "Report artifact published."
        );
        Ok(artifact)
    }
}

impl ArtifactWriter for Exporter {
    fn write(
        &self,
        doc: &FormattedDocument,
        template: &NameTemplate,
        as_of: NaiveDate,
        gate: &PublishGate,
    ) -> Result<ExportArtifact, ExportError> {
        self.export_gated(doc, template, as_of, gate)
    }
}

fn write_staged(staged: &mut NamedTempFile, bytes: &[u8]) -> std::io::Result<()> {
    staged.write_all(bytes)?;
    staged.flush()?;
    staged.as_file().sync_all()
}
