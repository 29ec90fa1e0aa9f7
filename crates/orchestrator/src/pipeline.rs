use crate::catalog::ViewCatalog;
use crate::error::OrchestratorError;
use crate::state::{ActiveRun, ExportTask, Machine, RunOutcome, RunState, lock};
use assembler::ReportAssembler;
use chrono::NaiveDate;
use configuration::ReportSettings;
use core_types::FilterSource;
use exporter::{ArtifactWriter, ExportArtifact, ExportError, Exporter, NameTemplate, PublishGate};
use formatter::FormattedDocument;
use std::sync::{Arc, Mutex};
use tokio::task::JoinError;
use uuid::Uuid;

/// Drives one report run at a time through assembly, formatting and export.
pub struct Orchestrator {
    settings: ReportSettings,
    template: NameTemplate,
    filters: Arc<dyn FilterSource>,
    catalog: Arc<ViewCatalog>,
    assembler: ReportAssembler,
    writer: Arc<dyn ArtifactWriter>,
    machine: Mutex<Machine>,
    last_outcome: Mutex<Option<RunOutcome>>,
}

impl Orchestrator {
    /// Validates `settings` up front so a bad view order or file name template
    /// is reported before the first trigger. Artifacts go to `settings.destination`.
    pub fn new(
        settings: ReportSettings,
        filters: Arc<dyn FilterSource>,
        catalog: Arc<ViewCatalog>,
    ) -> Result<Self, OrchestratorError> {
        let writer = Arc::new(Exporter::new(settings.destination.clone()));
        Self::with_writer(settings, filters, catalog, writer)
    }

    /// Like [`Orchestrator::new`], exporting through `writer` instead.
    pub fn with_writer(
        settings: ReportSettings,
        filters: Arc<dyn FilterSource>,
        catalog: Arc<ViewCatalog>,
        writer: Arc<dyn ArtifactWriter>,
    ) -> Result<Self, OrchestratorError> {
        settings.validate()?;
        let template = NameTemplate::parse(&settings.name_template)
            .map_err(|e| OrchestratorError::Configuration(e.to_string()))?;

        tracing::info!(
            views = ?settings.view_order,
            destination = %settings.destination.display(),
            template = %template,
            "Orchestrator initialized."
        );

        Ok(Self {
            assembler: ReportAssembler::new(settings.title.clone()),
            writer,
            settings,
            template,
            filters,
            catalog,
            machine: Mutex::new(Machine::default()),
            last_outcome: Mutex::new(None),
        })
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    pub fn state(&self) -> RunState {
        lock(&self.machine).state
    }

    /// Every state the most recent run (or preview) passed through, ending in `Idle`
    /// once it has finished.
    pub fn last_trail(&self) -> Vec<RunState> {
        lock(&self.machine).trail.clone()
    }

    pub fn last_outcome(&self) -> Option<RunOutcome> {
        lock(&self.last_outcome).clone()
    }

    /// Produces the report artifact for `as_of`.
    ///
    /// Fails with `Busy` without side effects if another run is in flight. The live
    /// filters are read exactly once, on entering `Assembling`.
    #[tracing::instrument(name = "report_run", skip(self), fields(run.id = %Uuid::new_v4()))]
    pub async fn generate(&self, as_of: NaiveDate) -> Result<ExportArtifact, OrchestratorError> {
        let run = ActiveRun::begin(&self.machine)?;
        tracing::info!("Report generation started.");

        let result = self.run_stages(&run, as_of).await;
        match &result {
            Ok(artifact) => {
                run.advance(RunState::Done);
                tracing::info!(
                    path = %artifact.path.display(),
                    bytes = artifact.bytes_written,
                    "Report generation completed."
                );
                *lock(&self.last_outcome) = Some(RunOutcome::Completed(artifact.clone()));
            }
            Err(e) => {
                run.advance(RunState::Failed);
                tracing::error!(error = %e, "Report generation failed.");
                *lock(&self.last_outcome) = Some(RunOutcome::Failed(e.to_string()));
            }
        }
        result
    }

    /// Renders the report as it would be exported right now, without writing anything.
    #[tracing::instrument(name = "report_preview", skip(self))]
    pub fn preview(&self) -> Result<String, OrchestratorError> {
        let run = ActiveRun::begin(&self.machine)?;
        match self.build(&run) {
            Ok(formatted) => Ok(formatted.render()),
            Err(e) => {
                run.advance(RunState::Failed);
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        run: &ActiveRun<'_>,
        as_of: NaiveDate,
    ) -> Result<ExportArtifact, OrchestratorError> {
        let formatted = self.build(run)?;
        run.advance(RunState::Exporting);
        self.export(run, formatted, as_of).await
    }

    fn build(&self, run: &ActiveRun<'_>) -> Result<FormattedDocument, OrchestratorError> {
        // The only read of the live filters for this run.
        let filters = self.filters.snapshot();
        let views = self.catalog.select(&self.settings.view_order)?;
        let document = self.assembler.assemble(&views, &filters)?;

        run.advance(RunState::Formatting);
        Ok(formatter::format(&document)?)
    }

    async fn export(
        &self,
        run: &ActiveRun<'_>,
        formatted: FormattedDocument,
        as_of: NaiveDate,
    ) -> Result<ExportArtifact, OrchestratorError> {
        let limit = self.settings.export_timeout;
        let gate = Arc::new(PublishGate::new());
        let mut task: ExportTask = tokio::task::spawn_blocking({
            let writer = Arc::clone(&self.writer);
            let template = self.template.clone();
            let gate = Arc::clone(&gate);
            move || writer.write(&formatted, &template, as_of, &gate)
        });

        match tokio::time::timeout(limit, &mut task).await {
            Ok(joined) => settle(joined),
            Err(_) if gate.close() => {
                // The blocking write cannot be cancelled. It will discard its staged
                // file, and no new run starts until it has returned.
                tracing::warn!(timeout = ?limit, "Export timed out; abandoning the write.");
                run.park_export(task);
                Err(ExportError::TimedOut(limit).into())
            }
            Err(_) => {
                // Published right at the deadline: the file on disk belongs to this run.
                tracing::warn!(timeout = ?limit, "Export finished at the deadline; keeping it.");
                settle(task.await)
            }
        }
    }
}

fn settle(
    joined: Result<Result<ExportArtifact, ExportError>, JoinError>,
) -> Result<ExportArtifact, OrchestratorError> {
    match joined {
        Ok(result) => Ok(result?),
        Err(join_error) => Err(ExportError::Interrupted(join_error.to_string()).into()),
    }
}
