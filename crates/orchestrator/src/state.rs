use crate::error::OrchestratorError;
use exporter::{ExportArtifact, ExportError};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::task::JoinHandle;

pub(crate) type ExportTask = JoinHandle<Result<ExportArtifact, ExportError>>;

/// Where a report run currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Assembling,
    Formatting,
    Exporting,
    Done,
    Failed,
}

impl RunState {
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            RunState::Assembling | RunState::Formatting | RunState::Exporting
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Assembling => "assembling",
            RunState::Formatting => "formatting",
            RunState::Exporting => "exporting",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How the most recent report run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(ExportArtifact),
    Failed(String),
}

/// The current state plus every state the latest run has passed through.
#[derive(Debug, Default)]
pub(crate) struct Machine {
    pub(crate) state: RunState,
    pub(crate) trail: Vec<RunState>,
    /// A timed-out export whose blocking write has not returned yet.
    pub(crate) draining: Option<ExportTask>,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn lock_read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn lock_write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive ownership of the state machine for one run.
///
/// Only one can exist at a time. Dropping it returns the machine to `Idle`,
/// including when the run's future is dropped mid-flight.
pub(crate) struct ActiveRun<'a> {
    machine: &'a Mutex<Machine>,
}

impl<'a> ActiveRun<'a> {
    /// `Idle -> Assembling`, or `Busy` if another run holds the machine or a
    /// timed-out export from an earlier run is still writing.
    pub(crate) fn begin(machine: &'a Mutex<Machine>) -> Result<Self, OrchestratorError> {
        let mut m = lock(machine);
        if m.state != RunState::Idle {
            return Err(OrchestratorError::Busy(m.state));
        }
        if m.draining.as_ref().is_some_and(|task| !task.is_finished()) {
            return Err(OrchestratorError::Busy(RunState::Exporting));
        }
        m.draining = None;
        m.state = RunState::Assembling;
        m.trail = vec![RunState::Assembling];
        tracing::debug!(to = %RunState::Assembling, "Run state transition.");
        Ok(Self { machine })
    }

    pub(crate) fn advance(&self, next: RunState) {
        let mut m = lock(self.machine);
        tracing::debug!(from = %m.state, to = %next, "Run state transition.");
        m.state = next;
        m.trail.push(next);
    }

    /// Keeps an abandoned export task so no new run starts until it has returned.
    pub(crate) fn park_export(&self, task: ExportTask) {
        lock(self.machine).draining = Some(task);
    }
}

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        let mut m = lock(self.machine);
        if m.state.is_in_flight() {
            tracing::warn!(state = %m.state, "Run abandoned before completion.");
        }
        m.state = RunState::Idle;
        m.trail.push(RunState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_run_at_a_time() {
        let machine = Mutex::new(Machine::default());
        let run = ActiveRun::begin(&machine).unwrap();
        run.advance(RunState::Formatting);

        let err = ActiveRun::begin(&machine).err().unwrap();
        assert!(matches!(err, OrchestratorError::Busy(RunState::Formatting)));

        drop(run);
        assert!(ActiveRun::begin(&machine).is_ok());
    }

    #[tokio::test]
    async fn parked_export_blocks_new_runs_until_it_returns() {
        let machine = Mutex::new(Machine::default());
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let task: ExportTask = tokio::task::spawn_blocking(move || {
            release_rx.recv().ok();
            Err(ExportError::Interrupted("abandoned".to_string()))
        });
        {
            let run = ActiveRun::begin(&machine).unwrap();
            run.park_export(task);
            run.advance(RunState::Failed);
        }

        let err = ActiveRun::begin(&machine).err().unwrap();
        assert!(matches!(err, OrchestratorError::Busy(RunState::Exporting)));

        release_tx.send(()).unwrap();
        while lock(&machine)
            .draining
            .as_ref()
            .is_some_and(|task| !task.is_finished())
        {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert!(ActiveRun::begin(&machine).is_ok());
        assert!(lock(&machine).draining.is_none());
    }

    #[test]
    fn dropping_a_run_returns_to_idle() {
        let machine = Mutex::new(Machine::default());
        {
            let run = ActiveRun::begin(&machine).unwrap();
            run.advance(RunState::Formatting);
            run.advance(RunState::Failed);
        }
        let m = lock(&machine);
        assert_eq!(m.state, RunState::Idle);
        assert_eq!(
            m.trail,
            [
                RunState::Assembling,
                RunState::Formatting,
                RunState::Failed,
                RunState::Idle
            ]
        );
    }
}
