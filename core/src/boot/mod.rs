//! Boot orchestrator
//!
//! Drives the boot as a linear state machine:
//!
//! ```text
//! Init -> MountStorage -> LoadLibraries -> LoadEntrypoint -> Idle
//! ```
//!
//! Each step is a separate type ([`Boot`], [`Mounted`], [`Idle`]) so the
//! sequence cannot be run out of order. Only the storage mount can fail
//! the boot; every script problem is logged and the sequence carries on.
//! The interpreter context lives exactly as long as the loading phase and
//! is dropped before the boot task parks in [`Idle`] for good.

mod idle;


pub use idle::{Idle, Scheduler, ThreadScheduler};

use serde::Serialize;
use std::convert::Infallible;
use std::io;
use std::path::Path;
use std::thread;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::discovery;
use crate::executor::{self, ExecutionOutcome, ScriptSource};
use crate::interpreter::Interpreter;
use crate::storage::{MountError, StorageMount};

/// Smallest stack the boot task gets on a hosted target; the configured
/// size is the device task's and is too tight for a desktop thread.
pub(crate) const HOST_MIN_STACK: usize = 256 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BootState {
    Init,
    MountStorage,
    LoadLibraries,
    LoadEntrypoint,
    Idle,
}

/// Conditions that end the boot
#[derive(Debug, thiserror::Error)]
pub enum BootError {
    #[error("failed to mount storage")]
    Mount(#[from] MountError),

    #[error("failed to spawn boot task '{name}'")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("boot task '{name}' panicked")]
    TaskPanicked { name: String },
}

/* ===================== Report ===================== */

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptReport {
    pub source: ScriptSource,
    pub outcome: ExecutionOutcome,
}

/// What happened to each script, in execution order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BootReport {
    /// False when the library directory could not be opened
    pub library_dir_available: bool,
    pub scripts: Vec<ScriptReport>,
}

impl BootReport {
    /// Outcome of the script at `path`, if it was attempted
    pub fn outcome(&self, path: &Path) -> Option<&ExecutionOutcome> {
        self.scripts
            .iter()
            .find(|report| report.source.path == path)
            .map(|report| &report.outcome)
    }

    pub fn loaded_count(&self) -> usize {
        self.scripts.iter().filter(|r| r.outcome.is_loaded()).count()
    }

    pub fn faulted_count(&self) -> usize {
        self.scripts
            .iter()
            .filter(|r| matches!(r.outcome, ExecutionOutcome::Faulted(_)))
            .count()
    }
}

/* ===================== Init ===================== */

/// A boot that has not touched storage yet
pub struct Boot<M> {
    config: Config,
    mount: M,
}

impl<M: StorageMount> Boot<M> {
    pub fn new(config: Config, mount: M) -> Self {
        Self { config, mount }
    }

    pub fn state(&self) -> BootState {
        BootState::Init
    }

    /// Mount the script volume; failure is fatal
    pub fn mount_storage(mut self) -> Result<Mounted, BootError> {
        enter(BootState::MountStorage);

        let storage = &self.config.storage;
        if let Err(err) = self.mount.mount(
            &storage.root,
            &storage.partition_label,
            storage.format_if_mount_failed,
        ) {
            error!(
                root = %storage.root.display(),
                label = %storage.partition_label,
                error = %err,
                "Storage mount failed"
            );
            return Err(BootError::Mount(err));
        }

        info!(root = %storage.root.display(), "Storage mounted");
        Ok(Mounted {
            config: self.config,
        })
    }
}

/* ===================== Loading ===================== */

/// Storage is mounted; scripts can be loaded
#[derive(Debug)]
pub struct Mounted {
    config: Config,
}

impl Mounted {
    pub fn state(&self) -> BootState {
        BootState::MountStorage
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the library scripts, then the entrypoint, against one fresh
    /// interpreter context, and tear the context down
    ///
    /// Scripts run one at a time in discovery order. No outcome stops the
    /// sequence.
    pub fn load_scripts<I, F>(self, open_interpreter: F) -> Idle
    where
        I: Interpreter,
        F: FnOnce() -> I,
    {
        let config = self.config;
        let mut report = BootReport::default();

        let mut context = open_interpreter();
        let checkpoint = context.checkpoint();
        info!("Loading Ruby scripts...");

        enter(BootState::LoadLibraries);
        let library_dir = config.library_dir();
        match discovery::discover(&library_dir, &config.scripts.suffix, config.scripts.order) {
            Ok(paths) => {
                report.library_dir_available = true;
                for path in paths {
                    run_script(&mut context, ScriptSource::library(path), &mut report);
                }
            }
            Err(err) => {
                warn!(
                    path = %library_dir.display(),
                    reason = %err.source,
                    "Library directory unavailable"
                );
            }
        }

        enter(BootState::LoadEntrypoint);
        run_script(&mut context, ScriptSource::entrypoint(config.entrypoint()), &mut report);

        context.restore(checkpoint);
        drop(context);

        enter(BootState::Idle);
        info!(
            loaded = report.loaded_count(),
            faulted = report.faulted_count(),
            attempted = report.scripts.len(),
            "Script loading finished"
        );

        Idle::new(config.task.idle_interval(), report)
    }
}

fn enter(state: BootState) {
    info!(state = ?state, "Boot state");
}

fn run_script<I: Interpreter>(context: &mut I, source: ScriptSource, report: &mut BootReport) {
    let outcome = executor::execute(context, &source.path);
    log_outcome(&source, &outcome);
    report.scripts.push(ScriptReport { source, outcome });
}

fn log_outcome(source: &ScriptSource, outcome: &ExecutionOutcome) {
    let path = source.path.display();
    let role = source.role;

    match outcome {
        ExecutionOutcome::Loaded => info!(path = %path, role = %role, "Loaded"),
        ExecutionOutcome::NotFound => warn!(path = %path, role = %role, "File not found"),
        ExecutionOutcome::Faulted(diagnostic) => error!(
            path = %path,
            role = %role,
            diagnostic = %diagnostic,
            "Exception occurred"
        ),
    }
}

/* ===================== Entry ===================== */

/// Boot the device: mount storage on the calling thread, then load the
/// scripts on a dedicated task and park that task forever
///
/// `open_interpreter` runs on the boot task, so the interpreter itself
/// never crosses threads. Returns only when the boot fails.
pub fn run<M, I, F>(config: Config, mount: M, open_interpreter: F) -> Result<Infallible, BootError>
where
    M: StorageMount,
    I: Interpreter,
    F: FnOnce() -> I + Send + 'static,
{
    let mounted = Boot::new(config, mount).mount_storage()?;

    let task = mounted.config().task.clone();
    let handle = thread::Builder::new()
        .name(task.name.clone())
        .stack_size(task.stack_size.max(HOST_MIN_STACK))
        .spawn(move || -> Infallible {
            mounted
                .load_scripts(open_interpreter)
                .park(ThreadScheduler)
        })
        .map_err(|source| BootError::Spawn {
            name: task.name.clone(),
            source,
        })?;

    match handle.join() {
        Ok(never) => match never {},
        Err(_) => {
            error!(task = %task.name, "Boot task panicked");
            Err(BootError::TaskPanicked { name: task.name })
        }
    }
}
