pub mod boot;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod executor;
pub mod interpreter;
pub mod storage;

// Re-export main types
pub use crate::boot::{run, Boot, BootError, BootReport, BootState, Idle, Mounted};
pub use crate::config::Config;
pub use crate::executor::{execute, ExecutionOutcome, ScriptRole, ScriptSource};
pub use crate::interpreter::{Interpreter, ScriptVm};
pub use crate::storage::{DirectoryMount, MountError, StorageMount};
