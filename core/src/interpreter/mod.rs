//! Interpreter boundary and the resident script VM
//!
//! The boot sequence only ever talks to an interpreter through the
//! [`Interpreter`] trait: a combined compile-and-run entry point, a fault
//! indicator that must be cleared by hand, and an allocation checkpoint
//! pair. [`ScriptVm`] is the in-tree implementation used on the host and
//! in tests.

pub mod errors;
pub mod expressions;
pub mod parser;
pub mod statements;
pub mod types;
pub mod vm;

#[cfg(test)]
mod tests;

use std::fmt;
use std::io::Read;

pub use parser::{parse_script, ParseError};
pub use types::{BinOp, Expr, Fault, Operation, Program, Stmt, StmtKind, Target, Val};
pub use vm::{ArenaIndex, ScriptVm};

/// A resident scripting VM with a single shared context
///
/// State is cumulative: whatever one `load` defines is visible to every
/// later `load` on the same value. Faults are recorded on the context
/// rather than returned, and stay set until `clear_fault` is called.
pub trait Interpreter {
    /// The fault recorded when script code raises; `Display` is the
    /// human-readable diagnostic.
    type Fault: fmt::Display;

    /// Opaque marker into the allocation arena.
    type Checkpoint: Copy + fmt::Debug;

    /// Compile and run everything readable from `source` in one pass.
    ///
    /// `filename` is only used for diagnostics.
    fn load(&mut self, source: &mut dyn Read, filename: &str);

    /// The pending fault, if the last load raised.
    fn fault(&self) -> Option<&Self::Fault>;

    fn clear_fault(&mut self);

    fn checkpoint(&self) -> Self::Checkpoint;

    /// Release everything allocated since `checkpoint` that is not
    /// reachable from persistent state.
    fn restore(&mut self, checkpoint: Self::Checkpoint);
}
