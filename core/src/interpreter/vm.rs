//! Virtual Machine state
//!
//! The VM holds the one shared script context:
//! - constants and `$globals`, which accumulate across loads
//! - the allocation arena bounding compile/run temporaries
//! - the fault indicator left behind by a raising load

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Read, Write};

use super::errors;
use super::parser::parse_script;
use super::types::{Fault, Program, Val};
use super::Interpreter;

/// Locals of a single load; discarded when the load ends
pub(crate) type Locals = HashMap<String, Val>;

/// Marker into the allocation arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaIndex(usize);

/* ===================== VM ===================== */

pub struct ScriptVm {
    pub(crate) constants: HashMap<String, Val>,
    pub(crate) globals: HashMap<String, Val>,
    pub(crate) arena: Vec<Val>,
    pub(crate) fault: Option<Fault>,
    pub(crate) output: Box<dyn Write>,
}

impl ScriptVm {
    /// Create a VM whose `puts` goes to stdout
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }

    /// Create a VM whose `puts` goes to `output`
    pub fn with_output(output: impl Write + 'static) -> Self {
        Self {
            constants: HashMap::new(),
            globals: HashMap::new(),
            arena: Vec::new(),
            fault: None,
            output: Box::new(output),
        }
    }

    pub fn constant(&self, name: &str) -> Option<&Val> {
        self.constants.get(name)
    }

    pub fn constants(&self) -> &HashMap<String, Val> {
        &self.constants
    }

    /// Read a `$global` by name, without the sigil
    pub fn global(&self, name: &str) -> Option<&Val> {
        self.globals.get(name)
    }

    /// Number of values currently held by the arena
    pub fn arena_len(&self) -> usize {
        self.arena.len()
    }

    /// Compile and run source text against this context
    ///
    /// A syntax error faults before anything runs. A runtime fault stops
    /// the file at the failing statement; earlier statements stay applied.
    pub fn eval_source(&mut self, source: &str, filename: &str) {
        match parse_script(source) {
            Ok(program) => self.run(&program, filename),
            Err(err) => {
                let mut fault = Fault::new(errors::SYNTAX_ERROR, err.message());
                fault.line = Some(err.line());
                self.fault = Some(fault.at(filename, None));
            }
        }
    }

    /// Run an already parsed program
    pub fn run(&mut self, program: &Program, filename: &str) {
        let mut locals = Locals::new();

        for stmt in &program.body {
            if let Err(fault) = self.execute_stmt(stmt, &mut locals) {
                self.fault = Some(fault.at(filename, Some(stmt.line)));
                return;
            }
        }
    }

    /// Register a heap value with the arena so it stays alive until the
    /// next restore
    pub(crate) fn protect(&mut self, val: &Val) {
        if val.is_heap() {
            self.arena.push(val.clone());
        }
    }
}

impl Default for ScriptVm {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScriptVm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptVm")
            .field("constants", &self.constants)
            .field("globals", &self.globals)
            .field("arena", &self.arena.len())
            .field("fault", &self.fault)
            .finish_non_exhaustive()
    }
}

/* ===================== Interpreter boundary ===================== */

impl Interpreter for ScriptVm {
    type Fault = Fault;
    type Checkpoint = ArenaIndex;

    fn load(&mut self, source: &mut dyn Read, filename: &str) {
        let mut text = String::new();
        match source.read_to_string(&mut text) {
            Ok(_) => self.eval_source(&text, filename),
            Err(err) => {
                self.fault = Some(Fault::new(errors::IO_ERROR, err.to_string()).at(filename, None));
            }
        }
    }

    fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    fn clear_fault(&mut self) {
        self.fault = None;
    }

    fn checkpoint(&self) -> ArenaIndex {
        ArenaIndex(self.arena.len())
    }

    fn restore(&mut self, checkpoint: ArenaIndex) {
        self.arena.truncate(checkpoint.0);
    }
}
