//! Statement execution
//!
//! Each statement runs to completion or returns the fault it raised;
//! the caller stops the file at the first fault.

use std::io::Write;

use super::errors;
use super::types::{Fault, Stmt, StmtKind, Target, Val};
use super::vm::{Locals, ScriptVm};

impl ScriptVm {
    pub(crate) fn execute_stmt(&mut self, stmt: &Stmt, locals: &mut Locals) -> Result<(), Fault> {
        match &stmt.kind {
            StmtKind::Assign { target, expr } => {
                let val = self.eval_expr(expr, locals)?;
                match target {
                    Target::Constant(name) => self.constants.insert(name.clone(), val),
                    Target::Global(name) => self.globals.insert(name.clone(), val),
                    Target::Local(name) => locals.insert(name.clone(), val),
                };
                Ok(())
            }

            StmtKind::Puts { args } => {
                let mut text = String::new();
                if args.is_empty() {
                    text.push('\n');
                }
                for arg in args {
                    let line = self.eval_expr(arg, locals)?.to_string();
                    text.push_str(&line);
                    if !line.ends_with('\n') {
                        text.push('\n');
                    }
                }
                self.output
                    .write_all(text.as_bytes())
                    .and_then(|_| self.output.flush())
                    .map_err(|e| Fault::new(errors::IO_ERROR, e.to_string()))
            }

            StmtKind::Raise { class, message } => {
                let class = class.as_deref().unwrap_or(errors::RUNTIME_ERROR);
                let message = match message {
                    None => errors::UNHANDLED_EXCEPTION.to_string(),
                    Some(expr) => match self.eval_expr(expr, locals)? {
                        Val::Str(s) => s,
                        _ => {
                            return Err(Fault::new(
                                errors::TYPE_ERROR,
                                "exception class/object expected",
                            ))
                        }
                    },
                };
                Err(Fault::new(class, message))
            }

            StmtKind::Expr { expr } => self.eval_expr(expr, locals).map(|_| ()),
        }
    }
}
