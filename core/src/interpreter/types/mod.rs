//! Type definitions for the script VM
//!
//! - AST nodes (Program, Stmt, Expr)
//! - Runtime values (Val)
//! - Faults raised by running code (Fault)

pub mod ast;
pub mod fault;
pub mod values;

pub use ast::{BinOp, Expr, Operation, Program, Stmt, StmtKind, Target};
pub use fault::Fault;
pub use values::Val;
