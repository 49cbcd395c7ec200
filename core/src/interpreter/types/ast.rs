//! Abstract Syntax Tree node types

use serde::{Deserialize, Serialize};

/// A parsed script file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Stmt>,
}

/// Statement with the source line it starts on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stmt {
    pub line: usize,
    #[serde(flatten)]
    pub kind: StmtKind,
}

/// Statement AST node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StmtKind {
    Assign {
        target: Target,
        expr: Expr,
    },
    Puts {
        args: Vec<Expr>,
    },
    Raise {
        /// Exception class named in `raise Class, msg`
        class: Option<String>,
        message: Option<Expr>,
    },
    Expr {
        expr: Expr,
    },
}

/// Left-hand side of an assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "name")]
pub enum Target {
    /// `NAME`, persists in the context
    Constant(String),
    /// `$name`, persists in the context
    Global(String),
    /// `name`, lives for a single load
    Local(String),
}

/// Expression AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expr {
    LitInt { v: i64 },
    LitFloat { v: f64 },
    LitStr { v: String },
    LitBool { v: bool },
    LitNil,
    Constant { name: String },
    Global { name: String },
    Local { name: String },
    Neg { inner: Box<Expr> },
    /// Left-associative run of same-precedence operators, `a - b - c`,
    /// held flat so its depth does not grow with its length
    Chain {
        first: Box<Expr>,
        rest: Vec<Operation>,
    },
}

/// One `op rhs` step of a chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub op: BinOp,
    pub rhs: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }
}
