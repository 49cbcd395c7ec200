//! Expression evaluation

use super::errors;
use super::types::{BinOp, Expr, Fault, Val};
use super::vm::{Locals, ScriptVm};

/// Largest string, in bytes, that concatenation or repetition may build
pub const MAX_STRING_BYTES: usize = 16 << 20;

impl ScriptVm {
    /// Evaluate an expression to a value
    ///
    /// Strings produced here are registered with the arena.
    pub(crate) fn eval_expr(&mut self, expr: &Expr, locals: &Locals) -> Result<Val, Fault> {
        match expr {
            Expr::LitInt { v } => Ok(Val::Int(*v)),
            Expr::LitFloat { v } => Ok(Val::Float(*v)),
            Expr::LitBool { v } => Ok(Val::Bool(*v)),
            Expr::LitNil => Ok(Val::Nil),

            Expr::LitStr { v } => {
                let val = Val::Str(v.clone());
                self.protect(&val);
                Ok(val)
            }

            Expr::Constant { name } => self.constants.get(name).cloned().ok_or_else(|| {
                Fault::new(errors::NAME_ERROR, format!("uninitialized constant {}", name))
            }),

            // Unset globals read as nil
            Expr::Global { name } => Ok(self.globals.get(name).cloned().unwrap_or(Val::Nil)),

            Expr::Local { name } => locals.get(name).cloned().ok_or_else(|| {
                Fault::new(
                    errors::NAME_ERROR,
                    format!("undefined local variable or method '{}' for main", name),
                )
            }),

            Expr::Neg { inner } => {
                let val = self.eval_expr(inner, locals)?;
                negate(val)
            }

            Expr::Chain { first, rest } => {
                let mut acc = self.eval_expr(first, locals)?;
                for operation in rest {
                    let rhs = self.eval_expr(&operation.rhs, locals)?;
                    acc = binary_op(operation.op, acc, rhs)?;
                    self.protect(&acc);
                }
                Ok(acc)
            }
        }
    }
}

fn negate(val: Val) -> Result<Val, Fault> {
    match val {
        Val::Int(i) => Ok(i
            .checked_neg()
            .map(Val::Int)
            .unwrap_or(Val::Float(-(i as f64)))),
        Val::Float(x) => Ok(Val::Float(-x)),
        other => Err(Fault::new(
            errors::NO_METHOD_ERROR,
            format!("undefined method '-@' for {}", other.describe()),
        )),
    }
}

/// Apply a binary operator
pub fn binary_op(op: BinOp, lhs: Val, rhs: Val) -> Result<Val, Fault> {
    match (lhs, rhs) {
        (Val::Int(a), Val::Int(b)) => int_op(op, a, b),
        (Val::Int(a), Val::Float(b)) => Ok(float_op(op, a as f64, b)),
        (Val::Float(a), Val::Int(b)) => Ok(float_op(op, a, b as f64)),
        (Val::Float(a), Val::Float(b)) => Ok(float_op(op, a, b)),

        (lhs @ (Val::Int(_) | Val::Float(_)), rhs) => Err(Fault::new(
            errors::TYPE_ERROR,
            format!("{} can't be coerced into {}", rhs.class_name(), lhs.class_name()),
        )),

        (Val::Str(a), rhs) => string_op(op, a, rhs),

        (lhs, _) => Err(undefined_method(op, &lhs)),
    }
}

fn int_op(op: BinOp, a: i64, b: i64) -> Result<Val, Fault> {
    let checked = match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Sub => a.checked_sub(b),
        BinOp::Mul => a.checked_mul(b),
        BinOp::Div | BinOp::Mod if b == 0 => {
            return Err(Fault::new(errors::ZERO_DIVISION_ERROR, "divided by 0"))
        }
        BinOp::Div => floor_div(a, b),
        BinOp::Mod => floor_mod(a, b),
    };

    // Overflow promotes to Float
    Ok(checked
        .map(Val::Int)
        .unwrap_or_else(|| float_op(op, a as f64, b as f64)))
}

fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

fn floor_mod(a: i64, b: i64) -> Option<i64> {
    let r = a.checked_rem(b)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        Some(r + b)
    } else {
        Some(r)
    }
}

fn float_op(op: BinOp, a: f64, b: f64) -> Val {
    Val::Float(match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => a / b,
        BinOp::Mod => {
            let r = a % b;
            if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
                r + b
            } else {
                r
            }
        }
    })
}

fn string_op(op: BinOp, a: String, rhs: Val) -> Result<Val, Fault> {
    match (op, rhs) {
        (BinOp::Add, Val::Str(b)) => {
            if a.len().saturating_add(b.len()) > MAX_STRING_BYTES {
                return Err(too_big());
            }
            Ok(Val::Str(a + &b))
        }
        (BinOp::Add, rhs) => Err(Fault::new(
            errors::TYPE_ERROR,
            format!("no implicit conversion of {} into String", rhs.class_name()),
        )),
        (BinOp::Mul, Val::Int(n)) if n < 0 => {
            Err(Fault::new(errors::ARGUMENT_ERROR, "negative argument"))
        }
        (BinOp::Mul, Val::Int(n)) => {
            let count = usize::try_from(n).map_err(|_| too_big())?;
            match a.len().checked_mul(count) {
                Some(len) if len <= MAX_STRING_BYTES => Ok(Val::Str(a.repeat(count))),
                _ => Err(too_big()),
            }
        }
        (BinOp::Mul, rhs) => Err(Fault::new(
            errors::TYPE_ERROR,
            format!("no implicit conversion of {} into Integer", rhs.class_name()),
        )),
        (op, _) => Err(undefined_method(op, &Val::Str(a))),
    }
}

fn too_big() -> Fault {
    Fault::new(errors::ARGUMENT_ERROR, "argument too big")
}

fn undefined_method(op: BinOp, receiver: &Val) -> Fault {
    Fault::new(
        errors::NO_METHOD_ERROR,
        format!("undefined method '{}' for {}", op.symbol(), receiver.describe()),
    )
}
