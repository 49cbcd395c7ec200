//! PEST-based parser for the script subset
//!
//! Produces the AST consumed by the VM. A file is compiled in full before
//! any of it runs, so a syntax error anywhere means nothing in the file
//! executes.

use pest::error::LineColLocation;
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

use super::types::{BinOp, Expr, Operation, Program, Stmt, StmtKind, Target};


/* ===================== PEST Parser ===================== */

#[derive(Parser)]
#[grammar = "interpreter/parser/script.pest"]
struct ScriptParser;

/* ===================== Error Types ===================== */

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: {message}")]
    Build { line: usize, message: String },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::Syntax { line, .. } | ParseError::Build { line, .. } => *line,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ParseError::Syntax { message, .. } | ParseError::Build { message, .. } => message,
        }
    }
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        let line = match err.line_col {
            LineColLocation::Pos((line, _)) => line,
            LineColLocation::Span((line, _), _) => line,
        };
        ParseError::Syntax {
            line,
            message: err.variant.message().into_owned(),
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Deepest parenthesis or negation nesting a script may use
pub const MAX_NESTING: usize = 32;

const TOO_DEEP: &str = "expression nested too deeply";

/* ===================== Public API ===================== */

/// Parse a whole script file
pub fn parse_script(source: &str) -> ParseResult<Program> {
    check_nesting(source)?;
    let mut pairs = ScriptParser::parse(Rule::program, source)?;
    let program = next_pair(&mut pairs, 1, "program")?;

    let body = program
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::statement)
        .map(build_statement)
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(Program { body })
}

/* ===================== AST Builder ===================== */

/// Reject runaway parentheses before the grammar recurses into them
///
/// Skips string literals and comments the way the grammar does.
fn check_nesting(source: &str) -> ParseResult<()> {
    let mut depth = 0usize;
    let mut line = 1;
    let mut in_string = false;
    let mut in_comment = false;
    let mut chars = source.chars();

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
            in_comment = false;
            continue;
        }
        if in_comment {
            continue;
        }
        if in_string {
            match c {
                '\\' => {
                    if chars.next() == Some('\n') {
                        line += 1;
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '#' => in_comment = true,
            '(' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(ParseError::Syntax {
                        line,
                        message: TOO_DEEP.to_string(),
                    });
                }
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    Ok(())
}

fn line_of(pair: &Pair<Rule>) -> usize {
    pair.line_col().0
}

/// The grammar guarantees these children; a miss is a builder bug, not
/// bad input, but it still surfaces as a parse error rather than a panic.
fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, line: usize, what: &str) -> ParseResult<Pair<'i, Rule>> {
    pairs.next().ok_or_else(|| ParseError::Build {
        line,
        message: format!("missing {}", what),
    })
}

fn build_statement(pair: Pair<Rule>) -> ParseResult<Stmt> {
    // statement = { assignment | raise_stmt | puts_stmt | expression }
    let line = line_of(&pair);
    let inner = next_pair(&mut pair.into_inner(), line, "statement body")?;

    let kind = match inner.as_rule() {
        Rule::assignment => {
            let mut parts = inner.into_inner();
            let target = build_target(next_pair(&mut parts, line, "assignment target")?)?;
            let expr = build_expression(next_pair(&mut parts, line, "assigned value")?)?;
            StmtKind::Assign { target, expr }
        }
        Rule::raise_stmt => {
            // raise_stmt = { kw_raise ~ (raise_class ~ ",")? ~ expression? }
            let mut class = None;
            let mut message = None;
            for part in inner.into_inner() {
                match part.as_rule() {
                    Rule::kw_raise => {}
                    Rule::raise_class => class = Some(part.as_str().trim().to_string()),
                    _ => message = Some(build_expression(part)?),
                }
            }
            StmtKind::Raise { class, message }
        }
        Rule::puts_stmt => {
            let args = inner
                .into_inner()
                .filter(|part| part.as_rule() != Rule::kw_puts)
                .map(build_expression)
                .collect::<ParseResult<Vec<_>>>()?;
            StmtKind::Puts { args }
        }
        Rule::expression => StmtKind::Expr {
            expr: build_expression(inner)?,
        },
        other => {
            return Err(ParseError::Build {
                line,
                message: format!("unexpected statement rule: {:?}", other),
            })
        }
    };

    Ok(Stmt { line, kind })
}

fn build_target(pair: Pair<Rule>) -> ParseResult<Target> {
    // target = { global_var | constant | local }
    let line = line_of(&pair);
    let inner = next_pair(&mut pair.into_inner(), line, "target name")?;
    let text = inner.as_str();

    match inner.as_rule() {
        Rule::global_var => Ok(Target::Global(text.trim_start_matches('$').to_string())),
        Rule::constant => Ok(Target::Constant(text.to_string())),
        Rule::local => Ok(Target::Local(text.to_string())),
        other => Err(ParseError::Build {
            line,
            message: format!("unexpected target rule: {:?}", other),
        }),
    }
}

fn build_expression(pair: Pair<Rule>) -> ParseResult<Expr> {
    build_nested(pair, 0)
}

/// `depth` counts the parentheses and negations enclosing `pair`
fn build_nested(pair: Pair<Rule>, depth: usize) -> ParseResult<Expr> {
    let line = line_of(&pair);
    if depth > MAX_NESTING {
        return Err(ParseError::Syntax {
            line,
            message: TOO_DEEP.to_string(),
        });
    }

    match pair.as_rule() {
        Rule::expression => {
            // expression = { sum }
            let inner = next_pair(&mut pair.into_inner(), line, "expression")?;
            build_nested(inner, depth)
        }
        Rule::sum | Rule::product => {
            // sum = { product ~ (add_op ~ product)* }, same shape for product
            let mut inner = pair.into_inner();
            let first = build_nested(next_pair(&mut inner, line, "operand")?, depth)?;
            let mut rest = Vec::new();

            while let Some(op_pair) = inner.next() {
                let op = match op_pair.as_str() {
                    "+" => BinOp::Add,
                    "-" => BinOp::Sub,
                    "*" => BinOp::Mul,
                    "/" => BinOp::Div,
                    "%" => BinOp::Mod,
                    other => {
                        return Err(ParseError::Build {
                            line,
                            message: format!("unknown operator '{}'", other),
                        })
                    }
                };
                let rhs = build_nested(next_pair(&mut inner, line, "right operand")?, depth)?;
                rest.push(Operation { op, rhs });
            }

            if rest.is_empty() {
                Ok(first)
            } else {
                Ok(Expr::Chain {
                    first: Box::new(first),
                    rest,
                })
            }
        }
        Rule::unary => {
            // unary = { neg* ~ primary }
            let mut negations = 0usize;
            let mut operand = None;
            for part in pair.into_inner() {
                match part.as_rule() {
                    Rule::neg => negations += 1,
                    // parenthesized
                    Rule::expression => operand = Some(build_nested(part, depth + negations + 1)?),
                    _ => operand = Some(build_nested(part, depth + negations)?),
                }
            }

            let mut expr = operand.ok_or_else(|| ParseError::Build {
                line,
                message: "missing operand".to_string(),
            })?;
            for _ in 0..negations {
                expr = Expr::Neg {
                    inner: Box::new(expr),
                };
            }
            Ok(expr)
        }
        Rule::integer => {
            let digits = pair.as_str().replace('_', "");
            let v = digits.parse::<i64>().map_err(|e| ParseError::Build {
                line,
                message: format!("integer literal '{}' out of range: {}", pair.as_str(), e),
            })?;
            Ok(Expr::LitInt { v })
        }
        Rule::float => {
            let digits = pair.as_str().replace('_', "");
            let v = digits.parse::<f64>().map_err(|e| ParseError::Build {
                line,
                message: format!("invalid float literal '{}': {}", pair.as_str(), e),
            })?;
            Ok(Expr::LitFloat { v })
        }
        Rule::string => {
            // string = ${ "\"" ~ string_inner ~ "\"" }
            let content = next_pair(&mut pair.into_inner(), line, "string body")?;
            Ok(Expr::LitStr {
                v: unescape(content.as_str()),
            })
        }
        Rule::boolean => Ok(Expr::LitBool {
            v: pair.as_str() == "true",
        }),
        Rule::nil => Ok(Expr::LitNil),
        Rule::global_var => Ok(Expr::Global {
            name: pair.as_str().trim_start_matches('$').to_string(),
        }),
        Rule::constant => Ok(Expr::Constant {
            name: pair.as_str().to_string(),
        }),
        Rule::local => Ok(Expr::Local {
            name: pair.as_str().to_string(),
        }),
        other => Err(ParseError::Build {
            line,
            message: format!("unexpected expression rule: {:?}", other),
        }),
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}
