//! kudos_expr: Boolean task-expression DSL for the Kudos engine
//!
//! Organisations can express combinations of tasks as compact strings:
//! - `1*2` (tasks 1 AND 2)
//! - `1+2` (task 1 OR task 2)
//! - `1*(2+3)` (task 1 AND either of tasks 2 and 3)
//!
//! `*` binds tighter than `+`. Constants are per-organisation task numbers.
//!
//! [`parse`] compiles a source string into an [`ExprNode`] tree. Constants
//! are unbound after parsing and evaluate to `false`; walk the tree with a
//! visitor such as [`BindTask`] to attach the task ids that are considered
//! satisfied, then call [`ExprNode::evaluate`].

mod ast;
mod parser;

pub use ast::{BindTask, ClearBindings, ConstantValues, ExprNode, ExprVisitor};
pub use parser::parse;

use thiserror::Error;

/// Errors that can happen when parsing an expression string.
#[derive(Debug, Error)]
pub enum ExprError {
    #[error("empty expression")]
    Empty,
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unexpected grammar shape: {0}")]
    Shape(&'static str),
}
