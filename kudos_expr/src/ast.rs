//! Expression tree, evaluation, and the binding visitors.

use std::collections::BTreeSet;

use uuid::Uuid;

/// A node in a parsed task expression.
///
/// `And`/`Or` nodes are n-ary: `1*2*3` parses to a single `And` with three
/// children rather than a nested pair. Chains with a single operand collapse
/// to the operand itself, so `(1)` and `1` produce the same tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    /// Leaf holding a task number, optionally bound to a concrete task id.
    Constant { value: u64, binding: Option<Uuid> },
    /// All children must hold.
    And(Vec<ExprNode>),
    /// At least one child must hold.
    Or(Vec<ExprNode>),
    /// The child must not hold.
    Not(Box<ExprNode>),
}

impl ExprNode {
    /// Leaf constant for a task number, unbound.
    pub fn constant(value: u64) -> Self {
        Self::Constant { value, binding: None }
    }

    /// Evaluate the tree. Unbound constants are `false`; `And` folds over
    /// all children with identity `true`, `Or` with identity `false`.
    /// Children are always evaluated in full, never short-circuited.
    pub fn evaluate(&self) -> bool {
        match self {
            Self::Constant { binding, .. } => binding.is_some(),
            Self::And(children) => children.iter().fold(true, |acc, c| acc & c.evaluate()),
            Self::Or(children) => children.iter().fold(false, |acc, c| acc | c.evaluate()),
            Self::Not(child) => !child.evaluate(),
        }
    }

    /// Walk the tree depth-first, giving `visitor` access to every node.
    pub fn accept<V: ExprVisitor>(&mut self, visitor: &mut V) {
        match self {
            Self::Constant { value, binding } => visitor.visit_constant(*value, binding),
            Self::And(children) => {
                visitor.visit_and(children.len());
                for child in children.iter_mut() {
                    child.accept(visitor);
                }
            },
            Self::Or(children) => {
                visitor.visit_or(children.len());
                for child in children.iter_mut() {
                    child.accept(visitor);
                }
            },
            Self::Not(child) => {
                visitor.visit_not();
                child.accept(visitor);
            },
        }
    }
}

/// Visitor over an expression tree. Only constant leaves carry mutable
/// state (their binding); sequence hooks exist for traversal bookkeeping.
pub trait ExprVisitor {
    fn visit_constant(&mut self, value: u64, binding: &mut Option<Uuid>);
    fn visit_and(&mut self, _arity: usize) {}
    fn visit_or(&mut self, _arity: usize) {}
    fn visit_not(&mut self) {}
}

/// Binds every constant whose value matches `number` to `task`.
#[derive(Debug, Clone, Copy)]
pub struct BindTask {
    pub number: u64,
    pub task: Uuid,
}

impl ExprVisitor for BindTask {
    fn visit_constant(&mut self, value: u64, binding: &mut Option<Uuid>) {
        if value == self.number {
            *binding = Some(self.task);
        }
    }
}

/// Resets every constant in the tree to unbound.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearBindings;

impl ExprVisitor for ClearBindings {
    fn visit_constant(&mut self, _value: u64, binding: &mut Option<Uuid>) {
        *binding = None;
    }
}

/// Collects the distinct constant values mentioned by the tree.
#[derive(Debug, Clone, Default)]
pub struct ConstantValues {
    pub values: BTreeSet<u64>,
}

impl ExprVisitor for ConstantValues {
    fn visit_constant(&mut self, value: u64, _binding: &mut Option<Uuid>) {
        self.values.insert(value);
    }
}
