//! Pest-backed parser for the task-expression grammar.
//!
//! Wraps the generated grammar with builders that construct [`ExprNode`]
//! trees. Single-operand chains collapse: `(4)` parses to the same tree
//! as `4`.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser as PestParser;

use crate::{ExprError, ExprNode};

#[derive(PestParser)]
#[grammar = "src/grammar.pest"]
struct ExprParser;

/// Parse an expression source string into an [`ExprNode`] tree.
///
/// # Errors
/// - [`ExprError::Empty`] when the input contains no tokens
/// - [`ExprError::Parse`] on stray characters, unbalanced brackets, or
///   input that ends mid-expression
pub fn parse(source: &str) -> Result<ExprNode, ExprError> {
    if source.trim().is_empty() {
        return Err(ExprError::Empty);
    }
    let mut pairs =
        ExprParser::parse(Rule::program, source).map_err(|e| ExprError::Parse(e.to_string()))?;
    let program = pairs.next().ok_or(ExprError::Shape("expected program"))?;
    let expression = program
        .into_inner()
        .next()
        .ok_or(ExprError::Shape("expected expression"))?;
    build_expression(expression)
}

/// expression := term ('+' term)*
///
/// One term passes through; several become an n-ary `Or`.
fn build_expression(pair: Pair<'_, Rule>) -> Result<ExprNode, ExprError> {
    if pair.as_rule() != Rule::expression {
        return Err(ExprError::Shape("expected expression rule"));
    }
    let mut terms = Vec::new();
    for inner in pair.into_inner() {
        terms.push(build_term(inner)?);
    }
    match terms.len() {
        0 => Err(ExprError::Shape("expression without terms")),
        1 => Ok(terms.remove(0)),
        _ => Ok(ExprNode::Or(terms)),
    }
}

/// term := factor ('*' factor)*
fn build_term(pair: Pair<'_, Rule>) -> Result<ExprNode, ExprError> {
    if pair.as_rule() != Rule::term {
        return Err(ExprError::Shape("expected term rule"));
    }
    let mut factors = Vec::new();
    for inner in pair.into_inner() {
        factors.push(build_factor(inner)?);
    }
    match factors.len() {
        0 => Err(ExprError::Shape("term without factors")),
        1 => Ok(factors.remove(0)),
        _ => Ok(ExprNode::And(factors)),
    }
}

/// factor := '(' expression ')' | NUMBER
///
/// The factor rule itself is silent, so we see either a number or a
/// parenthesized expression here.
fn build_factor(pair: Pair<'_, Rule>) -> Result<ExprNode, ExprError> {
    match pair.as_rule() {
        Rule::number => {
            let value: u64 = pair
                .as_str()
                .parse()
                .map_err(|_| ExprError::Shape("constant out of range"))?;
            Ok(ExprNode::constant(value))
        },
        Rule::expression => build_expression(pair),
        _ => Err(ExprError::Shape("expected number or bracketed expression")),
    }
}
