//! Block resolution: turning indentation into explicit statement ranges.
//!
//! A header at depth `d` owns every following statement deeper than `d`.
//! For an `%if`, the `%elif`/`%else` headers at depth `d` right after each
//! body extend the chain. Ranges are computed the first time a header is
//! reached and cached by header index.

use std::collections::HashMap;
use std::ops::Range;
use std::rc::Rc;

use crate::ast::{Condition, Statement, StatementKind};
use crate::error::{Error, Result};

/// One arm of an if-chain. `condition` is `None` for `%else`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arm {
    pub header: usize,
    pub condition: Option<Condition>,
    pub body: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfChain {
    pub arms: Vec<Arm>,
    /// Index of the first statement after the whole chain.
    pub end: usize,
}

#[derive(Debug, Clone)]
enum Block {
    Body(Range<usize>),
    Chain(Rc<IfChain>),
}

#[derive(Debug, Default)]
pub struct BlockResolver {
    cache: HashMap<usize, Block>,
}

impl BlockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body range of the `%while` / `%f` / `%if` header at `header`.
    pub fn body(&mut self, stmts: &[Statement], header: usize) -> Result<Range<usize>> {
        if let Some(Block::Body(range)) = self.cache.get(&header) {
            return Ok(range.clone());
        }
        let range = body_range(stmts, header)?;
        self.cache.insert(header, Block::Body(range.clone()));
        Ok(range)
    }

    /// The full if-chain opened by the `%if` at `header`.
    pub fn chain(&mut self, stmts: &[Statement], header: usize) -> Result<Rc<IfChain>> {
        if let Some(Block::Chain(chain)) = self.cache.get(&header) {
            return Ok(Rc::clone(chain));
        }
        let chain = Rc::new(if_chain(stmts, header)?);
        self.cache.insert(header, Block::Chain(Rc::clone(&chain)));
        Ok(chain)
    }
}

/// Compute the body of the header at `header` without caching.
pub fn body_range(stmts: &[Statement], header: usize) -> Result<Range<usize>> {
    let head = &stmts[header];
    let start = header + 1;
    let body_depth = match stmts.get(start) {
        Some(first) if first.depth > head.depth => first.depth,
        _ => return Err(Error::syntax("block header has no indented body")),
    };

    let end = stmts[start..]
        .iter()
        .position(|s| s.depth <= head.depth)
        .map_or(stmts.len(), |offset| start + offset);

    check_run(stmts, start..end, body_depth)?;
    Ok(start..end)
}

/// Check that every statement in `range` sits at `depth`, or deeper only
/// when it belongs to a header at `depth`.
pub fn check_run(stmts: &[Statement], range: Range<usize>, depth: usize) -> Result<()> {
    let mut after_header = false;
    for stmt in &stmts[range] {
        if stmt.depth == depth {
            after_header = stmt.kind.is_header();
        } else if stmt.depth < depth || !after_header {
            return Err(Error::syntax(format!(
                "line {}: inconsistent indentation (expected depth {}, found {})",
                stmt.line, depth, stmt.depth
            )));
        }
    }
    Ok(())
}

fn if_chain(stmts: &[Statement], header: usize) -> Result<IfChain> {
    let depth = stmts[header].depth;
    let condition = match &stmts[header].kind {
        StatementKind::If(cond) => cond.clone(),
        _ => {
            return Err(Error::syntax(format!(
                "line {}: expected '%if'",
                stmts[header].line
            )))
        }
    };

    let body = body_range(stmts, header)?;
    let mut next = body.end;
    let mut arms = vec![Arm {
        header,
        condition: Some(condition),
        body,
    }];

    while let Some(stmt) = stmts.get(next) {
        if stmt.depth != depth || !stmt.kind.is_continuation() {
            break;
        }
        if arms.last().is_some_and(|arm| arm.condition.is_none()) {
            return Err(Error::syntax(format!(
                "line {}: '%else' must be the last branch of an if-chain",
                stmt.line
            )));
        }
        let condition = match &stmt.kind {
            StatementKind::Elif(cond) => Some(cond.clone()),
            _ => None,
        };
        let body = body_range(stmts, next)?;
        let end = body.end;
        arms.push(Arm {
            header: next,
            condition,
            body,
        });
        next = end;
    }

    Ok(IfChain { arms, end: next })
}
