use std::collections::HashMap;
use std::ops::Range;
use std::rc::Rc;

use log::{debug, info};

use crate::ast::{Condition, Expr, Operand, Program, Statement, StatementKind};
use crate::blocks::BlockResolver;
use crate::commands;
use crate::config::Limits;
use crate::error::{Error, Result, ScriptError};
use crate::host::Host;
use crate::notify::Notifier;
use crate::store::VariableStore;
use crate::value::Value;

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// The last top-level statement ran.
    Completed,
    /// An `ii` statement stopped the script.
    Ended,
}

/// One level of the execution stack. Script-level calls and loops push
/// frames here instead of recursing, so nesting never grows the native stack.
struct Frame<'a> {
    start: usize,
    pc: usize,
    end: usize,
    /// Depth every statement in this frame sits at.
    depth: usize,
    kind: FrameKind<'a>,
}

enum FrameKind<'a> {
    /// Top level or an `%if` arm.
    Block,
    /// A `%while` body; re-checks its condition each time the body ends.
    Loop {
        header: &'a Statement,
        cond: &'a Condition,
        iterations: usize,
    },
    /// A function body; leaving it drops one call level.
    Call,
}

impl<'a> Frame<'a> {
    fn new(stmts: &[Statement], body: Range<usize>, kind: FrameKind<'a>) -> Self {
        Self {
            start: body.start,
            pc: body.start,
            end: body.end,
            depth: stmts.get(body.start).map_or(0, |s| s.depth),
            kind,
        }
    }
}

#[derive(Debug, Clone)]
struct Function {
    header: usize,
    body: Range<usize>,
}

/// The runtime environment: one program, the global variable store, the
/// function registry and the host it talks to.
pub struct Evaluator<H, N> {
    program: Rc<Program>,
    store: VariableStore,
    last_input: Option<Value>,
    functions: HashMap<String, Function>,
    blocks: BlockResolver,
    limits: Limits,
    call_depth: usize,
    host: H,
    notifier: N,
}

impl<H: Host, N: Notifier> Evaluator<H, N> {
    pub fn new(program: Program, host: H, notifier: N) -> Self {
        Self {
            program: Rc::new(program),
            store: VariableStore::new(),
            last_input: None,
            functions: HashMap::new(),
            blocks: BlockResolver::new(),
            limits: Limits::default(),
            call_depth: 0,
            host,
            notifier,
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Seed `%1` before the first statement runs.
    pub fn with_input(mut self, input: Value) -> Self {
        self.last_input = Some(input);
        self
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn variables(&self) -> &VariableStore {
        &self.store
    }

    pub fn last_input(&self) -> Option<&Value> {
        self.last_input.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub(crate) fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub(crate) fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub(crate) fn set_last_input(&mut self, value: Value) {
        self.last_input = Some(value);
    }

    // -----------------------------------------------------------------------
    // Expressions
    // -----------------------------------------------------------------------

    pub fn eval_operand(&self, operand: &Operand) -> Result<Value> {
        match operand {
            Operand::Literal(v) => Ok(v.clone()),
            Operand::LastInput => self
                .last_input
                .clone()
                .ok_or_else(|| Error::undefined("%1 was read before any input was given")),
            Operand::Variable(name) => self.store.read(name).cloned(),
        }
    }

    pub fn eval_expr(&self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Operand(operand) => self.eval_operand(operand),
            Expr::Binary { lhs, op, rhs } => {
                let lhs = self.eval_operand(lhs)?;
                let rhs = self.eval_operand(rhs)?;
                lhs.arith(*op, &rhs)
            }
        }
    }

    pub fn eval_condition(&self, cond: &Condition) -> Result<bool> {
        let lhs = self.eval_operand(&cond.lhs)?;
        let rhs = self.eval_operand(&cond.rhs)?;
        lhs.compare(cond.op, &rhs)
    }

    // -----------------------------------------------------------------------
    // Execution
    // -----------------------------------------------------------------------

    /// Run the whole program from its first statement.
    ///
    /// Top-level statements must all sit at the shallowest depth used in the
    /// script.
    pub fn run(&mut self) -> std::result::Result<Halt, ScriptError> {
        let program = Rc::clone(&self.program);
        let stmts = &program.statements;
        info!("running script with {} statements", stmts.len());

        self.call_depth = 0;
        let mut top = Frame::new(stmts, 0..stmts.len(), FrameKind::Block);
        top.depth = stmts.iter().map(|s| s.depth).min().unwrap_or(0);
        let mut stack = vec![top];

        let halt = loop {
            let Some(frame) = stack.last_mut() else {
                break Halt::Completed;
            };

            if frame.pc >= frame.end {
                match &mut frame.kind {
                    FrameKind::Loop {
                        header,
                        cond,
                        iterations,
                    } => {
                        if self.next_iteration(*header, *cond, iterations)? {
                            frame.pc = frame.start;
                            continue;
                        }
                    }
                    FrameKind::Call => self.call_depth -= 1,
                    FrameKind::Block => {}
                }
                stack.pop();
                continue;
            }

            let i = frame.pc;
            let stmt = &stmts[i];
            if stmt.depth != frame.depth {
                return Err(at(
                    stmt,
                    Error::syntax(format!(
                        "inconsistent indentation (expected depth {}, found {})",
                        frame.depth, stmt.depth
                    )),
                ));
            }

            let pushed = match &stmt.kind {
                StatementKind::If(_) => {
                    let chain = self.blocks.chain(stmts, i).map_err(|e| at(stmt, e))?;
                    frame.pc = chain.end;
                    let mut taken = None;
                    for arm in &chain.arms {
                        let hit = match &arm.condition {
                            Some(cond) => self
                                .eval_condition(cond)
                                .map_err(|e| at(&stmts[arm.header], e))?,
                            None => true,
                        };
                        if hit {
                            taken = Some(arm.body.clone());
                            break;
                        }
                    }
                    taken.map(|body| Frame::new(stmts, body, FrameKind::Block))
                }
                StatementKind::Elif(_) | StatementKind::Else => {
                    return Err(at(
                        stmt,
                        Error::syntax("branch without a matching '%if'"),
                    ));
                }
                StatementKind::While(cond) => {
                    let body = self.blocks.body(stmts, i).map_err(|e| at(stmt, e))?;
                    frame.pc = body.end;
                    let mut iterations = 0;
                    if self.next_iteration(stmt, cond, &mut iterations)? {
                        let kind = FrameKind::Loop {
                            header: stmt,
                            cond,
                            iterations,
                        };
                        Some(Frame::new(stmts, body, kind))
                    } else {
                        None
                    }
                }
                StatementKind::Function { name } => {
                    let body = self.blocks.body(stmts, i).map_err(|e| at(stmt, e))?;
                    frame.pc = body.end;
                    self.define_function(name, i, body).map_err(|e| at(stmt, e))?;
                    None
                }
                StatementKind::Call { name } => {
                    let body = self.enter_call(name).map_err(|e| at(stmt, e))?;
                    frame.pc = i + 1;
                    Some(Frame::new(stmts, body, FrameKind::Call))
                }
                StatementKind::End => break Halt::Ended,
                _ => {
                    self.execute_simple(stmt).map_err(|e| at(stmt, e))?;
                    frame.pc = i + 1;
                    None
                }
            };

            if let Some(frame) = pushed {
                stack.push(frame);
            }
        };

        info!("script halted: {:?}", halt);
        Ok(halt)
    }

    /// Evaluate a `%while` condition once more. `true` means the body runs
    /// again; the ceiling applies only while the condition still holds.
    fn next_iteration(
        &self,
        header: &Statement,
        cond: &Condition,
        iterations: &mut usize,
    ) -> std::result::Result<bool, ScriptError> {
        if !self.eval_condition(cond).map_err(|e| at(header, e))? {
            debug!("while loop on line {} ran {} times", header.line, iterations);
            return Ok(false);
        }
        if *iterations >= self.limits.max_iterations {
            return Err(at(
                header,
                Error::IterationLimitExceeded {
                    limit: self.limits.max_iterations,
                },
            ));
        }
        *iterations += 1;
        Ok(true)
    }

    fn define_function(&mut self, name: &str, header: usize, body: Range<usize>) -> Result<()> {
        if let Some(existing) = self.functions.get(name) {
            if existing.header == header {
                return Ok(());
            }
            return Err(Error::Declaration(format!(
                "function '{}' is already declared",
                name
            )));
        }
        debug!("registered function '{}' ({} statements)", name, body.len());
        self.functions
            .insert(name.to_string(), Function { header, body });
        Ok(())
    }

    /// Look up a function body and take one call level.
    fn enter_call(&mut self, name: &str) -> Result<Range<usize>> {
        let body = match self.functions.get(name) {
            Some(f) => f.body.clone(),
            None => {
                return Err(Error::undefined(format!(
                    "function '{}' is not declared",
                    name
                )))
            }
        };
        if self.call_depth >= self.limits.max_call_depth {
            return Err(Error::CallDepthExceeded {
                limit: self.limits.max_call_depth,
            });
        }
        self.call_depth += 1;
        debug!("calling '{}' at depth {}", name, self.call_depth);
        Ok(body)
    }

    /// One handler per non-block statement kind.
    fn execute_simple(&mut self, stmt: &Statement) -> Result<()> {
        match &stmt.kind {
            StatementKind::AliasDecl { name, alias } => self.store.declare_alias(alias, name)?,
            StatementKind::TypeDecl { name, ty } => self.store.declare_type(name, *ty)?,
            StatementKind::ValueAssign { name, expr } => {
                let value = self.eval_expr(expr)?;
                self.store.assign(name, value)?;
            }
            StatementKind::Prompt { message, ty } => commands::input::run(self, message, *ty)?,
            StatementKind::Write(items) => commands::write::run(self, items)?,
            StatementKind::Newline => commands::send::run(self)?,
            StatementKind::Wait(seconds) => commands::wait::run(self, seconds)?,
            StatementKind::Clear(delay) => commands::clear::run(self, delay.as_ref())?,
            StatementKind::Notify { title, subtitle } => {
                commands::msg::run(self, title, subtitle)?
            }
            StatementKind::End
            | StatementKind::If(_)
            | StatementKind::Elif(_)
            | StatementKind::Else
            | StatementKind::While(_)
            | StatementKind::Function { .. }
            | StatementKind::Call { .. } => {
                return Err(Error::syntax("block statement reached the simple handler"))
            }
        }
        Ok(())
    }
}

fn at(stmt: &Statement, error: Error) -> ScriptError {
    ScriptError::new(stmt.line, stmt.text.clone(), error)
}
