use std::fmt;

use crate::lexer::Token;
use crate::value::{Value, ValueType};

/// A single value-producing operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A quoted string or a numeric literal.
    Literal(Value),
    /// `%1` — the value captured by the most recent prompt.
    LastInput,
    /// `%var name` or a bare declared `name`.
    Variable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            _ => None,
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        })
    }
}

/// Relational and substring operators usable in `%if` / `%while` headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Contains,
    ContainsIgnoreCase,
}

impl RelOp {
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "=" => Some(Self::Eq),
            "X=" | "x=" => Some(Self::Ne),
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            ">=" => Some(Self::Ge),
            "<=" => Some(Self::Le),
            "~" => Some(Self::Contains),
            "~=" => Some(Self::ContainsIgnoreCase),
            _ => None,
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eq => "=",
            Self::Ne => "X=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Contains => "~",
            Self::ContainsIgnoreCase => "~=",
        })
    }
}

/// Right-hand side of a value assignment: an operand, optionally combined
/// with a second one through a single arithmetic operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Operand(Operand),
    Binary {
        lhs: Operand,
        op: ArithOp,
        rhs: Operand,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub lhs: Operand,
    pub op: RelOp,
    pub rhs: Operand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Blue,
    Purple,
}

impl Color {
    /// `None` inside `Some` means the `%reset` code.
    pub fn from_code(code: &str) -> Option<Option<Self>> {
        match code.to_ascii_lowercase().as_str() {
            "%redtext" => Some(Some(Self::Red)),
            "%greentext" => Some(Some(Self::Green)),
            "%bluetext" => Some(Some(Self::Blue)),
            "%purpletext" => Some(Some(Self::Purple)),
            "%reset" => Some(None),
            _ => None,
        }
    }
}

/// One argument of `write`.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteItem {
    /// Switch color for the following items; `None` resets it.
    Color(Option<Color>),
    Operand(Operand),
}

/// Closed classification of a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `name%alias = alias`
    AliasDecl { name: String, alias: String },
    /// `name%type = int|dec|text`
    TypeDecl { name: String, ty: ValueType },
    /// `name%value = expr`
    ValueAssign { name: String, expr: Expr },
    If(Condition),
    Elif(Condition),
    Else,
    While(Condition),
    /// `%f Name:`
    Function { name: String },
    /// A bare function name.
    Call { name: String },
    /// `input "message" [type]`
    Prompt { message: Operand, ty: ValueType },
    Write(Vec<WriteItem>),
    /// `send %NL%`
    Newline,
    Wait(Operand),
    Clear(Option<Operand>),
    /// `msg %title ... %subtitle ...`
    Notify { title: Operand, subtitle: Operand },
    /// `ii`
    End,
}

impl StatementKind {
    /// Headers own the indented block that follows them.
    pub fn is_header(&self) -> bool {
        matches!(
            self,
            Self::If(_) | Self::Elif(_) | Self::Else | Self::While(_) | Self::Function { .. }
        )
    }

    pub fn is_continuation(&self) -> bool {
        matches!(self, Self::Elif(_) | Self::Else)
    }
}

/// One classified logical line.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// 1-based source line.
    pub line: usize,
    pub depth: usize,
    /// Source text without indentation.
    pub text: String,
    pub tokens: Vec<Token>,
    pub kind: StatementKind,
}

/// Renders the statement back to source: depth as spaces, tokens joined by
/// a single space.
impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:width$}", "", width = self.depth)?;
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match token {
                Token::Bare(s) => f.write_str(s)?,
                Token::Quoted(s) => {
                    f.write_str("\"")?;
                    for c in s.chars() {
                        match c {
                            '"' => f.write_str("\\\"")?,
                            '\\' => f.write_str("\\\\")?,
                            '\n' => f.write_str("\\n")?,
                            '\t' => f.write_str("\\t")?,
                            c => write!(f, "{}", c)?,
                        }
                    }
                    f.write_str("\"")?;
                }
            }
        }
        Ok(())
    }
}

/// A classified script, ready to execute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}
