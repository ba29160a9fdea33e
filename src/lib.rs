//! cmdscript — a small line-oriented scripting language.
//!
//! ```text
//! name%alias = people
//! name%type = text
//! input "Who are you? "
//! name%value = %1
//!
//! %f Greet:
//!     write %greentext "Hello, " %var name
//!     send %NL%
//!
//! Greet
//! ```
//!
//! A script is classified line by line ([`parser::parse`]) and executed by
//! an [`Evaluator`], which sends every observable effect to a [`Host`].

pub mod ast;
pub mod blocks;
pub mod commands;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod host;
pub mod lexer;
pub mod notify;
pub mod parser;
pub mod store;
pub mod value;

pub use ast::Program;
pub use config::Limits;
pub use error::{Error, ScriptError};
pub use evaluator::{Evaluator, Halt};
pub use host::{Buffer, Host, Terminal};
pub use notify::Notifier;
pub use value::{Value, ValueType};

/// Classify a whole script.
pub fn load(source: &str) -> Result<Program, ScriptError> {
    parser::parse(source)
}

/// Load and run `source` in one go.
///
/// `input`, when given, is stored in `%1` as text before the first
/// statement runs.
pub fn run_script<H: Host, N: Notifier>(
    source: &str,
    host: H,
    notifier: N,
    limits: Limits,
    input: Option<&str>,
) -> Result<Halt, ScriptError> {
    let mut eval = Evaluator::new(load(source)?, host, notifier).with_limits(limits);
    if let Some(input) = input {
        eval = eval.with_input(Value::Text(input.to_string()));
    }
    eval.run()
}
