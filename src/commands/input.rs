//! `input` — prompt for one line and store it in `%1`.
//!
//! The answer is converted to the requested type (`text` by default); an
//! answer that does not parse as that type is a type mismatch.
//!
//! ```text
//! input "How old are you? " int
//! write "Next year you will be " %1
//! ```
use crate::ast::Operand;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::host::Host;
use crate::notify::Notifier;
use crate::value::{Value, ValueType};

pub fn run<H: Host, N: Notifier>(
    eval: &mut Evaluator<H, N>,
    message: &Operand,
    ty: ValueType,
) -> Result<()> {
    let message = eval.eval_operand(message)?.to_string();
    let answer = eval.host_mut().prompt(&message)?;
    let value = Value::parse_as(&answer, ty)?;
    eval.set_last_input(value);
    Ok(())
}
