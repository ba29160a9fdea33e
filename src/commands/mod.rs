//! Handlers for the commands that reach outside the interpreter.
//!
//! Each handler resolves its operands through the [`Evaluator`] and then
//! hands the side effect to the host (or the notifier, for `msg`). They are
//! dispatched from `Evaluator::execute_simple`, one per statement kind.
//!
//! [`Evaluator`]: crate::evaluator::Evaluator

use std::time::Duration;

use crate::ast::Operand;
use crate::error::{Error, Result};
use crate::evaluator::Evaluator;
use crate::host::Host;
use crate::notify::Notifier;
use crate::value::Value;

pub mod clear; // clear
pub mod input; // input
pub mod msg;   // msg
pub mod send;  // send %NL%
pub mod wait;  // wait
pub mod write; // write

/// Resolve an operand that must be a number of seconds.
fn duration<H: Host, N: Notifier>(
    eval: &Evaluator<H, N>,
    operand: &Operand,
    command: &str,
) -> Result<Duration> {
    let secs = match eval.eval_operand(operand)? {
        Value::Integer(i) => i as f64,
        Value::Decimal(d) => d,
        Value::Text(t) => {
            return Err(Error::type_mismatch(format!(
                "{}: '{}' is not a number of seconds",
                command, t
            )))
        }
    };
    Duration::try_from_secs_f64(secs).map_err(|_| {
        Error::type_mismatch(format!(
            "{}: duration must be a non-negative number of seconds in range, got {}",
            command, secs
        ))
    })
}
