//! `wait` — pause execution for the given number of seconds.
//!
//! Fractional seconds are supported.
//!
//! ```text
//! wait 1.5
//! wait %var delay
//! ```
use crate::ast::Operand;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::host::Host;
use crate::notify::Notifier;

pub fn run<H: Host, N: Notifier>(eval: &mut Evaluator<H, N>, seconds: &Operand) -> Result<()> {
    let duration = super::duration(eval, seconds, "wait")?;
    eval.host_mut().wait(duration);
    Ok(())
}
