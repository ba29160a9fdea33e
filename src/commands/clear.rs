//! `clear` — optionally wait, then clear the screen.
//!
//! ```text
//! clear
//! clear 2
//! clear %var delay
//! ```
use std::time::Duration;

use crate::ast::Operand;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::host::Host;
use crate::notify::Notifier;

pub fn run<H: Host, N: Notifier>(
    eval: &mut Evaluator<H, N>,
    delay: Option<&Operand>,
) -> Result<()> {
    let delay = match delay {
        Some(operand) => super::duration(eval, operand, "clear")?,
        None => Duration::ZERO,
    };
    eval.host_mut().clear(delay)?;
    Ok(())
}
