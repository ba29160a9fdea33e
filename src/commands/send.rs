// `send %NL%` — emit a line break.
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::host::Host;
use crate::notify::Notifier;

pub fn run<H: Host, N: Notifier>(eval: &mut Evaluator<H, N>) -> Result<()> {
    eval.host_mut().newline()?;
    Ok(())
}
