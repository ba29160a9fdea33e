//! `msg` — desktop notification.
//!
//! ```text
//! msg %title "Backup" %subtitle "finished"
//! ```
//!
//! When no notification can be shown, a `(Notification) <title>: <subtitle>`
//! line is printed instead and the script continues.
use log::warn;

use crate::ast::Operand;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::host::Host;
use crate::notify::Notifier;

pub fn run<H: Host, N: Notifier>(
    eval: &mut Evaluator<H, N>,
    title: &Operand,
    subtitle: &Operand,
) -> Result<()> {
    let title = eval.eval_operand(title)?.to_string();
    let subtitle = eval.eval_operand(subtitle)?.to_string();

    if let Err(e) = eval.notifier_mut().notify(&title, &subtitle) {
        warn!("notification not delivered: {}", e);
        eval.host_mut()
            .diagnostic(&format!("(Notification) {}: {}", title, subtitle))?;
    }
    Ok(())
}
