//! `write` — print values without a trailing newline.
//!
//! Every argument is resolved and emitted as-is; no spaces are inserted
//! between them. Color codes switch the color of the arguments after them
//! and the color is reset when the command finishes.
//!
//! ```text
//! write "Hello, " %1 "!"
//! write %greentext "ok " %reset "total: " %var total
//! ```
use crate::ast::WriteItem;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::host::{Fragment, Host};
use crate::notify::Notifier;

pub fn run<H: Host, N: Notifier>(eval: &mut Evaluator<H, N>, items: &[WriteItem]) -> Result<()> {
    let fragments = items
        .iter()
        .map(|item| match item {
            WriteItem::Color(color) => Ok(Fragment::Color(*color)),
            WriteItem::Operand(operand) => {
                eval.eval_operand(operand).map(|v| Fragment::Text(v.to_string()))
            }
        })
        .collect::<Result<Vec<_>>>()?;
    eval.host_mut().write(&fragments)?;
    Ok(())
}
