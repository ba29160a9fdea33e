//! Best-effort desktop notifications for the `msg` command.
//!
//! The evaluator only sees the [`Notifier`] trait. When a notifier reports
//! an error, the evaluator prints a fallback line and keeps going.

use std::io;
use std::process::{Command, Stdio};

use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("desktop notifications are unavailable on this system")]
    Unavailable,
    #[error("notification command exited with {0}")]
    Failed(std::process::ExitStatus),
    #[error("notification command failed: {0}")]
    Io(#[from] io::Error),
}

pub trait Notifier {
    fn notify(&mut self, title: &str, subtitle: &str) -> Result<(), NotifyError>;
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&mut self, title: &str, subtitle: &str) -> Result<(), NotifyError> {
        (**self).notify(title, subtitle)
    }
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn notify(&mut self, title: &str, subtitle: &str) -> Result<(), NotifyError> {
        (**self).notify(title, subtitle)
    }
}

/// Never delivers anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unavailable;

impl Notifier for Unavailable {
    fn notify(&mut self, _title: &str, _subtitle: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Unavailable)
    }
}

/// Delivers through the platform's notification command: `notify-send` on
/// Linux and the BSDs, `osascript` on macOS, `msg` on Windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct Desktop;

impl Desktop {
    fn command(title: &str, subtitle: &str) -> Option<Command> {
        if cfg!(target_os = "macos") {
            let script = format!(
                "display notification \"{}\" with title \"{}\"",
                escape_applescript(subtitle),
                escape_applescript(title)
            );
            let mut cmd = Command::new("osascript");
            cmd.arg("-e").arg(script);
            Some(cmd)
        } else if cfg!(windows) {
            let mut cmd = Command::new("msg");
            cmd.arg("*").arg(format!("{}: {}", title, subtitle));
            Some(cmd)
        } else if cfg!(unix) {
            let mut cmd = Command::new("notify-send");
            cmd.arg(title).arg(subtitle);
            Some(cmd)
        } else {
            None
        }
    }
}

impl Notifier for Desktop {
    fn notify(&mut self, title: &str, subtitle: &str) -> Result<(), NotifyError> {
        let mut cmd = Self::command(title, subtitle).ok_or(NotifyError::Unavailable)?;
        debug!("sending notification via {:?}", cmd.get_program());
        let status = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => NotifyError::Unavailable,
                _ => NotifyError::Io(e),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(NotifyError::Failed(status))
        }
    }
}

fn escape_applescript(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Pick the notifier at startup.
pub fn select(enabled: bool) -> Box<dyn Notifier> {
    if enabled {
        Box::new(Desktop)
    } else {
        Box::new(Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_always_fails() {
        assert!(matches!(
            Unavailable.notify("a", "b"),
            Err(NotifyError::Unavailable)
        ));
        assert!(select(false).notify("a", "b").is_err());
    }

    #[test]
    fn applescript_quotes_are_escaped() {
        assert_eq!(escape_applescript(r#"say "hi""#), r#"say \"hi\""#);
    }
}
