//! Command-line surface of the `cmdscript` binary.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;

use cmdscript::config::{DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_ITERATIONS};
use cmdscript::Limits;

/// File extension of script files picked up automatically.
pub const SCRIPT_EXTENSION: &str = "cmdscript";

#[derive(Debug, Parser)]
#[command(
    name = "cmdscript",
    version,
    about = "Run a cmdscript file",
    long_about = "Run a cmdscript file. Without SCRIPT, the first *.cmdscript file \
                  (alphabetically) in the current directory is used."
)]
pub struct Cli {
    /// Script to run
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// Initial value of %1 (words are joined with single spaces)
    #[arg(long, num_args = 0.., value_name = "WORDS")]
    pub input: Option<Vec<String>>,

    /// Iterations a single while loop may run
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Nested function calls allowed
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    pub max_call_depth: usize,

    /// Do not emit ANSI colors
    #[arg(long)]
    pub no_color: bool,

    /// Never try desktop notifications; print them instead
    #[arg(long)]
    pub no_notify: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn limits(&self) -> Limits {
        Limits::default()
            .with_max_iterations(self.max_iterations)
            .with_max_call_depth(self.max_call_depth)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("InputQuotationError: {0}")]
    InputQuotation(String),
    #[error("cannot list '{dir}': {source}")]
    Discovery {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Join `--input` words and strip their quotes.
///
/// Quotes must balance across the whole input, and no single word may carry
/// exactly one quote.
pub fn join_input(words: &[String]) -> Result<String, CliError> {
    let joined = words.join(" ");
    if joined.matches('"').count() % 2 != 0 {
        return Err(CliError::InputQuotation(
            "Input string quotes are not balanced. Did you forget to put quotes around your input?"
                .into(),
        ));
    }
    if let Some(word) = words.iter().find(|w| w.matches('"').count() == 1) {
        return Err(CliError::InputQuotation(format!(
            "Input argument \"{}\" has unmatched quote. Did you forget to quote your input properly?",
            word
        )));
    }
    Ok(joined.replace('"', ""))
}

/// The alphabetically first `*.cmdscript` file in `dir`.
pub fn find_first_script(dir: &Path) -> Result<Option<PathBuf>, CliError> {
    let entries = fs::read_dir(dir).map_err(|source| CliError::Discovery {
        dir: dir.to_path_buf(),
        source,
    })?;
    let mut scripts: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION))
        .collect();
    scripts.sort();
    Ok(scripts.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn input_words_are_joined_and_unquoted() {
        assert_eq!(join_input(&words(&["\"hello world\""])).unwrap(), "hello world");
        assert_eq!(join_input(&words(&["a", "b"])).unwrap(), "a b");
        assert_eq!(join_input(&[]).unwrap(), "");
    }

    #[test]
    fn unbalanced_quotes_are_rejected() {
        let err = join_input(&words(&["\"oops"])).unwrap_err();
        assert!(matches!(err, CliError::InputQuotation(ref m) if m.contains("not balanced")));
    }

    #[test]
    fn a_word_with_a_single_quote_is_rejected_even_when_balanced() {
        let err = join_input(&words(&["\"hello", "world\""])).unwrap_err();
        assert!(matches!(err, CliError::InputQuotation(ref m) if m.contains("\"hello")));
    }

    #[test]
    fn discovery_picks_the_first_script_alphabetically() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.cmdscript"), "").unwrap();
        fs::write(dir.path().join("a.cmdscript"), "").unwrap();
        fs::write(dir.path().join("0.txt"), "").unwrap();
        let found = find_first_script(dir.path()).unwrap().unwrap();
        assert_eq!(found.file_name().unwrap(), "a.cmdscript");
    }

    #[test]
    fn discovery_in_an_empty_directory_finds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_first_script(dir.path()).unwrap().is_none());
    }

    #[test]
    fn flags_map_onto_limits() {
        let cli = Cli::parse_from(["cmdscript", "x.cmdscript", "--max-iterations", "5", "-vv"]);
        assert_eq!(cli.limits().max_iterations, 5);
        assert_eq!(cli.limits().max_call_depth, DEFAULT_MAX_CALL_DEPTH);
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);
        assert!(cli.input.is_none());
    }

    #[test]
    fn input_flag_collects_words() {
        let cli = Cli::parse_from(["cmdscript", "x.cmdscript", "--input", "hi", "there"]);
        assert_eq!(cli.input, Some(words(&["hi", "there"])));
    }
}
