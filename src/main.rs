mod cli;

use std::fs;

use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};

use cli::Cli;
use cmdscript::{notify, Terminal};

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let path = match &cli.script {
        Some(path) => path.clone(),
        None => {
            let cwd = std::env::current_dir().into_diagnostic()?;
            match cli::find_first_script(&cwd).into_diagnostic()? {
                Some(path) => path,
                None => {
                    println!("No .{} files found in current directory.", cli::SCRIPT_EXTENSION);
                    println!("No .{} file to run.", cli::SCRIPT_EXTENSION);
                    return Ok(());
                }
            }
        }
    };

    let input = cli
        .input
        .as_deref()
        .map(cli::join_input)
        .transpose()
        .into_diagnostic()?;

    let source = fs::read_to_string(&path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Error reading '{}'", path.display()))?;

    println!(
        "Running {} with input: {}\n",
        path.display(),
        input.as_deref().unwrap_or("")
    );

    cmdscript::run_script(
        &source,
        Terminal::new(!cli.no_color),
        notify::select(!cli.no_notify),
        cli.limits(),
        input.as_deref(),
    )
    .into_diagnostic()?;

    Ok(())
}
