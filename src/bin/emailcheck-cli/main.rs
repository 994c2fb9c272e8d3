mod args;
#[cfg(feature = "with-dns")]
mod dns;
mod output;

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use args::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let addresses: Vec<String> = if cli.stdin {
        let mut lines = Vec::new();
        for line in io::stdin().lock().lines() {
            lines.push(line.context("read stdin")?);
        }
        lines
    } else if let Some(cmd) = &cli.cmd {
        vec![cmd.email().to_string()]
    } else {
        Cli::clap_command().print_help()?;
        println!();
        return Ok(());
    };

    output::ensure_destination(&cli)?;
    let rows = output::make_rows(&addresses, &cli)?;
    output::write_reports(&rows, &cli)?;

    // codes de sortie : 0 OK, 2 invalides, 1 fatal
    if output::any_invalid(&rows) {
        std::process::exit(2);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("emailcheck_lib=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
