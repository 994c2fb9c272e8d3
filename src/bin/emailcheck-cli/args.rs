use clap::{Parser, Subcommand};
#[cfg(feature = "with-dns")]
use emailcheck_lib::CheckOptions;

#[derive(Parser)]
#[command(name = "emailcheck-cli", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// lit des adresses depuis stdin (une par ligne)
    #[arg(long)]
    pub stdin: bool,

    /// write report to file; requires --format json|ndjson|csv
    #[arg(long, global = true)]
    pub out: Option<String>,

    /// format: human|json|ndjson|csv
    #[arg(long, global = true, default_value = "human")]
    pub format: String,

    /// logs détaillés sur stderr (sinon RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// résout le domaine des adresses valides (feature `with-dns`)
    #[cfg(feature = "with-dns")]
    #[arg(long)]
    pub dns: bool,

    /// timeout global d'une résolution (ms, 0 = aucun)
    #[cfg(feature = "with-dns")]
    #[arg(long = "timeout-ms", global = true, default_value_t = 5_000)]
    pub timeout_ms: u64,

    /// nombre de tentatives par serveur DNS
    #[cfg(feature = "with-dns")]
    #[arg(long, global = true, default_value_t = 2)]
    pub attempts: usize,

    /// ignore la configuration système (resolv.conf)
    #[cfg(feature = "with-dns")]
    #[arg(long = "no-system-conf", global = true)]
    pub no_system_conf: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// vérifie uniquement la syntaxe
    Validate { email: String },
    /// syntaxe puis résolution DNS du domaine
    #[cfg(feature = "with-dns")]
    Check { email: String },
}

impl Commands {
    pub fn email(&self) -> &str {
        match self {
            Self::Validate { email } => email,
            #[cfg(feature = "with-dns")]
            Self::Check { email } => email,
        }
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    #[cfg(feature = "with-dns")]
    pub fn dns_requested(&self) -> bool {
        self.dns || matches!(self.cmd, Some(Commands::Check { .. }))
    }

    #[cfg(feature = "with-dns")]
    pub fn check_options(&self) -> CheckOptions {
        CheckOptions::new()
            .with_timeout_ms(self.timeout_ms)
            .with_attempts(self.attempts)
            .with_system_conf(!self.no_system_conf)
    }
}
