//! cjsify - ES module to CommonJS rewriter
//!
//! CLI driver for checking how JavaScript and TypeScript modules rewrite to
//! CommonJS.

mod commands;
mod config;
mod pipeline;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// ES module to CommonJS rewriter
#[derive(Parser, Debug)]
#[command(name = "cjsify")]
#[command(author, version, about = "Rewrite ES modules to CommonJS")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file (defaults to ./cjsify.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output settings shared by every command.
#[derive(Clone, Copy, Debug)]
pub struct Output {
    pub format: OutputFormat,
    pub use_color: bool,
    pub verbose: u8,
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite file(s) and report problems without writing anything
    Check(commands::check::CheckArgs),

    /// Show what the rewrite of a single module hoists and exports
    Inspect(commands::inspect::InspectArgs),

    /// Explain a diagnostic code
    Explain(commands::explain::ExplainArgs),
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // Determine if colors should be used
    let use_color = !cli.no_color && !cli.quiet && atty::is(atty::Stream::Stdout);

    let Some(command) = cli.command else {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        cmd.print_help()?;
        println!();
        return Ok(());
    };

    let output = Output {
        format: cli.format,
        use_color,
        verbose: if cli.quiet { 0 } else { cli.verbose },
        quiet: cli.quiet,
    };
    let config_path = cli.config.as_deref();

    match command {
        Commands::Check(args) => commands::check::run(args, output, config_path),
        Commands::Inspect(args) => commands::inspect::run(args, output, config_path),
        Commands::Explain(args) => commands::explain::run(args, output.format, output.use_color),
    }
}
