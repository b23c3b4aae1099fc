// CLI binary entry point for pathtag

mod cli;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::commands::{command_rename, command_show, command_tag};
use cli::{Commands, Config, OutputFormatter};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let config = Config::parse();
    init_tracing(config.verbose);

    let formatter = OutputFormatter::new(config.format, config.quiet);
    let result = match &config.command {
        Commands::Show { files } => command_show(files, &formatter),
        Commands::Tag(args) => command_tag(args, &formatter),
        Commands::Rename(args) => command_rename(args, &formatter),
    };

    match result {
        Ok(summary) if summary.failed == 0 => ExitCode::SUCCESS,
        Ok(summary) => {
            formatter.print_info(&format!(
                "Completed: {} successful, {} errors",
                summary.succeeded, summary.failed
            ));
            ExitCode::FAILURE
        }
        Err(e) => {
            formatter.print_error(&format!("{e:#}"));
            ExitCode::from(2)
        }
    }
}
