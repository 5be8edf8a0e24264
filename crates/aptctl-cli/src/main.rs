use std::path::Path;

use clap::Parser;
use cli::{Args, Commands};
use config::Config;
use error::Result;
use logging::setup_logging;
use tracing::debug;
use utils::disable_color;

mod cli;
mod config;
mod error;
mod files;
mod logging;
mod package;
mod publish;
mod repo;
mod snapshot;
mod status;
mod upload;
mod utils;

fn handle_cli() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        disable_color();
    }

    let config = Config::load(args.config.as_deref().map(Path::new))?;
    let client = config.client_config(&args.connection)?.build();
    debug!("using aptly server at {}", client.base_url());

    match args.command {
        Commands::Repo {
            command,
        } => repo::run(&client, command),
        Commands::Snapshot {
            command,
        } => snapshot::run(&client, command),
        Commands::Publish {
            command,
        } => publish::run(&client, command),
        Commands::Package {
            command,
        } => package::run(&client, command),
        Commands::Files {
            command,
        } => files::run(&client, command),
        Commands::Status {
            command,
        } => status::run(&client, command),
    }
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
