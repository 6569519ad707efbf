mod cli;
mod cmd;

use clap::Parser;
use cli::{CacheAction, Cli, Commands, ConfigAction, UserAction};
use std::process;
use tracing_subscriber::EnvFilter;

use vitalcoach::output;

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` wins over
/// the per-command default.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let serving = matches!(cli.command, Commands::Serve { .. });
    init_tracing(if serving { "info,tower_http=info" } else { "warn" });

    let result = match cli.command {
        Commands::Init { skip } => cmd::init::run(skip),
        Commands::Serve { bind } => cmd::serve::run(bind),
        Commands::User { action } => match action {
            UserAction::Add(args) => cmd::user::run_add(args, cli.human),
            UserAction::List => cmd::user::run_list(cli.human),
        },
        Commands::Log(args) => cmd::log::run(args, cli.date, cli.human),
        Commands::Show {
            user,
            last,
            from,
            to,
        } => cmd::show::run(&user, last, from, to, cli.human),
        Commands::Insights { user } => cmd::insights::run(&user, cli.human),
        Commands::Alerts {
            user,
            generate,
            unacknowledged,
        } => cmd::alerts::run(&user, generate, unacknowledged, cli.human),
        Commands::Cache { action } => match action {
            CacheAction::Purge => cmd::cache::run_purge(cli.human),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd::config::run_show(cli.human),
            ConfigAction::Set { key, value } => cmd::config::run_set(&key, &value),
        },
    };

    if let Err(e) = result {
        let err = output::error("", "general_error", &e.to_string());
        eprintln!("{}", err);
        process::exit(1);
    }
}
