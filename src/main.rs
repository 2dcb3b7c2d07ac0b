//! cricfeed - cached cricket match data from a rate-limited upstream API
//!
//! One-shot subcommands print a read operation's result as JSON; `watch`
//! runs the background refresh loop until interrupted.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cricfeed::cli::{Cli, Command};
use cricfeed::{FeedError, MatchService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cricfeed=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = cli.to_config();
    let service = MatchService::new(config).unwrap_or_else(|err| fail(err));

    match cli.command {
        Command::Current => {
            print_json(&service.current_matches().await)?;
        }
        Command::Upcoming => {
            print_json(&service.upcoming_matches().await)?;
        }
        Command::All => {
            print_json(&service.all_matches().await)?;
        }
        Command::Detail { id } => {
            let detail = service.match_details(&id).await.unwrap_or_else(|err| fail(err));
            print_json(&detail)?;
        }
        Command::Series => {
            let series = service.series_list().await.unwrap_or_else(|err| fail(err));
            print_json(&series)?;
        }
        Command::Status => {
            print_json(&service.status().await)?;
        }
        Command::Watch => {
            let handle = service.spawn_refresh();
            info!("background refresh running, press Ctrl-C to stop");
            tokio::signal::ctrl_c().await?;
            handle.shutdown().await;
            info!("stopped");
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn fail(err: FeedError) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}
