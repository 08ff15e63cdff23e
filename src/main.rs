use clap::{Parser, Subcommand};
use config::settings;
use segment_cli::{match_and_print, NetworkCommand};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "blazar",
    author,
    version,
    about = "Reservation dashboard server and network-segment CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the dashboard web server
    Serve,

    /// Network-segment operations against the reservation service
    Network {
        #[clap(subcommand)]
        action: NetworkCommand,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::from(settings().logging.max_level))
        .init();

    match cli.command {
        Command::Serve => dashboard::entry().await?,
        Command::Network { action } => {
            let client = client::BlazarClient::new(
                &settings().reservation.url,
                settings().reservation.token.clone(),
            )?;
            match_and_print(segment_cli::run(&client, action).await);
        }
    }

    Ok(())
}
