use clap::{Parser, Subcommand};
use petpal_core::{CallerIdentity, Coordinate};
use petpal_places::VetLookupService;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "petpal-cli")]
#[command(about = "PetPal operator command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Veterinarian lookups against the live places provider.
    Vets {
        #[command(subcommand)]
        command: VetsCommands,
    },
    /// Configuration diagnostics.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum VetsCommands {
    /// Print vets near a coordinate as JSON.
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Load configuration and print it with secrets redacted.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = petpal_core::load_app_config_from_env()?;

    match cli.command {
        Commands::Vets {
            command: VetsCommands::Nearby { lat, lng },
        } => {
            let coordinate = Coordinate::new(lat, lng)?;
            let service = VetLookupService::from_config(&config)?;
            let caller = CallerIdentity::new("petpal-cli");
            let vets = service.fetch_nearby(coordinate, &caller).await?;
            tracing::info!(count = vets.len(), "nearby vets fetched");
            println!("{}", serde_json::to_string_pretty(&vets)?);
        }
        Commands::Config {
            command: ConfigCommands::Check,
        } => {
            println!("{config:#?}");
        }
    }

    Ok(())
}
