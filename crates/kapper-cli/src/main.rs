mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "kapper-cli")]
#[command(about = "Cluster and query provider map markers offline")]
struct Cli {
    /// Providers file (YAML or JSON).
    #[arg(
        long,
        global = true,
        env = "KAPPER_PROVIDERS_PATH",
        default_value = "./config/providers.yaml"
    )]
    providers: PathBuf,

    /// Zoom table override (YAML).
    #[arg(long, global = true, env = "KAPPER_ZOOM_TABLE_PATH")]
    zoom_table: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render the marker layer for one zoom level.
    Markers {
        #[arg(long, allow_negative_numbers = true)]
        zoom: f64,
        /// Case-insensitive name substring.
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price_range: Option<String>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Find the provider closest to a coordinate.
    Nearest {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
    /// Show which markers change when zooming from one level to another.
    Transition {
        #[arg(long, allow_negative_numbers = true)]
        from: f64,
        #[arg(long, allow_negative_numbers = true)]
        to: f64,
        #[arg(long)]
        json: bool,
    },
    /// Print the zoom bands and their clustering radius.
    ZoomTable,
    /// Load the providers file and report rejected records.
    Validate,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context::load(&cli.providers, cli.zoom_table.as_deref())?;

    match cli.command {
        Some(Commands::Markers {
            zoom,
            name,
            price_range,
            json,
        }) => commands::markers(&ctx, zoom, kapper_core::ProviderFilter { name, price_range }, json),
        Some(Commands::Nearest { lat, lng }) => commands::nearest(&ctx, lat, lng),
        Some(Commands::Transition { from, to, json }) => commands::transition(&ctx, from, to, json),
        Some(Commands::ZoomTable) => {
            commands::zoom_table(&ctx);
            Ok(())
        }
        Some(Commands::Validate) | None => commands::validate(&ctx),
    }
}

#[cfg(test)]
mod tests;
