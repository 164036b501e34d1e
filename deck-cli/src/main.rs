//! # swipedeck
//!
//! CLI for the swipedeck people feed.
//!
//! ## Commands
//!
//! - `device`: Show (and create on first use) the device identity
//! - `feed`: Show a page of people not swiped yet
//! - `liked`: Show a page of people this device likes
//! - `like` / `dislike`: Record a swipe for one person
//! - `play`: Replay scripted swipes through a full deck session
//!
//! ## Example
//!
//! ```bash
//! # Browse the feed of a local server
//! swipedeck --base-url http://localhost:8080/api feed
//!
//! # Like person 3
//! swipedeck like 3
//!
//! # Swipe through the deck offline
//! swipedeck --mock play "like left tease nope"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use swipedeck_client::{
    HttpPeopleApi, HttpPrefetcher, ImagePrefetcher, MockPeopleApi, NoopPrefetcher, PeopleApi,
    UserLocation,
};
use swipedeck_types::{PersonId, SwipeAction};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod demo;

use commands::{device, feed, liked, play, swipe};
use config::DeviceConfig;

/// CLI for the swipedeck people feed.
#[derive(Parser, Debug)]
#[command(name = "swipedeck")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory for storing the device identity
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Client configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// REST API base URL (overrides the configuration file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Your latitude, for distances
    #[arg(long, global = true, requires = "longitude", allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// Your longitude, for distances
    #[arg(long, global = true, requires = "latitude", allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// Use an in-memory demo backend instead of the REST API
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the device identity
    Device,

    /// Show people you have not swiped yet
    Feed {
        /// Page number
        #[arg(long, default_value = "1")]
        page: u32,

        /// Page size
        #[arg(long, default_value = "10")]
        limit: u32,
    },

    /// Show people you like
    Liked {
        /// Page number
        #[arg(long, default_value = "1")]
        page: u32,

        /// Page size
        #[arg(long, default_value = "10")]
        limit: u32,
    },

    /// Like a person
    Like {
        /// Person id
        id: i64,
    },

    /// Dislike a person
    Dislike {
        /// Person id
        id: i64,
    },

    /// Replay scripted swipes (like, nope, right, left, tease)
    Play {
        /// Moves, separated by commas or spaces
        script: String,

        /// Warm upcoming card photos over HTTP
        #[arg(long)]
        prefetch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;

    if let Commands::Device = cli.command {
        device::run(&data_dir).await?;
        return Ok(());
    }

    let mut client_config =
        config::load_client_config(cli.config.as_deref(), cli.base_url.as_deref())?;
    if let (Some(latitude), Some(longitude)) = (cli.latitude, cli.longitude) {
        client_config.location = Some(UserLocation {
            latitude,
            longitude,
        });
    }

    let api: Arc<dyn PeopleApi> = if cli.mock {
        Arc::new(MockPeopleApi::with_people(demo::demo_profiles()))
    } else {
        let device = DeviceConfig::load_or_create(&data_dir).await?;
        Arc::new(HttpPeopleApi::from_config(&client_config, &device.device_id)?)
    };

    match cli.command {
        Commands::Device => {}
        Commands::Feed { page, limit } => {
            feed::run(api.as_ref(), page, limit).await?;
        }
        Commands::Liked { page, limit } => {
            liked::run(api.as_ref(), page, limit).await?;
        }
        Commands::Like { id } => {
            swipe::run(api.as_ref(), PersonId::new(id), SwipeAction::Like).await?;
        }
        Commands::Dislike { id } => {
            swipe::run(api.as_ref(), PersonId::new(id), SwipeAction::Dislike).await?;
        }
        Commands::Play { script, prefetch } => {
            let moves = play::parse_script(&script)?;
            let prefetcher: Arc<dyn ImagePrefetcher> = if prefetch {
                Arc::new(HttpPrefetcher::new(client_config.timeout())?)
            } else {
                Arc::new(NoopPrefetcher)
            };
            play::run(client_config.swipe, api, prefetcher, &moves).await?;
        }
    }

    Ok(())
}

/// Get the default data directory for swipedeck.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("dev", "swipedeck", "swipedeck")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
