use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tubescope::commands::{self, FetchArgs};
use tubescope::config::Config;
use tubescope::error::AppResult;
use tubescope::server;

/// tubescope - browse a YouTube channel's uploads
#[derive(Parser, Debug)]
#[command(name = "tubescope")]
#[command(version)]
#[command(about = "Fetch, sort and export the uploaded videos of a YouTube channel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server
    Server {
        /// Host to bind to (overrides SERVER_HOST env var)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides SERVER_PORT env var)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Fetch a channel's uploads once and print them
    Fetch(FetchArgs),

    /// Show the channel id and uploads playlist behind a channel URL
    Resolve {
        /// Channel URL, e.g. https://www.youtube.com/@ChannelName
        url: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    // .env may set RUST_LOG / LOG_FORMAT, so load it before tracing starts
    dotenvy::dotenv().ok();
    init_tracing();

    // Load configuration
    let config = Config::from_env()?;

    match cli.command {
        Commands::Server { host, port } => {
            // Override config with CLI args if provided
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);

            server::run_server(config, addr).await
        }
        Commands::Fetch(args) => commands::fetch(config, args).await,
        Commands::Resolve { url } => commands::resolve(config, url).await,
    }
}
