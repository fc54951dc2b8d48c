use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imageserver::{routes, AppState, Config};

#[derive(Parser, Debug)]
#[command(name = "imageserver")]
#[command(about = "Minimal HTTP server exposing a directory of images")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "IMAGESERVER_PORT")]
    port: Option<u16>,

    /// Address to bind to
    #[arg(short, long, env = "IMAGESERVER_BIND")]
    bind: Option<String>,

    /// Directory of images to serve
    #[arg(short, long, env = "IMAGESERVER_DIR")]
    dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, env = "IMAGESERVER_VERBOSE")]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long, env = "IMAGESERVER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "imageserver=debug,tower_http=debug"
    } else {
        "imageserver=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config from file if provided, otherwise use defaults;
    // CLI flags and their env vars override either
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    if let Some(dir) = cli.dir {
        config.image_dir = dir;
    }
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    // Resolve the image directory to an absolute path where possible
    let image_dir = config
        .image_dir
        .canonicalize()
        .unwrap_or_else(|_| config.image_dir.clone());

    // The directory is not required to exist at startup; listings answer
    // 500 until it does
    if !image_dir.is_dir() {
        warn!(
            "Image directory does not exist yet: {}",
            image_dir.display()
        );
    }

    info!("Serving images from: {}", image_dir.display());

    let state = AppState::new(image_dir);

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .merge(routes::image_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.bind, config.port).parse()?;
    info!("Starting imageserver on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
