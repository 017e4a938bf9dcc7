/// Encore Server - playback session API
use clap::{Parser, Subcommand, ValueEnum};
use encore_core::types::{DeviceId, DeviceType, UserId};
use encore_playback::SessionEngine;
use encore_server::{
    api, config::ServerConfig, services::AuthService, state::AppState, ServerError,
};
use encore_storage::SqliteStore;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "encore-server")]
#[command(about = "Encore playback session server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "ENCORE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create the playback record for a new account
    CreatePlayer {
        /// User ID
        #[arg(short, long)]
        user: String,
        /// Account is ad-supported
        #[arg(long)]
        ads: bool,
    },
    /// Register an output device for a user
    RegisterDevice {
        /// Owner user ID
        #[arg(short, long)]
        user: String,
        /// Device ID
        #[arg(short, long)]
        id: String,
        /// Display name
        #[arg(short, long)]
        name: String,
        #[arg(short = 't', long, value_enum, default_value_t = DeviceKind::Web)]
        device_type: DeviceKind,
    },
    /// Print an access token for a user
    IssueToken {
        /// User ID
        #[arg(short, long)]
        user: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DeviceKind {
    Web,
    Desktop,
    Mobile,
    Speaker,
}

impl From<DeviceKind> for DeviceType {
    fn from(kind: DeviceKind) -> Self {
        match kind {
            DeviceKind::Web => DeviceType::Web,
            DeviceKind::Desktop => DeviceType::Desktop,
            DeviceKind::Mobile => DeviceType::Mobile,
            DeviceKind::Speaker => DeviceType::Speaker,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "encore_server=info,encore_playback=info,encore_storage=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::CreatePlayer { user, ads } => create_player(&config, &user, ads).await?,
        Commands::RegisterDevice {
            user,
            id,
            name,
            device_type,
        } => register_device(&config, &user, &id, &name, device_type.into()).await?,
        Commands::IssueToken { user } => issue_token(&config, &user)?,
    }

    Ok(())
}

async fn open_store(config: &ServerConfig) -> anyhow::Result<Arc<SqliteStore>> {
    let pool = encore_storage::create_pool(&config.storage.database_url).await?;
    encore_storage::run_migrations(&pool).await?;
    Ok(Arc::new(SqliteStore::new(pool)))
}

fn build_engine(store: &Arc<SqliteStore>, config: &ServerConfig) -> SessionEngine {
    SessionEngine::new(
        encore_playback::SessionBackends {
            players: store.clone(),
            queues: store.clone(),
            queue_refs: store.clone(),
            catalog: store.clone(),
            devices: store.clone(),
            activity: store.clone(),
        },
        config.session.clone(),
    )
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Encore Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let store = open_store(&config).await?;
    tracing::info!("Database connected");

    let engine = Arc::new(build_engine(&store, &config));
    let auth_service = Arc::new(AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    ));

    let app = api::create_router(AppState::new(Arc::clone(&engine), auth_service));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    tracing::info!("Draining activity queue");
    engine.flush_activity().await;

    Ok(())
}

async fn create_player(config: &ServerConfig, user: &str, ads: bool) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let engine = build_engine(&store, config);

    let player = engine.create_player(&UserId::new(user), ads).await?;

    println!(
        "Player ready for {} (ad-supported: {})",
        player.user_id,
        player.ads_counter.is_some()
    );
    Ok(())
}

async fn register_device(
    config: &ServerConfig,
    user: &str,
    id: &str,
    name: &str,
    device_type: DeviceType,
) -> anyhow::Result<()> {
    let store = open_store(config).await?;

    let device = encore_storage::devices::register(
        store.pool(),
        &DeviceId::new(id),
        &UserId::new(user),
        name,
        device_type,
    )
    .await?;

    println!("Registered {} ({}) for {}", device.id, device.device_type, device.user_id);
    Ok(())
}

fn issue_token(config: &ServerConfig, user: &str) -> anyhow::Result<()> {
    if config.auth.jwt_secret.is_empty() {
        return Err(ServerError::Config(
            "JWT secret is required (set ENCORE_AUTH__JWT_SECRET)".to_string(),
        )
        .into());
    }

    let auth_service = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    );
    println!("{}", auth_service.create_access_token(&UserId::new(user))?);
    Ok(())
}
