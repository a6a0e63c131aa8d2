// ============================
// crates/backend-bin/src/main.rs
// ============================
//! Portal server and seeding commands.
use anyhow::Context;
use clap::{Parser, Subcommand};
use portal_backend_lib::{
    config::{Settings, DEFAULT_CONFIG_FILE},
    router::create_router,
    storage::{CardDetail, NewUser, SqliteStorage, Storage},
    telemetry::init_tracing,
    validation::neutralize,
    AppState,
};
use portal_common::UserId;
use std::{path::PathBuf, sync::Arc};
use tokio::{net::TcpListener, signal};
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[command(name = "portal", version, about = "Demo portal with session-gated profiles")]
struct Cli {
    /// Configuration file
    #[arg(long, env = "PORTAL_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the web server (default)
    Serve,
    /// Create an account
    AddUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Explicit identifier, assigned by the database when omitted
        #[arg(long)]
        id: Option<i64>,
    },
    /// Attach a card to an account
    AddCard {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        number: String,
        #[arg(long)]
        holder: Option<String>,
        #[arg(long)]
        expiry: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load_from(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    init_tracing(&settings.log_level, settings.log_json)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(settings).await,
        Command::AddUser {
            username,
            password,
            id,
        } => {
            let storage = open_storage(&settings).await?;
            // Stored the way the login flow submits them.
            let user = NewUser {
                id: id.map(UserId),
                username: neutralize(&username),
                password: neutralize(&password),
            };
            let id = storage.create_user(&user).await?;
            info!(%id, username = %user.username, "user created");
            storage.close().await;
            Ok(())
        },
        Command::AddCard {
            user_id,
            number,
            holder,
            expiry,
        } => {
            let storage = open_storage(&settings).await?;
            let card = CardDetail {
                card_holder: holder,
                card_number: number,
                expiry,
            };
            storage.add_card(UserId(user_id), &card).await?;
            info!(user_id, "card added");
            storage.close().await;
            Ok(())
        },
    }
}

async fn open_storage(settings: &Settings) -> anyhow::Result<SqliteStorage> {
    SqliteStorage::connect(&settings.database_url, settings.max_db_connections)
        .await
        .context("opening the datastore")
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    let bind_addr = settings.bind_addr;
    let cleanup_every = settings.session.cleanup_interval();

    let state = AppState::from_settings(settings).await?;

    let sessions = Arc::clone(&state.sessions);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_every);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = sessions.cleanup_expired().await;
            debug!(removed, "expired sessions purged");
        }
    });

    let app = create_router(state);
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!("listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(%err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received SIGTERM, shutting down");
            },
            Err(err) => {
                warn!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
