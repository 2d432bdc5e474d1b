use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::ExposeSecret;
use tokio::sync::{oneshot, watch};

use okanassist_bot::backend::{BackendGateway, HttpBackend};
use okanassist_bot::channel::Messenger;
use okanassist_bot::config::BotConfig;
use okanassist_bot::conversation::ConversationEngine;
use okanassist_bot::dispatch::{Dispatcher, Handlers};
use okanassist_bot::health;
use okanassist_bot::lanes::{BotHandler, UpdateLanes};
use okanassist_bot::session::{MemorySessionStore, SessionStore, spawn_eviction_task};
use okanassist_bot::telegram::{TelegramApi, spawn_poller};

/// Upper bound on waiting for in-flight updates at shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Verify the bot token and build the backend client.
async fn connect(config: &BotConfig) -> okanassist_bot::error::Result<(TelegramApi, HttpBackend)> {
    let telegram = TelegramApi::new(config.bot_token.clone());
    let me = telegram.get_me().await?;
    tracing::info!(bot_id = me.id, username = ?me.username, "Connected to Telegram");

    let backend = HttpBackend::new(config)?;
    Ok((telegram, backend))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    // A missing .env file is fine; the environment may be set directly.
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export TELEGRAM_BOT_TOKEN=123456:ABC-...");
        std::process::exit(1);
    });

    let bot_id = config
        .bot_token
        .expose_secret()
        .split(':')
        .next()
        .unwrap_or("?")
        .to_string();

    eprintln!("🤖 OkanAssist Bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Bot token: {bot_id}:***");
    eprintln!("   Backend: {}", config.backend_base());
    eprintln!(
        "   Support chat: {}",
        config.support_chat_id.as_deref().unwrap_or("not configured")
    );
    eprintln!("   Health: http://0.0.0.0:{}/health", config.port);
    eprintln!(
        "   Session idle timeout: {}s\n",
        config.session_idle_timeout.as_secs()
    );

    // ── Telegram + backend ───────────────────────────────────────────────
    let (telegram, backend) = connect(&config).await?;

    if let Err(e) = telegram.register_commands().await {
        tracing::warn!(error = %e, "Failed to publish command menus");
    }

    // ── Core ─────────────────────────────────────────────────────────────
    let backend: Arc<dyn BackendGateway> = Arc::new(backend);
    let messenger: Arc<dyn Messenger> = Arc::new(telegram.clone());

    let sessions: Arc<dyn SessionStore> = MemorySessionStore::new();
    let eviction = spawn_eviction_task(Arc::clone(&sessions), config.session_idle_timeout);

    let engine = Arc::new(ConversationEngine::new(
        Arc::clone(&sessions),
        Arc::clone(&backend),
        Arc::clone(&messenger),
        config.support_chat_id.clone(),
    ));
    let handlers = Handlers::new(
        Arc::clone(&backend),
        Arc::clone(&messenger),
        config.app_url.clone(),
    );
    let dispatcher = Arc::new(Dispatcher::new(engine, handlers));

    // ── Health server ────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("binding health port {}", config.port))?;
    let (health_stop, health_stopped) = oneshot::channel::<()>();
    let health_task = tokio::spawn(async move {
        let shutdown = async {
            let _ = health_stopped.await;
        };
        if let Err(e) = health::serve(listener, shutdown).await {
            tracing::error!(error = %e, "Health server failed");
        }
    });
    tracing::info!(port = config.port, "Health server started");

    // ── Updates ──────────────────────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (poller, updates) = spawn_poller(telegram, shutdown_rx);
    let handler = Arc::new(BotHandler::new(dispatcher, messenger));
    let lanes = tokio::spawn(UpdateLanes::new(handler).run(updates));

    tracing::info!("🤖 Telegram Bot started!");

    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl+C")?;
    tracing::info!("Shutdown requested");

    // Stop listening, then let in-flight updates finish.
    let _ = shutdown_tx.send(true);
    if let Err(e) = poller.await {
        tracing::error!(error = %e, "Poller task failed");
    }
    match tokio::time::timeout(DRAIN_TIMEOUT, lanes).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "Lane runner failed"),
        Err(_) => tracing::warn!("Timed out draining in-flight updates"),
    }

    eviction.abort();
    drop(backend);
    tracing::info!("Backend client released");

    let _ = health_stop.send(());
    if let Err(e) = health_task.await {
        tracing::error!(error = %e, "Health server task failed");
    }

    tracing::info!("Bot stopped");
    Ok(())
}
