use crate::domain::ports::ModeStore;
use crate::frameworks::config::{self, Settings};
use crate::frameworks::db;
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::{AppState, InMemoryModeStore, PostgresModeStore};
use std::net::SocketAddr;
use std::sync::Arc;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Pick the module plan store: PostgreSQL when DATABASE_URL is set, memory otherwise.
async fn build_mode_store(settings: &Settings) -> Option<Arc<dyn ModeStore>> {
    let Some(database_url) = config::database_url() else {
        tracing::info!(mode = settings.initial_mode.as_str(), "using in-memory module plan");
        return Some(Arc::new(InMemoryModeStore::new(settings.initial_mode)));
    };

    let pool = match db::connect_pool(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to database");
            return None;
        }
    };

    if let Err(e) = db::run_migrations(&pool).await {
        tracing::error!(error = %e, "failed to run migrations");
        return None;
    }

    let store = PostgresModeStore { db: pool };
    match store.current_mode().await {
        Ok(mode) => tracing::info!(mode = mode.as_str(), "using persisted module plan"),
        Err(e) => {
            tracing::error!(error = %e, "failed to read module plan");
            return None;
        }
    }

    Some(Arc::new(store))
}

pub async fn run() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = match config::load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "failed to load settings");
            return;
        }
    };

    if settings.accounts.is_empty() {
        tracing::warn!("no operator accounts configured; nobody can sign in");
    }

    let Some(modes) = build_mode_store(&settings).await else {
        return;
    };

    let port = settings.port;
    let state = AppState::new(modes, settings.accounts, settings.session_ttl_seconds);
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", addr, e);
            return;
        }
    };
    tracing::info!(%addr, "listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
    }
}
