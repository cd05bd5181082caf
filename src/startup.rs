//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::application::services::{ChatService, ChatServiceImpl, SocialService, SocialServiceImpl};
use crate::config::{Settings, StorageBackend};
use crate::domain::{ChatPresenceStore, ChatRoomRepository, PlaylistRepository, RelationRepository};
use crate::infrastructure::cache::{self, LocalChatPresence, RedisChatPresence};
use crate::infrastructure::database;
use crate::infrastructure::memory::{MemoryChatRoomRepository, MemoryPlaylistRepository, MemoryRelationRepository};
use crate::infrastructure::probe::{DependencyProbe, PostgresProbe, RedisProbe};
use crate::infrastructure::repositories::{PgChatRoomRepository, PgPlaylistRepository, PgRelationRepository};
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging, track_metrics};
use crate::shared::snowflake::SnowflakeGenerator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub social: Arc<dyn SocialService>,
    pub chat: Arc<dyn ChatService>,
    pub probes: Arc<Vec<Arc<dyn DependencyProbe>>>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Connect to the configured backends and wire the services
    pub async fn build(settings: Settings) -> Result<Self> {
        let ids = Arc::new(SnowflakeGenerator::new(
            settings.snowflake.epoch,
            settings.snowflake.machine_id as u64,
            0u64, // Default node_id
        ));
        let mut probes: Vec<Arc<dyn DependencyProbe>> = Vec::new();

        let presence: Arc<dyn ChatPresenceStore> = match &settings.redis.url {
            Some(url) => {
                let redis = cache::create_redis_client(url)
                    .await
                    .context("failed to connect to Redis")?;
                probes.push(Arc::new(RedisProbe::new(redis.clone())));
                Arc::new(RedisChatPresence::new(redis))
            }
            None => {
                tracing::warn!("redis.url not set; chat presence is kept in-process");
                Arc::new(LocalChatPresence::new())
            }
        };

        let (social, chat) = match settings.storage.backend {
            StorageBackend::Postgres => {
                let url = settings
                    .database
                    .url
                    .as_deref()
                    .context("database.url is required for the postgres backend")?;
                let pool = database::create_pool(&settings.database, url)
                    .await
                    .context("failed to connect to PostgreSQL")?;
                tracing::info!("Database connection pool created");

                if settings.database.run_migrations {
                    database::run_migrations(&pool).await?;
                    tracing::info!("Database migrations applied");
                }
                probes.push(Arc::new(PostgresProbe::new(pool.clone())));

                wire_services(
                    Arc::new(PgRelationRepository::new(pool.clone())),
                    Arc::new(PgChatRoomRepository::new(pool.clone())),
                    Arc::new(PgPlaylistRepository::new(pool)),
                    presence,
                    ids,
                )
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                wire_services(
                    Arc::new(MemoryRelationRepository::new()),
                    Arc::new(MemoryChatRoomRepository::new()),
                    Arc::new(MemoryPlaylistRepository::new()),
                    presence,
                    ids,
                )
            }
        };

        Ok(Self {
            social,
            chat,
            probes: Arc::new(probes),
            settings: Arc::new(settings),
        })
    }

    /// Self-contained state on in-memory storage and local presence
    pub fn in_memory(settings: Settings) -> Self {
        let ids = Arc::new(SnowflakeGenerator::new(
            settings.snowflake.epoch,
            settings.snowflake.machine_id as u64,
            0u64,
        ));
        let (social, chat) = wire_services(
            Arc::new(MemoryRelationRepository::new()),
            Arc::new(MemoryChatRoomRepository::new()),
            Arc::new(MemoryPlaylistRepository::new()),
            Arc::new(LocalChatPresence::new()),
            ids,
        );

        Self {
            social,
            chat,
            probes: Arc::new(Vec::new()),
            settings: Arc::new(settings),
        }
    }
}

/// Build both services over one set of repositories
fn wire_services<R, C, P>(
    relations: Arc<R>,
    rooms: Arc<C>,
    playlists: Arc<P>,
    presence: Arc<dyn ChatPresenceStore>,
    ids: Arc<SnowflakeGenerator>,
) -> (Arc<dyn SocialService>, Arc<dyn ChatService>)
where
    R: RelationRepository + 'static,
    C: ChatRoomRepository + 'static,
    P: PlaylistRepository + 'static,
{
    let social = SocialServiceImpl::new(relations.clone(), playlists, ids.clone());
    let chat = ChatServiceImpl::new(relations, rooms, presence, ids);
    (Arc::new(social), Arc::new(chat))
}

/// Router with all routes and middleware applied
pub fn build_router(state: AppState) -> Router {
    let cors_layer = cors::create_cors_layer(&state.settings.cors);

    routes::create_router(state)
        .layer(middleware::from_fn(track_metrics))
        .layer(CompressionLayer::new())
        .layer(logging::create_trace_layer())
        .layer(cors_layer)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let addr: SocketAddr = settings
            .server_addr()
            .parse()
            .with_context(|| format!("invalid server address {}", settings.server_addr()))?;

        let state = AppState::build(settings).await?;
        let router = build_router(state);

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until Ctrl-C or SIGTERM
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
