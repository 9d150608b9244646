use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, extract::FromRef, middleware, routing::get};
use catalog_auth::{AuthState, TokenService};
use catalog_db_memory::InMemoryStore;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    cache::CacheStore,
    config::AppConfig,
    error::ServerError,
    handlers, middleware as app_middleware,
    routes::{self, API_PREFIX},
    services::{AccountService, ProductService},
};

/// Shared request state. Every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub products: ProductService,
    pub auth: AuthState,
    pub cache: CacheStore,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl AppState {
    /// Wires services over one in-memory store.
    pub fn new(
        store: Arc<InMemoryStore>,
        tokens: Arc<TokenService>,
        cache: CacheStore,
        cfg: &AppConfig,
    ) -> Self {
        Self {
            accounts: AccountService::new(store.clone(), tokens.clone()),
            products: ProductService::new(store.clone(), store, cache.clone(), cfg.cache.clone()),
            auth: AuthState::new(tokens),
            cache,
        }
    }
}

pub struct CatalogServer {
    addr: SocketAddr,
    app: Router,
}

/// Builds the full application: token service, store, cache, seed data and
/// routes.
///
/// # Errors
///
/// Fails when the signing secret is missing or admin bootstrap fails.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, ServerError> {
    let tokens = Arc::new(TokenService::new(&cfg.auth)?);
    let store = catalog_db_memory::create_store();

    if let Some(admin) = &cfg.bootstrap.admin_user {
        crate::bootstrap::ensure_admin_user(store.as_ref(), admin).await?;
    }

    let cache = CacheStore::new(crate::create_cache_backend(&cfg.redis, &cfg.cache).await);
    tracing::info!(mode = cache.mode(), "cache ready");

    let state = AppState::new(store, tokens, cache, cfg);
    Ok(router(state, cfg.server.body_limit_bytes))
}

pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .route("/metrics", get(handlers::metrics))
        .nest(API_PREFIX, routes::api_router())
        .with_state(state)
        // Middleware stack (outermost last: request id -> trace -> cors/compression -> metrics -> body limit)
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(app_middleware::track_metrics))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub async fn build(self) -> Result<CatalogServer, ServerError> {
        let app = build_app(&self.config).await?;

        Ok(CatalogServer {
            addr: self.addr,
            app,
        })
    }
}

impl CatalogServer {
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
