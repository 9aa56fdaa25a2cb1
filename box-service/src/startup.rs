use crate::config::BoxServiceConfig;
use crate::handlers;
use crate::services::{
    ArtifactStore, BoxGenerator, CandidateLocator, ExecutableLocator, SearchEnvironment,
};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, with_request_tracing};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

#[derive(Clone)]
pub struct AppState {
    pub config: BoxServiceConfig,
    pub locator: Arc<dyn ExecutableLocator>,
    pub artifacts: ArtifactStore,
    pub generator: BoxGenerator,
}

impl AppState {
    pub fn new(config: BoxServiceConfig, locator: Arc<dyn ExecutableLocator>) -> Self {
        let artifacts = ArtifactStore::new(
            config.storage.output_dir.clone(),
            &config.storage.url_prefix,
        );
        let generator = BoxGenerator::new(&config.generator);

        Self {
            config,
            locator,
            artifacts,
            generator,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let output_route = format!("/{}", state.artifacts.url_prefix());
    let output_files = ServeDir::new(state.artifacts.output_dir());

    let app = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/generate-box", post(handlers::generate_box))
        .nest_service(&output_route, output_files)
        .layer(from_fn(metrics_middleware))
        // Development posture: any origin, method and header.
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    with_request_tracing(app)
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: BoxServiceConfig) -> Result<Self, AppError> {
        let locator: Arc<dyn ExecutableLocator> = Arc::new(CandidateLocator::from_config(
            &config.generator,
            &SearchEnvironment::capture(),
        ));
        Self::build_with_locator(config, locator).await
    }

    pub async fn build_with_locator(
        config: BoxServiceConfig,
        locator: Arc<dyn ExecutableLocator>,
    ) -> Result<Self, AppError> {
        let state = AppState::new(config, locator);

        state.artifacts.ensure_output_dir().await.map_err(|e| {
            tracing::error!(
                "Failed to create output directory {}: {}",
                state.artifacts.output_dir().display(),
                e
            );
            AppError::from(e)
        })?;

        match state.locator.locate() {
            Some(path) => tracing::info!(path = %path.display(), "Box generator located"),
            None => tracing::warn!(
                basis = %state.locator.search_basis(),
                "Box generator not found; requests will fail until it is installed"
            ),
        }

        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }

    pub async fn run_with_graceful_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
    }
}
