//! In-memory dev server for the features API.
//!
//! Serves the same `/features` surface the client consumes, so the client can
//! be exercised end to end without the real backend. Records live in a
//! [`FeatureStore`]; the default [`MemoryStore`] keeps them in process memory.

pub mod handlers;
pub mod store;

use actix_cors::Cors;
use actix_web::{dev::ServerHandle, middleware::Condition, web, App, HttpServer};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;
use tracing_actix_web::TracingLogger;

use crate::config::ServerConfig;
use crate::error::{FeatureError, Result};

pub use handlers::ApiError;
pub use store::{seed_from_file, FeatureStore, MemoryStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FeatureStore>,
}

/// Register the features routes under `prefix` (empty for the root)
pub fn routes(cfg: &mut web::ServiceConfig, prefix: &str) {
    let root = if prefix.is_empty() { "/" } else { prefix };

    handlers::extractor_configs(cfg);
    cfg.route(root, web::get().to(handlers::api_root))
        .service(
            web::resource(format!("{}/features", prefix))
                .route(web::get().to(handlers::list_features))
                .route(web::post().to(handlers::create_feature)),
        )
        .service(
            web::resource(format!("{}/features/{{id}}", prefix))
                .route(web::get().to(handlers::get_feature))
                .route(web::put().to(handlers::update_feature))
                .route(web::delete().to(handlers::delete_feature)),
        );
}

/// CORS policy for the configured origins
pub fn cors(config: &ServerConfig) -> Cors {
    let cors = Cors::default().allow_any_method().allow_any_header();

    if config.cors_origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }

    config
        .cors_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

/// Features API dev server
pub struct FeatureServer {
    config: ServerConfig,
    store: Arc<dyn FeatureStore>,
}

/// A server bound to a socket and running on a background task
pub struct RunningServer {
    addr: SocketAddr,
    handle: ServerHandle,
    task: JoinHandle<std::io::Result<()>>,
}

impl FeatureServer {
    /// Create a server backed by an empty in-memory store
    pub fn new(config: ServerConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Create a server backed by the given store
    pub fn with_store(config: ServerConfig, store: Arc<dyn FeatureStore>) -> Self {
        Self { config, store }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Backing store
    pub fn store(&self) -> Arc<dyn FeatureStore> {
        self.store.clone()
    }

    /// Load the configured seed file, if any, and return the number of
    /// features inserted
    pub async fn seed(&self) -> Result<usize> {
        let Some(path) = &self.config.seed_file else {
            return Ok(0);
        };

        let inserted = seed_from_file(self.store.as_ref(), path).await?;
        info!("Store holds {} features", self.store.count().await?);
        Ok(inserted)
    }

    /// Bind the configured address and serve on a background task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) -> Result<RunningServer> {
        let config = self.config.clone();
        let state = web::Data::new(AppState {
            store: self.store.clone(),
        });

        let mut server = HttpServer::new(move || {
            App::new()
                .wrap(Condition::new(config.enable_cors, cors(&config)))
                .wrap(TracingLogger::default())
                .app_data(state.clone())
                .configure(|cfg| routes(cfg, &config.path_prefix))
        })
        .disable_signals();

        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let bind_addr = format!("{}:{}", self.config.bind_address, self.config.port);
        let server = server
            .bind(&bind_addr)
            .map_err(|e| FeatureError::Server(format!("Failed to bind to {}: {}", bind_addr, e)))?;

        let addr = server
            .addrs()
            .first()
            .copied()
            .ok_or_else(|| FeatureError::Server(format!("No address bound for {}", bind_addr)))?;

        let server = server.run();
        let handle = server.handle();
        let task = tokio::spawn(server);

        info!(
            "Features dev server listening on http://{}{}/features",
            addr, self.config.path_prefix
        );

        Ok(RunningServer { addr, handle, task })
    }

    /// Seed, start and serve until Ctrl-C or the server exits
    pub async fn run(&self) -> Result<()> {
        self.seed().await?;
        let mut running = self.start()?;

        let exited = tokio::select! {
            result = running.stopped() => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        };

        match exited {
            Some(result) => result,
            None => {
                info!("Shutdown signal received");
                running.stop().await
            }
        }
    }
}

impl RunningServer {
    /// Bound socket address
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL a [`crate::FeatureClient`] should use for this server
    pub fn base_url(&self, path_prefix: &str) -> String {
        format!("http://{}{}", self.addr, path_prefix)
    }

    /// Wait for the server task to finish
    pub async fn stopped(&mut self) -> Result<()> {
        match (&mut self.task).await {
            Ok(result) => result.map_err(FeatureError::from),
            Err(e) => Err(FeatureError::Server(format!("Server task failed: {}", e))),
        }
    }

    /// Gracefully stop the server and wait for it to finish
    pub async fn stop(mut self) -> Result<()> {
        self.handle.stop(true).await;
        self.stopped().await?;
        info!("Features dev server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::header, test};

    #[actix_web::test]
    async fn test_permissive_cors_by_default() {
        let config = ServerConfig::default();
        let app = test::init_service(
            App::new()
                .wrap(Condition::new(config.enable_cors, cors(&config)))
                .configure(|cfg| routes(cfg, "")),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "http://maps.example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert!(resp
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[actix_web::test]
    async fn test_cors_disabled_adds_no_headers() {
        let config = ServerConfig {
            enable_cors: false,
            ..ServerConfig::default()
        };
        let app = test::init_service(
            App::new()
                .wrap(Condition::new(config.enable_cors, cors(&config)))
                .configure(|cfg| routes(cfg, "")),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "http://maps.example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(!resp
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_seed_loads_configured_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("seed.geojson");
        let document = serde_json::json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [77.59, 12.97] },
            "properties": { "name": "Bengaluru" }
        });
        tokio::fs::write(&path, document.to_string()).await.unwrap();

        let server = FeatureServer::new(ServerConfig {
            seed_file: Some(path),
            ..ServerConfig::default()
        });
        assert_eq!(server.seed().await.unwrap(), 1);
        assert_eq!(server.store().count().await.unwrap(), 1);

        let unseeded = FeatureServer::new(ServerConfig::default());
        assert_eq!(unseeded.seed().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_start_binds_ephemeral_port_and_stops() {
        let config = ServerConfig {
            port: 0,
            workers: Some(1),
            ..ServerConfig::default()
        };
        let server = FeatureServer::new(config);

        let running = server.start().unwrap();
        assert_ne!(running.local_addr().port(), 0);
        assert!(running.base_url("").starts_with("http://127.0.0.1:"));

        running.stop().await.unwrap();
    }
}
