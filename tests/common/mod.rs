//! Shared test doubles.
#![allow(dead_code)]

use actix_web::{dev::ServerHandle, http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};
use std::sync::{Arc, Mutex};

use feature_client::config::ServerConfig;
use feature_client::server::{FeatureServer, RunningServer};

/// One request as seen by the recording server
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// A server that answers every request with a canned response and records it
pub struct RecordingServer {
    pub base_url: String,
    recorded: Arc<Mutex<Vec<Recorded>>>,
    handle: ServerHandle,
}

impl RecordingServer {
    /// Answer every request with `status` and the raw `body` (sent as JSON)
    pub fn start(status: u16, body: impl Into<String>) -> Self {
        let body: String = body.into();
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let log = recorded.clone();

        let server = HttpServer::new(move || {
            let log = log.clone();
            let body = body.clone();
            App::new().default_service(web::to(move |req: HttpRequest, payload: web::Bytes| {
                let log = log.clone();
                let body = body.clone();
                async move {
                    log.lock().unwrap().push(Recorded {
                        method: req.method().to_string(),
                        path: req.path().to_string(),
                        query: req.query_string().to_string(),
                        content_type: req
                            .headers()
                            .get("content-type")
                            .and_then(|v| v.to_str().ok())
                            .map(|v| v.to_string()),
                        body: payload.to_vec(),
                    });

                    HttpResponse::build(StatusCode::from_u16(status).unwrap())
                        .content_type("application/json")
                        .body(body)
                }
            }))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        tokio::spawn(server);

        Self {
            base_url: format!("http://{}", addr),
            recorded,
            handle,
        }
    }

    /// Answer every request with `status` and a JSON value
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::start(status, body.to_string())
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }

    /// The single request received
    pub fn only_request(&self) -> Recorded {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// Start the in-memory dev server on an ephemeral port
pub fn dev_server(path_prefix: &str) -> RunningServer {
    let config = ServerConfig {
        port: 0,
        workers: Some(1),
        path_prefix: path_prefix.to_string(),
        ..ServerConfig::default()
    };

    FeatureServer::new(config).start().unwrap()
}

/// A base URL nothing is listening on
pub fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
