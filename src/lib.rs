//! # Feature Client
//!
//! An async HTTP client for the Geospatial API `features` resource.
//!
//! [`FeatureClient`] exposes the five CRUD operations against
//! `{base_url}/features`. Each call is a single request: the status code is
//! checked, the JSON body is decoded into whatever type the caller asks for,
//! and any failure comes back as [`FeatureError::Request`] with an
//! operation-specific message.
//!
//! The crate also ships an in-memory dev server ([`server::FeatureServer`])
//! implementing the same HTTP surface, for local runs and tests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use feature_client::{FeatureClient, ListParams};
//! use serde_json::{json, Value};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FeatureClient::new("http://localhost:8000")?;
//!
//!     let created: Value = client
//!         .create_feature(&json!({
//!             "type": "Feature",
//!             "geometry": { "type": "Point", "coordinates": [77.59, 12.97] },
//!             "properties": { "name": "Bengaluru" }
//!         }))
//!         .await?;
//!
//!     let page: Value = client.list_features(ListParams::default()).await?;
//!     println!("created {} -> {}", created["id"], page);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod utils;

// Re-export main types for convenience
pub use client::{FeatureClient, ListParams, Operation};
pub use config::Config;
pub use error::{FeatureError, RequestFailure, Result};
pub use models::{CreatedFeature, Feature, FeatureCollection, FeatureProperties, Geometry, StatusMessage};

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default page size for `list_features`
pub const DEFAULT_LIMIT: i64 = 50;

/// Default page offset for `list_features`
pub const DEFAULT_OFFSET: i64 = 0;

/// Client information
pub const CLIENT_NAME: &str = "feature-client";
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");
