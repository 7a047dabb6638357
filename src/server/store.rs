//! Feature storage backing the dev server.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{FeatureError, Result};
use crate::models::{Feature, FeatureProperties, Geometry};

/// Name given to seeded features that carry no `name` property
pub const DEFAULT_SEED_NAME: &str = "Unnamed Region";

/// Storage seam for the dev server
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// Features ordered by id, after skipping `offset` and taking at most `limit`
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Feature>>;

    /// Feature by id, with its `id` field populated
    async fn get(&self, id: i64) -> Result<Option<Feature>>;

    /// Store a new feature and return its assigned id
    async fn insert(&self, feature: Feature) -> Result<i64>;

    /// Replace an existing feature; `false` if the id is unknown
    async fn update(&self, id: i64, feature: Feature) -> Result<bool>;

    /// Remove a feature; `false` if the id is unknown
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Number of stored features
    async fn count(&self) -> Result<usize>;
}

/// A stored record with bookkeeping timestamps
#[derive(Debug, Clone)]
struct StoredFeature {
    feature: Feature,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

/// In-memory feature store
pub struct MemoryStore {
    features: RwLock<BTreeMap<i64, StoredFeature>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    /// Create an empty store; ids start at 1
    pub fn new() -> Self {
        Self {
            features: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureStore for MemoryStore {
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Feature>> {
        let features = self.features.read().await;
        Ok(features
            .iter()
            .skip(offset)
            .take(limit)
            .map(|(id, stored)| with_id(&stored.feature, *id))
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Feature>> {
        let features = self.features.read().await;
        Ok(features.get(&id).map(|stored| with_id(&stored.feature, id)))
    }

    async fn insert(&self, mut feature: Feature) -> Result<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = chrono::Utc::now();
        feature.id = None;

        self.features.write().await.insert(
            id,
            StoredFeature {
                feature,
                created_at: now,
                updated_at: now,
            },
        );

        debug!("Inserted feature {}", id);
        Ok(id)
    }

    async fn update(&self, id: i64, mut feature: Feature) -> Result<bool> {
        let mut features = self.features.write().await;
        let Some(stored) = features.get_mut(&id) else {
            return Ok(false);
        };

        feature.id = None;
        stored.feature = feature;
        stored.updated_at = chrono::Utc::now();

        debug!(
            "Updated feature {} (created {}, updated {})",
            id, stored.created_at, stored.updated_at
        );
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let removed = self.features.write().await.remove(&id).is_some();
        if removed {
            debug!("Deleted feature {}", id);
        }
        Ok(removed)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.features.read().await.len())
    }
}

fn with_id(feature: &Feature, id: i64) -> Feature {
    let mut feature = feature.clone();
    feature.id = Some(id);
    feature
}

/// Load a GeoJSON `FeatureCollection` (or single `Feature`) file into a store.
///
/// Features without a geometry, or whose geometry has no `coordinates`
/// (such as a `GeometryCollection`), are skipped. A missing `name` property is
/// replaced by [`DEFAULT_SEED_NAME`]. Returns the number of features inserted.
pub async fn seed_from_file(store: &dyn FeatureStore, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await?;
    let document: serde_json::Value = serde_json::from_str(&content)?;

    let kind = document
        .get("type")
        .and_then(|t| t.as_str())
        .map(str::to_owned);

    let raw_features = match kind.as_deref() {
        Some("FeatureCollection") => document
            .get("features")
            .and_then(|f| f.as_array())
            .cloned()
            .unwrap_or_default(),
        Some("Feature") => vec![document],
        other => {
            return Err(FeatureError::Server(format!(
                "Seed file {} is not GeoJSON (type: {:?})",
                path.display(),
                other
            )))
        }
    };

    let mut inserted = 0;
    for (index, raw) in raw_features.into_iter().enumerate() {
        let geometry = match raw.get("geometry") {
            Some(g) if !g.is_null() => match serde_json::from_value::<Geometry>(g.clone()) {
                Ok(geometry) => geometry,
                Err(e) => {
                    warn!("Skipping seed feature {} with unsupported geometry: {}", index, e);
                    continue;
                }
            },
            _ => {
                warn!("Skipping seed feature {} without geometry", index);
                continue;
            }
        };

        let properties = raw.get("properties");
        let name = properties
            .and_then(|p| p.get("name"))
            .and_then(|n| n.as_str())
            .unwrap_or(DEFAULT_SEED_NAME)
            .to_string();
        let description = properties
            .and_then(|p| p.get("description"))
            .and_then(|d| d.as_str())
            .map(|d| d.to_string());

        store
            .insert(Feature {
                kind: "Feature".to_string(),
                id: None,
                geometry,
                properties: FeatureProperties { name, description },
            })
            .await?;
        inserted += 1;
    }

    info!("Seeded {} features from {}", inserted, path.display());
    Ok(inserted)
}
