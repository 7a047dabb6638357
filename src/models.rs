//! Typed views of the GeoJSON records exchanged with the features API.
//!
//! The client itself treats features as opaque JSON; these types are for
//! callers that want structure, and for the dev server which validates
//! incoming payloads against them.

use serde::{Deserialize, Serialize};

/// GeoJSON geometry. Coordinates are kept as raw JSON since their nesting
/// depends on the geometry type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,

    pub coordinates: serde_json::Value,
}

/// Feature properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single GeoJSON feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_kind")]
    pub kind: String,

    /// Server-assigned id; absent on records that have not been created yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub geometry: Geometry,

    pub properties: FeatureProperties,
}

/// A page of features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_kind")]
    pub kind: String,

    #[serde(default)]
    pub features: Vec<Feature>,
}

/// Response body of a successful create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedFeature {
    pub id: i64,
    pub message: String,
}

/// Response body of a successful update or delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

fn feature_kind() -> String {
    "Feature".to_string()
}

fn collection_kind() -> String {
    "FeatureCollection".to_string()
}

impl Feature {
    /// Create a feature from a geometry and a name
    pub fn new(geometry: Geometry, name: impl Into<String>) -> Self {
        Self {
            kind: feature_kind(),
            id: None,
            geometry,
            properties: FeatureProperties {
                name: name.into(),
                description: None,
            },
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.properties.description = Some(description.into());
        self
    }
}

impl Geometry {
    /// Create a `Point` geometry
    pub fn point(lon: f64, lat: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: serde_json::json!([lon, lat]),
        }
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: collection_kind(),
            features,
        }
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
