mod common;

use serde_json::{json, Value};
use std::collections::HashSet;

use common::dev_server;
use feature_client::{
    CreatedFeature, Feature, FeatureClient, FeatureCollection, Geometry, ListParams,
    StatusMessage,
};

#[tokio::test]
async fn test_typed_round_trip_against_dev_server() {
    let server = dev_server("");
    let client = FeatureClient::new(server.base_url("")).unwrap();

    let feature = Feature::new(Geometry::point(77.59, 12.97), "Bengaluru")
        .with_description("Garden city");
    let created: CreatedFeature = client.create_feature(&feature).await.unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.message, "Feature created successfully");

    let fetched: Feature = client.get_feature(created.id).await.unwrap();
    assert_eq!(fetched.id, Some(created.id));
    assert_eq!(fetched.geometry, feature.geometry);
    assert_eq!(fetched.properties, feature.properties);

    let renamed = Feature::new(Geometry::point(77.59, 12.97), "Bangalore");
    let updated: StatusMessage = client.update_feature(created.id, &renamed).await.unwrap();
    assert_eq!(updated.message, "Feature updated successfully");

    let page: FeatureCollection = client.list_features(ListParams::default()).await.unwrap();
    assert_eq!(page.features.len(), 1);
    assert_eq!(page.features[0].properties.name, "Bangalore");

    let deleted: StatusMessage = client.delete_feature(created.id).await.unwrap();
    assert_eq!(deleted.message, "Feature deleted successfully");

    let err = client.get_feature::<Feature>(created.id).await.unwrap_err();
    assert!(err.is_request_error());
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_pagination_against_dev_server() {
    let server = dev_server("");
    let client = FeatureClient::new(server.base_url("")).unwrap();

    for i in 0..5 {
        let feature = Feature::new(Geometry::point(i as f64, 0.0), format!("f{}", i));
        let _: CreatedFeature = client.create_feature(&feature).await.unwrap();
    }

    let page: FeatureCollection = client.list_features(ListParams::new(2, 1)).await.unwrap();
    let ids: Vec<_> = page.features.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![Some(2), Some(3)]);

    // The client passes bounds through; the server rejects them
    let err = client
        .list_features::<Value>(ListParams::new(0, 0))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch features");
    assert_eq!(err.status().map(|s| s.as_u16()), Some(422));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_schema_violations_surface_as_request_errors() {
    let server = dev_server("");
    let client = FeatureClient::new(server.base_url("")).unwrap();

    let err = client
        .create_feature::<_, Value>(&json!({ "name": "x" }))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to create feature");
    assert_eq!(err.status().map(|s| s.as_u16()), Some(422));

    let err = client.get_feature::<Value>("not-a-number").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch feature");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_path_prefix_against_dev_server() {
    let server = dev_server("/api");
    let client = FeatureClient::new(server.base_url("/api")).unwrap();

    let page: FeatureCollection = client.list_features(ListParams::default()).await.unwrap();
    assert!(page.features.is_empty());

    server.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_do_not_interfere() {
    let server = dev_server("");
    let client = FeatureClient::new(server.base_url("")).unwrap();

    let mut tasks = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            let name = format!("region-{}", i);
            let feature = Feature::new(Geometry::point(i as f64, i as f64), name.clone());
            let created: CreatedFeature = client.create_feature(&feature).await.unwrap();
            let fetched: Feature = client.get_feature(created.id).await.unwrap();
            (name, created.id, fetched)
        }));
    }

    let mut ids = HashSet::new();
    for task in tasks {
        let (name, id, fetched) = task.await.unwrap();
        assert_eq!(fetched.properties.name, name);
        assert_eq!(fetched.id, Some(id));
        assert!(ids.insert(id), "duplicate id {}", id);
    }

    let page: FeatureCollection = client.list_features(ListParams::new(100, 0)).await.unwrap();
    assert_eq!(page.features.len(), 20);

    server.stop().await.unwrap();
}
