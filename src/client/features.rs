//! CRUD operations on the features resource.

use std::fmt::Display;

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};

use super::{FeatureClient, Operation};
use crate::error::Result;

/// Pagination passed straight through as `limit` / `offset` query parameters.
///
/// Values are not range-checked here; the server decides what it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub limit: i64,
    pub offset: i64,
}

impl ListParams {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    fn query(&self) -> [(&'static str, String); 2] {
        [
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ]
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: crate::DEFAULT_LIMIT,
            offset: crate::DEFAULT_OFFSET,
        }
    }
}

impl FeatureClient {
    /// `GET {base_url}/features?limit=..&offset=..`
    ///
    /// ```rust,no_run
    /// use feature_client::{FeatureClient, ListParams};
    ///
    /// # async fn run() -> feature_client::Result<()> {
    /// let client = FeatureClient::default();
    /// let page: serde_json::Value = client.list_features(ListParams::default()).await?;
    /// println!("{}", page);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_features<T>(&self, params: ListParams) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request::<(), T>(
            Operation::ListFeatures,
            Method::GET,
            &[],
            &params.query(),
            None,
        )
        .await
    }

    /// `GET {base_url}/features/{id}`
    pub async fn get_feature<T>(&self, id: impl Display) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let id = id.to_string();
        self.request::<(), T>(Operation::GetFeature, Method::GET, &[id.as_str()], &[], None)
            .await
    }

    /// `POST {base_url}/features` with the feature as a JSON body
    pub async fn create_feature<B, T>(&self, feature: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(
            Operation::CreateFeature,
            Method::POST,
            &[],
            &[],
            Some(feature),
        )
        .await
    }

    /// `PUT {base_url}/features/{id}` with the feature as a JSON body
    pub async fn update_feature<B, T>(&self, id: impl Display, feature: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let id = id.to_string();
        self.request(
            Operation::UpdateFeature,
            Method::PUT,
            &[id.as_str()],
            &[],
            Some(feature),
        )
        .await
    }

    /// `DELETE {base_url}/features/{id}`
    pub async fn delete_feature<T>(&self, id: impl Display) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let id = id.to_string();
        self.request::<(), T>(Operation::DeleteFeature, Method::DELETE, &[id.as_str()], &[], None)
            .await
    }
}
