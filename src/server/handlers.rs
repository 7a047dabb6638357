//! Request handlers for the dev server's features API.

use actix_web::{error::InternalError, http::StatusCode, web, HttpRequest, HttpResponse, ResponseError};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

use super::AppState;
use crate::error::FeatureError;
use crate::models::{CreatedFeature, Feature, FeatureCollection, StatusMessage};

/// Upper bound on `limit` accepted by the list endpoint
pub const MAX_LIMIT: i64 = 1000;

/// Errors returned to API callers as `{"detail": "..."}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Feature not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "detail": self.to_string() }))
    }
}

impl From<FeatureError> for ApiError {
    fn from(err: FeatureError) -> Self {
        error!("Store error: {}", err);
        ApiError::Internal(err.to_string())
    }
}

/// Pagination query for the list endpoint
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    /// Apply defaults and bounds, returning `(limit, offset)`
    fn resolve(&self) -> Result<(usize, usize), ApiError> {
        let limit = self.limit.unwrap_or(i64::from(crate::DEFAULT_LIMIT));
        let offset = self.offset.unwrap_or(crate::DEFAULT_OFFSET as i64);

        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ApiError::Validation(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, limit
            )));
        }
        if offset < 0 {
            return Err(ApiError::Validation(format!(
                "offset must be greater than or equal to 0, got {}",
                offset
            )));
        }

        Ok((limit as usize, offset as usize))
    }
}

/// `GET /`
pub async fn api_root() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Welcome to the Geospatial API" }))
}

/// `GET /features`
pub async fn list_features(
    query: web::Query<ListQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let (limit, offset) = query.resolve()?;
    let features = state.store.list(limit, offset).await?;

    Ok(HttpResponse::Ok().json(FeatureCollection::new(features)))
}

/// `GET /features/{id}`
pub async fn get_feature(
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let feature = state.store.get(id).await?.ok_or(ApiError::NotFound)?;

    Ok(HttpResponse::Ok().json(feature))
}

/// `POST /features`
pub async fn create_feature(
    body: web::Json<Feature>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = state.store.insert(body.into_inner()).await?;
    info!("Created feature {}", id);

    Ok(HttpResponse::Ok().json(CreatedFeature {
        id,
        message: "Feature created successfully".to_string(),
    }))
}

/// `PUT /features/{id}`
pub async fn update_feature(
    path: web::Path<i64>,
    body: web::Json<Feature>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !state.store.update(id, body.into_inner()).await? {
        return Err(ApiError::NotFound);
    }
    info!("Updated feature {}", id);

    Ok(HttpResponse::Ok().json(StatusMessage {
        message: "Feature updated successfully".to_string(),
    }))
}

/// `DELETE /features/{id}`
pub async fn delete_feature(
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !state.store.delete(id).await? {
        return Err(ApiError::NotFound);
    }
    info!("Deleted feature {}", id);

    Ok(HttpResponse::Ok().json(StatusMessage {
        message: "Feature deleted successfully".to_string(),
    }))
}

/// Turn an extractor failure into a 422 `{"detail": ...}` response
fn unprocessable<E>(err: E, _req: &HttpRequest) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    let response = HttpResponse::UnprocessableEntity().json(json!({ "detail": err.to_string() }));
    InternalError::from_response(err, response).into()
}

/// Extractor configs so malformed bodies, queries and ids answer in JSON
pub(crate) fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(unprocessable))
        .app_data(web::QueryConfig::default().error_handler(unprocessable))
        .app_data(web::PathConfig::default().error_handler(unprocessable));
}
