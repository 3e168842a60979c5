use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use service::banner::BannerInput;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

/// Wire representation of a banner. `modified` stays null until the first
/// update.
#[derive(Debug, Serialize, Deserialize)]
pub struct BannerModel {
    pub id: i32,
    pub title: String,
    pub html: String,
    pub created: DateTime<Utc>,
    pub modified: Option<DateTime<Utc>>,
}

impl From<models::banner::Model> for BannerModel {
    fn from(m: models::banner::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            html: m.html,
            created: m.created.with_timezone(&Utc),
            modified: m.modified.map(|t| t.with_timezone(&Utc)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BannerQuery {
    pub title: Option<String>,
}

pub async fn get_by_query(
    State(state): State<ServerState>,
    Query(q): Query<BannerQuery>,
) -> Result<Json<Vec<BannerModel>>, JsonApiError> {
    let found = state.banners.query(q.title.as_deref()).await?;
    Ok(Json(found.into_iter().map(BannerModel::from).collect()))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(banner_id): Path<i32>,
) -> Result<Json<BannerModel>, JsonApiError> {
    let found = state.banners.get(banner_id).await?;
    Ok(Json(found.into()))
}

pub async fn get_html_by_id(
    State(state): State<ServerState>,
    Path(banner_id): Path<i32>,
) -> Result<Html<String>, JsonApiError> {
    let html = state.banners.get_html(banner_id).await?;
    Ok(Html(html))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<BannerInput>,
) -> Result<(StatusCode, Json<BannerModel>), JsonApiError> {
    let created = state.banners.create(input).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(banner_id): Path<i32>,
    Json(input): Json<BannerInput>,
) -> Result<Json<BannerModel>, JsonApiError> {
    let updated = state.banners.update(banner_id, input).await?;
    Ok(Json(updated.into()))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(banner_id): Path<i32>,
) -> Result<StatusCode, JsonApiError> {
    state.banners.delete(banner_id).await?;
    Ok(StatusCode::OK)
}
