//! People listing and swipe endpoints.

use crate::error::ServerError;
use crate::geo::Coordinates;
use crate::http::device::Device;
use crate::server::PeopleServer;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use std::sync::Arc;
use swipedeck_types::{DislikeResponse, LikeResponse, Page, PersonId, Profile};

/// Query string accepted by the listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Page size.
    pub limit: Option<i64>,
    /// Caller latitude, for distances.
    pub user_latitude: Option<f64>,
    /// Caller longitude, for distances.
    pub user_longitude: Option<f64>,
}

impl ListQuery {
    fn origin(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.user_latitude, self.user_longitude)
    }
}

/// `GET /api/people`
pub async fn list_people(
    Extension(server): Extension<Arc<PeopleServer>>,
    Device(device): Device,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Profile>>, ServerError> {
    let request = server.page_request(query.page, query.limit);
    let page = server.feed(&device, request, query.origin()).await?;
    Ok(Json(page))
}

/// `GET /api/people/liked`
pub async fn list_liked(
    Extension(server): Extension<Arc<PeopleServer>>,
    Device(device): Device,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Profile>>, ServerError> {
    let request = server.page_request(query.page, query.limit);
    let page = server.liked(&device, request, query.origin()).await?;
    Ok(Json(page))
}

/// `POST /api/people/{id}/like`
pub async fn like(
    Extension(server): Extension<Arc<PeopleServer>>,
    Device(device): Device,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<LikeResponse>), ServerError> {
    let response = server.like(PersonId::new(id), &device).await?;
    Ok((status_for(response.success), Json(response)))
}

/// `POST /api/people/{id}/dislike`
pub async fn dislike(
    Extension(server): Extension<Arc<PeopleServer>>,
    Device(device): Device,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<DislikeResponse>), ServerError> {
    let response = server.dislike(PersonId::new(id), &device).await?;
    Ok((status_for(response.success), Json(response)))
}

fn status_for(success: bool) -> StatusCode {
    if success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    }
}
