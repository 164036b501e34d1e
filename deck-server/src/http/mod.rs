//! HTTP endpoints for swipedeck-server.
//!
//! Provides the people API and a health check.

mod device;
pub mod health;
mod people;

use crate::server::PeopleServer;
use axum::routing::{get, post};
use axum::{Extension, Router};
use std::sync::Arc;

pub use device::Device;
pub use health::HealthStatus;
pub use people::ListQuery;

/// Build the HTTP router with all endpoints.
pub fn build_router(server: Arc<PeopleServer>) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/people", get(people::list_people))
        .route("/api/people/liked", get(people::list_liked))
        .route("/api/people/:id/like", post(people::like))
        .route("/api/people/:id/dislike", post(people::dislike))
        .layer(Extension(server))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::{NewPerson, PeopleStorage, SqliteStorage};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use swipedeck_types::{PersonId, Photo};
    use tower::util::ServiceExt;

    async fn test_server(names: &[&str]) -> (Arc<PeopleServer>, Vec<PersonId>) {
        let storage = SqliteStorage::in_memory().await.unwrap();
        let mut ids = Vec::new();
        for name in names {
            let id = storage
                .insert_person(NewPerson {
                    name: name.to_string(),
                    age: 27,
                    bio: "Pecinta buku".to_string(),
                    location: Some("Bandung".to_string()),
                    latitude: Some(-6.9175),
                    longitude: Some(107.6191),
                    photos: vec![Photo {
                        url: format!("http://img/{}.png", name),
                        order: 0,
                    }],
                })
                .await
                .unwrap();
            ids.push(id);
        }
        (Arc::new(PeopleServer::new(Config::default(), storage)), ids)
    }

    fn get_as(uri: &str, device: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(device) = device {
            builder = builder.header("X-Device-ID", device);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_as(uri: &str, device: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(device) = device {
            builder = builder.header("X-Device-ID", device);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let (server, _) = test_server(&["Ayu", "Rina"]).await;
        let app = build_router(server);

        let response = app.oneshot(get_as("/health", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["people"], 2);
    }

    #[tokio::test]
    async fn listing_requires_device_header() {
        let (server, _) = test_server(&["Ayu"]).await;
        let app = build_router(server);

        let response = app.oneshot(get_as("/api/people", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "X-Device-ID header is required");
    }

    #[tokio::test]
    async fn blank_device_header_is_missing() {
        let (server, ids) = test_server(&["Ayu"]).await;
        let app = build_router(server);
        let uri = format!("/api/people/{}/like", ids[0]);

        let response = app.oneshot(post_as(&uri, Some("   "))).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert_eq!(body["message"], "X-Device-ID header is required");
    }

    #[tokio::test]
    async fn feed_page_shape() {
        let (server, _) = test_server(&["Ayu", "Rina", "Budi"]).await;
        let app = build_router(server);

        let response = app
            .oneshot(get_as("/api/people?page=1&limit=2", Some("dev-1")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 2);
        assert_eq!(body["total"], 3);
        assert_eq!(body["hasMore"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][0]["name"], "Ayu");
        assert_eq!(body["data"][0]["photos"][0]["url"], "http://img/Ayu.png");
        assert!(body["data"][0]["distance"].is_null());
    }

    #[tokio::test]
    async fn feed_includes_distance_with_both_coordinates() {
        let (server, _) = test_server(&["Rina"]).await;
        let app = build_router(server);

        let response = app
            .oneshot(get_as(
                "/api/people?user_latitude=-6.2088&user_longitude=106.8456",
                Some("dev-1"),
            ))
            .await
            .unwrap();

        let body = json(response).await;
        assert_eq!(body["data"][0]["distance"], 116.2);
    }

    #[tokio::test]
    async fn like_flow_over_http() {
        let (server, ids) = test_server(&["Ayu", "Rina"]).await;
        let app = build_router(server);
        let uri = format!("/api/people/{}/like", ids[0]);

        let first = app
            .clone()
            .oneshot(post_as(&uri, Some("dev-1")))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let body = json(first).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["match"], false);
        assert_eq!(body["like_count"], 1);

        let again = app
            .clone()
            .oneshot(post_as(&uri, Some("dev-1")))
            .await
            .unwrap();
        assert_eq!(again.status(), StatusCode::BAD_REQUEST);
        let body = json(again).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Already liked this person");

        let feed = json(
            app.clone()
                .oneshot(get_as("/api/people", Some("dev-1")))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(feed["total"], 1);
        assert_eq!(feed["data"][0]["name"], "Rina");

        let liked = json(
            app.oneshot(get_as("/api/people/liked", Some("dev-1")))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(liked["total"], 1);
        assert_eq!(liked["data"][0]["name"], "Ayu");
    }

    #[tokio::test]
    async fn dislike_unknown_person_is_404() {
        let (server, _) = test_server(&[]).await;
        let app = build_router(server);

        let response = app
            .oneshot(post_as("/api/people/77/dislike", Some("dev-1")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json(response).await;
        assert_eq!(body["message"], "Person not found");
    }

    #[tokio::test]
    async fn dislike_response_has_no_match_field() {
        let (server, ids) = test_server(&["Budi"]).await;
        let app = build_router(server);
        let uri = format!("/api/people/{}/dislike", ids[0]);

        let response = app.oneshot(post_as(&uri, Some("dev-1"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["message"], "Person disliked successfully");
        assert!(body.get("match").is_none());
    }
}
