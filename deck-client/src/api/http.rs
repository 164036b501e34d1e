//! reqwest-backed people API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Response, StatusCode};
use swipedeck_types::{
    DeviceId, DislikeResponse, ErrorBody, LikeResponse, Page, PersonId, Profile, DEVICE_ID_HEADER,
};
use tracing::debug;

use super::{ApiError, PeopleApi};
use crate::config::{ClientConfig, UserLocation};

/// HTTP client for the people REST API.
///
/// Every request carries the device id in the `X-Device-ID` header.
#[derive(Debug, Clone)]
pub struct HttpPeopleApi {
    base_url: String,
    location: Option<UserLocation>,
    http: reqwest::Client,
}

impl HttpPeopleApi {
    /// Create a client for `base_url` (e.g. `http://localhost:8080/api`).
    pub fn new(base_url: &str, device: &DeviceId, timeout: Duration) -> Result<Self, ApiError> {
        let value = HeaderValue::from_str(device.as_str())
            .map_err(|e| ApiError::Http(format!("invalid device id header: {}", e)))?;
        let name = HeaderName::from_bytes(DEVICE_ID_HEADER.as_bytes())
            .map_err(|e| ApiError::Http(format!("invalid header name: {}", e)))?;
        let mut headers = HeaderMap::new();
        headers.insert(name, value);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            location: None,
            http,
        })
    }

    /// Create a client from a loaded configuration.
    pub fn from_config(config: &ClientConfig, device: &DeviceId) -> Result<Self, ApiError> {
        let mut api = Self::new(&config.base_url, device, config.timeout())?;
        api.location = config.location;
        Ok(api)
    }

    /// Ask the backend to compute distances from this position.
    pub fn with_location(mut self, location: UserLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the feed listing.
    pub fn people_url(&self) -> String {
        format!("{}/people", self.base_url)
    }

    /// URL of the liked listing.
    pub fn liked_url(&self) -> String {
        format!("{}/people/liked", self.base_url)
    }

    /// URL of a like/dislike action.
    pub fn action_url(&self, id: PersonId, action: &str) -> String {
        format!("{}/people/{}/{}", self.base_url, id, action)
    }

    /// Query parameters for a listing request.
    pub fn page_query(&self, page: u32, limit: u32) -> Vec<(&'static str, String)> {
        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(location) = self.location {
            query.push(("user_latitude", location.latitude.to_string()));
            query.push(("user_longitude", location.longitude.to_string()));
        }
        query
    }

    async fn get_page(
        &self,
        url: String,
        page: u32,
        limit: u32,
    ) -> Result<Page<Profile>, ApiError> {
        debug!(%url, page, limit, "Fetching page");
        let response = self
            .http
            .get(&url)
            .query(&self.page_query(page, limit))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(response.json().await?)
    }

    /// POST an action. A 400 carrying a well-formed body is a rejection,
    /// not an error.
    async fn post_action(&self, id: PersonId, action: &str) -> Result<String, ApiError> {
        let url = self.action_url(id, action);
        debug!(%url, "Posting action");
        let response = self.http.post(&url).send().await?;
        let status = response.status();

        if status.is_success() || status == StatusCode::BAD_REQUEST {
            let body = response.text().await?;
            if status.is_success() || serde_json::from_str::<ErrorBody>(&body).is_ok() {
                return Ok(body);
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body,
            });
        }
        Err(error_from(response).await)
    }
}

async fn error_from(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or(body);

    if status == StatusCode::NOT_FOUND {
        ApiError::NotFound(message)
    } else {
        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl PeopleApi for HttpPeopleApi {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Page<Profile>, ApiError> {
        self.get_page(self.people_url(), page, limit).await
    }

    async fn liked_page(&self, page: u32, limit: u32) -> Result<Page<Profile>, ApiError> {
        self.get_page(self.liked_url(), page, limit).await
    }

    async fn like(&self, id: PersonId) -> Result<LikeResponse, ApiError> {
        let body = self.post_action(id, "like").await?;
        parse(&body)
    }

    async fn dislike(&self, id: PersonId) -> Result<DislikeResponse, ApiError> {
        let body = self.post_action(id, "dislike").await?;
        parse(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> HttpPeopleApi {
        let device = DeviceId::parse("device-1-abc").unwrap();
        HttpPeopleApi::new("http://localhost:8080/api/", &device, Duration::from_secs(10))
            .unwrap()
    }

    #[test]
    fn urls_are_built_from_base() {
        let api = api();
        assert_eq!(api.base_url(), "http://localhost:8080/api");
        assert_eq!(api.people_url(), "http://localhost:8080/api/people");
        assert_eq!(api.liked_url(), "http://localhost:8080/api/people/liked");
        assert_eq!(
            api.action_url(PersonId::new(4), "dislike"),
            "http://localhost:8080/api/people/4/dislike"
        );
    }

    #[test]
    fn query_includes_location_when_set() {
        let api = api();
        assert_eq!(
            api.page_query(2, 10),
            vec![("page", "2".to_string()), ("limit", "10".to_string())]
        );

        let api = api.with_location(UserLocation {
            latitude: -6.2,
            longitude: 106.8,
        });
        let query = api.page_query(1, 5);
        assert!(query.contains(&("user_latitude", "-6.2".to_string())));
        assert!(query.contains(&("user_longitude", "106.8".to_string())));
    }

    #[tokio::test]
    async fn unreachable_backend_is_an_error() {
        let device = DeviceId::parse("device-1-abc").unwrap();
        // Port 9 (discard) is not expected to serve HTTP
        let api = HttpPeopleApi::new("http://127.0.0.1:9/api", &device, Duration::from_secs(2))
            .unwrap();

        let result = api.fetch_page(1, 10).await;
        assert!(result.is_err());
    }

    #[test]
    fn rejection_body_parses_as_like_response() {
        let resp: LikeResponse =
            parse(r#"{"success":false,"message":"Already liked this person"}"#).unwrap();
        assert!(!resp.success);
        assert!(parse::<LikeResponse>("not json").is_err());
    }
}
