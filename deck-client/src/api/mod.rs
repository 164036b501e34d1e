//! People API abstraction for swipedeck.
//!
//! This module provides a pluggable backend layer that abstracts the REST
//! service (reqwest over HTTP, mock for testing).
//!
//! # Design
//!
//! Every call is scoped to the device the implementation was built for:
//! - `fetch_page()` returns one page of people the device has not swiped
//! - `liked_page()` returns one page of people the device currently likes
//! - `like()` / `dislike()` record a decision
//!
//! A rejected like/dislike (e.g. "Already liked this person") is returned as
//! `Ok` with `success: false`; only transport and server failures are errors.
//!
//! # Example
//!
//! ```ignore
//! let api = MockPeopleApi::new();
//! api.add_people(profiles);
//! let page = api.fetch_page(1, 10).await?;
//! api.like(page.data[0].id).await?;
//! ```

mod http;
mod mock;

pub use http::HttpPeopleApi;
pub use mock::MockPeopleApi;

use async_trait::async_trait;
use swipedeck_types::{DislikeResponse, LikeResponse, Page, PersonId, Profile};
use thiserror::Error;

/// API errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Could not reach the backend.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request could not be built or sent.
    #[error("http error: {0}")]
    Http(String),

    /// The person does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Non-success status with the server's message.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the raw body.
        message: String,
    },

    /// Response body did not match the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Request timed out.
    #[error("request timeout")]
    Timeout,
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::ConnectionFailed(e.to_string())
        } else if e.is_decode() {
            ApiError::InvalidResponse(e.to_string())
        } else {
            ApiError::Http(e.to_string())
        }
    }
}

/// Backend for the people feed and like/dislike actions.
///
/// Implementations are bound to one device id.
#[async_trait]
pub trait PeopleApi: Send + Sync {
    /// Fetch one page of the feed (1-based).
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Page<Profile>, ApiError>;

    /// Fetch one page of people this device likes (1-based).
    async fn liked_page(&self, page: u32, limit: u32) -> Result<Page<Profile>, ApiError>;

    /// Like a person.
    async fn like(&self, id: PersonId) -> Result<LikeResponse, ApiError>;

    /// Dislike a person.
    async fn dislike(&self, id: PersonId) -> Result<DislikeResponse, ApiError>;
}
