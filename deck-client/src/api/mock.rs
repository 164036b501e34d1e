//! Mock people API for testing.
//!
//! Behaves like the real backend for a single device: the feed hides people
//! already liked or disliked, likes and dislikes are toggled per person, and
//! listings are paginated. Failures and latency can be injected.

use super::{ApiError, PeopleApi};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use swipedeck_types::{
    DislikeResponse, LikeResponse, Page, PersonId, Profile, SwipeAction,
};

/// Mock people API for testing.
///
/// Clones share state, so a test can keep a handle while the session owns
/// another.
#[derive(Debug, Default)]
pub struct MockPeopleApi {
    inner: Arc<Mutex<MockPeopleApiInner>>,
}

#[derive(Debug, Default)]
struct MockPeopleApiInner {
    people: Vec<Profile>,
    decisions: HashMap<PersonId, SwipeAction>,
    actions: Vec<(SwipeAction, PersonId)>,
    fetched_pages: Vec<u32>,
    latency: Option<Duration>,
    fail_next_fetch: Option<String>,
    fail_next_action: Option<String>,
}

impl MockPeopleApi {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock serving these people, in order.
    pub fn with_people(people: Vec<Profile>) -> Self {
        let api = Self::new();
        api.add_people(people);
        api
    }

    /// Append people to the backing store.
    pub fn add_people(&self, people: impl IntoIterator<Item = Profile>) {
        let mut inner = self.inner.lock().unwrap();
        inner.people.extend(people);
    }

    /// Every like/dislike call that reached the mock, in order.
    pub fn actions(&self) -> Vec<(SwipeAction, PersonId)> {
        let inner = self.inner.lock().unwrap();
        inner.actions.clone()
    }

    /// Page numbers requested from the feed, in order.
    pub fn fetched_pages(&self) -> Vec<u32> {
        let inner = self.inner.lock().unwrap();
        inner.fetched_pages.clone()
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.latency = Some(latency);
    }

    /// Cause the next feed fetch to fail with the given error.
    pub fn fail_next_fetch(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_fetch = Some(error.to_string());
    }

    /// Cause the next like/dislike to fail with the given error.
    pub fn fail_next_action(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_action = Some(error.to_string());
    }

    /// Clear all state.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockPeopleApiInner::default();
    }

    async fn delay(&self) {
        let latency = self.inner.lock().unwrap().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn record(&self, id: PersonId, action: SwipeAction) -> Result<Option<String>, ApiError> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(error) = inner.fail_next_action.take() {
            return Err(ApiError::ConnectionFailed(error));
        }
        if !inner.people.iter().any(|p| p.id == id) {
            return Err(ApiError::NotFound("Person not found".into()));
        }

        inner.actions.push((action, id));
        if inner.decisions.get(&id) == Some(&action) {
            return Ok(Some(format!("Already {}d this person", action)));
        }
        inner.decisions.insert(id, action);
        Ok(None)
    }
}

impl Clone for MockPeopleApi {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn paginate(items: Vec<Profile>, page: u32, limit: u32) -> Page<Profile> {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = items.len() as u64;
    let skip = ((page - 1) as usize).saturating_mul(limit as usize);
    let data = items.into_iter().skip(skip).take(limit as usize).collect();
    Page::new(data, page, limit, total)
}

#[async_trait]
impl PeopleApi for MockPeopleApi {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Page<Profile>, ApiError> {
        self.delay().await;
        let mut inner = self.inner.lock().unwrap();
        inner.fetched_pages.push(page);

        if let Some(error) = inner.fail_next_fetch.take() {
            return Err(ApiError::ConnectionFailed(error));
        }

        let visible: Vec<Profile> = inner
            .people
            .iter()
            .filter(|p| !inner.decisions.contains_key(&p.id))
            .cloned()
            .collect();
        Ok(paginate(visible, page, limit))
    }

    async fn liked_page(&self, page: u32, limit: u32) -> Result<Page<Profile>, ApiError> {
        self.delay().await;
        let inner = self.inner.lock().unwrap();
        let liked: Vec<Profile> = inner
            .people
            .iter()
            .filter(|p| inner.decisions.get(&p.id) == Some(&SwipeAction::Like))
            .cloned()
            .collect();
        Ok(paginate(liked, page, limit))
    }

    async fn like(&self, id: PersonId) -> Result<LikeResponse, ApiError> {
        self.delay().await;
        Ok(match self.record(id, SwipeAction::Like)? {
            Some(message) => LikeResponse {
                success: false,
                message,
                is_match: None,
                like_count: None,
            },
            None => LikeResponse {
                success: true,
                message: "Person liked successfully".into(),
                is_match: Some(false),
                like_count: Some(1),
            },
        })
    }

    async fn dislike(&self, id: PersonId) -> Result<DislikeResponse, ApiError> {
        self.delay().await;
        Ok(match self.record(id, SwipeAction::Dislike)? {
            Some(message) => DislikeResponse {
                success: false,
                message,
            },
            None => DislikeResponse {
                success: true,
                message: "Person disliked successfully".into(),
            },
        })
    }
}
