//! People service: pagination, distances and like/dislike semantics on top
//! of the storage layer.

use crate::config::{Config, FeedConfig};
use crate::error::{Result, ServerError};
use crate::geo::{round_km, Coordinates};
use crate::storage::{ActionOutcome, PeopleStorage, PersonPage, SqliteStorage, StoredPerson};
use std::sync::Arc;
use swipedeck_types::{
    DeviceId, DislikeResponse, LikeResponse, Page, PersonId, Profile, SwipeAction,
};
use tracing::{debug, info};

/// Resolved page/limit pair for a listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl PageRequest {
    /// Apply defaults and bounds: `page` is at least 1, `limit` defaults to
    /// `feed.default_limit` and is clamped to `[1, feed.max_limit]`.
    pub fn resolve(page: Option<i64>, limit: Option<i64>, feed: &FeedConfig) -> Self {
        let max_limit = i64::from(feed.max_limit.max(1));
        let page = page.unwrap_or(1).clamp(1, i64::from(u32::MAX));
        let limit = limit
            .unwrap_or_else(|| i64::from(feed.default_limit))
            .clamp(1, max_limit);
        Self {
            page: page as u32,
            limit: limit as u32,
        }
    }

    /// Number of rows before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// The people backend.
pub struct PeopleServer {
    config: Config,
    storage: Arc<SqliteStorage>,
}

impl std::fmt::Debug for PeopleServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeopleServer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PeopleServer {
    /// Create a new PeopleServer with the given config and storage.
    pub fn new(config: Config, storage: SqliteStorage) -> Self {
        Self {
            config,
            storage: Arc::new(storage),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the storage backend.
    pub fn storage(&self) -> &Arc<SqliteStorage> {
        &self.storage
    }

    /// Resolve raw query values against the feed configuration.
    pub fn page_request(&self, page: Option<i64>, limit: Option<i64>) -> PageRequest {
        PageRequest::resolve(page, limit, &self.config.feed)
    }

    /// People `device` has not swiped yet.
    pub async fn feed(
        &self,
        device: &DeviceId,
        request: PageRequest,
        origin: Option<Coordinates>,
    ) -> Result<Page<Profile>> {
        let found = self
            .storage
            .unseen_people(device, request.offset(), request.limit)
            .await?;
        debug!(%device, page = request.page, total = found.total, "Feed page");
        Ok(to_page(found, request, origin))
    }

    /// People `device` currently likes.
    pub async fn liked(
        &self,
        device: &DeviceId,
        request: PageRequest,
        origin: Option<Coordinates>,
    ) -> Result<Page<Profile>> {
        let found = self
            .storage
            .liked_people(device, request.offset(), request.limit)
            .await?;
        debug!(%device, page = request.page, total = found.total, "Liked page");
        Ok(to_page(found, request, origin))
    }

    /// Like a person.
    ///
    /// A repeated like is a rejection (`success: false`), not an error.
    /// Mutual matching is not modelled; `match` is always `false`.
    pub async fn like(&self, id: PersonId, device: &DeviceId) -> Result<LikeResponse> {
        match self.record(id, device, SwipeAction::Like).await? {
            Some(message) => Ok(LikeResponse {
                success: false,
                message,
                is_match: None,
                like_count: None,
            }),
            None => {
                let like_count = self.storage.like_count(id).await?;
                Ok(LikeResponse {
                    success: true,
                    message: "Person liked successfully".to_string(),
                    is_match: Some(false),
                    like_count: Some(like_count),
                })
            }
        }
    }

    /// Dislike a person.
    pub async fn dislike(&self, id: PersonId, device: &DeviceId) -> Result<DislikeResponse> {
        Ok(match self.record(id, device, SwipeAction::Dislike).await? {
            Some(message) => DislikeResponse {
                success: false,
                message,
            },
            None => DislikeResponse {
                success: true,
                message: "Person disliked successfully".to_string(),
            },
        })
    }

    /// Store the action. Returns the rejection message if nothing changed.
    async fn record(
        &self,
        id: PersonId,
        device: &DeviceId,
        action: SwipeAction,
    ) -> Result<Option<String>> {
        match self.storage.record_action(id, device, action).await? {
            ActionOutcome::NotFound => Err(ServerError::PersonNotFound { id }),
            ActionOutcome::AlreadySet => {
                debug!(%id, %device, %action, "Action already recorded");
                Ok(Some(format!("Already {}d this person", action)))
            }
            ActionOutcome::Recorded { previous } => {
                info!(%id, %device, %action, ?previous, "Recorded swipe");
                Ok(None)
            }
        }
    }
}

fn to_page(found: PersonPage, request: PageRequest, origin: Option<Coordinates>) -> Page<Profile> {
    let data = found
        .people
        .into_iter()
        .map(|person| to_profile(person, origin))
        .collect();
    Page::new(data, request.page, request.limit, found.total)
}

/// Wire view of a stored person. `distance` is set only when both the
/// caller and the person have coordinates.
fn to_profile(person: StoredPerson, origin: Option<Coordinates>) -> Profile {
    let distance = origin
        .zip(Coordinates::from_parts(person.latitude, person.longitude))
        .map(|(from, to)| round_km(from.distance_km(&to)));
    Profile {
        id: person.id,
        name: person.name,
        age: person.age,
        bio: person.bio,
        location: person.location,
        distance,
        photos: person.photos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::NewPerson;
    use swipedeck_types::Photo;

    fn feed_config(default_limit: u32, max_limit: u32) -> FeedConfig {
        FeedConfig {
            default_limit,
            max_limit,
        }
    }

    fn device(raw: &str) -> DeviceId {
        DeviceId::parse(raw).unwrap()
    }

    fn new_person(name: &str, lat: Option<f64>, lon: Option<f64>) -> NewPerson {
        NewPerson {
            name: name.to_string(),
            age: 24,
            bio: String::new(),
            location: None,
            latitude: lat,
            longitude: lon,
            photos: vec![Photo {
                url: format!("http://img/{}.png", name),
                order: 0,
            }],
        }
    }

    async fn server_with(count: usize) -> (PeopleServer, Vec<PersonId>) {
        let storage = SqliteStorage::in_memory().await.unwrap();
        let mut ids = Vec::new();
        for i in 0..count {
            let person = new_person(&format!("p{}", i), Some(-6.9175), Some(107.6191));
            ids.push(storage.insert_person(person).await.unwrap());
        }
        (PeopleServer::new(Config::default(), storage), ids)
    }

    #[test]
    fn page_request_defaults() {
        let req = PageRequest::resolve(None, None, &feed_config(10, 50));
        assert_eq!(req, PageRequest { page: 1, limit: 10 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn page_request_clamps() {
        let feed = feed_config(10, 50);
        assert_eq!(
            PageRequest::resolve(Some(0), Some(0), &feed),
            PageRequest { page: 1, limit: 1 }
        );
        assert_eq!(
            PageRequest::resolve(Some(-3), Some(500), &feed),
            PageRequest { page: 1, limit: 50 }
        );
        assert_eq!(PageRequest::resolve(Some(3), Some(5), &feed).offset(), 10);
    }

    #[tokio::test]
    async fn feed_pages_report_has_more() {
        let (server, _) = server_with(5).await;
        let d1 = device("d1");

        let first = server
            .feed(&d1, server.page_request(Some(1), Some(2)), None)
            .await
            .unwrap();
        let last = server
            .feed(&d1, server.page_request(Some(3), Some(2)), None)
            .await
            .unwrap();

        assert_eq!(first.data.len(), 2);
        assert_eq!(first.total, 5);
        assert!(first.has_more);
        assert_eq!(last.data.len(), 1);
        assert!(!last.has_more);
    }

    #[tokio::test]
    async fn distance_needs_both_coordinates() {
        let (server, _) = server_with(1).await;
        let d1 = device("d1");
        let req = server.page_request(None, None);

        let without = server.feed(&d1, req, None).await.unwrap();
        let with = server
            .feed(&d1, req, Some(Coordinates::new(-6.2088, 106.8456)))
            .await
            .unwrap();

        assert_eq!(without.data[0].distance, None);
        assert_eq!(with.data[0].distance, Some(116.2));
    }

    #[tokio::test]
    async fn person_without_coordinates_has_no_distance() {
        let storage = SqliteStorage::in_memory().await.unwrap();
        storage
            .insert_person(new_person("nowhere", None, None))
            .await
            .unwrap();
        let server = PeopleServer::new(Config::default(), storage);

        let page = server
            .feed(
                &device("d1"),
                server.page_request(None, None),
                Some(Coordinates::new(0.0, 0.0)),
            )
            .await
            .unwrap();

        assert_eq!(page.data[0].distance, None);
    }

    #[tokio::test]
    async fn like_then_relike() {
        let (server, ids) = server_with(1).await;
        let d1 = device("d1");

        let first = server.like(ids[0], &d1).await.unwrap();
        let second = server.like(ids[0], &d1).await.unwrap();

        assert!(first.success);
        assert_eq!(first.message, "Person liked successfully");
        assert_eq!(first.is_match, Some(false));
        assert_eq!(first.like_count, Some(1));
        assert!(!second.success);
        assert_eq!(second.message, "Already liked this person");
        assert_eq!(second.like_count, None);
    }

    #[tokio::test]
    async fn dislike_flips_like_and_rejects_repeat() {
        let (server, ids) = server_with(1).await;
        let d1 = device("d1");
        server.like(ids[0], &d1).await.unwrap();

        let flipped = server.dislike(ids[0], &d1).await.unwrap();
        let repeat = server.dislike(ids[0], &d1).await.unwrap();
        let liked = server
            .liked(&d1, server.page_request(None, None), None)
            .await
            .unwrap();

        assert!(flipped.success);
        assert_eq!(flipped.message, "Person disliked successfully");
        assert!(!repeat.success);
        assert_eq!(repeat.message, "Already disliked this person");
        assert!(liked.data.is_empty());
    }

    #[tokio::test]
    async fn unknown_person_is_not_found() {
        let (server, _) = server_with(0).await;

        let result = server.like(PersonId::new(42), &device("d1")).await;

        assert!(matches!(
            result,
            Err(ServerError::PersonNotFound { id }) if id == PersonId::new(42)
        ));
    }

    #[tokio::test]
    async fn like_count_counts_all_devices() {
        let (server, ids) = server_with(1).await;
        server.like(ids[0], &device("d1")).await.unwrap();

        let resp = server.like(ids[0], &device("d2")).await.unwrap();

        assert_eq!(resp.like_count, Some(2));
    }
}
