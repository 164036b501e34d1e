//! Storage layer for swipedeck-server.
//!
//! People with their pictures, and one like/dislike row per
//! (person, device) pair.

mod sqlite;

pub use sqlite::SqliteStorage;

use crate::error::StorageError;
use async_trait::async_trait;
use swipedeck_types::{DeviceId, PersonId, Photo, SwipeAction};

/// A person as stored, including raw coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPerson {
    /// Person identifier.
    pub id: PersonId,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Free-text biography.
    pub bio: String,
    /// Human-readable place name.
    pub location: Option<String>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Pictures ordered by their `order` field.
    pub photos: Vec<Photo>,
}

/// Request to store a new person.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPerson {
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Free-text biography.
    pub bio: String,
    /// Human-readable place name.
    pub location: Option<String>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Pictures to attach.
    pub photos: Vec<Photo>,
}

/// One page of people plus the size of the whole listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonPage {
    /// People on this page.
    pub people: Vec<StoredPerson>,
    /// Number of people across all pages.
    pub total: u64,
}

/// Result of recording a like or dislike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// No visible person has this id. Nothing was written.
    NotFound,
    /// The device already holds this exact action. Nothing was written.
    AlreadySet,
    /// The action was stored, replacing `previous` if any.
    Recorded {
        /// The device's earlier action for this person.
        previous: Option<SwipeAction>,
    },
}

/// Trait for people storage backends.
#[async_trait]
pub trait PeopleStorage: Send + Sync {
    /// Store a person and their pictures.
    ///
    /// Returns the assigned id.
    async fn insert_person(&self, person: NewPerson) -> Result<PersonId, StorageError>;

    /// Hide a person from every listing.
    ///
    /// Returns `false` if no visible person had this id.
    async fn soft_delete_person(&self, id: PersonId) -> Result<bool, StorageError>;

    /// Count visible people.
    async fn count_people(&self) -> Result<u64, StorageError>;

    /// People `device` has neither liked nor disliked, ordered by id.
    async fn unseen_people(
        &self,
        device: &DeviceId,
        offset: u64,
        limit: u32,
    ) -> Result<PersonPage, StorageError>;

    /// People `device` currently likes, ordered by id.
    async fn liked_people(
        &self,
        device: &DeviceId,
        offset: u64,
        limit: u32,
    ) -> Result<PersonPage, StorageError>;

    /// Record `action` for (`id`, `device`) atomically.
    async fn record_action(
        &self,
        id: PersonId,
        device: &DeviceId,
        action: SwipeAction,
    ) -> Result<ActionOutcome, StorageError>;

    /// Number of devices currently liking `id`.
    async fn like_count(&self, id: PersonId) -> Result<u64, StorageError>;
}
