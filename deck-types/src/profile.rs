//! Profiles shown as cards in the deck.

use serde::{Deserialize, Serialize};

use crate::PersonId;

/// A photo attached to a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Absolute URL of the image.
    pub url: String,
    /// Display position; lower comes first.
    pub order: i32,
}

/// A person as served by the feed.
///
/// Immutable from the client's point of view. `distance` is derived per
/// request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Stable identity.
    pub id: PersonId,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Free-form biography.
    #[serde(default)]
    pub bio: String,
    /// Human-readable location (city).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Distance from the requesting user in kilometres, if known.
    #[serde(default)]
    pub distance: Option<f64>,
    /// Photos, ordered by [`Photo::order`].
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl Profile {
    /// The photo shown on the card face (lowest `order`).
    pub fn primary_photo(&self) -> Option<&Photo> {
        self.photos.iter().min_by_key(|p| p.order)
    }
}
