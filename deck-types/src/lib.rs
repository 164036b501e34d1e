//! # swipedeck-types
//!
//! Wire format types for the swipedeck people feed.
//!
//! This crate provides the foundational types used across all swipedeck crates:
//! - [`PersonId`], [`DeviceId`] - Identity types
//! - [`Profile`], [`Photo`] - The cards shown in the deck
//! - [`Page`] - Paginated feed envelope
//! - [`LikeResponse`], [`DislikeResponse`], [`SwipeAction`] - Like/dislike exchange
//! - [`SwipeError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod messages;
mod profile;

pub use error::SwipeError;
pub use ids::{DeviceId, PersonId, DEVICE_ID_HEADER, MAX_DEVICE_ID_LEN};
pub use messages::{DislikeResponse, ErrorBody, LikeResponse, Page, SwipeAction};
pub use profile::{Photo, Profile};
