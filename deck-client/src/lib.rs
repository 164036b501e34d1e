//! # swipedeck-client
//!
//! Client library for the swipedeck people feed.
//!
//! This is the library a front end embeds to run a swipe deck against the
//! REST backend.
//!
//! ## Features
//!
//! - **API Abstraction**: Pluggable people backend (reqwest HTTP, mock)
//! - **Swipe Session**: Single-writer event loop that runs the deck, timers
//!   and like/dislike calls
//! - **Image Prefetch**: Warms the primary photos of upcoming cards
//! - **Pure State Machine**: Uses swipedeck-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use swipedeck_client::{ClientConfig, HttpPeopleApi, NoopPrefetcher, SwipeSession};
//!
//! let config = ClientConfig::default();
//! let api = HttpPeopleApi::from_config(&config, &device)?;
//! let mut session = SwipeSession::spawn(config.swipe, Arc::new(api), Arc::new(NoopPrefetcher));
//!
//! session.handle().refresh()?;
//! while let Some(event) = session.next_event().await {
//!     println!("{:?}", event);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod prefetch;
pub mod session;

#[cfg(test)]
mod testing;

pub use api::{ApiError, HttpPeopleApi, MockPeopleApi, PeopleApi};
pub use config::{ClientConfig, ConfigError, UserLocation};
pub use prefetch::{HttpPrefetcher, ImagePrefetcher, NoopPrefetcher, PrefetchError};
pub use session::{
    AnimationKind, DeckSnapshot, SessionError, SessionEvent, SessionHandle, SwipeSession,
};
