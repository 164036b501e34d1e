//! # swipedeck-core
//!
//! Pure logic for swipedeck (no I/O, instant tests).
//!
//! This crate implements the deck reconciliation and the gesture state
//! machine without any timers, network or rendering, enabling fast unit
//! tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. The [`SwipeController`] owns the [`Deck`] and the
//! [`GestureState`] and answers every input with a list of [`Effect`]s.
//! The actual I/O (animation timers, like/dislike requests, image
//! prefetching) is performed by `swipedeck-client`, which interprets those
//! effects.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod controller;
pub mod deck;
pub mod feed;
pub mod gesture;
pub mod motion;

pub use config::SwipeConfig;
pub use controller::{Effect, SwipeController};
pub use deck::{Deck, Reconciled, SuppressionToken};
pub use feed::FeedPages;
pub use gesture::{
    decide_release, Action, AnimationId, Direction, Event, GestureContext, GestureState, Offset,
    PendingAnimation, SwipeIntent, SwipeSource,
};
pub use motion::{CardPose, Easing, ExitMotion, PopMotion, Tween};
