//! # swipedeck-server
//!
//! REST backend for the swipedeck people feed.
//!
//! This crate implements a small HTTP server that:
//! - Lists people a device has not swiped yet, page by page
//! - Records likes and dislikes per device (one mutable row per person)
//! - Lists the people a device currently likes
//! - Computes distances from an optional caller position
//!
//! ## Architecture
//!
//! ```text
//! Mobile client ──┐
//!                 │  HTTP + X-Device-ID
//!                 ▼
//!        ┌────────────────────────────┐
//!        │      swipedeck-server      │
//!        │  axum router → PeopleServer│
//!        │  ┌─────────────────────┐   │
//!        │  │ SQLite (people,     │   │
//!        │  │ pictures, likes)    │   │
//!        │  └─────────────────────┘   │
//!        └────────────────────────────┘
//! ```
//!
//! ## Endpoints
//!
//! - `GET /api/people?page&limit[&user_latitude&user_longitude]`
//! - `GET /api/people/liked?page&limit`
//! - `POST /api/people/{id}/like`
//! - `POST /api/people/{id}/dislike`
//! - `GET /health`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod geo;
pub mod http;
pub mod seed;
pub mod server;
pub mod storage;
