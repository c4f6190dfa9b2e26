//! # Spotify Integration Module
//!
//! Talks to the Spotify Web API with plain `reqwest` calls.
//!
//! - [`auth`] - Authorization code flow with PKCE: consent URL, code
//!   exchange and token refresh against the accounts service.
//! - [`catalog`] - The [`catalog::Catalog`] seam the playlist builder works
//!   against, and its Web API implementation: current user lookup, track
//!   search, playlist creation and item addition.
//!
//! ## API Coverage
//!
//! - `GET /me` - Identity of the signed-in user
//! - `GET /search` - First track matching `track:{title} year:{year}`
//! - `POST /users/{user_id}/playlists` - Create a private playlist
//! - `POST /playlists/{playlist_id}/tracks` - Add tracks, up to 100 per call
//! - `POST /api/token` - Token exchange and refresh
//!
//! Nothing here retries or paginates. Failures are returned to the caller as
//! typed errors from [`crate::error`].

pub mod auth;
pub mod catalog;
