//! # API Module
//!
//! HTTP endpoints of the chart playlist web app.
//!
//! ## Endpoints
//!
//! - [`index`] - `GET /`, the date form with any queued flash messages
//! - [`create_playlist`] - `POST /create-playlist`, validates the date and
//!   runs the playlist builder, sending the user through Spotify consent
//!   first when the session has no token yet
//! - [`callback`] - `GET /callback`, completes the OAuth code exchange and
//!   resumes the submission that triggered it
//! - [`health`] - `GET /health`, status, version and live session count
//!
//! ## Sessions
//!
//! Every browser gets a signed `session` cookie. The id behind it keys the
//! [`crate::management::SessionStore`], which holds that browser's token,
//! its unfinished consent and its flash messages.

mod callback;
mod create;
mod health;
mod index;
mod page;

pub use callback::callback;
pub use create::create_playlist;
pub use health::health;
pub use index::index;
pub use page::render_index;

use axum::{
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};

use crate::{
    builder::PlaylistBuilder,
    error::BuildError,
    management::PendingAuth,
    server::AppState,
    spotify::auth,
    types::{ChartDate, Flash, Token},
    utils, warning,
};

pub const SESSION_COOKIE: &str = "session";

/// The caller's session id and, when it was just issued, the cookie to set.
pub(crate) struct SessionHandle {
    pub id: String,
    set_cookie: Option<String>,
}

impl SessionHandle {
    /// Reads the signed session cookie, issuing a new session when it is
    /// missing or its digest does not match.
    pub fn from_headers(headers: &HeaderMap, secret_key: &str) -> Self {
        let existing = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| utils::verify_session_cookie(value, secret_key));

        match existing {
            Some(id) => Self {
                id,
                set_cookie: None,
            },
            None => {
                let id = utils::generate_session_id();
                let set_cookie = format!(
                    "{}={}; Path=/; HttpOnly; SameSite=Lax",
                    SESSION_COOKIE,
                    utils::sign_session_id(&id, secret_key)
                );
                Self {
                    id,
                    set_cookie: Some(set_cookie),
                }
            }
        }
    }

    /// Attaches the session cookie to a response when it is new.
    pub fn respond(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if let Some(cookie) = &self.set_cookie {
            if let Ok(value) = HeaderValue::from_str(cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

/// A `302 Found` to `location`.
pub(crate) fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Redirects to Spotify consent, remembering `date` so the callback can
/// finish the submission.
pub(crate) async fn begin_consent(
    state: &AppState,
    session: &SessionHandle,
    date: Option<ChartDate>,
) -> Response {
    let verifier = utils::generate_code_verifier();
    let challenge = utils::generate_code_challenge(&verifier);
    let oauth_state = utils::generate_oauth_state();

    match auth::authorize_url(&state.settings, &challenge, &oauth_state) {
        Ok(url) => {
            state
                .sessions
                .begin_auth(
                    &session.id,
                    PendingAuth {
                        code_verifier: verifier,
                        state: oauth_state,
                        date,
                    },
                )
                .await;
            session.respond(found(&url))
        }
        Err(e) => {
            warning!("Cannot build Spotify authorization URL: {}", e);
            state
                .sessions
                .push_flash(&session.id, Flash::error(format!("Error: {}", e)))
                .await;
            session.respond(found("/"))
        }
    }
}

/// Runs the builder for `date` with the session's token and renders the
/// result page.
pub(crate) async fn render_build(
    state: &AppState,
    session: &SessionHandle,
    date: ChartDate,
    token: &Token,
) -> Response {
    let catalog = state.catalog.connect(token);
    let builder = PlaylistBuilder::new(state.chart.as_ref(), catalog.as_ref());

    let playlist_url = match builder.build(date).await {
        Ok(url) => {
            state
                .sessions
                .push_flash(&session.id, Flash::success("Playlist created successfully!"))
                .await;
            Some(url)
        }
        Err(e) => {
            warning!("Playlist for {} failed: {}", date, e);
            if matches!(e, BuildError::Auth(_)) {
                state.sessions.clear_token(&session.id).await;
            }
            state
                .sessions
                .push_flash(&session.id, Flash::error(format!("Error: {}", e)))
                .await;
            None
        }
    };

    let flashes = state.sessions.take_flashes(&session.id).await;
    session.respond(Html(render_index(&flashes, playlist_url.as_deref())))
}
