use axum::{Form, extract::State, http::HeaderMap, response::Response};
use serde::Deserialize;

use crate::{
    api::{SessionHandle, begin_consent, found, render_build},
    info,
    server::AppState,
    spotify::auth,
    types::{ChartDate, Flash},
    warning,
};

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistForm {
    pub date: Option<String>,
}

/// Handles a form submission.
///
/// An invalid date redirects back to the form with a flash message and
/// touches neither the chart nor Spotify. Without a usable token the user is
/// sent through consent first and the callback finishes the job.
pub async fn create_playlist(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CreatePlaylistForm>,
) -> Response {
    let session = SessionHandle::from_headers(&headers, &state.settings.secret_key);

    let date = match form.date.as_deref().unwrap_or_default().parse::<ChartDate>() {
        Ok(date) => date,
        Err(e) => {
            state
                .sessions
                .push_flash(&session.id, Flash::error(e.to_string()))
                .await;
            return session.respond(found("/"));
        }
    };

    let Some(token) = state.sessions.token(&session.id).await else {
        info!("No Spotify token for this session, starting consent");
        return begin_consent(&state, &session, Some(date)).await;
    };

    let token = match auth::ensure_fresh(&state.settings, token).await {
        Ok(token) => token,
        Err(e) => {
            warning!("Spotify token could not be refreshed: {}", e);
            state.sessions.clear_token(&session.id).await;
            return begin_consent(&state, &session, Some(date)).await;
        }
    };
    state.sessions.set_token(&session.id, token.clone()).await;

    render_build(&state, &session, date, &token).await
}
