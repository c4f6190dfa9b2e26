use axum::{extract::State, http::HeaderMap, response::Html, response::Response};

use crate::{
    api::{SessionHandle, render_index},
    server::AppState,
};

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = SessionHandle::from_headers(&headers, &state.settings.secret_key);
    let flashes = state.sessions.take_flashes(&session.id).await;
    session.respond(Html(render_index(&flashes, None)))
}
