use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;

use crate::{
    api::{SessionHandle, found, render_build},
    error::{AuthError, BuildError},
    server::AppState,
    spotify::auth,
    success,
    types::Flash,
    warning,
};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Completes the authorization code flow.
///
/// On success the token is stored in the caller's session and, when consent
/// was triggered by a form submission, that submission is built right away.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Response {
    let session = SessionHandle::from_headers(&headers, &state.settings.secret_key);

    let result = async {
        if let Some(error) = params.error.as_deref() {
            return Err(AuthError::TokenExchange(format!("consent denied: {}", error)));
        }
        let code = params
            .code
            .as_deref()
            .ok_or_else(|| AuthError::TokenExchange("missing authorization code".to_string()))?;
        let pending = state
            .sessions
            .finish_auth(&session.id, params.state.as_deref().unwrap_or_default())
            .await?;
        let token = auth::exchange_code(&state.settings, code, &pending.code_verifier).await?;
        Ok::<_, AuthError>((token, pending.date))
    }
    .await;

    match result {
        Ok((token, date)) => {
            success!("Spotify authorization completed");
            state.sessions.set_token(&session.id, token.clone()).await;
            match date {
                Some(date) => render_build(&state, &session, date, &token).await,
                None => session.respond(found("/")),
            }
        }
        Err(e) => {
            warning!("Spotify authorization failed: {}", e);
            let message = format!("Error: {}", BuildError::Auth(e));
            state
                .sessions
                .push_flash(&session.id, Flash::error(message))
                .await;
            session.respond(found("/"))
        }
    }
}
