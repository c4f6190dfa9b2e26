use chrono::Utc;
use reqwest::{Client, Url};

use crate::{
    config::{SPOTIFY_SCOPE, Settings},
    error::AuthError,
    types::{Token, TokenResponse},
};

/// Seconds before expiry at which a token is treated as expired.
const EXPIRY_MARGIN: u64 = 240;

/// Builds the Spotify consent URL for the authorization code flow.
///
/// The user is always shown the consent dialog, and the request carries a
/// PKCE challenge alongside the client id so the code can only be redeemed
/// with the matching verifier.
///
/// # Arguments
///
/// * `settings` - Client id, redirect URI and accounts service URL
/// * `code_challenge` - SHA256 challenge derived from the session's verifier
/// * `state` - Random value echoed back on the callback
pub fn authorize_url(
    settings: &Settings,
    code_challenge: &str,
    state: &str,
) -> Result<String, AuthError> {
    let mut url = Url::parse(&format!("{}/authorize", settings.spotify_accounts_url))
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    url.query_pairs_mut()
        .append_pair("client_id", &settings.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", &settings.redirect_uri)
        .append_pair("scope", SPOTIFY_SCOPE)
        .append_pair("state", state)
        .append_pair("code_challenge", code_challenge)
        .append_pair("code_challenge_method", "S256")
        .append_pair("show_dialog", "true");

    Ok(url.to_string())
}

/// Exchanges an authorization code from the callback for an access token.
///
/// Authenticates with the client id and secret and proves possession of the
/// PKCE verifier that was generated when the consent redirect was issued.
///
/// # Errors
///
/// Returns [`AuthError::TokenExchange`] on network failures, on a non-2xx
/// answer (expired or reused code, verifier mismatch) and on malformed
/// response bodies.
pub async fn exchange_code(
    settings: &Settings,
    code: &str,
    verifier: &str,
) -> Result<Token, AuthError> {
    request_token(
        settings,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("code_verifier", verifier),
        ],
        None,
    )
    .await
}

/// Refreshes an expired access token using its refresh token.
///
/// Spotify may or may not rotate the refresh token; when it does not, the old
/// one is kept.
pub async fn refresh_token(settings: &Settings, refresh_token: &str) -> Result<Token, AuthError> {
    request_token(
        settings,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
        Some(refresh_token),
    )
    .await
}

async fn request_token(
    settings: &Settings,
    form: &[(&str, &str)],
    previous_refresh_token: Option<&str>,
) -> Result<Token, AuthError> {
    let client = Client::new();
    let res = client
        .post(format!("{}/api/token", settings.spotify_accounts_url))
        .basic_auth(&settings.client_id, Some(&settings.client_secret))
        .form(form)
        .send()
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(AuthError::TokenExchange(format!(
            "status {}: {}",
            status, body
        )));
    }

    let json: TokenResponse = res
        .json()
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    Ok(Token {
        access_token: json.access_token,
        refresh_token: json
            .refresh_token
            .or_else(|| previous_refresh_token.map(str::to_string)),
        scope: json.scope,
        expires_in: json.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

/// Whether the token is expired or about to expire.
pub fn is_expired(token: &Token) -> bool {
    let now = Utc::now().timestamp() as u64;
    now + EXPIRY_MARGIN >= token.obtained_at + token.expires_in
}

/// Returns a token that is safe to use, refreshing it when needed.
///
/// # Errors
///
/// Fails when the token is expired and cannot be refreshed, in which case the
/// caller has to send the user through consent again.
pub async fn ensure_fresh(settings: &Settings, token: Token) -> Result<Token, AuthError> {
    if !is_expired(&token) {
        return Ok(token);
    }

    match token.refresh_token.as_deref() {
        Some(refresh) => refresh_token(settings, refresh).await,
        None => Err(AuthError::MissingToken),
    }
}
