use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

pub fn generate_code_verifier() -> String {
    random_string(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

pub fn generate_session_id() -> String {
    random_string(32)
}

pub fn generate_oauth_state() -> String {
    random_string(16)
}

fn random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Tags a session id with a keyed digest, giving the cookie value `id.digest`.
///
/// The digest is a plain SHA-256 over `secret "." id`, not an HMAC. It only
/// has to stop a client from choosing another session's id, and the ids are
/// random and unguessable to begin with.
pub fn sign_session_id(session_id: &str, secret_key: &str) -> String {
    format!("{}.{}", session_id, session_digest(session_id, secret_key))
}

/// Returns the session id of a tagged cookie value when the digest matches.
pub fn verify_session_cookie(value: &str, secret_key: &str) -> Option<String> {
    let (id, digest) = value.rsplit_once('.')?;
    if id.is_empty() || session_digest(id, secret_key) != digest {
        return None;
    }
    Some(id.to_string())
}

fn session_digest(session_id: &str, secret_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret_key.as_bytes());
    hasher.update(b".");
    hasher.update(session_id.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Escapes text for interpolation into HTML bodies and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

