use async_trait::async_trait;
use reqwest::{Client, Response};

use crate::{
    error::{AuthError, CatalogWriteError, SearchError},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, CurrentUser, Playlist, SearchResponse, Token,
    },
};

/// Spotify accepts at most this many URIs per add-items request.
const ADD_TRACKS_CHUNK: usize = 100;

/// The catalog operations the playlist builder needs, bound to one user.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Looks up the id of the authenticated user.
    async fn current_user_id(&self) -> Result<String, AuthError>;

    /// Returns the URI of the first track matching `title` in `year`, if any.
    async fn search_track(&self, title: &str, year: i32) -> Result<Option<String>, SearchError>;

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<Playlist, CatalogWriteError>;

    async fn add_tracks(&self, playlist_id: &str, uris: &[String])
    -> Result<(), CatalogWriteError>;
}

/// Opens a [`Catalog`] for the holder of an access token.
pub trait CatalogConnector: Send + Sync {
    fn connect(&self, token: &Token) -> Box<dyn Catalog>;
}

/// Connects to the Spotify Web API.
pub struct SpotifyConnector {
    api_url: String,
}

impl SpotifyConnector {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }
}

impl CatalogConnector for SpotifyConnector {
    fn connect(&self, token: &Token) -> Box<dyn Catalog> {
        Box::new(SpotifyCatalog::new(
            self.api_url.clone(),
            token.access_token.clone(),
        ))
    }
}

pub struct SpotifyCatalog {
    api_url: String,
    access_token: String,
    client: Client,
}

impl SpotifyCatalog {
    pub fn new(api_url: String, access_token: String) -> Self {
        Self {
            api_url,
            access_token,
            client: Client::new(),
        }
    }
}

/// Builds the search query for a title, restricted to the chart year.
pub fn search_query(title: &str, year: i32) -> String {
    format!("track:{} year:{}", title, year)
}

#[async_trait]
impl Catalog for SpotifyCatalog {
    async fn current_user_id(&self) -> Result<String, AuthError> {
        let response = self
            .client
            .get(format!("{}/me", self.api_url))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|e| AuthError::Identity(e.to_string()))?;

        let user = response
            .json::<CurrentUser>()
            .await
            .map_err(|e| AuthError::Identity(e.to_string()))?;

        Ok(user.id)
    }

    async fn search_track(&self, title: &str, year: i32) -> Result<Option<String>, SearchError> {
        let query = search_query(title, year);
        let response = self
            .client
            .get(format!("{}/search", self.api_url))
            .bearer_auth(&self.access_token)
            .query(&[("q", query.as_str()), ("type", "track"), ("limit", "1")])
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|e| SearchError(e.to_string()))?;

        let json = response
            .json::<SearchResponse>()
            .await
            .map_err(|e| SearchError(e.to_string()))?;

        Ok(json
            .tracks
            .and_then(|page| page.items.into_iter().next())
            .map(|track| track.uri))
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<Playlist, CatalogWriteError> {
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: false,
        };

        let response = self
            .client
            .post(format!("{}/users/{}/playlists", self.api_url, user_id))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| CatalogWriteError::Request(e.to_string()))?;

        let created = check_write(response)
            .await?
            .json::<CreatePlaylistResponse>()
            .await
            .map_err(|e| CatalogWriteError::Request(e.to_string()))?;

        let url = created
            .external_urls
            .spotify
            .unwrap_or_else(|| format!("https://open.spotify.com/playlist/{}", created.id));

        Ok(Playlist {
            id: created.id,
            url,
        })
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), CatalogWriteError> {
        for chunk in uris.chunks(ADD_TRACKS_CHUNK) {
            let body = AddTrackToPlaylistRequest {
                uris: chunk.to_vec(),
            };

            let response = self
                .client
                .post(format!("{}/playlists/{}/tracks", self.api_url, playlist_id))
                .bearer_auth(&self.access_token)
                .json(&body)
                .send()
                .await
                .map_err(|e| CatalogWriteError::Request(e.to_string()))?;

            check_write(response)
                .await?
                .json::<AddTrackToPlaylistResponse>()
                .await
                .map_err(|e| CatalogWriteError::Request(e.to_string()))?;
        }

        Ok(())
    }
}

async fn check_write(response: Response) -> Result<Response, CatalogWriteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CatalogWriteError::Rejected { status, body })
}
