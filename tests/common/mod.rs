#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use reqwest::StatusCode;
use chartlist::{
    chart::ChartSource,
    config::Settings,
    error::{AuthError, CatalogWriteError, FetchError, SearchError},
    spotify::catalog::{Catalog, CatalogConnector},
    types::{ChartDate, Playlist, Token},
};

// Chart source that returns a fixed list of titles and counts its calls
#[derive(Clone, Default)]
pub struct FakeChart {
    titles: Vec<String>,
    unavailable: bool,
    pub calls: Arc<Mutex<Vec<ChartDate>>>,
}

impl FakeChart {
    pub fn with_titles(titles: &[&str]) -> Self {
        Self {
            titles: titles.iter().map(|t| t.to_string()).collect(),
            unavailable: false,
            calls: Arc::default(),
        }
    }

    // Chart page that answers 503
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ChartSource for FakeChart {
    async fn fetch_titles(&self, date: ChartDate) -> Result<Vec<String>, FetchError> {
        self.calls.lock().unwrap().push(date);
        if self.unavailable {
            return Err(FetchError::Status(StatusCode::SERVICE_UNAVAILABLE));
        }
        Ok(self.titles.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCall {
    CurrentUser,
    Search { title: String, year: i32 },
    CreatePlaylist { user_id: String, name: String, description: String },
    AddTracks { playlist_id: String, uris: Vec<String> },
}

#[derive(Clone)]
pub enum SearchOutcome {
    Hit(&'static str),
    Miss,
    Fail,
}

// Catalog double with scripted search results that records every call
#[derive(Clone, Default)]
pub struct FakeCatalog {
    identity_fails: bool,
    create_fails: bool,
    add_fails: bool,
    searches: HashMap<String, SearchOutcome>,
    pub calls: Arc<Mutex<Vec<CatalogCall>>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, title: &str, outcome: SearchOutcome) -> Self {
        self.searches.insert(title.to_string(), outcome);
        self
    }

    pub fn with_failing_identity(mut self) -> Self {
        self.identity_fails = true;
        self
    }

    pub fn with_failing_create(mut self) -> Self {
        self.create_fails = true;
        self
    }

    pub fn with_failing_add(mut self) -> Self {
        self.add_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn searched(&self) -> bool {
        self.calls()
            .iter()
            .any(|c| matches!(c, CatalogCall::Search { .. }))
    }

    pub fn created_playlists(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, CatalogCall::CreatePlaylist { .. }))
            .count()
    }

    fn record(&self, call: CatalogCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn current_user_id(&self) -> Result<String, AuthError> {
        self.record(CatalogCall::CurrentUser);
        if self.identity_fails {
            return Err(AuthError::Identity("401 Unauthorized: invalid access token".to_string()));
        }
        Ok("chart-fan".to_string())
    }

    async fn search_track(&self, title: &str, year: i32) -> Result<Option<String>, SearchError> {
        self.record(CatalogCall::Search {
            title: title.to_string(),
            year,
        });
        match self.searches.get(title) {
            Some(SearchOutcome::Hit(uri)) => Ok(Some(uri.to_string())),
            Some(SearchOutcome::Fail) => Err(SearchError("502 Bad Gateway".to_string())),
            Some(SearchOutcome::Miss) | None => Ok(None),
        }
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<Playlist, CatalogWriteError> {
        self.record(CatalogCall::CreatePlaylist {
            user_id: user_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        });
        if self.create_fails {
            return Err(CatalogWriteError::Rejected {
                status: StatusCode::TOO_MANY_REQUESTS,
                body: "API rate limit exceeded".to_string(),
            });
        }
        let id = format!("playlist{}", self.created_playlists());
        Ok(Playlist {
            url: format!("https://open.spotify.com/playlist/{}", id),
            id,
        })
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), CatalogWriteError> {
        self.record(CatalogCall::AddTracks {
            playlist_id: playlist_id.to_string(),
            uris: uris.to_vec(),
        });
        if self.add_fails {
            return Err(CatalogWriteError::Rejected {
                status: StatusCode::BAD_REQUEST,
                body: "Invalid track uri".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct FakeConnector {
    pub catalog: FakeCatalog,
    pub connects: Arc<Mutex<usize>>,
}

impl FakeConnector {
    pub fn new(catalog: FakeCatalog) -> Self {
        Self {
            catalog,
            connects: Arc::default(),
        }
    }

    pub fn connect_count(&self) -> usize {
        *self.connects.lock().unwrap()
    }
}

impl CatalogConnector for FakeConnector {
    fn connect(&self, _token: &Token) -> Box<dyn Catalog> {
        *self.connects.lock().unwrap() += 1;
        Box::new(self.catalog.clone())
    }
}

pub fn test_settings(accounts_url: &str) -> Settings {
    Settings {
        secret_key: "test-secret".to_string(),
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        redirect_uri: "http://localhost:10000/callback".to_string(),
        port: 0,
        chart_base_url: "http://127.0.0.1:1/charts/hot-100".to_string(),
        spotify_api_url: "http://127.0.0.1:1/v1".to_string(),
        spotify_accounts_url: accounts_url.to_string(),
    }
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
