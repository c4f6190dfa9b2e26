use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    Res, api,
    chart::{BillboardChart, ChartSource},
    config::Settings,
    info,
    management::SessionStore,
    spotify::catalog::{CatalogConnector, SpotifyConnector},
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub sessions: SessionStore,
    pub chart: Arc<dyn ChartSource>,
    pub catalog: Arc<dyn CatalogConnector>,
}

impl AppState {
    /// State wired to the real Billboard site and Spotify Web API.
    pub fn new(settings: Settings) -> Self {
        let chart = BillboardChart::new(settings.chart_base_url.clone());
        let catalog = SpotifyConnector::new(settings.spotify_api_url.clone());
        Self {
            settings: Arc::new(settings),
            sessions: SessionStore::new(),
            chart: Arc::new(chart),
            catalog: Arc::new(catalog),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/create-playlist", post(api::create_playlist))
        .route("/callback", get(api::callback))
        .route("/health", get(api::health))
        .with_state(state)
}

pub async fn start_server(settings: Settings) -> Res<()> {
    let addr = SocketAddr::from_str(&settings.server_addr())?;
    let app = router(AppState::new(settings));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
