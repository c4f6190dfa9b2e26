//! The chart to playlist pipeline.
//!
//! One linear pass per request: fetch the chart titles, confirm who the
//! catalog user is, look every title up once, then create a private playlist
//! and fill it. Nothing is cached or reused, so building the same date twice
//! creates two playlists.

use crate::{
    chart::ChartSource,
    error::BuildError,
    info,
    spotify::catalog::Catalog,
    success,
    types::{ChartDate, PlaylistUrl},
    warning,
};

pub fn playlist_name(date: ChartDate) -> String {
    format!("Billboard 100 - {}", date)
}

pub fn playlist_description(date: ChartDate) -> String {
    format!("Billboard Hot 100 songs from {}", date)
}

pub struct PlaylistBuilder<'a> {
    chart: &'a dyn ChartSource,
    catalog: &'a dyn Catalog,
}

impl<'a> PlaylistBuilder<'a> {
    pub fn new(chart: &'a dyn ChartSource, catalog: &'a dyn Catalog) -> Self {
        Self { chart, catalog }
    }

    /// Builds a playlist for the chart of `date` and returns its public URL.
    ///
    /// # Errors
    ///
    /// - [`BuildError::Fetch`] when the chart page cannot be retrieved
    /// - [`BuildError::NoSongsFound`] when the page yields no titles; the
    ///   catalog is not contacted
    /// - [`BuildError::Auth`] when the user lookup fails; nothing is searched
    /// - [`BuildError::NoMatches`] when no title resolves to a track; no
    ///   playlist is created
    /// - [`BuildError::CatalogWrite`] when creating or filling the playlist fails
    ///
    /// Search failures for single titles are logged and skipped.
    pub async fn build(&self, date: ChartDate) -> Result<PlaylistUrl, BuildError> {
        let titles = self.chart.fetch_titles(date).await?;
        if titles.is_empty() {
            return Err(BuildError::NoSongsFound);
        }
        info!("Found {} chart entries for {}", titles.len(), date);

        let user_id = self.catalog.current_user_id().await?;

        let uris = self.resolve_tracks(&titles, date.year()).await;
        if uris.is_empty() {
            return Err(BuildError::NoMatches);
        }
        info!("Matched {} of {} titles", uris.len(), titles.len());

        let playlist = self
            .catalog
            .create_playlist(&user_id, &playlist_name(date), &playlist_description(date))
            .await?;
        self.catalog.add_tracks(&playlist.id, &uris).await?;

        success!("Created playlist {} for {}", playlist.url, date);
        Ok(playlist.url)
    }

    async fn resolve_tracks(&self, titles: &[String], year: i32) -> Vec<String> {
        let mut uris = Vec::with_capacity(titles.len());
        for title in titles {
            match self.catalog.search_track(title, year).await {
                Ok(Some(uri)) => uris.push(uri),
                Ok(None) => {}
                Err(e) => warning!("Error searching for song {}: {}", title, e),
            }
        }
        uris
    }
}
