mod common;

use chartlist::{
    builder::{PlaylistBuilder, playlist_description, playlist_name},
    error::BuildError,
    types::ChartDate,
};
use common::{CatalogCall, FakeCatalog, FakeChart, SearchOutcome};

fn date(s: &str) -> ChartDate {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_build_keeps_chart_order_and_skips_misses() {
    let chart = FakeChart::with_titles(&["Song A", "Song B"]);
    let catalog = FakeCatalog::new()
        .with_search("Song A", SearchOutcome::Hit("uri:track:1"))
        .with_search("Song B", SearchOutcome::Miss);

    let url = PlaylistBuilder::new(&chart, &catalog)
        .build(date("2000-08-12"))
        .await
        .unwrap();

    assert_eq!(url, "https://open.spotify.com/playlist/playlist1");
    assert_eq!(
        catalog.calls(),
        vec![
            CatalogCall::CurrentUser,
            CatalogCall::Search {
                title: "Song A".to_string(),
                year: 2000
            },
            CatalogCall::Search {
                title: "Song B".to_string(),
                year: 2000
            },
            CatalogCall::CreatePlaylist {
                user_id: "chart-fan".to_string(),
                name: "Billboard 100 - 2000-08-12".to_string(),
                description: "Billboard Hot 100 songs from 2000-08-12".to_string(),
            },
            CatalogCall::AddTracks {
                playlist_id: "playlist1".to_string(),
                uris: vec!["uri:track:1".to_string()],
            },
        ]
    );
}

#[tokio::test]
async fn test_build_with_empty_chart_never_authenticates() {
    let chart = FakeChart::with_titles(&[]);
    let catalog = FakeCatalog::new();

    let result = PlaylistBuilder::new(&chart, &catalog)
        .build(date("1958-08-04"))
        .await;

    assert!(matches!(result, Err(BuildError::NoSongsFound)));
    assert_eq!(result.unwrap_err().to_string(), "No songs found for this date");
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn test_build_without_matches_creates_nothing() {
    let chart = FakeChart::with_titles(&["Nobody Knows", "Unheard Of"]);
    let catalog = FakeCatalog::new();

    let result = PlaylistBuilder::new(&chart, &catalog)
        .build(date("1999-01-01"))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, BuildError::NoMatches));
    assert_eq!(err.to_string(), "No songs could be found on Spotify");
    assert_eq!(catalog.created_playlists(), 0);
}

#[tokio::test]
async fn test_build_stops_when_identity_lookup_fails() {
    let chart = FakeChart::with_titles(&["Song A"]);
    let catalog = FakeCatalog::new()
        .with_search("Song A", SearchOutcome::Hit("uri:track:1"))
        .with_failing_identity();

    let err = PlaylistBuilder::new(&chart, &catalog)
        .build(date("2010-05-05"))
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::Auth(_)));
    assert!(
        err.to_string()
            .starts_with("Spotify authentication failed: ")
    );
    assert_eq!(catalog.calls(), vec![CatalogCall::CurrentUser]);
    assert!(!catalog.searched());
    assert_eq!(catalog.created_playlists(), 0);
}

#[tokio::test]
async fn test_build_skips_failed_searches() {
    let chart = FakeChart::with_titles(&["Broken", "Works", "Also Works"]);
    let catalog = FakeCatalog::new()
        .with_search("Broken", SearchOutcome::Fail)
        .with_search("Works", SearchOutcome::Hit("uri:track:2"))
        .with_search("Also Works", SearchOutcome::Hit("uri:track:3"));

    PlaylistBuilder::new(&chart, &catalog)
        .build(date("2015-03-14"))
        .await
        .unwrap();

    let added = catalog
        .calls()
        .into_iter()
        .find_map(|c| match c {
            CatalogCall::AddTracks { uris, .. } => Some(uris),
            _ => None,
        })
        .unwrap();
    assert_eq!(added, vec!["uri:track:2", "uri:track:3"]);
}

#[tokio::test]
async fn test_build_twice_creates_two_playlists() {
    let chart = FakeChart::with_titles(&["Song A"]);
    let catalog = FakeCatalog::new().with_search("Song A", SearchOutcome::Hit("uri:track:1"));
    let builder = PlaylistBuilder::new(&chart, &catalog);

    let first = builder.build(date("2020-02-02")).await.unwrap();
    let second = builder.build(date("2020-02-02")).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(catalog.created_playlists(), 2);
    assert_eq!(chart.call_count(), 2);
}

#[test]
fn test_playlist_naming() {
    let d = date("1984-07-21");
    assert_eq!(playlist_name(d), "Billboard 100 - 1984-07-21");
    assert_eq!(playlist_description(d), "Billboard Hot 100 songs from 1984-07-21");
}

#[tokio::test]
async fn test_build_fetch_failure_never_authenticates() {
    let chart = FakeChart::unavailable();
    let catalog = FakeCatalog::new();

    let err = PlaylistBuilder::new(&chart, &catalog)
        .build(date("2019-06-22"))
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::Fetch(_)));
    assert!(err.to_string().starts_with("Error creating playlist: "));
    assert!(err.to_string().contains("503"));
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn test_build_create_failure_skips_adding() {
    let chart = FakeChart::with_titles(&["Song A"]);
    let catalog = FakeCatalog::new()
        .with_search("Song A", SearchOutcome::Hit("uri:track:1"))
        .with_failing_create();

    let err = PlaylistBuilder::new(&chart, &catalog)
        .build(date("2019-06-22"))
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::CatalogWrite(_)));
    assert!(err.to_string().starts_with("Error creating playlist: "));
    assert!(err.to_string().contains("API rate limit exceeded"));
    assert!(
        !catalog
            .calls()
            .iter()
            .any(|c| matches!(c, CatalogCall::AddTracks { .. }))
    );
}

#[tokio::test]
async fn test_build_add_failure_is_reported() {
    let chart = FakeChart::with_titles(&["Song A"]);
    let catalog = FakeCatalog::new()
        .with_search("Song A", SearchOutcome::Hit("uri:track:1"))
        .with_failing_add();

    let err = PlaylistBuilder::new(&chart, &catalog)
        .build(date("2019-06-22"))
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::CatalogWrite(_)));
    assert!(err.to_string().contains("Invalid track uri"));
    assert_eq!(catalog.created_playlists(), 1);
}
