use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use moodmix::application::ports::{MusicCatalog, MusicCatalogError};
use moodmix::application::services::{DEFAULT_TRACK_LIMIT, PlaylistService};
use moodmix::infrastructure::catalog::{
    CLIENT_ID_ENV, CLIENT_SECRET_ENV, DEFAULT_REQUEST_TIMEOUT, SpotifyCatalogClient,
    SpotifyCredentials,
};

#[derive(Default)]
struct FakeSpotify {
    token_requests: AtomicUsize,
    playlist_requests: AtomicUsize,
    reject_first_token: bool,
    playlist_status: Option<StatusCode>,
}

async fn issue_token(State(fake): State<Arc<FakeSpotify>>, headers: HeaderMap) -> Response {
    if !headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "))
    {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let issued = fake.token_requests.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({
        "access_token": format!("token-{}", issued),
        "token_type": "Bearer",
        "expires_in": 3600
    }))
    .into_response()
}

async fn playlist(
    State(fake): State<Arc<FakeSpotify>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    fake.playlist_requests.fetch_add(1, Ordering::SeqCst);

    if let Some(status) = fake.playlist_status {
        return (status, "upstream unavailable").into_response();
    }

    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if fake.reject_first_token && bearer == "Bearer token-1" {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    Json(playlist_body(&id)).into_response()
}

fn playlist_body(id: &str) -> Value {
    let mut items = vec![json!({ "track": null })];
    for i in 0..8 {
        items.push(json!({
            "track": {
                "name": format!("Track {}", i),
                "artists": [{ "name": "Artist A" }, { "name": "Artist B" }],
                "external_urls": { "spotify": format!("https://open.spotify.com/track/{}", i) },
                "preview_url": null
            }
        }));
    }

    json!({
        "name": "Happy Hits",
        "description": "Hits to boost your mood",
        "images": [{ "url": "https://i.scdn.co/image/cover", "width": 300, "height": 300 }],
        "external_urls": { "spotify": format!("https://open.spotify.com/playlist/{}", id) },
        "tracks": { "items": items }
    })
}

async fn spawn_fake(fake: Arc<FakeSpotify>) -> String {
    let router = Router::new()
        .route("/api/token", post(issue_token))
        .route("/v1/playlists/{id}", get(playlist))
        .with_state(fake);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client_for(base_url: &str) -> SpotifyCatalogClient {
    client_with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
}

fn client_with_timeout(base_url: &str, timeout: Duration) -> SpotifyCatalogClient {
    SpotifyCatalogClient::with_credentials(
        base_url,
        base_url,
        timeout,
        SpotifyCredentials::new("test-id", "test-secret"),
    )
    .unwrap()
}

#[tokio::test]
async fn given_valid_credentials_when_fetching_playlist_then_maps_catalog_fields() {
    let fake = Arc::new(FakeSpotify::default());
    let base_url = spawn_fake(fake.clone()).await;

    let playlist = client_for(&base_url)
        .fetch_playlist("37i9dQZF1DXdPec7aLTmlC")
        .await
        .unwrap();

    assert_eq!(playlist.name, "Happy Hits");
    assert_eq!(
        playlist.external_url,
        "https://open.spotify.com/playlist/37i9dQZF1DXdPec7aLTmlC"
    );
    assert_eq!(playlist.images.len(), 1);
    assert_eq!(playlist.images[0].width, Some(300));
    // The null item keeps its position
    assert_eq!(playlist.tracks.len(), 9);
    assert!(playlist.tracks[0].is_none());
    let first = playlist.tracks[1].as_ref().unwrap();
    assert_eq!(first.name, "Track 0");
    assert_eq!(first.artists, vec!["Artist A", "Artist B"]);
}

#[tokio::test]
async fn given_leading_null_item_when_resolving_playlist_then_trims_before_skipping() {
    let fake = Arc::new(FakeSpotify::default());
    let base_url = spawn_fake(fake.clone()).await;
    let service = PlaylistService::new(Arc::new(client_for(&base_url)), DEFAULT_TRACK_LIMIT);

    let playlist = service.playlist_for("happy").await.unwrap();

    let names: Vec<&str> = playlist.tracks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Track 0", "Track 1", "Track 2", "Track 3"]);
}

#[tokio::test]
async fn given_cached_token_when_fetching_twice_then_requests_token_once() {
    let fake = Arc::new(FakeSpotify::default());
    let base_url = spawn_fake(fake.clone()).await;
    let client = client_for(&base_url);

    client.fetch_playlist("first").await.unwrap();
    client.fetch_playlist("second").await.unwrap();

    assert_eq!(fake.token_requests.load(Ordering::SeqCst), 1);
    assert_eq!(fake.playlist_requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn given_rejected_token_when_fetching_then_refreshes_once_and_succeeds() {
    let fake = Arc::new(FakeSpotify {
        reject_first_token: true,
        ..FakeSpotify::default()
    });
    let base_url = spawn_fake(fake.clone()).await;

    let playlist = client_for(&base_url).fetch_playlist("any").await.unwrap();

    assert_eq!(playlist.name, "Happy Hits");
    assert_eq!(fake.token_requests.load(Ordering::SeqCst), 2);
    assert_eq!(fake.playlist_requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn given_upstream_error_when_fetching_then_returns_api_request_failed() {
    let fake = Arc::new(FakeSpotify {
        playlist_status: Some(StatusCode::SERVICE_UNAVAILABLE),
        ..FakeSpotify::default()
    });
    let base_url = spawn_fake(fake.clone()).await;

    let result = client_for(&base_url).fetch_playlist("any").await;

    match result {
        Err(MusicCatalogError::ApiRequestFailed(message)) => assert!(message.contains("503")),
        other => panic!("expected ApiRequestFailed, got {:?}", other.map(|p| p.name)),
    }
}

#[tokio::test]
async fn given_hanging_accounts_service_when_fetching_then_gives_up_after_timeout() {
    let router = Router::new().route(
        "/api/token",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            StatusCode::OK
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    let client = Arc::new(client_with_timeout(&base_url, Duration::from_millis(200)));

    let first = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.fetch_playlist("first").await }
    });
    let second = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.fetch_playlist("second").await }
    });

    let (first, second) = tokio::time::timeout(Duration::from_secs(5), async {
        (first.await.unwrap(), second.await.unwrap())
    })
    .await
    .expect("requests queued behind a hanging token request");

    assert!(matches!(first, Err(MusicCatalogError::AuthenticationFailed(_))));
    assert!(matches!(second, Err(MusicCatalogError::AuthenticationFailed(_))));
}

#[tokio::test]
async fn given_unreachable_accounts_service_when_fetching_then_returns_authentication_failed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = client_for(&format!("http://{}", addr))
        .fetch_playlist("any")
        .await;

    assert!(matches!(
        result,
        Err(MusicCatalogError::AuthenticationFailed(_))
    ));
}

#[tokio::test]
async fn given_no_credentials_in_environment_when_fetching_then_returns_missing_credentials() {
    if std::env::var(CLIENT_ID_ENV).is_ok_and(|v| !v.is_empty())
        && std::env::var(CLIENT_SECRET_ENV).is_ok_and(|v| !v.is_empty())
    {
        return;
    }

    let fake = Arc::new(FakeSpotify::default());
    let base_url = spawn_fake(fake.clone()).await;
    let client =
        SpotifyCatalogClient::from_env(&base_url, &base_url, DEFAULT_REQUEST_TIMEOUT).unwrap();

    let result = client.fetch_playlist("any").await;

    let err = result.err().unwrap();
    assert!(matches!(err, MusicCatalogError::MissingCredentials));
    assert!(err.to_string().contains("SPOTIFY_CLIENT_ID"));
    assert_eq!(fake.token_requests.load(Ordering::SeqCst), 0);
}
