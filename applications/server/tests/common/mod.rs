//! Common test utilities and fixtures

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use encore_core::types::*;
use encore_playback::{SessionBackends, SessionConfig, SessionEngine};
use encore_server::{api, services::AuthService, state::AppState};
use encore_storage::{ads, albums, artists, devices, playlists, tracks, SqliteStore};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub mod fixtures {
    pub const TEST_SECRET: &str = "test-secret-key";
    pub const FREE_USER: &str = "free-user";
    pub const PREMIUM_USER: &str = "premium-user";
    pub const OTHER_USER: &str = "other-user";
}

/// Router plus handles to everything behind it
pub struct TestApp {
    pub router: Router,
    pub auth: Arc<AuthService>,
    pub engine: Arc<SessionEngine>,
    pub store: Arc<SqliteStore>,
    _temp_dir: TempDir,
}

impl TestApp {
    /// SQLite-backed app with a seeded catalog and two players
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_url = format!("sqlite://{}", temp_dir.path().join("api.db").display());
        let pool = encore_storage::create_pool(&db_url).await.unwrap();
        encore_storage::run_migrations(&pool).await.unwrap();
        let store = Arc::new(SqliteStore::new(pool));
        seed(&store).await;

        let engine = Arc::new(SessionEngine::new(
            SessionBackends {
                players: store.clone(),
                queues: store.clone(),
                queue_refs: store.clone(),
                catalog: store.clone(),
                devices: store.clone(),
                activity: store.clone(),
            },
            SessionConfig::default(),
        ));
        engine
            .create_player(&UserId::new(fixtures::FREE_USER), true)
            .await
            .unwrap();
        engine
            .create_player(&UserId::new(fixtures::PREMIUM_USER), false)
            .await
            .unwrap();

        let auth = Arc::new(AuthService::new(fixtures::TEST_SECRET.to_string(), 1));
        let router = api::create_router(AppState::new(Arc::clone(&engine), Arc::clone(&auth)));

        Self {
            router,
            auth,
            engine,
            store,
            _temp_dir: temp_dir,
        }
    }

    pub fn token(&self, user: &str) -> String {
        self.auth.create_access_token(&UserId::new(user)).unwrap()
    }

    /// Send an authenticated request as `user`; returns status and JSON body
    pub async fn call(
        &self,
        user: &str,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token(user)));
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        // Extractor rejections answer in plain text
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

/// Album `al1` = [t1, t2, t3] by `ar1`; public playlist `p1` = [t2, t4]; one ad;
/// device `phone` owned by the premium user
async fn seed(store: &SqliteStore) {
    let pool = store.pool();
    let artist = ArtistId::new("ar1");
    artists::create(pool, &artist, "Artist").await.unwrap();
    albums::create(
        pool,
        &albums::CreateAlbum {
            id: AlbumId::new("al1"),
            title: "Album".into(),
            artist_id: Some(artist.clone()),
            is_released: true,
        },
    )
    .await
    .unwrap();

    for (position, id) in ["t1", "t2", "t3", "t4"].into_iter().enumerate() {
        let on_album = position < 3;
        tracks::create(
            pool,
            tracks::CreateTrack {
                id: TrackId::new(id),
                title: format!("Track {id}"),
                artist_id: Some(artist.clone()),
                album_id: on_album.then(|| AlbumId::new("al1")),
                album_position: position as u32,
                duration_ms: 200_000,
            },
        )
        .await
        .unwrap();
    }

    let playlist = PlaylistId::new("p1");
    playlists::create(
        pool,
        &playlists::CreatePlaylist {
            id: playlist.clone(),
            name: "Mix".into(),
            owner_id: UserId::new("curator"),
            is_public: true,
        },
    )
    .await
    .unwrap();
    for id in ["t2", "t4"] {
        playlists::add_track(pool, &playlist, &TrackId::new(id))
            .await
            .unwrap();
    }

    ads::create(
        pool,
        &Ad {
            id: AdId::new("ad1"),
            title: "Sponsor".into(),
            duration_ms: 15_000,
        },
    )
    .await
    .unwrap();

    devices::register(
        pool,
        &DeviceId::new("phone"),
        &UserId::new(fixtures::PREMIUM_USER),
        "Phone",
        DeviceType::Mobile,
    )
    .await
    .unwrap();
}
