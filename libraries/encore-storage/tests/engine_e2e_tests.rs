//! End-to-end: the session engine running on the SQLite store


use encore_core::types::*;
use encore_core::EncoreError;
use encore_playback::{DeleteSelector, PlayRequest, SessionBackends, SessionConfig, SessionEngine};
use encore_storage::{devices, play_history, queue_refs, tracks, SqliteStore};
use std::sync::Arc;
use test_helpers::{seed_catalog, TestDb};

fn alice() -> UserId {
    UserId::new("alice")
}

async fn engine(db: &TestDb) -> SessionEngine {
    let store = Arc::new(SqliteStore::new(db.pool().clone()));
    let engine = SessionEngine::new(
        SessionBackends {
            players: store.clone(),
            queues: store.clone(),
            queue_refs: store.clone(),
            catalog: store.clone(),
            devices: store.clone(),
            activity: store,
        },
        SessionConfig::default(),
    );
    engine.create_player(&alice(), false).await.unwrap();
    engine
}

fn play_album() -> PlayRequest {
    PlayRequest {
        context_uri: Some("album:al1".into()),
        ..PlayRequest::default()
    }
}

#[tokio::test]
async fn test_album_playback_continues_into_related_album() {
    let db = TestDb::new().await;
    seed_catalog(db.pool()).await;
    let engine = engine(&db).await;

    let player = engine.play(&alice(), &play_album()).await.unwrap();
    assert_eq!(player.item, Some(PlayableItem::Track(TrackId::new("t1"))));

    engine.next(&alice(), None).await.unwrap();
    engine.next(&alice(), None).await.unwrap();
    let player = engine.next(&alice(), None).await.unwrap();

    assert_eq!(player.context, Context::Album(AlbumId::new("al2")));
    assert_eq!(player.item, Some(PlayableItem::Track(TrackId::new("t4"))));
    assert!(player.is_playing);

    let refs = queue_refs::get(db.pool(), &alice()).await.unwrap();
    assert_eq!(refs.len(), 1, "the exhausted queue is replaced, not kept");
    let queue = engine.get_queue(&alice()).await.unwrap();
    assert_eq!(queue.queue_id.as_ref(), refs.first());
}

#[tokio::test]
async fn test_activity_lands_in_the_database() {
    let db = TestDb::new().await;
    seed_catalog(db.pool()).await;
    let engine = engine(&db).await;

    engine.play(&alice(), &play_album()).await.unwrap();
    engine.next(&alice(), None).await.unwrap();
    engine.flush_activity().await;

    let history = play_history::list_for_user(db.pool(), &alice(), 10)
        .await
        .unwrap();
    assert!(!history.is_empty());
    assert!(history
        .iter()
        .all(|entry| entry.context == Context::Album(AlbumId::new("al1"))));

    let t1 = tracks::get_by_id(db.pool(), &TrackId::new("t1"))
        .await
        .unwrap()
        .unwrap();
    let t2 = tracks::get_by_id(db.pool(), &TrackId::new("t2"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!((t1.plays, t2.plays), (1, 1));
}

#[tokio::test]
async fn test_queue_edits_persist() {
    let db = TestDb::new().await;
    seed_catalog(db.pool()).await;
    let engine = engine(&db).await;
    engine.play(&alice(), &play_album()).await.unwrap();

    engine.edit_queue_position(&alice(), 2, 0).await.unwrap();
    let view = engine
        .delete_from_queue(
            &alice(),
            &DeleteSelector {
                track_index: None,
                track_id: Some(TrackId::new("t2")),
            },
        )
        .await
        .unwrap();

    assert_eq!(view.tracks, vec![TrackId::new("t3"), TrackId::new("t1")]);
    assert_eq!(view.current_index, Some(1));
    let reloaded = engine.get_queue(&alice()).await.unwrap();
    assert_eq!(reloaded.tracks, view.tracks);
}

#[tokio::test]
async fn test_transfer_requires_an_owned_device() {
    let db = TestDb::new().await;
    seed_catalog(db.pool()).await;
    let engine = engine(&db).await;
    devices::register(
        db.pool(),
        &DeviceId::new("phone"),
        &alice(),
        "Phone",
        DeviceType::Mobile,
    )
    .await
    .unwrap();
    devices::register(
        db.pool(),
        &DeviceId::new("bobs-tv"),
        &UserId::new("bob"),
        "TV",
        DeviceType::Speaker,
    )
    .await
    .unwrap();

    let player = engine
        .transfer(&alice(), &DeviceId::new("phone"), None)
        .await
        .unwrap();
    let foreign = engine
        .transfer(&alice(), &DeviceId::new("bobs-tv"), None)
        .await;

    assert_eq!(player.device_id, Some(DeviceId::new("phone")));
    assert!(matches!(foreign, Err(EncoreError::NotFound { .. })));
}
