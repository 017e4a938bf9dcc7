//! In-memory stores and collaborators for session engine tests

#![allow(dead_code)]

use async_trait::async_trait;
use encore_core::{
    ActivitySink, Ad, AdId, AlbumId, ArtistId, Catalog, Context, Device, DeviceDirectory,
    DeviceId, DeviceType, EncoreError, Player, PlayerStore, PlaylistId, Queue, QueueId,
    QueueRefStore, QueueStore, Result, Track, TrackId, UserId,
};
use encore_playback::{SessionBackends, SessionConfig, SessionEngine};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TRACK_MS: u64 = 180_000;
pub const AD_MS: u64 = 15_000;

pub fn user() -> UserId {
    UserId::new("u1")
}

pub fn ids(tracks: &[TrackId]) -> Vec<&str> {
    tracks.iter().map(TrackId::as_str).collect()
}

// ===== Stores =====

/// Player, queue and reference stores with version checks
#[derive(Default)]
pub struct MemoryStore {
    players: Mutex<HashMap<UserId, Player>>,
    queues: Mutex<HashMap<QueueId, Queue>>,
    refs: Mutex<HashMap<UserId, Vec<QueueId>>>,
    pending_conflicts: AtomicUsize,
}

impl MemoryStore {
    /// Make the next `n` player saves fail with a conflict
    pub fn inject_conflicts(&self, n: usize) {
        self.pending_conflicts.store(n, Ordering::SeqCst);
    }

    pub fn queue_count(&self) -> usize {
        self.queues.lock().unwrap().len()
    }

    pub fn has_queue(&self, id: &QueueId) -> bool {
        self.queues.lock().unwrap().contains_key(id)
    }

    pub fn refs_of(&self, user_id: &UserId) -> Vec<QueueId> {
        self.refs
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn force_refs(&self, user_id: &UserId, refs: Vec<QueueId>) {
        self.refs.lock().unwrap().insert(user_id.clone(), refs);
    }
}

#[async_trait]
impl PlayerStore for MemoryStore {
    async fn get_player(&self, user_id: &UserId) -> Result<Option<Player>> {
        Ok(self.players.lock().unwrap().get(user_id).cloned())
    }

    async fn create_player(&self, player: &Player) -> Result<Player> {
        let mut players = self.players.lock().unwrap();
        Ok(players
            .entry(player.user_id.clone())
            .or_insert_with(|| player.clone())
            .clone())
    }

    async fn save_player(&self, player: &Player) -> Result<Player> {
        let injected = self
            .pending_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(EncoreError::conflict("player", player.user_id.as_str()));
        }

        let mut players = self.players.lock().unwrap();
        let stored = players
            .get_mut(&player.user_id)
            .ok_or_else(|| EncoreError::not_found("player", player.user_id.as_str()))?;
        if stored.version != player.version {
            return Err(EncoreError::conflict("player", player.user_id.as_str()));
        }
        let mut saved = player.clone();
        saved.version += 1;
        *stored = saved.clone();
        Ok(saved)
    }
}

#[async_trait]
impl QueueStore for MemoryStore {
    async fn create_queue(&self, queue: &Queue) -> Result<Queue> {
        self.queues
            .lock()
            .unwrap()
            .insert(queue.id.clone(), queue.clone());
        Ok(queue.clone())
    }

    async fn get_queue(&self, id: &QueueId) -> Result<Option<Queue>> {
        Ok(self.queues.lock().unwrap().get(id).cloned())
    }

    async fn save_queue(&self, queue: &Queue) -> Result<Queue> {
        let mut queues = self.queues.lock().unwrap();
        let stored = queues
            .get_mut(&queue.id)
            .ok_or_else(|| EncoreError::not_found("queue", queue.id.as_str()))?;
        if stored.version != queue.version {
            return Err(EncoreError::conflict("queue", queue.id.as_str()));
        }
        let mut saved = queue.clone();
        saved.version += 1;
        *stored = saved.clone();
        Ok(saved)
    }

    async fn delete_queue(&self, id: &QueueId) -> Result<bool> {
        Ok(self.queues.lock().unwrap().remove(id).is_some())
    }
}

#[async_trait]
impl QueueRefStore for MemoryStore {
    async fn get_queue_refs(&self, user_id: &UserId) -> Result<Vec<QueueId>> {
        Ok(self.refs_of(user_id))
    }

    async fn set_queue_refs(&self, user_id: &UserId, refs: &[QueueId]) -> Result<()> {
        self.force_refs(user_id, refs.to_vec());
        Ok(())
    }
}

// ===== Catalog =====

#[derive(Default)]
pub struct FakeCatalog {
    tracks: HashMap<TrackId, Track>,
    albums: HashMap<AlbumId, Vec<TrackId>>,
    playlists: HashMap<PlaylistId, Vec<TrackId>>,
    popular: HashMap<ArtistId, Vec<TrackId>>,
    related_albums: HashMap<AlbumId, Vec<AlbumId>>,
    related_artists: HashMap<ArtistId, Vec<ArtistId>>,
    related_playlists: HashMap<PlaylistId, Vec<PlaylistId>>,
    ads: Vec<Ad>,
    ad_lookup_fails: bool,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(mut self, id: &str, artist: Option<&str>, plays: u64) -> Self {
        self.tracks.insert(
            TrackId::new(id),
            Track {
                id: TrackId::new(id),
                title: format!("Track {id}"),
                artist_id: artist.map(ArtistId::new),
                album_id: None,
                duration_ms: TRACK_MS,
                plays,
            },
        );
        self
    }

    fn tracks(mut self, ids: &[&str]) -> (Self, Vec<TrackId>) {
        for id in ids {
            if !self.tracks.contains_key(&TrackId::new(*id)) {
                self = self.track(id, None, 0);
            }
        }
        (self, ids.iter().map(|id| TrackId::new(*id)).collect())
    }

    pub fn playlist(self, id: &str, track_ids: &[&str]) -> Self {
        let (mut this, tracks) = self.tracks(track_ids);
        this.playlists.insert(PlaylistId::new(id), tracks);
        this
    }

    pub fn album(self, id: &str, track_ids: &[&str]) -> Self {
        let (mut this, tracks) = self.tracks(track_ids);
        this.albums.insert(AlbumId::new(id), tracks);
        this
    }

    pub fn artist(self, id: &str, popular: &[&str]) -> Self {
        let (mut this, tracks) = self.tracks(popular);
        this.popular.insert(ArtistId::new(id), tracks);
        this
    }

    pub fn related_playlists(mut self, id: &str, related: &[&str]) -> Self {
        self.related_playlists.insert(
            PlaylistId::new(id),
            related.iter().map(|r| PlaylistId::new(*r)).collect(),
        );
        self
    }

    pub fn related_albums(mut self, id: &str, related: &[&str]) -> Self {
        self.related_albums.insert(
            AlbumId::new(id),
            related.iter().map(|r| AlbumId::new(*r)).collect(),
        );
        self
    }

    pub fn related_artists(mut self, id: &str, related: &[&str]) -> Self {
        self.related_artists.insert(
            ArtistId::new(id),
            related.iter().map(|r| ArtistId::new(*r)).collect(),
        );
        self
    }

    /// `ad()` lookups fail; `random_ad()` still serves inventory
    pub fn failing_ad_lookups(mut self) -> Self {
        self.ad_lookup_fails = true;
        self
    }

    pub fn ad(mut self, id: &str) -> Self {
        self.ads.push(Ad {
            id: AdId::new(id),
            title: format!("Ad {id}"),
            duration_ms: AD_MS,
        });
        self
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn track(&self, id: &TrackId) -> Result<Option<Track>> {
        Ok(self.tracks.get(id).cloned())
    }

    async fn album_tracks(&self, id: &AlbumId) -> Result<Option<Vec<TrackId>>> {
        Ok(self.albums.get(id).cloned())
    }

    async fn playlist_tracks(&self, id: &PlaylistId) -> Result<Option<Vec<TrackId>>> {
        Ok(self.playlists.get(id).cloned())
    }

    async fn artist_popular_tracks(&self, id: &ArtistId) -> Result<Option<Vec<TrackId>>> {
        if let Some(popular) = self.popular.get(id) {
            return Ok(Some(popular.clone()));
        }
        let known = self
            .tracks
            .values()
            .any(|t| t.artist_id.as_ref() == Some(id));
        Ok(known.then(Vec::new))
    }

    async fn artist_top_tracks_by_plays(
        &self,
        id: &ArtistId,
        limit: usize,
    ) -> Result<Vec<TrackId>> {
        let mut tracks: Vec<&Track> = self
            .tracks
            .values()
            .filter(|t| t.artist_id.as_ref() == Some(id))
            .collect();
        tracks.sort_by(|a, b| b.plays.cmp(&a.plays).then(a.id.cmp(&b.id)));
        Ok(tracks.into_iter().take(limit).map(|t| t.id.clone()).collect())
    }

    async fn related_artists(&self, id: &ArtistId, limit: usize) -> Result<Vec<ArtistId>> {
        Ok(take(self.related_artists.get(id), limit))
    }

    async fn related_albums(&self, id: &AlbumId, limit: usize) -> Result<Vec<AlbumId>> {
        Ok(take(self.related_albums.get(id), limit))
    }

    async fn related_playlists(&self, id: &PlaylistId, limit: usize) -> Result<Vec<PlaylistId>> {
        Ok(take(self.related_playlists.get(id), limit))
    }

    async fn playlists_containing(
        &self,
        tracks: &[TrackId],
        limit: usize,
    ) -> Result<Vec<PlaylistId>> {
        let mut found: Vec<PlaylistId> = self
            .playlists
            .iter()
            .filter(|(_, list)| list.iter().any(|t| tracks.contains(t)))
            .map(|(id, _)| id.clone())
            .collect();
        found.sort();
        found.truncate(limit);
        Ok(found)
    }

    async fn random_ad(&self) -> Result<Option<Ad>> {
        Ok(self.ads.first().cloned())
    }

    async fn ad(&self, id: &AdId) -> Result<Option<Ad>> {
        if self.ad_lookup_fails {
            return Err(EncoreError::collaborator("ad service unavailable"));
        }
        Ok(self.ads.iter().find(|ad| &ad.id == id).cloned())
    }
}

fn take<T: Clone>(items: Option<&Vec<T>>, limit: usize) -> Vec<T> {
    items
        .map(|items| items.iter().take(limit).cloned().collect())
        .unwrap_or_default()
}

// ===== Devices and activity =====

#[derive(Default)]
pub struct FakeDevices {
    devices: Vec<Device>,
}

impl FakeDevices {
    pub fn with(mut self, id: &str, owner: &str) -> Self {
        self.devices.push(Device {
            id: DeviceId::new(id),
            user_id: UserId::new(owner),
            name: format!("Device {id}"),
            device_type: DeviceType::Speaker,
        });
        self
    }
}

#[async_trait]
impl DeviceDirectory for FakeDevices {
    async fn device(&self, user_id: &UserId, id: &DeviceId) -> Result<Option<Device>> {
        Ok(self
            .devices
            .iter()
            .find(|d| &d.id == id && &d.user_id == user_id)
            .cloned())
    }
}

/// Records activity; can be told to fail every call
#[derive(Default)]
pub struct RecordingSink {
    pub history: Mutex<Vec<(UserId, Context)>>,
    pub plays: Mutex<Vec<TrackId>>,
    fail: AtomicBool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail: AtomicBool::new(true),
            ..Self::default()
        }
    }

    pub fn history(&self) -> Vec<Context> {
        self.history
            .lock()
            .unwrap()
            .iter()
            .map(|(_, c)| c.clone())
            .collect()
    }

    pub fn plays(&self) -> Vec<TrackId> {
        self.plays.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActivitySink for RecordingSink {
    async fn record_play_history(&self, user_id: &UserId, context: &Context) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(EncoreError::collaborator("history unavailable"));
        }
        self.history
            .lock()
            .unwrap()
            .push((user_id.clone(), context.clone()));
        Ok(())
    }

    async fn increment_play_count(&self, track_id: &TrackId) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(EncoreError::collaborator("play counts unavailable"));
        }
        self.plays.lock().unwrap().push(track_id.clone());
        Ok(())
    }
}

// ===== Harness =====

pub struct Harness {
    pub engine: Arc<SessionEngine>,
    pub store: Arc<MemoryStore>,
    pub sink: Arc<RecordingSink>,
}

pub async fn harness(catalog: FakeCatalog, ad_supported: bool) -> Harness {
    harness_with(catalog, ad_supported, RecordingSink::default()).await
}

pub async fn harness_with(
    catalog: FakeCatalog,
    ad_supported: bool,
    sink: RecordingSink,
) -> Harness {
    let store = Arc::new(MemoryStore::default());
    let sink = Arc::new(sink);
    let devices = FakeDevices::default().with("d1", "u1").with("d2", "u2");

    let engine = SessionEngine::new(
        SessionBackends {
            players: store.clone(),
            queues: store.clone(),
            queue_refs: store.clone(),
            catalog: Arc::new(catalog),
            devices: Arc::new(devices),
            activity: sink.clone(),
        },
        SessionConfig::default(),
    );
    engine.create_player(&user(), ad_supported).await.unwrap();

    Harness {
        engine: Arc::new(engine),
        store,
        sink,
    }
}

pub fn three_track_playlist() -> FakeCatalog {
    FakeCatalog::new().playlist("p1", &["t1", "t2", "t3"])
}
