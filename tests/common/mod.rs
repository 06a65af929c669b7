#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use discord_music_bot::music::error::{MusicError, Result};
use discord_music_bot::music::{
    AudioTransport, Notice, NotificationSink, PlayerManager, StreamEnd, Track, TrackResolver,
};
use serenity::model::id::{ChannelId, GuildId};

pub fn voice() -> ChannelId {
    ChannelId::new(10)
}

pub fn text() -> ChannelId {
    ChannelId::new(20)
}

pub fn track(n: u32) -> Track {
    let url = format!("https://youtube.com/watch?v=test{n}");
    let mut t = Track::new(format!("Song {n}"), url.clone(), url).requested_by("user");
    t.duration = Some(format!("{n}:00"));
    t
}

#[derive(Default)]
struct TransportInner {
    connected: HashMap<GuildId, ChannelId>,
    active: HashMap<GuildId, StreamEnd>,
    started: Vec<String>,
    failing: HashSet<String>,
    refuse_connect: bool,
    connects: usize,
    moves: usize,
    disconnects: usize,
    volume: HashMap<GuildId, f32>,
}

/// 메모리 안에서 동작하는 음성 연결. 스트림은 `finish`를 부를 때까지 끝나지 않는다.
#[derive(Default)]
pub struct FakeTransport {
    inner: Mutex<TransportInner>,
}

impl FakeTransport {
    fn with<T>(&self, f: impl FnOnce(&mut TransportInner) -> T) -> T {
        f(&mut self.inner.lock().unwrap())
    }

    /// 현재 스트림이 자연스럽게 끝난 것처럼 종료 신호를 보낸다
    pub fn finish(&self, guild_id: GuildId) -> bool {
        self.end_with(guild_id, None)
    }

    pub fn fail_current(&self, guild_id: GuildId, error: &str) -> bool {
        self.end_with(guild_id, Some(error.to_string()))
    }

    fn end_with(&self, guild_id: GuildId, error: Option<String>) -> bool {
        let end = self.with(|i| i.active.remove(&guild_id));
        match end {
            Some(end) => {
                end.finish(error);
                true
            }
            None => false,
        }
    }

    pub fn fail_source(&self, locator: &str) {
        self.with(|i| i.failing.insert(locator.to_string()));
    }

    pub fn refuse_connect(&self, refuse: bool) {
        self.with(|i| i.refuse_connect = refuse);
    }

    /// 봇이 외부 요인으로 음성 채널에서 끊긴 상황
    pub fn drop_connection(&self, guild_id: GuildId) {
        self.with(|i| i.connected.remove(&guild_id));
    }

    pub fn started(&self) -> Vec<String> {
        self.with(|i| i.started.clone())
    }

    pub fn connects(&self) -> usize {
        self.with(|i| i.connects)
    }

    pub fn moves(&self) -> usize {
        self.with(|i| i.moves)
    }

    pub fn disconnects(&self) -> usize {
        self.with(|i| i.disconnects)
    }

    pub fn channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        self.with(|i| i.connected.get(&guild_id).copied())
    }

    pub fn volume(&self, guild_id: GuildId) -> Option<f32> {
        self.with(|i| i.volume.get(&guild_id).copied())
    }
}

#[async_trait]
impl AudioTransport for FakeTransport {
    async fn connect(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<()> {
        self.with(|i| {
            if i.refuse_connect {
                return Err(MusicError::Transport("connect refused".to_string()));
            }
            i.connects += 1;
            i.connected.insert(guild_id, channel_id);
            Ok(())
        })
    }

    async fn move_to(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<()> {
        self.with(|i| {
            i.moves += 1;
            i.connected.insert(guild_id, channel_id);
        });
        Ok(())
    }

    async fn is_connected(&self, guild_id: GuildId) -> bool {
        self.with(|i| i.connected.contains_key(&guild_id))
    }

    async fn is_streaming(&self, guild_id: GuildId) -> bool {
        self.with(|i| i.active.contains_key(&guild_id))
    }

    async fn start_stream(
        &self,
        guild_id: GuildId,
        locator: &str,
        volume: f32,
        on_end: StreamEnd,
    ) -> Result<()> {
        self.with(|i| {
            if !i.connected.contains_key(&guild_id) {
                return Err(MusicError::NotConnected);
            }
            if i.failing.contains(locator) {
                return Err(MusicError::Transport(format!("cannot open {locator}")));
            }
            i.started.push(locator.to_string());
            i.volume.insert(guild_id, volume);
            i.active.insert(guild_id, on_end);
            Ok(())
        })
    }

    async fn stop_stream(&self, guild_id: GuildId) {
        self.finish(guild_id);
    }

    async fn set_volume(&self, guild_id: GuildId, volume: f32) {
        self.with(|i| i.volume.insert(guild_id, volume));
    }

    async fn disconnect(&self, guild_id: GuildId) {
        self.with(|i| {
            i.disconnects += 1;
            i.connected.remove(&guild_id);
        });
        self.finish(guild_id);
    }
}

/// 미리 등록한 검색어만 찾아주는 검색기
#[derive(Default)]
pub struct FakeResolver {
    tracks: Mutex<HashMap<String, Track>>,
    delay: Option<Duration>,
}

impl FakeResolver {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            tracks: Mutex::new(HashMap::new()),
            delay: Some(delay),
        }
    }

    pub fn add(&self, query: &str, track: Track) {
        self.tracks.lock().unwrap().insert(query.to_string(), track);
    }
}

#[async_trait]
impl TrackResolver for FakeResolver {
    async fn resolve(&self, query: &str, requester: &str) -> Result<Track> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let found = self.tracks.lock().unwrap().get(query).cloned();
        found
            .map(|t| t.requested_by(requester))
            .ok_or_else(|| MusicError::Resolution(format!("not found: {query}")))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    notices: Mutex<Vec<(ChannelId, Notice)>>,
}

impl RecordingSink {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|(_, n)| n.clone())
            .collect()
    }

    pub fn channels(&self) -> Vec<ChannelId> {
        self.notices.lock().unwrap().iter().map(|(c, _)| *c).collect()
    }

    /// "now playing" 알림의 (곡 제목, 남은 곡 수)
    pub fn now_playing(&self) -> Vec<(String, usize)> {
        self.notices()
            .into_iter()
            .filter_map(|n| match n {
                Notice::NowPlaying { track, remaining } => Some((track.title, remaining)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, notice: &Notice) -> usize {
        self.notices().iter().filter(|n| *n == notice).count()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, _guild_id: GuildId, channel_id: ChannelId, notice: Notice) {
        self.notices.lock().unwrap().push((channel_id, notice));
    }
}

pub struct Harness {
    pub manager: PlayerManager,
    pub transport: Arc<FakeTransport>,
    pub resolver: Arc<FakeResolver>,
    pub sink: Arc<RecordingSink>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_resolver(FakeResolver::default())
    }

    pub fn with_resolver(resolver: FakeResolver) -> Self {
        let transport = Arc::new(FakeTransport::default());
        let resolver = Arc::new(resolver);
        let sink = Arc::new(RecordingSink::default());
        for n in 1..=5 {
            resolver.add(&format!("song {n}"), track(n));
        }

        let manager = PlayerManager::new(
            transport.clone(),
            resolver.clone(),
            sink.clone(),
            Duration::from_secs(300),
        );

        Self {
            manager,
            transport,
            resolver,
            sink,
        }
    }

    pub async fn play(
        &self,
        guild_id: GuildId,
        query: &str,
    ) -> Result<discord_music_bot::music::EnqueueOutcome> {
        self.manager
            .enqueue_request(guild_id, query, "user", voice(), text())
            .await
            .map(|(_, outcome)| outcome)
    }

    pub async fn current_title(&self, guild_id: GuildId) -> Option<String> {
        self.manager
            .query_now_playing(guild_id)
            .await
            .unwrap()
            .map(|t| t.title)
    }

    pub async fn queued_titles(&self, guild_id: GuildId) -> Vec<String> {
        let (tracks, _) = self.manager.query_queue(guild_id, 100).await;
        tracks.into_iter().map(|t| t.title).collect()
    }
}
