pub mod cache;
pub mod engine;
pub mod error;
pub mod notify;
pub mod queue;
pub mod source;
pub mod state;
pub mod transport;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serenity::model::id::{ChannelId, GuildId};
use tokio::sync::RwLock;
use tracing::info;

pub use engine::{EnqueueOutcome, GuildPlayer, SkipOutcome, StreamEnd};
pub use error::MusicError;
pub use notify::{Notice, NotificationSink};
pub use source::TrackResolver;
pub use state::{PlaybackStatus, PlayerView};
pub use transport::AudioTransport;

pub const TITLE_LIMIT: usize = 100;
pub const UPLOADER_LIMIT: usize = 50;
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub title: String,
    /// 오디오 쪽에 넘기는 스트리밍 위치
    pub source: String,
    pub url: String,
    pub duration: Option<String>,
    pub uploader: String,
    pub thumbnail: Option<String>,
    pub requester: String,
}

fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

impl Track {
    pub fn new(title: impl AsRef<str>, source: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: truncate_chars(title.as_ref(), TITLE_LIMIT),
            source: source.into(),
            url: url.into(),
            duration: None,
            uploader: "알 수 없음".to_string(),
            thumbnail: None,
            requester: String::new(),
        }
    }

    pub fn with_uploader(mut self, uploader: &str) -> Self {
        self.uploader = truncate_chars(uploader, UPLOADER_LIMIT);
        self
    }

    pub fn requested_by(mut self, requester: &str) -> Self {
        self.requester = requester.to_string();
        self
    }
}

/// 초 단위 길이를 `M:SS` 또는 `H:MM:SS`로
pub fn format_duration(seconds: f64) -> Option<String> {
    if !seconds.is_finite() || seconds < 1.0 {
        return None;
    }
    let secs = seconds as u64;
    if secs > 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        Some(format!("{hours}:{mins:02}:{:02}", secs % 60))
    } else {
        Some(format!("{}:{:02}", secs / 60, secs % 60))
    }
}

/// 길드 → 플레이어 레지스트리. 플레이어는 처음 쓰일 때 만들어지고 프로세스가
/// 끝날 때까지 유지된다.
pub struct PlayerManager {
    players: RwLock<HashMap<GuildId, GuildPlayer>>,
    transport: Arc<dyn AudioTransport>,
    resolver: Arc<dyn TrackResolver>,
    sink: Arc<dyn NotificationSink>,
    idle_timeout: Duration,
}

impl PlayerManager {
    pub fn new(
        transport: Arc<dyn AudioTransport>,
        resolver: Arc<dyn TrackResolver>,
        sink: Arc<dyn NotificationSink>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            players: RwLock::new(HashMap::new()),
            transport,
            resolver,
            sink,
            idle_timeout,
        }
    }

    pub async fn player(&self, guild_id: GuildId) -> GuildPlayer {
        if let Some(player) = self.players.read().await.get(&guild_id) {
            return player.clone();
        }

        let mut players = self.players.write().await;
        players
            .entry(guild_id)
            .or_insert_with(|| {
                info!("플레이어 생성 (guild: {guild_id})");
                GuildPlayer::spawn(
                    guild_id,
                    Arc::clone(&self.transport),
                    Arc::clone(&self.sink),
                    self.idle_timeout,
                )
            })
            .clone()
    }

    pub async fn get(&self, guild_id: GuildId) -> Option<GuildPlayer> {
        self.players.read().await.get(&guild_id).cloned()
    }

    /// 곡을 찾아 큐에 넣는다. 검색은 플레이어 밖에서 하므로 느린 검색이
    /// 같은 길드의 다른 요청을 막지 않는다.
    pub async fn enqueue_request(
        &self,
        guild_id: GuildId,
        query: &str,
        requester: &str,
        voice_channel: ChannelId,
        notify_channel: ChannelId,
    ) -> Result<(Track, EnqueueOutcome), MusicError> {
        let track = self.resolver.resolve(query, requester).await?;
        let player = self.player(guild_id).await;
        let outcome = player
            .enqueue(track.clone(), voice_channel, notify_channel)
            .await?;
        Ok((track, outcome))
    }

    pub async fn skip_request(
        &self,
        guild_id: GuildId,
        notify_channel: ChannelId,
    ) -> Result<SkipOutcome, MusicError> {
        self.player(guild_id).await.skip(Some(notify_channel)).await
    }

    pub async fn stop_request(&self, guild_id: GuildId) -> Result<(), MusicError> {
        self.player(guild_id).await.stop().await
    }

    /// 게이트웨이가 봇의 음성 퇴장을 알렸을 때. 그 사이 다시 접속했다면 그대로 둔다.
    pub async fn voice_disconnected(&self, guild_id: GuildId) -> Result<bool, MusicError> {
        match self.get(guild_id).await {
            Some(player) => player.voice_lost().await,
            None => Ok(false),
        }
    }

    pub async fn toggle_loop_request(&self, guild_id: GuildId) -> Result<bool, MusicError> {
        self.player(guild_id).await.toggle_loop().await
    }

    /// 퍼센트(0~200)로 볼륨 설정. 적용된 배율을 돌려준다.
    pub async fn set_volume_request(
        &self,
        guild_id: GuildId,
        percent: u32,
    ) -> Result<f32, MusicError> {
        let volume = percent as f32 / 100.0;
        self.player(guild_id).await.set_volume(volume).await
    }

    /// 0부터 시작하는 위치의 대기 곡을 제거
    pub async fn remove_request(&self, guild_id: GuildId, index: usize) -> Option<Track> {
        let player = self.get(guild_id).await?;
        player.queue().remove_at(index).await
    }

    /// 앞에서부터 최대 `limit`곡과 전체 대기 곡 수
    pub async fn query_queue(&self, guild_id: GuildId, limit: usize) -> (Vec<Track>, usize) {
        match self.get(guild_id).await {
            Some(player) => player.queue().snapshot(limit).await,
            None => (Vec::new(), 0),
        }
    }

    pub async fn query_now_playing(&self, guild_id: GuildId) -> Result<Option<Track>, MusicError> {
        match self.get(guild_id).await {
            Some(player) => player.now_playing().await,
            None => Ok(None),
        }
    }

    pub async fn status(&self, guild_id: GuildId) -> Result<PlayerView, MusicError> {
        match self.get(guild_id).await {
            Some(player) => player.snapshot().await,
            None => Ok(PlayerView {
                volume: state::DEFAULT_VOLUME,
                ..PlayerView::default()
            }),
        }
    }
}
