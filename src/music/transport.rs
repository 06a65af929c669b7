use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serenity::model::id::{ChannelId, GuildId};
use songbird::events::{Event, EventContext, EventHandler, TrackEvent};
use songbird::input::YoutubeDl;
use songbird::tracks::{PlayMode, TrackHandle};
use songbird::Songbird;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::engine::StreamEnd;
use super::error::{MusicError, Result};

/// 음성 채널 연결과 오디오 스트리밍
///
/// `start_stream`이 성공하면 스트림 하나당 `StreamEnd`가 정확히 한 번 완료되어야 한다.
/// 자연스럽게 끝났든, `stop_stream`으로 멈췄든, 재생 중 오류가 났든 마찬가지다.
#[async_trait]
pub trait AudioTransport: Send + Sync {
    async fn connect(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<()>;
    async fn move_to(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<()>;
    async fn is_connected(&self, guild_id: GuildId) -> bool;
    async fn is_streaming(&self, guild_id: GuildId) -> bool;
    async fn start_stream(
        &self,
        guild_id: GuildId,
        locator: &str,
        volume: f32,
        on_end: StreamEnd,
    ) -> Result<()>;
    async fn stop_stream(&self, guild_id: GuildId);
    async fn set_volume(&self, guild_id: GuildId, volume: f32);
    async fn disconnect(&self, guild_id: GuildId);
}

struct TrackEndNotifier {
    guild_id: GuildId,
    end: Arc<Mutex<Option<StreamEnd>>>,
}

#[async_trait]
impl EventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        let error = match ctx {
            EventContext::Track(tracks) => tracks.iter().find_map(|(state, _)| match &state.playing {
                PlayMode::Errored(e) => Some(e.to_string()),
                _ => None,
            }),
            _ => None,
        };

        // End와 Error 둘 다 걸려 있으므로 먼저 온 쪽만 전달
        if let Some(end) = self.end.lock().await.take() {
            debug!("스트림 종료 (guild: {}, stream: {})", self.guild_id, end.stream());
            end.finish(error);
        }

        None
    }
}

pub struct SongbirdTransport {
    manager: Arc<Songbird>,
    http_client: reqwest::Client,
    tracks: Mutex<HashMap<GuildId, TrackHandle>>,
}

impl SongbirdTransport {
    pub fn new(manager: Arc<Songbird>, http_client: reqwest::Client) -> Self {
        Self {
            manager,
            http_client,
            tracks: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl AudioTransport for SongbirdTransport {
    async fn connect(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<()> {
        let call = self
            .manager
            .join(guild_id, channel_id)
            .await
            .map_err(|e| MusicError::Transport(e.to_string()))?;

        let mut handler = call.lock().await;
        if !handler.is_deaf() {
            if let Err(e) = handler.deafen(true).await {
                warn!("스피커 음소거 실패: {e}");
            }
        }

        info!("음성 채널 접속 (guild: {guild_id}, channel: {channel_id})");
        Ok(())
    }

    async fn move_to(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<()> {
        // 이미 연결된 상태에서 join하면 채널만 옮겨진다
        self.manager
            .join(guild_id, channel_id)
            .await
            .map_err(|e| MusicError::Transport(e.to_string()))?;
        info!("음성 채널 이동 (guild: {guild_id}, channel: {channel_id})");
        Ok(())
    }

    async fn is_connected(&self, guild_id: GuildId) -> bool {
        match self.manager.get(guild_id) {
            Some(call) => call.lock().await.current_connection().is_some(),
            None => false,
        }
    }

    async fn is_streaming(&self, guild_id: GuildId) -> bool {
        let handle = self.tracks.lock().await.get(&guild_id).cloned();
        match handle {
            Some(h) => h
                .get_info()
                .await
                .map(|info| matches!(info.playing, PlayMode::Play))
                .unwrap_or(false),
            None => false,
        }
    }

    async fn start_stream(
        &self,
        guild_id: GuildId,
        locator: &str,
        volume: f32,
        on_end: StreamEnd,
    ) -> Result<()> {
        let call = self.manager.get(guild_id).ok_or(MusicError::NotConnected)?;
        let src = YoutubeDl::new(self.http_client.clone(), locator.to_string());

        let track_handle = {
            let mut handler = call.lock().await;
            handler.play_only(src.into())
        }; // handler lock dropped here

        let _ = track_handle.set_volume(volume);

        let end = Arc::new(Mutex::new(Some(on_end)));
        for event in [TrackEvent::End, TrackEvent::Error] {
            let notifier = TrackEndNotifier {
                guild_id,
                end: Arc::clone(&end),
            };
            if let Err(e) = track_handle.add_event(Event::Track(event), notifier) {
                let _ = track_handle.stop();
                return Err(MusicError::Transport(e.to_string()));
            }
        }

        self.tracks.lock().await.insert(guild_id, track_handle);
        Ok(())
    }

    async fn stop_stream(&self, guild_id: GuildId) {
        if let Some(handle) = self.tracks.lock().await.remove(&guild_id) {
            if let Err(e) = handle.stop() {
                debug!("이미 끝난 트랙 정지 시도: {e}");
            }
        }
    }

    async fn set_volume(&self, guild_id: GuildId, volume: f32) {
        if let Some(handle) = self.tracks.lock().await.get(&guild_id) {
            let _ = handle.set_volume(volume);
        }
    }

    async fn disconnect(&self, guild_id: GuildId) {
        self.tracks.lock().await.remove(&guild_id);
        if self.manager.get(guild_id).is_none() {
            return;
        }
        match self.manager.remove(guild_id).await {
            Ok(()) => info!("음성 채널 퇴장 (guild: {guild_id})"),
            Err(e) => warn!("음성 채널 퇴장 실패 (guild: {guild_id}): {e}"),
        }
    }
}
