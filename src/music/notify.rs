use std::sync::Arc;

use async_trait::async_trait;
use serenity::builder::CreateMessage;
use serenity::http::Http;
use serenity::model::id::{ChannelId, GuildId};
use tracing::warn;

use super::Track;
use crate::utils::embed;

/// 플레이어가 텍스트 채널로 내보내는 알림
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    NowPlaying { track: Track, remaining: usize },
    AutoDisconnected,
    NothingToSkip,
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, guild_id: GuildId, channel_id: ChannelId, notice: Notice);
}

/// 알림을 디스코드 채널에 임베드로 보낸다
pub struct ChannelNotifier {
    http: Arc<Http>,
}

impl ChannelNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl NotificationSink for ChannelNotifier {
    async fn notify(&self, guild_id: GuildId, channel_id: ChannelId, notice: Notice) {
        let embed = match &notice {
            Notice::NowPlaying { track, remaining } => embed::now_playing(track, *remaining),
            Notice::AutoDisconnected => embed::auto_disconnected(),
            Notice::NothingToSkip => embed::error("건너뛸 곡이 없습니다."),
        };

        if let Err(e) = channel_id
            .send_message(&self.http, CreateMessage::new().embed(embed))
            .await
        {
            warn!("알림 전송 실패 (guild: {guild_id}): {e}");
        }
    }
}
