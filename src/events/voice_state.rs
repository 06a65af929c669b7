use poise::serenity_prelude as serenity;
use tracing::info;

use crate::Data;

/// 봇이 음성 채널에서 밀려나면(강제 퇴장, 채널 삭제 등) 해당 길드 재생을 정리한다.
pub async fn handle(
    ctx: &serenity::Context,
    _old: &Option<serenity::VoiceState>,
    new: &serenity::VoiceState,
    data: &Data,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let guild_id = match new.guild_id {
        Some(id) => id,
        None => return Ok(()),
    };

    if new.user_id != ctx.cache.current_user().id || new.channel_id.is_some() {
        return Ok(());
    }

    if data.players.voice_disconnected(guild_id).await? {
        info!("봇이 음성 채널에서 나갔습니다 (guild: {guild_id})");
    }

    Ok(())
}
