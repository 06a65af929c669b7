use poise::CreateReply;

use crate::music::SkipOutcome;
use crate::{Context, Error};

async fn skip_impl(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("서버에서만 사용할 수 있습니다")?;

    ctx.defer_ephemeral().await?;

    let players = &ctx.data().players;
    let current = players.query_now_playing(guild_id).await?;

    match players.skip_request(guild_id, ctx.channel_id()).await? {
        SkipOutcome::Skipped => {
            let msg = match current {
                Some(track) => format!("⏭️ **{}** 스킵", track.title),
                None => "⏭️ 스킵".to_string(),
            };
            ctx.send(CreateReply::default().content(msg).ephemeral(true))
                .await?;
        }
        // 안내는 플레이어 알림이 이 채널로 보내므로 응답은 지운다
        SkipOutcome::NothingToSkip => {
            if let poise::Context::Application(app) = ctx {
                app.interaction.delete_response(ctx.http()).await?;
            }
        }
    }

    Ok(())
}

/// 현재 곡을 건너뜁니다
#[poise::command(slash_command, guild_only)]
pub async fn skip(ctx: Context<'_>) -> Result<(), Error> {
    skip_impl(ctx).await
}

/// 현재 곡을 건너뜁니다 (/skip 단축)
#[poise::command(slash_command, guild_only)]
pub async fn s(ctx: Context<'_>) -> Result<(), Error> {
    skip_impl(ctx).await
}
