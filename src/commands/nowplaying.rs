use poise::CreateReply;

use crate::utils::embed;
use crate::{Context, Error};

async fn nowplaying_impl(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("서버에서만 사용할 수 있습니다")?;

    let players = &ctx.data().players;
    let view = players.status(guild_id).await?;

    match view.current {
        Some(ref track) => {
            let (_, remaining) = players.query_queue(guild_id, 0).await;
            ctx.send(CreateReply::default().embed(embed::now_playing_status(track, &view, remaining)))
                .await?;
        }
        None => {
            ctx.send(CreateReply::default().embed(embed::error("재생 중인 곡이 없습니다.")))
                .await?;
        }
    }

    Ok(())
}

/// 현재 재생 중인 곡 정보를 표시합니다
#[poise::command(slash_command, guild_only)]
pub async fn nowplaying(ctx: Context<'_>) -> Result<(), Error> {
    nowplaying_impl(ctx).await
}

/// 현재 재생 중인 곡 정보를 표시합니다 (/nowplaying 단축)
#[poise::command(slash_command, guild_only)]
pub async fn np(ctx: Context<'_>) -> Result<(), Error> {
    nowplaying_impl(ctx).await
}
