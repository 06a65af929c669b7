use poise::CreateReply;

use crate::utils::embed;
use crate::{Context, Error};

/// 한 번에 보여주는 대기 곡 수
const DISPLAY_LIMIT: usize = 10;

async fn queue_impl(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("서버에서만 사용할 수 있습니다")?;

    let players = &ctx.data().players;
    let current = players.query_now_playing(guild_id).await?;
    let (tracks, total) = players.query_queue(guild_id, DISPLAY_LIMIT).await;

    let embed = embed::queue_list(current.as_ref(), &tracks, total);
    ctx.send(CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// 재생 목록을 표시합니다
#[poise::command(slash_command, guild_only)]
pub async fn queue(ctx: Context<'_>) -> Result<(), Error> {
    queue_impl(ctx).await
}

/// 재생 목록을 표시합니다 (/queue 단축)
#[poise::command(slash_command, guild_only)]
pub async fn q(ctx: Context<'_>) -> Result<(), Error> {
    queue_impl(ctx).await
}
