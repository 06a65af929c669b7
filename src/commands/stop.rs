use crate::{Context, Error};

async fn stop_impl(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("서버에서만 사용할 수 있습니다")?;

    ctx.data().players.stop_request(guild_id).await?;

    ctx.say("⏹️ 재생을 중지하고 퇴장합니다.").await?;

    Ok(())
}

/// 재생을 중지하고 퇴장합니다
#[poise::command(slash_command, guild_only)]
pub async fn stop(ctx: Context<'_>) -> Result<(), Error> {
    stop_impl(ctx).await
}

/// 재생을 중지하고 퇴장합니다 (/stop 단축)
#[poise::command(slash_command, guild_only)]
pub async fn st(ctx: Context<'_>) -> Result<(), Error> {
    stop_impl(ctx).await
}
