use crate::{Context, Error};

async fn loop_impl(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("서버에서만 사용할 수 있습니다")?;

    let looping = ctx.data().players.toggle_loop_request(guild_id).await?;

    let msg = if looping {
        "🔂 반복 모드: **켜짐** (현재 곡 반복)"
    } else {
        "➡️ 반복 모드: **꺼짐**"
    };
    ctx.say(msg).await?;

    Ok(())
}

/// 현재 곡 반복을 켜고 끕니다
#[poise::command(slash_command, guild_only, rename = "loop")]
pub async fn loop_cmd(ctx: Context<'_>) -> Result<(), Error> {
    loop_impl(ctx).await
}

/// 현재 곡 반복을 켜고 끕니다 (/loop 단축)
#[poise::command(slash_command, guild_only)]
pub async fn l(ctx: Context<'_>) -> Result<(), Error> {
    loop_impl(ctx).await
}
