use poise::CreateReply;

use crate::utils::embed;
use crate::{Context, Error};

async fn volume_impl(ctx: Context<'_>, level: u32) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("서버에서만 사용할 수 있습니다")?;

    if level > 200 {
        ctx.send(CreateReply::default().embed(embed::error("볼륨은 0~200 사이로 설정해주세요.")))
            .await?;
        return Ok(());
    }

    let volume = ctx.data().players.set_volume_request(guild_id, level).await?;

    ctx.say(format!("🔊 볼륨: **{}%**", (volume * 100.0).round() as u32))
        .await?;

    Ok(())
}

/// 볼륨을 조절합니다
#[poise::command(slash_command, guild_only)]
pub async fn volume(
    ctx: Context<'_>,
    #[description = "볼륨 (0-200)"] level: u32,
) -> Result<(), Error> {
    volume_impl(ctx, level).await
}

/// 볼륨을 조절합니다 (/volume 단축)
#[poise::command(slash_command, guild_only)]
pub async fn v(
    ctx: Context<'_>, #[description = "볼륨 (0-200)"] level: u32
) -> Result<(), Error> {
    volume_impl(ctx, level).await
}
