use poise::CreateReply;

use crate::music::EnqueueOutcome;
use crate::utils::embed;
use crate::{Context, Error};

async fn play_impl(ctx: Context<'_>, query: String) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("서버에서만 사용할 수 있습니다")?;

    let channel_id = {
        let guild = ctx.guild().ok_or("서버 정보를 가져올 수 없습니다")?;
        guild
            .voice_states
            .get(&ctx.author().id)
            .and_then(|vs| vs.channel_id)
    };

    let channel_id = match channel_id {
        Some(id) => id,
        None => {
            ctx.send(
                CreateReply::default()
                    .embed(embed::error("음성 채널에 먼저 접속해주세요!"))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }
    };

    ctx.defer().await?;

    let requester = ctx.author().name.clone();
    let result = ctx
        .data()
        .players
        .enqueue_request(guild_id, &query, &requester, channel_id, ctx.channel_id())
        .await;

    let reply = match result {
        Ok((track, EnqueueOutcome::Started)) => embed::playback_started(&track),
        Ok((track, EnqueueOutcome::Queued { position })) => embed::added_to_queue(&track, position),
        Ok((track, EnqueueOutcome::Unplayable)) => {
            embed::error(&format!("**{}** 재생을 시작하지 못해 건너뛰었습니다.", track.title))
        }
        Err(e) if e.is_resolution() => {
            embed::error(&format!("노래를 찾을 수 없습니다: **{query}**"))
        }
        Err(e) => embed::error(&e.to_string()),
    };

    ctx.send(CreateReply::default().embed(reply)).await?;

    Ok(())
}

/// 음악을 재생합니다
#[poise::command(slash_command, guild_only)]
pub async fn play(
    ctx: Context<'_>,
    #[description = "노래 제목 또는 URL"] query: String,
) -> Result<(), Error> {
    play_impl(ctx, query).await
}

/// 음악을 재생합니다 (/play 단축)
#[poise::command(slash_command, guild_only)]
pub async fn p(
    ctx: Context<'_>,
    #[description = "노래 제목 또는 URL"] query: String,
) -> Result<(), Error> {
    play_impl(ctx, query).await
}
