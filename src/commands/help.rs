use poise::CreateReply;
use serenity::builder::CreateEmbed;

use crate::{Context, Error};

async fn help_impl(ctx: Context<'_>) -> Result<(), Error> {
    let music_cmds = "\
`/play` (`/p`) — 음악 재생 또는 큐에 추가
`/skip` (`/s`) — 현재 곡 건너뛰기
`/stop` (`/st`) — 재생 중지 및 퇴장
`/queue` (`/q`) — 재생 목록 표시
`/nowplaying` (`/np`) — 현재 재생 중인 곡
`/loop` (`/l`) — 현재 곡 반복 켜기/끄기
`/remove` (`/rm`) — 큐에서 곡 제거
`/volume` (`/v`) — 볼륨 조절 (0-200)";

    let embed = CreateEmbed::new()
        .title("뮤직봇 도움말")
        .field("음악", music_cmds, false)
        .footer(serenity::builder::CreateEmbedFooter::new(
            "재생할 곡이 없으면 잠시 후 자동으로 퇴장합니다",
        ))
        .color(0x5865F2);

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// 봇 명령어 도움말
#[poise::command(slash_command, guild_only)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    help_impl(ctx).await
}
