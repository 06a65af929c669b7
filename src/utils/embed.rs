use serenity::builder::{CreateEmbed, CreateEmbedFooter};

use crate::music::{PlayerView, Track};

fn duration_text(track: &Track) -> &str {
    track.duration.as_deref().unwrap_or("알 수 없음")
}

fn with_thumbnail(embed: CreateEmbed, track: &Track) -> CreateEmbed {
    match track.thumbnail {
        Some(ref url) => embed.thumbnail(url),
        None => embed,
    }
}

pub fn now_playing(track: &Track, remaining: usize) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title("🎵 현재 재생 중")
        .description(format!("[{}]({})", track.title, track.url))
        .color(0x1DB954)
        .field("업로더", &track.uploader, true)
        .field("길이", duration_text(track), true)
        .field("대기열", format!("{remaining}곡"), true)
        .field("요청", &track.requester, true);

    with_thumbnail(embed, track)
}

pub fn now_playing_status(track: &Track, view: &PlayerView, remaining: usize) -> CreateEmbed {
    now_playing(track, remaining)
        .field("반복", if view.looping { "켜짐" } else { "꺼짐" }, true)
        .field("볼륨", format!("{}%", (view.volume * 100.0).round() as u32), true)
}

pub fn added_to_queue(track: &Track, position: usize) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title("✅ 큐에 추가됨")
        .description(format!("[{}]({})", track.title, track.url))
        .color(0x5865F2)
        .field("길이", duration_text(track), true)
        .field("위치", format!("#{position}"), true)
        .footer(CreateEmbedFooter::new(format!("요청: {}", track.requester)));

    with_thumbnail(embed, track)
}

pub fn playback_started(track: &Track) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title("▶️ 재생 시작")
        .description(format!("[{}]({})", track.title, track.url))
        .color(0x1DB954)
        .field("업로더", &track.uploader, true)
        .field("길이", duration_text(track), true)
        .footer(CreateEmbedFooter::new(format!("요청: {}", track.requester)));

    with_thumbnail(embed, track)
}

pub fn queue_list(current: Option<&Track>, tracks: &[Track], total: usize) -> CreateEmbed {
    let mut description = String::new();

    if let Some(track) = current {
        description.push_str(&format!(
            "**현재 재생:** [{}]({}) `{}`\n\n",
            track.title,
            track.url,
            duration_text(track)
        ));
    }

    if tracks.is_empty() {
        description.push_str("큐가 비어있습니다.");
    } else {
        for (i, track) in tracks.iter().enumerate() {
            description.push_str(&format!(
                "**{}.** [{}]({}) `{}`\n",
                i + 1,
                track.title,
                track.url,
                duration_text(track)
            ));
        }
    }

    let footer = if total > tracks.len() {
        format!("총 {total}곡 중 {}곡 표시", tracks.len())
    } else {
        format!("총 {total}곡")
    };

    CreateEmbed::new()
        .title("📋 재생 목록")
        .description(description)
        .color(0x5865F2)
        .footer(CreateEmbedFooter::new(footer))
}

pub fn auto_disconnected() -> CreateEmbed {
    CreateEmbed::new()
        .title("👋 자동 퇴장")
        .description("한동안 재생하지 않아 음성 채널에서 나갔습니다.")
        .color(0x808080)
}

pub fn error(message: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("❌ 오류")
        .description(message)
        .color(0xED4245)
}
