use std::sync::Arc;

use discord_music_bot::music::cache::{self, SearchCache};
use discord_music_bot::music::notify::ChannelNotifier;
use discord_music_bot::music::source::YtDlpResolver;
use discord_music_bot::music::transport::SongbirdTransport;
use discord_music_bot::music::PlayerManager;
use discord_music_bot::{commands, config, events, Data};
use poise::serenity_prelude as serenity;
use songbird::SerenityInit;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let idle_timeout = config.idle_timeout;
    let search_cache = Arc::new(SearchCache::new(
        config.search_cache_capacity,
        config.search_cache_ttl,
    ));
    let sweep_interval = config.cache_sweep_interval;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                let voice = songbird::get(ctx).await.ok_or("Songbird 미등록")?;

                let transport = Arc::new(SongbirdTransport::new(voice, reqwest::Client::new()));
                let resolver = Arc::new(YtDlpResolver::new(Arc::clone(&search_cache)));
                let notifier = Arc::new(ChannelNotifier::new(ctx.http.clone()));

                // 검색 캐시는 요청 처리와 별개로 주기적으로 정리
                cache::spawn_sweeper(Arc::clone(&search_cache), sweep_interval);

                tracing::info!("봇이 준비되었습니다!");
                Ok(Data {
                    players: Arc::new(PlayerManager::new(
                        transport,
                        resolver,
                        notifier,
                        idle_timeout,
                    )),
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .register_songbird()
        .await
        .expect("클라이언트 생성 실패");

    if let Err(e) = client.start().await {
        tracing::error!("클라이언트 오류: {e}");
    }
}
