use std::env;

#[test]
#[should_panic(expected = "DISCORD_TOKEN")]
fn test_config_missing_token_panics() {
    // 토큰이 없으면 시작하지 않는다
    env::remove_var("DISCORD_TOKEN");
    discord_music_bot::config::Config::from_env();
}
