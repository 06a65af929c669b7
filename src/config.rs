use std::time::Duration;

pub struct Config {
    pub discord_token: String,
    pub idle_timeout: Duration,
    pub search_cache_capacity: usize,
    pub search_cache_ttl: Duration,
    pub cache_sweep_interval: Duration,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            discord_token: std::env::var("DISCORD_TOKEN")
                .expect("DISCORD_TOKEN 환경변수가 필요합니다"),
            idle_timeout: Duration::from_secs(env_or("MUSIC_IDLE_TIMEOUT_SECS", 300)),
            search_cache_capacity: env_or("MUSIC_SEARCH_CACHE_CAPACITY", 100),
            search_cache_ttl: Duration::from_secs(env_or("MUSIC_SEARCH_CACHE_TTL_SECS", 600)),
            cache_sweep_interval: Duration::from_secs(env_or("MUSIC_CACHE_SWEEP_SECS", 3600)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back() {
        std::env::set_var("MUSICBOT_TEST_NUMBER", "not a number");
        assert_eq!(env_or("MUSICBOT_TEST_NUMBER", 42u64), 42);

        std::env::set_var("MUSICBOT_TEST_NUMBER", " 7 ");
        assert_eq!(env_or("MUSICBOT_TEST_NUMBER", 42u64), 7);

        std::env::remove_var("MUSICBOT_TEST_NUMBER");
        assert_eq!(env_or("MUSICBOT_TEST_NUMBER", 42u64), 42);
    }

    #[test]
    fn test_from_env_defaults() {
        std::env::set_var("DISCORD_TOKEN", "test-token");
        for key in [
            "MUSIC_IDLE_TIMEOUT_SECS",
            "MUSIC_SEARCH_CACHE_CAPACITY",
            "MUSIC_SEARCH_CACHE_TTL_SECS",
            "MUSIC_CACHE_SWEEP_SECS",
        ] {
            std::env::remove_var(key);
        }

        let config = Config::from_env();
        assert_eq!(config.discord_token, "test-token");
        assert_eq!(config.idle_timeout, Duration::from_secs(300));
        assert_eq!(config.search_cache_capacity, 100);
        assert_eq!(config.search_cache_ttl, Duration::from_secs(600));
        assert_eq!(config.cache_sweep_interval, Duration::from_secs(3600));
    }
}
