use std::sync::Arc;
use std::time::Duration;

use discord_music_bot::music::cache::SearchCache;
use discord_music_bot::music::source::YtDlpResolver;
use discord_music_bot::music::TrackResolver;

fn resolver() -> (YtDlpResolver, Arc<SearchCache>) {
    let cache = Arc::new(SearchCache::new(10, Duration::from_secs(600)));
    (YtDlpResolver::new(Arc::clone(&cache)), cache)
}

#[tokio::test]
#[ignore] // Requires yt-dlp installed and network access
async fn test_resolve_url() {
    // Use a well-known, stable YouTube video (Rick Astley - Never Gonna Give You Up)
    let (resolver, cache) = resolver();
    let result = resolver
        .resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "tester")
        .await;
    assert!(result.is_ok(), "resolve failed: {:?}", result.err());
    let track = result.unwrap();
    assert!(!track.title.is_empty());
    assert!(track.url.contains("youtube.com") || track.url.contains("youtu.be"));
    assert!(track.duration.is_some());
    assert_eq!(track.requester, "tester");
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
#[ignore] // Requires yt-dlp installed and network access
async fn test_resolve_search() {
    let (resolver, _) = resolver();
    let result = resolver
        .resolve("never gonna give you up rick astley", "tester")
        .await;
    assert!(result.is_ok(), "search failed: {:?}", result.err());
    let track = result.unwrap();
    assert!(!track.title.is_empty());
    assert!(track.duration.is_some());
}
