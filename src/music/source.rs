use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use super::cache::SearchCache;
use super::error::{MusicError, Result};
use super::{format_duration, Track};

/// 검색어나 URL을 재생 가능한 곡으로 바꾼다
#[async_trait]
pub trait TrackResolver: Send + Sync {
    async fn resolve(&self, query: &str, requester: &str) -> Result<Track>;
}

#[derive(Deserialize)]
struct YtDlpOutput {
    title: Option<String>,
    duration: Option<f64>,
    webpage_url: Option<String>,
    original_url: Option<String>,
    uploader: Option<String>,
    thumbnail: Option<String>,
}

pub fn is_url(query: &str) -> bool {
    query.starts_with("http://") || query.starts_with("https://")
}

fn parse_output(query: &str, stdout: &[u8]) -> Result<Track> {
    let info: YtDlpOutput =
        serde_json::from_slice(stdout).map_err(|e| MusicError::Resolution(e.to_string()))?;

    let url = info
        .webpage_url
        .or(info.original_url)
        .unwrap_or_else(|| query.to_string());

    let mut track = Track::new(
        info.title.unwrap_or_else(|| "알 수 없음".to_string()),
        url.clone(),
        url,
    );
    track.duration = info.duration.and_then(format_duration);
    if let Some(uploader) = info.uploader {
        track = track.with_uploader(&uploader);
    }
    track.thumbnail = info.thumbnail.filter(|t| !t.is_empty());
    Ok(track)
}

/// yt-dlp로 곡 정보를 가져온다. 검색어는 첫 번째 검색 결과를 쓴다.
pub struct YtDlpResolver {
    cache: Arc<SearchCache>,
}

impl YtDlpResolver {
    pub fn new(cache: Arc<SearchCache>) -> Self {
        Self { cache }
    }

    async fn fetch(&self, query: &str) -> Result<Track> {
        let search_query = if is_url(query) {
            query.to_string()
        } else {
            format!("ytsearch1:{query}")
        };

        let output = Command::new("yt-dlp")
            .args([
                "-j",
                "-f",
                "bestaudio",
                "--no-playlist",
                "--no-warnings",
                &search_query,
            ])
            .output()
            .await
            .map_err(|e| MusicError::Resolution(format!("yt-dlp 실행 실패: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MusicError::Resolution(format!("yt-dlp 오류: {}", stderr.trim())));
        }
        if output.stdout.iter().all(u8::is_ascii_whitespace) {
            return Err(MusicError::Resolution(format!("검색 결과 없음: {query}")));
        }

        parse_output(query, &output.stdout)
    }
}

#[async_trait]
impl TrackResolver for YtDlpResolver {
    async fn resolve(&self, query: &str, requester: &str) -> Result<Track> {
        let query = query.trim();
        if query.is_empty() {
            return Err(MusicError::Resolution("검색어가 비어 있습니다".to_string()));
        }

        if let Some(track) = self.cache.get(query) {
            debug!("검색 캐시 적중: {query}");
            return Ok(track.requested_by(requester));
        }

        let track = self.fetch(query).await.map_err(|e| {
            warn!("곡 검색 실패 ({query}): {e}");
            e
        })?;
        self.cache.insert(query, track.clone());
        Ok(track.requested_by(requester))
    }
}
