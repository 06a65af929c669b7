use std::collections::VecDeque;

use tokio::sync::Mutex;

use super::Track;

/// 길드별 대기열
///
/// 모든 연산이 같은 락을 거치므로 명령 처리 경로와 자동 재생 경로가
/// 동시에 접근해도 길이와 순서가 어긋나지 않는다.
#[derive(Debug, Default)]
pub struct PlaybackQueue {
    tracks: Mutex<VecDeque<Track>>,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self {
            tracks: Mutex::new(VecDeque::new()),
        }
    }

    pub async fn append(&self, track: Track) {
        self.tracks.lock().await.push_back(track);
    }

    pub async fn pop_front(&self) -> Option<Track> {
        self.tracks.lock().await.pop_front()
    }

    pub async fn clear(&self) {
        self.tracks.lock().await.clear();
    }

    /// 앞에서부터 최대 `limit`개를 복사해서 돌려준다.
    pub async fn list(&self, limit: usize) -> Vec<Track> {
        let tracks = self.tracks.lock().await;
        tracks.iter().take(limit).cloned().collect()
    }

    /// `list`와 전체 길이를 한 번의 락으로
    pub async fn snapshot(&self, limit: usize) -> (Vec<Track>, usize) {
        let tracks = self.tracks.lock().await;
        (tracks.iter().take(limit).cloned().collect(), tracks.len())
    }

    /// 0부터 시작하는 위치의 곡을 제거한다.
    pub async fn remove_at(&self, index: usize) -> Option<Track> {
        let mut tracks = self.tracks.lock().await;
        if index < tracks.len() {
            tracks.remove(index)
        } else {
            None
        }
    }

    pub async fn len(&self) -> usize {
        self.tracks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tracks.lock().await.is_empty()
    }
}
