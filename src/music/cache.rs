use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::Track;

struct Entry {
    inserted_at: Instant,
    track: Track,
}

/// 검색어 → 곡 정보 캐시
///
/// 용량을 넘으면 가장 오래된 항목부터 밀어내고, 주기적인 `sweep`이
/// 만료된 항목을 정리한다. 요청 처리 중에는 정리하지 않는다.
pub struct SearchCache {
    entries: Mutex<HashMap<String, Entry>>,
    capacity: usize,
    ttl: Duration,
}

impl SearchCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 캐시된 곡 정보. 요청자는 비어 있으므로 호출 쪽에서 채운다.
    pub fn get(&self, query: &str) -> Option<Track> {
        let entries = self.lock();
        entries
            .get(query)
            .filter(|e| e.inserted_at.elapsed() < self.ttl)
            .map(|e| e.track.clone())
    }

    pub fn insert(&self, query: &str, mut track: Track) {
        track.requester = String::new();

        let mut entries = self.lock();
        if !entries.contains_key(query) && entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| k.clone());
            if let Some(key) = oldest {
                entries.remove(&key);
            }
        }
        entries.insert(
            query.to_string(),
            Entry {
                inserted_at: Instant::now(),
                track,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// 만료 항목을 지우고, 그래도 절반을 넘게 차 있으면 최신 절반만 남긴다.
    /// 지운 개수를 돌려준다.
    pub fn sweep(&self) -> usize {
        let mut entries = self.lock();
        let before = entries.len();

        let ttl = self.ttl;
        entries.retain(|_, e| e.inserted_at.elapsed() < ttl);

        let keep = self.capacity / 2;
        if entries.len() > keep {
            let mut ages: Vec<(String, Instant)> = entries
                .iter()
                .map(|(k, e)| (k.clone(), e.inserted_at))
                .collect();
            ages.sort_by(|a, b| b.1.cmp(&a.1));
            for (key, _) in ages.into_iter().skip(keep) {
                entries.remove(&key);
            }
        }

        before - entries.len()
    }
}

/// 고정 주기로 `sweep`을 돌리는 백그라운드 작업
pub fn spawn_sweeper(cache: Arc<SearchCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let removed = cache.sweep();
            if removed > 0 {
                info!("검색 캐시 정리: {removed}개 제거, {}개 남음", cache.len());
            }
            if cache.len() > cache.capacity {
                warn!("검색 캐시가 용량을 초과했습니다: {}", cache.len());
            }
        }
    })
}
