use std::sync::Arc;
use std::time::Duration;

use serenity::model::id::ChannelId;
use tokio::task::JoinHandle;

use super::queue::PlaybackQueue;
use super::Track;

pub const DEFAULT_VOLUME: f32 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Playing,
    /// 큐가 비었고 자동 퇴장 타이머가 걸린 상태
    Exhausted,
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "대기"),
            Self::Playing => write!(f, "재생 중"),
            Self::Exhausted => write!(f, "퇴장 대기"),
        }
    }
}

/// 자동 퇴장 타이머 슬롯. 동시에 하나만 살아 있다.
#[derive(Debug, Default)]
pub struct IdleTimer {
    armed: Option<(u64, JoinHandle<()>)>,
    next_id: u64,
}

impl IdleTimer {
    /// 기존 타이머를 취소하고 새 타이머를 건다. `on_fire`는 지연 후 타이머 id와 함께 호출된다.
    pub fn arm<F>(&mut self, delay: Duration, on_fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        self.next_id += 1;
        let id = self.next_id;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire(id);
        });
        self.armed = Some((id, task));
        id
    }

    pub fn cancel(&mut self) -> bool {
        match self.armed.take() {
            Some((_, task)) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// 발사된 타이머가 아직 슬롯에 있는 그 타이머인지 확인하고 슬롯을 비운다.
    /// 이미 취소됐거나 교체된 타이머면 false.
    pub fn take_fired(&mut self, id: u64) -> bool {
        match &self.armed {
            Some((armed_id, _)) if *armed_id == id => {
                self.armed = None;
                true
            }
            _ => false,
        }
    }
}

/// 외부에서 읽기 위한 상태 사본
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerView {
    pub status: PlaybackStatus,
    pub current: Option<Track>,
    pub looping: bool,
    pub volume: f32,
    /// 현재 스트림 번호. 스킵 요청이 어느 곡을 겨냥했는지 구분하는 데 쓴다.
    pub stream: Option<u64>,
}

pub struct GuildPlaybackState {
    pub queue: Arc<PlaybackQueue>,
    pub current: Option<Track>,
    pub status: PlaybackStatus,
    pub notify_channel: Option<ChannelId>,
    pub voice_channel: Option<ChannelId>,
    pub looping: bool,
    pub volume: f32,
    pub stream: Option<u64>,
    pub idle_timer: IdleTimer,
    last_stream: u64,
}

impl GuildPlaybackState {
    pub fn new(queue: Arc<PlaybackQueue>) -> Self {
        Self {
            queue,
            current: None,
            status: PlaybackStatus::Idle,
            notify_channel: None,
            voice_channel: None,
            looping: false,
            volume: DEFAULT_VOLUME,
            stream: None,
            idle_timer: IdleTimer::default(),
            last_stream: 0,
        }
    }

    pub fn next_stream_id(&mut self) -> u64 {
        self.last_stream += 1;
        self.last_stream
    }

    /// 정지 후 상태. 반복 여부와 볼륨, 알림 채널은 유지한다.
    pub fn reset(&mut self) {
        self.current = None;
        self.stream = None;
        self.voice_channel = None;
        self.status = PlaybackStatus::Idle;
        self.idle_timer.cancel();
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            status: self.status,
            current: self.current.clone(),
            looping: self.looping,
            volume: self.volume,
            stream: self.stream,
        }
    }
}
