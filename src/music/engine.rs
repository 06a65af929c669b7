//! 길드별 재생 엔진
//!
//! 한 길드의 모든 상태 전이(추가, 스킵, 정지, 반복 전환, 스트림 종료, 자동 퇴장)는
//! 하나의 이벤트 채널로 들어와 전용 태스크에서 순서대로 처리된다. 오디오 쪽의
//! 종료 콜백도 직접 상태를 건드리지 않고 `PlayerEvent::StreamEnded`를 보낼 뿐이다.

use std::sync::Arc;
use std::time::Duration;

use serenity::model::id::{ChannelId, GuildId};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, warn};

use super::error::{MusicError, Result};
use super::notify::{Notice, NotificationSink};
use super::queue::PlaybackQueue;
use super::state::{GuildPlaybackState, PlaybackStatus, PlayerView};
use super::transport::AudioTransport;
use super::Track;

pub const MAX_VOLUME: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// 재생 중이 아니어서 바로 재생을 시작했다
    Started,
    /// 현재 곡 뒤에 대기 중 (1부터 시작하는 위치)
    Queued { position: usize },
    /// 받아들였지만 재생을 시작하지 못하고 건너뛰었다
    Unplayable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipOutcome {
    Skipped,
    NothingToSkip,
}

pub(crate) enum PlayerEvent {
    Enqueue {
        track: Track,
        voice_channel: ChannelId,
        notify_channel: ChannelId,
        reply: oneshot::Sender<Result<EnqueueOutcome>>,
    },
    Skip {
        target: Option<u64>,
        notify_channel: Option<ChannelId>,
        reply: oneshot::Sender<SkipOutcome>,
    },
    Stop {
        reply: oneshot::Sender<()>,
    },
    VoiceLost {
        reply: oneshot::Sender<bool>,
    },
    ToggleLoop {
        reply: oneshot::Sender<bool>,
    },
    SetVolume {
        volume: f32,
        reply: oneshot::Sender<f32>,
    },
    Inspect {
        reply: oneshot::Sender<PlayerView>,
    },
    StreamEnded {
        stream: u64,
        error: Option<String>,
    },
    IdleTimeout {
        timer: u64,
    },
}

/// 스트림 하나의 종료 신호. 소비되는 값이라 한 스트림에 한 번만 보낼 수 있다.
pub struct StreamEnd {
    stream: u64,
    events: mpsc::UnboundedSender<PlayerEvent>,
}

impl StreamEnd {
    pub fn stream(&self) -> u64 {
        self.stream
    }

    /// 오디오 쪽에서 스트림이 끝났을 때 호출. `error`는 재생 실패 사유.
    pub fn finish(self, error: Option<String>) {
        let _ = self.events.send(PlayerEvent::StreamEnded {
            stream: self.stream,
            error,
        });
    }
}

impl std::fmt::Debug for StreamEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamEnd").field("stream", &self.stream).finish()
    }
}

/// 길드 플레이어 핸들. 복제해도 같은 엔진 태스크를 가리킨다.
#[derive(Clone)]
pub struct GuildPlayer {
    queue: Arc<PlaybackQueue>,
    events: mpsc::UnboundedSender<PlayerEvent>,
    view: watch::Receiver<PlayerView>,
}

impl GuildPlayer {
    pub fn spawn(
        guild_id: GuildId,
        transport: Arc<dyn AudioTransport>,
        sink: Arc<dyn NotificationSink>,
        idle_timeout: Duration,
    ) -> Self {
        let queue = Arc::new(PlaybackQueue::new());
        let state = GuildPlaybackState::new(Arc::clone(&queue));
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(state.view());

        let task = PlayerTask {
            guild_id,
            state,
            transport,
            sink,
            idle_timeout,
            events: events_tx.clone(),
            view: view_tx,
        };
        tokio::spawn(task.run(events_rx));

        Self {
            queue,
            events: events_tx,
            view: view_rx,
        }
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> PlayerEvent) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.events
            .send(make(tx))
            .map_err(|_| MusicError::PlayerClosed)?;
        rx.await.map_err(|_| MusicError::PlayerClosed)
    }

    pub async fn enqueue(
        &self,
        track: Track,
        voice_channel: ChannelId,
        notify_channel: ChannelId,
    ) -> Result<EnqueueOutcome> {
        self.request(|reply| PlayerEvent::Enqueue {
            track,
            voice_channel,
            notify_channel,
            reply,
        })
        .await?
    }

    /// 요청 시점에 재생 중이던 스트림을 건너뛴다. 그 스트림이 이미 끝났다면
    /// 다음 곡을 또 건너뛰지 않는다. `notify_channel`이 있으면 알림 채널을 바꾼다.
    pub async fn skip(&self, notify_channel: Option<ChannelId>) -> Result<SkipOutcome> {
        let target = self.view.borrow().stream;
        self.request(|reply| PlayerEvent::Skip {
            target,
            notify_channel,
            reply,
        })
        .await
    }

    pub async fn stop(&self) -> Result<()> {
        self.request(|reply| PlayerEvent::Stop { reply }).await
    }

    /// 음성 연결이 끊겼다는 알림. 이미 다시 접속했다면 무시하고 false.
    pub async fn voice_lost(&self) -> Result<bool> {
        self.request(|reply| PlayerEvent::VoiceLost { reply }).await
    }

    pub async fn toggle_loop(&self) -> Result<bool> {
        self.request(|reply| PlayerEvent::ToggleLoop { reply }).await
    }

    pub async fn set_volume(&self, volume: f32) -> Result<f32> {
        self.request(|reply| PlayerEvent::SetVolume { volume, reply })
            .await
    }

    /// 앞선 이벤트가 모두 처리된 뒤의 상태
    pub async fn snapshot(&self) -> Result<PlayerView> {
        self.request(|reply| PlayerEvent::Inspect { reply }).await
    }

    pub async fn now_playing(&self) -> Result<Option<Track>> {
        Ok(self.snapshot().await?.current)
    }
}

struct PlayerTask {
    guild_id: GuildId,
    state: GuildPlaybackState,
    transport: Arc<dyn AudioTransport>,
    sink: Arc<dyn NotificationSink>,
    idle_timeout: Duration,
    events: mpsc::UnboundedSender<PlayerEvent>,
    view: watch::Sender<PlayerView>,
}

impl PlayerTask {
    async fn run(mut self, mut events: mpsc::UnboundedReceiver<PlayerEvent>) {
        debug!("플레이어 시작 (guild: {})", self.guild_id);
        while let Some(event) = events.recv().await {
            self.handle(event).await;
        }
    }

    async fn handle(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Enqueue {
                track,
                voice_channel,
                notify_channel,
                reply,
            } => {
                let outcome = self.enqueue(track, voice_channel, notify_channel).await;
                self.publish();
                let _ = reply.send(outcome);
            }
            PlayerEvent::Skip {
                target,
                notify_channel,
                reply,
            } => {
                if notify_channel.is_some() {
                    self.state.notify_channel = notify_channel;
                }
                let outcome = self.skip(target).await;
                self.publish();
                let _ = reply.send(outcome);
            }
            PlayerEvent::Stop { reply } => {
                self.stop().await;
                self.publish();
                let _ = reply.send(());
            }
            PlayerEvent::VoiceLost { reply } => {
                let stopped = self.voice_lost().await;
                self.publish();
                let _ = reply.send(stopped);
            }
            PlayerEvent::ToggleLoop { reply } => {
                self.state.looping = !self.state.looping;
                info!(
                    "반복 {} (guild: {})",
                    if self.state.looping { "켜짐" } else { "꺼짐" },
                    self.guild_id
                );
                self.publish();
                let _ = reply.send(self.state.looping);
            }
            PlayerEvent::SetVolume { volume, reply } => {
                let volume = volume.clamp(0.0, MAX_VOLUME);
                self.state.volume = volume;
                self.transport.set_volume(self.guild_id, volume).await;
                self.publish();
                let _ = reply.send(volume);
            }
            PlayerEvent::Inspect { reply } => {
                let _ = reply.send(self.state.view());
            }
            PlayerEvent::StreamEnded { stream, error } => {
                self.stream_ended(stream, error).await;
                self.publish();
            }
            PlayerEvent::IdleTimeout { timer } => {
                self.idle_timeout(timer).await;
                self.publish();
            }
        }
    }

    fn publish(&self) {
        self.view.send_replace(self.state.view());
    }

    async fn notify(&self, notice: Notice) {
        if let Some(channel_id) = self.state.notify_channel {
            self.sink.notify(self.guild_id, channel_id, notice).await;
        }
    }

    async fn ensure_connected(&mut self, voice_channel: ChannelId) -> Result<()> {
        let guild_id = self.guild_id;
        if !self.transport.is_connected(guild_id).await {
            self.transport
                .connect(guild_id, voice_channel)
                .await
                .map_err(|e| {
                    error!("음성 채널 접속 실패 (guild: {guild_id}): {e}");
                    e
                })?;
            self.state.voice_channel = Some(voice_channel);
        } else if self.state.voice_channel != Some(voice_channel) {
            self.transport.move_to(guild_id, voice_channel).await?;
            self.state.voice_channel = Some(voice_channel);
        }
        Ok(())
    }

    async fn enqueue(
        &mut self,
        track: Track,
        voice_channel: ChannelId,
        notify_channel: ChannelId,
    ) -> Result<EnqueueOutcome> {
        self.state.notify_channel = Some(notify_channel);
        self.ensure_connected(voice_channel).await?;

        let title = track.title.clone();
        self.state.queue.append(track).await;

        if self.state.status == PlaybackStatus::Playing {
            let position = self.state.queue.len().await;
            info!("큐에 추가: {title} (#{position}, guild: {})", self.guild_id);
            return Ok(EnqueueOutcome::Queued { position });
        }

        self.state.idle_timer.cancel();
        self.advance().await;

        if self.state.status == PlaybackStatus::Playing {
            Ok(EnqueueOutcome::Started)
        } else {
            Ok(EnqueueOutcome::Unplayable)
        }
    }

    /// 다음 곡을 골라 스트리밍을 시작한다. 시작에 실패한 곡은 건너뛰고 계속 시도하므로
    /// 큐 길이만큼만 반복된다.
    async fn advance(&mut self) {
        let guild_id = self.guild_id;

        if !self.transport.is_connected(guild_id).await {
            info!("음성 연결이 없어 재생을 멈춥니다 (guild: {guild_id})");
            self.go_idle();
            return;
        }

        loop {
            let next = if self.state.looping && self.state.current.is_some() {
                self.state.current.clone()
            } else {
                self.state.queue.pop_front().await
            };

            let track = match next {
                Some(track) => track,
                None => {
                    self.exhaust();
                    return;
                }
            };

            let stream = self.state.next_stream_id();
            let on_end = StreamEnd {
                stream,
                events: self.events.clone(),
            };
            self.state.current = Some(track.clone());

            match self
                .transport
                .start_stream(guild_id, &track.source, self.state.volume, on_end)
                .await
            {
                Ok(()) => {
                    self.state.stream = Some(stream);
                    self.state.status = PlaybackStatus::Playing;
                    self.state.idle_timer.cancel();

                    let remaining = self.state.queue.len().await;
                    info!("재생 시작: {} (guild: {guild_id}, 남은 곡: {remaining})", track.title);
                    self.notify(Notice::NowPlaying { track, remaining }).await;
                    return;
                }
                Err(MusicError::NotConnected) => {
                    warn!("음성 연결이 끊겨 재생을 멈춥니다 (guild: {guild_id})");
                    self.go_idle();
                    return;
                }
                Err(e) => {
                    // 반복 모드에서 같은 곡을 계속 재시도하지 않도록 현재 곡을 비운다
                    error!("재생 시작 실패: {} ({e})", track.title);
                    self.state.current = None;
                }
            }
        }
    }

    fn go_idle(&mut self) {
        self.state.current = None;
        self.state.stream = None;
        self.state.status = PlaybackStatus::Idle;
        self.state.idle_timer.cancel();
    }

    fn exhaust(&mut self) {
        self.state.current = None;
        self.state.stream = None;
        self.state.status = PlaybackStatus::Exhausted;

        let events = self.events.clone();
        self.state.idle_timer.arm(self.idle_timeout, move |timer| {
            let _ = events.send(PlayerEvent::IdleTimeout { timer });
        });
        info!(
            "큐가 비었습니다 (guild: {}), {}초 후 자동 퇴장",
            self.guild_id,
            self.idle_timeout.as_secs()
        );
    }

    async fn stream_ended(&mut self, stream: u64, error: Option<String>) {
        if self.state.stream != Some(stream) {
            debug!("지난 스트림 종료 무시 (guild: {}, stream: {stream})", self.guild_id);
            return;
        }
        if let Some(e) = error {
            error!("재생 오류 (guild: {}): {e}", self.guild_id);
            // 재생 중 실패한 곡은 반복하지 않는다
            self.state.current = None;
        }
        self.state.stream = None;
        self.advance().await;
    }

    async fn skip(&mut self, target: Option<u64>) -> SkipOutcome {
        if self.state.status != PlaybackStatus::Playing || self.state.stream.is_none() {
            self.notify(Notice::NothingToSkip).await;
            return SkipOutcome::NothingToSkip;
        }

        // 요청한 곡이 이미 끝나 다음 곡으로 넘어갔다
        if target.is_some() && target != self.state.stream {
            debug!("이미 끝난 곡에 대한 스킵 (guild: {})", self.guild_id);
            return SkipOutcome::Skipped;
        }

        if let Some(track) = &self.state.current {
            info!("스킵: {} (guild: {})", track.title, self.guild_id);
        }
        // 종료 콜백이 다음 곡으로 넘긴다
        self.transport.stop_stream(self.guild_id).await;
        SkipOutcome::Skipped
    }

    async fn stop(&mut self) {
        let guild_id = self.guild_id;
        self.state.queue.clear().await;
        self.state.reset();

        self.transport.stop_stream(guild_id).await;
        if self.transport.is_connected(guild_id).await {
            self.transport.disconnect(guild_id).await;
        }
        info!("재생 중지 (guild: {guild_id})");
    }

    async fn voice_lost(&mut self) -> bool {
        if self.transport.is_connected(self.guild_id).await {
            debug!("이미 다시 접속한 상태라 연결 끊김 무시 (guild: {})", self.guild_id);
            return false;
        }
        self.stop().await;
        true
    }

    async fn idle_timeout(&mut self, timer: u64) {
        let guild_id = self.guild_id;
        if !self.state.idle_timer.take_fired(timer) {
            debug!("취소된 자동 퇴장 타이머 (guild: {guild_id})");
            return;
        }
        if self.state.status != PlaybackStatus::Exhausted {
            return;
        }

        if self.transport.is_connected(guild_id).await
            && !self.transport.is_streaming(guild_id).await
        {
            self.transport.disconnect(guild_id).await;
            info!("비활성 상태로 자동 퇴장 (guild: {guild_id})");
            self.notify(Notice::AutoDisconnected).await;
        }
        self.state.voice_channel = None;
        self.state.status = PlaybackStatus::Idle;
    }
}
