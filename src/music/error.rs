use thiserror::Error;

/// 음악 재생 코어에서 발생하는 오류
///
/// 어느 것도 프로세스를 종료시키지 않는다. `Resolution`은 사용자에게 보여주고,
/// `Transport`는 로그를 남긴 뒤 다음 곡으로 넘어간다.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MusicError {
    #[error("노래를 찾을 수 없습니다: {0}")]
    Resolution(String),

    #[error("음성 연결 오류: {0}")]
    Transport(String),

    #[error("음성 채널에 연결되어 있지 않습니다")]
    NotConnected,

    #[error("플레이어가 종료되었습니다")]
    PlayerClosed,
}

impl MusicError {
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }
}

pub type Result<T> = std::result::Result<T, MusicError>;
