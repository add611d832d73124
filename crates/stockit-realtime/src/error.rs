//! 실시간 스트림 에러 타입.

use thiserror::Error;

/// 실시간 연결 에러.
#[derive(Debug, Error)]
pub enum StreamError {
    /// 연결 수립 실패 (재시도 소진 포함)
    #[error("연결 실패: {0}")]
    Connect(String),

    /// 연결 중 전송 오류
    #[error("전송 오류: {0}")]
    Transport(String),

    /// 이미 종료된 스트림에 대한 작업
    #[error("스트림이 종료되었습니다")]
    Closed,
}

pub type StreamResult<T> = Result<T, StreamError>;
