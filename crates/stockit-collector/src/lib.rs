//! Standalone insight collector for Stockit.
//!
//! API 서버와 독립적으로 인사이트 파이프라인을 실행하는 바이너리를
//! 제공합니다:
//! - 시장 데이터 수집 → 팩트 시트 생성
//! - AI 분석 → 스냅샷 저장
//! - 페르소나 리서치 리포트 생성

pub mod config;

pub use config::{CollectorConfig, DaemonConfig};
