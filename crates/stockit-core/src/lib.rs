//! # Stockit Core
//!
//! 인사이트 파이프라인의 기본 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 공통 요소를 제공합니다:
//! - 에러 타입 정의 (소스 실패, 저장 실패, 분석 실패 구분)
//! - 환경변수 기반 설정 관리
//! - 로깅 인프라
//! - 위젯 이름 및 모드 타입 상수

pub mod config;
pub mod error;
pub mod logging;
pub mod widget;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use widget::*;
