//! 인사이트 파이프라인 저장소.
//!
//! 데이터베이스 접근 로직을 파이프라인/라우트에서 분리하여 관리합니다.
//! 모든 Repository는 static methods 패턴을 사용합니다.
//!
//! 테이블은 전부 append-only입니다. UPDATE/DELETE 없이 INSERT만 하며
//! "최신"은 항상 `created_at DESC LIMIT 1`로 결정됩니다.

pub mod fact_sheet;
pub mod news;
pub mod report;
pub mod snapshot;

pub use fact_sheet::{FactSheetInput, FactSheetRecord, FactSheetRepository};
pub use news::{NewsItemInput, NewsItemRecord, NewsRepository};
pub use report::{ReportInput, ReportRepository, ResearchReportRecord};
pub use snapshot::{InsightSnapshotRecord, SnapshotInput, SnapshotRepository};
