//! 실시간 시세 구독 레이어.
//!
//! WebSocket 연결 하나를 소유하는 [`MarketStream`], 실행 중인
//! 스트림을 제어하는 복제 가능한 [`StreamHandle`], IO가 없는
//! 구독 상태 머신 [`SubscriptionState`]를 제공합니다. 상태 전이는
//! `Idle → Connecting → Open`이며 `Closed`는 어디서든 도달 가능한
//! 종결 상태입니다.
//!
//! 클라이언트 측 상태(계좌, 호가창)와 TTL 요청 캐시도 이 크레이트에
//! 있습니다. 모두 전역 싱글톤이 아닌 주입식 컨테이너입니다.

pub mod cache;
pub mod error;
pub mod protocol;
pub mod store;
pub mod stream;
pub mod subscription;

pub use cache::RequestCache;
pub use error::{StreamError, StreamResult};
pub use protocol::{ClientMessage, Tick};
pub use store::{Account, AccountStore, OrderBookSnapshot, OrderBookStore, PriceLevel};
pub use stream::{MarketStream, StreamHandle};
pub use subscription::{ConnectionStatus, SubscriptionState};
