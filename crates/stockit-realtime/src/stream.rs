//! 실시간 시세 WebSocket 스트림.
//!
//! 단일 연결을 소유하고 구독 메시지 송신과 틱 수신을 담당합니다.
//! 수신 틱은 broadcast 채널로 팬아웃되어 여러 소비자가 구독할 수
//! 있습니다. 연결이 끊어지면 지수 백오프로 재연결하며, `Open` 전이
//! 시 구독 상태 머신이 전체 코드 집합을 재구독합니다.
//!
//! [`MarketStream::run`]이 연결 루프를 소유한 채 별도 태스크에서
//! 돌아가는 동안, 구독/해제/종료는 [`StreamHandle`]로 수행합니다.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, StreamExt};
use futures::SinkExt;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio_tungstenite::{
    connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{StreamError, StreamResult};
use crate::protocol::{ClientMessage, Tick};
use crate::subscription::{ConnectionStatus, SubscriptionState};

/// 재연결 백오프 시작값.
const RECONNECT_BASE: Duration = Duration::from_secs(1);
/// 재연결 백오프 상한.
const RECONNECT_MAX: Duration = Duration::from_secs(30);
/// 재연결 최대 시도 횟수.
const MAX_RECONNECT_ATTEMPTS: u32 = 5;
/// keep-alive ping 주기.
const PING_INTERVAL: Duration = Duration::from_secs(30);

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

async fn send_message(write: &mut WsSink, msg: &ClientMessage) -> StreamResult<()> {
    let json = serde_json::to_string(msg).map_err(|e| StreamError::Transport(e.to_string()))?;
    write
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| StreamError::Transport(e.to_string()))
}

/// 실행 중인 스트림을 제어하는 핸들.
///
/// 자유롭게 복제해 태스크 간에 공유할 수 있습니다. 연결이 `Open`이면
/// 구독 메시지가 즉시 전송되고, 아니면 코드만 기억되었다가 `Open`
/// 전이 시의 재구독으로 전송됩니다.
#[derive(Clone)]
pub struct StreamHandle {
    state: Arc<RwLock<SubscriptionState>>,
    outbound_tx: mpsc::Sender<ClientMessage>,
    tick_tx: broadcast::Sender<Tick>,
    cancel: CancellationToken,
}

impl StreamHandle {
    /// 수신 틱 구독.
    pub fn ticks(&self) -> broadcast::Receiver<Tick> {
        self.tick_tx.subscribe()
    }

    pub async fn status(&self) -> ConnectionStatus {
        self.state.read().await.status()
    }

    pub async fn is_connected(&self) -> bool {
        self.state.read().await.is_connected()
    }

    /// 종목 구독.
    ///
    /// `Open`이 아니면 코드만 기억되고 전송은 `Open` 전이 시의
    /// 재구독으로 이루어집니다. 종료된 스트림이면 에러입니다.
    pub async fn subscribe(&self, codes: &[String]) -> StreamResult<()> {
        let msg = {
            let mut state = self.state.write().await;
            if state.status() == ConnectionStatus::Closed {
                return Err(StreamError::Closed);
            }
            state.subscribe(codes)
        };

        if let Some(msg) = msg {
            self.outbound_tx
                .send(msg)
                .await
                .map_err(|_| StreamError::Closed)?;
        }
        Ok(())
    }

    /// 종목 구독 해제.
    pub async fn unsubscribe(&self, codes: &[String]) -> StreamResult<()> {
        let msg = {
            let mut state = self.state.write().await;
            if state.status() == ConnectionStatus::Closed {
                return Err(StreamError::Closed);
            }
            state.unsubscribe(codes)
        };

        if let Some(msg) = msg {
            self.outbound_tx
                .send(msg)
                .await
                .map_err(|_| StreamError::Closed)?;
        }
        Ok(())
    }

    /// 스트림 종료. 이후의 구독은 모두 거부됩니다.
    pub async fn close(&self) {
        self.cancel.cancel();
        self.state.write().await.close();
    }
}

/// 실시간 시세 스트림.
pub struct MarketStream {
    url: String,
    handle: StreamHandle,
    outbound_rx: Option<mpsc::Receiver<ClientMessage>>,
}

impl MarketStream {
    pub fn new(url: impl Into<String>) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::channel(256);
        let (tick_tx, _) = broadcast::channel(1024);

        Self {
            url: url.into(),
            handle: StreamHandle {
                state: Arc::new(RwLock::new(SubscriptionState::new())),
                outbound_tx,
                tick_tx,
                cancel: CancellationToken::new(),
            },
            outbound_rx: Some(outbound_rx),
        }
    }

    /// 제어 핸들 복제.
    ///
    /// `run`으로 스트림을 태스크에 넘기기 전에 얻어 두면 실행 중에도
    /// 구독을 변경할 수 있습니다.
    pub fn handle(&self) -> StreamHandle {
        self.handle.clone()
    }

    /// 수신 틱 구독.
    pub fn ticks(&self) -> broadcast::Receiver<Tick> {
        self.handle.ticks()
    }

    pub async fn status(&self) -> ConnectionStatus {
        self.handle.status().await
    }

    pub async fn is_connected(&self) -> bool {
        self.handle.is_connected().await
    }

    /// 종목 구독. [`StreamHandle::subscribe`] 참고.
    pub async fn subscribe(&self, codes: &[String]) -> StreamResult<()> {
        self.handle.subscribe(codes).await
    }

    /// 종목 구독 해제.
    pub async fn unsubscribe(&self, codes: &[String]) -> StreamResult<()> {
        self.handle.unsubscribe(codes).await
    }

    /// 스트림 종료. 이후의 구독은 모두 거부됩니다.
    pub async fn close(&self) {
        self.handle.close().await;
    }

    fn handle_text(&self, text: &str) {
        match serde_json::from_str::<Tick>(text) {
            Ok(tick) => {
                // 수신자가 없으면 조용히 버림
                let _ = self.handle.tick_tx.send(tick);
            }
            Err(e) => debug!(error = %e, "틱이 아닌 메시지 수신"),
        }
    }

    /// 연결 루프 실행.
    ///
    /// 종료(`close` 또는 재시도 소진)까지 반환하지 않습니다. 한 번만
    /// 호출할 수 있습니다. 실행 중의 제어는 [`Self::handle`]로 얻은
    /// 핸들을 사용합니다.
    pub async fn run(&mut self) -> StreamResult<()> {
        let mut outbound_rx = self.outbound_rx.take().ok_or(StreamError::Closed)?;
        let mut backoff = RECONNECT_BASE;
        let mut attempts: u32 = 0;

        loop {
            if self.handle.cancel.is_cancelled() {
                break;
            }

            {
                self.handle
                    .state
                    .write()
                    .await
                    .set_status(ConnectionStatus::Connecting);
            }
            info!(url = %self.url, "실시간 서버 연결 시도");

            match connect_async(&self.url).await {
                Ok((ws, _)) => {
                    attempts = 0;
                    backoff = RECONNECT_BASE;
                    let replay = self
                        .handle
                        .state
                        .write()
                        .await
                        .set_status(ConnectionStatus::Open);
                    info!("실시간 서버 연결됨");

                    let (mut write, mut read) = ws.split();

                    if let Some(msg) = replay {
                        if let Err(e) = send_message(&mut write, &msg).await {
                            warn!(error = %e, "재구독 전송 실패");
                        }
                    }

                    let mut ping = tokio::time::interval(PING_INTERVAL);
                    ping.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                    // interval의 첫 틱은 즉시 발화하므로 미리 소비
                    ping.tick().await;

                    let lost = loop {
                        tokio::select! {
                            _ = self.handle.cancel.cancelled() => {
                                let _ = write.send(Message::Close(None)).await;
                                break false;
                            }
                            _ = ping.tick() => {
                                if write.send(Message::Ping(Vec::new().into())).await.is_err() {
                                    break true;
                                }
                            }
                            outbound = outbound_rx.recv() => match outbound {
                                Some(msg) => {
                                    if let Err(e) = send_message(&mut write, &msg).await {
                                        warn!(error = %e, "메시지 전송 실패");
                                        break true;
                                    }
                                }
                                None => break false,
                            },
                            frame = read.next() => match frame {
                                Some(Ok(Message::Text(text))) => self.handle_text(&text),
                                Some(Ok(Message::Close(_))) => {
                                    info!("서버가 연결을 종료했습니다");
                                    break true;
                                }
                                Some(Ok(_)) => {}
                                Some(Err(e)) => {
                                    warn!(error = %e, "수신 오류");
                                    break true;
                                }
                                None => break true,
                            },
                        }
                    };

                    if !lost {
                        break;
                    }
                    warn!("연결이 끊어졌습니다, 재연결을 시도합니다");
                }
                Err(e) => {
                    warn!(error = %e, attempt = attempts + 1, "연결 실패");
                }
            }

            attempts += 1;
            if attempts >= MAX_RECONNECT_ATTEMPTS {
                self.handle.state.write().await.close();
                return Err(StreamError::Connect(format!(
                    "재연결 {}회 실패, 스트림을 종료합니다",
                    attempts
                )));
            }

            tokio::select! {
                _ = self.handle.cancel.cancelled() => break,
                _ = tokio::time::sleep(backoff) => {}
            }
            backoff = (backoff * 2).min(RECONNECT_MAX);
        }

        self.handle.state.write().await.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_stream_is_idle() {
        let stream = MarketStream::new("ws://localhost:9999");
        assert_eq!(stream.status().await, ConnectionStatus::Idle);
        assert!(!stream.is_connected().await);
    }

    #[tokio::test]
    async fn test_subscribe_before_connect_remembers_codes() {
        let stream = MarketStream::new("ws://localhost:9999");
        stream
            .subscribe(&["005930".to_string()])
            .await
            .unwrap();

        let state = stream.handle.state.read().await;
        assert_eq!(state.codes(), vec!["005930"]);
    }

    #[tokio::test]
    async fn test_subscribe_after_close_is_rejected() {
        let stream = MarketStream::new("ws://localhost:9999");
        stream.close().await;

        assert_eq!(stream.status().await, ConnectionStatus::Closed);
        let result = stream.subscribe(&["005930".to_string()]).await;
        assert!(matches!(result, Err(StreamError::Closed)));
    }

    #[tokio::test]
    async fn test_handle_subscribe_while_open_queues_frame() {
        let mut stream = MarketStream::new("ws://localhost:9999");
        let handle = stream.handle();

        {
            let mut state = handle.state.write().await;
            state.set_status(ConnectionStatus::Connecting);
            state.set_status(ConnectionStatus::Open);
        }

        handle
            .subscribe(&["005930".to_string()])
            .await
            .unwrap();

        let queued = stream
            .outbound_rx
            .as_mut()
            .and_then(|rx| rx.try_recv().ok());
        assert_eq!(
            queued,
            Some(ClientMessage::Subscribe {
                codes: vec!["005930".to_string()],
            })
        );

        handle
            .unsubscribe(&["005930".to_string()])
            .await
            .unwrap();

        let queued = stream
            .outbound_rx
            .as_mut()
            .and_then(|rx| rx.try_recv().ok());
        assert_eq!(
            queued,
            Some(ClientMessage::Unsubscribe {
                codes: vec!["005930".to_string()],
            })
        );
    }

    #[tokio::test]
    async fn test_handle_controls_stream_running_in_task() {
        let mut stream = MarketStream::new("ws://127.0.0.1:1");
        let handle = stream.handle();
        let task = tokio::spawn(async move { stream.run().await });

        // 연결 전 구독은 코드만 기억
        handle.subscribe(&["005930".to_string()]).await.unwrap();

        handle.close().await;
        let _ = task.await.unwrap();

        assert_eq!(handle.status().await, ConnectionStatus::Closed);
        let result = handle.subscribe(&["000660".to_string()]).await;
        assert!(matches!(result, Err(StreamError::Closed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_exhausts_reconnect_attempts() {
        // 닫힌 포트로 연결: 매 시도가 즉시 실패하고 백오프는
        // 가상 시간으로 소진됨
        let mut stream = MarketStream::new("ws://127.0.0.1:1");
        let result = stream.run().await;

        assert!(matches!(result, Err(StreamError::Connect(_))));
        assert_eq!(stream.status().await, ConnectionStatus::Closed);
    }
}
