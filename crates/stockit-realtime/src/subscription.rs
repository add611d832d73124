//! 구독 상태 머신 (순수 코어).
//!
//! 연결 상태 전이와 구독 코드 집합을 IO 없이 관리합니다.
//! `Idle → Connecting → Open`, `Closed`는 모든 상태에서 도달 가능하며
//! 종결 상태입니다.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::protocol::ClientMessage;

/// 연결 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Idle,
    Connecting,
    Open,
    Closed,
}

/// 구독 상태.
///
/// 구독 요청은 `Open`이 아니면 코드만 기억하고 메시지를 만들지
/// 않습니다. `Open` 전이 시 전체 코드 집합을 한 번에 재구독합니다.
#[derive(Debug, Clone)]
pub struct SubscriptionState {
    status: ConnectionStatus,
    codes: BTreeSet<String>,
}

impl Default for SubscriptionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionState {
    pub fn new() -> Self {
        Self {
            status: ConnectionStatus::Idle,
            codes: BTreeSet::new(),
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Open
    }

    /// 현재 구독 중인 코드 (정렬 순서).
    pub fn codes(&self) -> Vec<String> {
        self.codes.iter().cloned().collect()
    }

    /// 상태 전이.
    ///
    /// `Open`으로 전이하면 기억해 둔 전체 코드 집합에 대한 재구독
    /// 메시지를 반환합니다. `Closed`는 종결 상태이며 이후의 전이는
    /// 무시됩니다.
    pub fn set_status(&mut self, status: ConnectionStatus) -> Option<ClientMessage> {
        if self.status == ConnectionStatus::Closed {
            return None;
        }
        self.status = status;

        if status == ConnectionStatus::Open && !self.codes.is_empty() {
            return Some(ClientMessage::Subscribe {
                codes: self.codes(),
            });
        }
        None
    }

    /// 종목 구독.
    ///
    /// 코드는 항상 집합에 추가되지만 메시지는 `Open`에서 새 코드가
    /// 있을 때만 생성됩니다. 중복 구독은 메시지를 만들지 않습니다.
    pub fn subscribe(&mut self, codes: &[String]) -> Option<ClientMessage> {
        if self.status == ConnectionStatus::Closed {
            return None;
        }

        let mut added = Vec::new();
        for code in codes {
            if self.codes.insert(code.clone()) {
                added.push(code.clone());
            }
        }

        if self.status == ConnectionStatus::Open && !added.is_empty() {
            Some(ClientMessage::Subscribe { codes: added })
        } else {
            None
        }
    }

    /// 종목 구독 해제.
    pub fn unsubscribe(&mut self, codes: &[String]) -> Option<ClientMessage> {
        if self.status == ConnectionStatus::Closed {
            return None;
        }

        let mut removed = Vec::new();
        for code in codes {
            if self.codes.remove(code) {
                removed.push(code.clone());
            }
        }

        if self.status == ConnectionStatus::Open && !removed.is_empty() {
            Some(ClientMessage::Unsubscribe { codes: removed })
        } else {
            None
        }
    }

    /// 종결. 이후의 구독/전이는 모두 무시됩니다.
    pub fn close(&mut self) {
        self.status = ConnectionStatus::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_subscribe_while_connecting_produces_no_message() {
        let mut state = SubscriptionState::new();
        state.set_status(ConnectionStatus::Connecting);

        assert!(state.subscribe(&codes(&["005930"])).is_none());
        assert_eq!(state.codes(), vec!["005930"]);
    }

    #[test]
    fn test_open_transition_replays_pending_codes_once() {
        let mut state = SubscriptionState::new();
        state.set_status(ConnectionStatus::Connecting);
        state.subscribe(&codes(&["005930"]));

        let replay = state.set_status(ConnectionStatus::Open);
        assert_eq!(
            replay,
            Some(ClientMessage::Subscribe {
                codes: codes(&["005930"])
            })
        );
        // 이미 구독된 코드의 재구독은 메시지를 만들지 않음
        assert!(state.subscribe(&codes(&["005930"])).is_none());
    }

    #[test]
    fn test_subscribe_while_open_sends_new_codes_only() {
        let mut state = SubscriptionState::new();
        state.set_status(ConnectionStatus::Open);
        state.subscribe(&codes(&["005930"]));

        let msg = state.subscribe(&codes(&["005930", "000660"]));
        assert_eq!(
            msg,
            Some(ClientMessage::Subscribe {
                codes: codes(&["000660"])
            })
        );
    }

    #[test]
    fn test_reconnect_replays_full_code_set() {
        let mut state = SubscriptionState::new();
        state.set_status(ConnectionStatus::Open);
        state.subscribe(&codes(&["005930"]));
        state.subscribe(&codes(&["000660"]));

        // 연결 끊김 후 재연결
        state.set_status(ConnectionStatus::Connecting);
        let replay = state.set_status(ConnectionStatus::Open);
        assert_eq!(
            replay,
            Some(ClientMessage::Subscribe {
                codes: codes(&["000660", "005930"])
            })
        );
    }

    #[test]
    fn test_closed_is_terminal() {
        let mut state = SubscriptionState::new();
        state.set_status(ConnectionStatus::Open);
        state.close();

        assert_eq!(state.status(), ConnectionStatus::Closed);
        assert!(state.subscribe(&codes(&["005930"])).is_none());
        assert!(state.set_status(ConnectionStatus::Open).is_none());
        assert_eq!(state.status(), ConnectionStatus::Closed);
    }

    #[test]
    fn test_unsubscribe_while_open() {
        let mut state = SubscriptionState::new();
        state.set_status(ConnectionStatus::Open);
        state.subscribe(&codes(&["005930", "000660"]));

        let msg = state.unsubscribe(&codes(&["005930"]));
        assert_eq!(
            msg,
            Some(ClientMessage::Unsubscribe {
                codes: codes(&["005930"])
            })
        );
        assert_eq!(state.codes(), vec!["000660"]);
        // 없는 코드 해제는 no-op
        assert!(state.unsubscribe(&codes(&["005930"])).is_none());
    }
}
