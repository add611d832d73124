//! 실시간 서버와 주고받는 메시지 타입.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 클라이언트 → 서버 메시지.
///
/// `{"type":"SUBSCRIBE","codes":["005930", ...]}` 형태로 직렬화됩니다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "SUBSCRIBE")]
    Subscribe { codes: Vec<String> },
    #[serde(rename = "UNSUBSCRIBE")]
    Unsubscribe { codes: Vec<String> },
}

/// 서버 → 클라이언트 시세 틱.
///
/// 종목 코드 외의 필드는 프로바이더 정의이므로 그대로 전달합니다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tick {
    pub code: String,
    #[serde(flatten)]
    pub data: serde_json::Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_wire_format() {
        let msg = ClientMessage::Subscribe {
            codes: vec!["005930".to_string()],
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"SUBSCRIBE","codes":["005930"]}"#);
    }

    #[test]
    fn test_tick_keeps_provider_fields() {
        let tick: Tick = serde_json::from_str(
            r#"{"code": "005930", "price": "70500", "change_rate": "+3.2%"}"#,
        )
        .unwrap();
        assert_eq!(tick.code, "005930");
        assert_eq!(tick.data["price"], "70500");
    }
}
