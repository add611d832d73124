//! 클라이언트 측 상태 저장소.
//!
//! 전역 싱글톤 대신 명시적으로 주입되는 컨테이너입니다. 동기
//! RwLock으로 보호되며 임계 구역은 모두 짧은 복사/교체입니다.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// 증권 계좌.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub account_no: String,
    pub name: String,
}

#[derive(Debug, Default)]
struct AccountState {
    accounts: Vec<Account>,
    selected: Option<Account>,
}

/// 계좌 목록 + 선택 계좌 저장소.
#[derive(Debug, Default)]
pub struct AccountStore {
    state: RwLock<AccountState>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 계좌 목록 교체.
    ///
    /// 기존 선택 계좌가 새 목록에 없으면 첫 계좌가 선택됩니다.
    pub fn set_accounts(&self, accounts: Vec<Account>) {
        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let selected = state
            .selected
            .take()
            .filter(|s| accounts.iter().any(|a| a.account_no == s.account_no))
            .or_else(|| accounts.first().cloned());

        state.accounts = accounts;
        state.selected = selected;
    }

    /// 계좌 선택. 목록에 없는 계좌면 선택이 바뀌지 않고 `false`.
    pub fn select(&self, account_no: &str) -> bool {
        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match state.accounts.iter().find(|a| a.account_no == account_no) {
            Some(account) => {
                state.selected = Some(account.clone());
                true
            }
            None => false,
        }
    }

    pub fn selected(&self) -> Option<Account> {
        match self.state.read() {
            Ok(guard) => guard.selected.clone(),
            Err(poisoned) => poisoned.into_inner().selected.clone(),
        }
    }

    pub fn accounts(&self) -> Vec<Account> {
        match self.state.read() {
            Ok(guard) => guard.accounts.clone(),
            Err(poisoned) => poisoned.into_inner().accounts.clone(),
        }
    }
}

/// 호가 1단계 (가격/잔량, 원문 문자열 그대로).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceLevel {
    pub price: String,
    pub quantity: String,
}

/// 호가창 스냅샷.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderBookSnapshot {
    pub code: String,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

/// 최신 호가창 스냅샷 저장소.
#[derive(Debug, Default)]
pub struct OrderBookStore {
    snapshot: RwLock<Option<OrderBookSnapshot>>,
}

impl OrderBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, snapshot: OrderBookSnapshot) {
        match self.snapshot.write() {
            Ok(mut guard) => *guard = Some(snapshot),
            Err(poisoned) => *poisoned.into_inner() = Some(snapshot),
        }
    }

    pub fn clear(&self) {
        match self.snapshot.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    pub fn get(&self) -> Option<OrderBookSnapshot> {
        match self.snapshot.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(no: &str) -> Account {
        Account {
            account_no: no.to_string(),
            name: format!("계좌 {}", no),
        }
    }

    #[test]
    fn test_set_accounts_selects_first_by_default() {
        let store = AccountStore::new();
        store.set_accounts(vec![account("1111"), account("2222")]);

        assert_eq!(store.selected().map(|a| a.account_no), Some("1111".to_string()));
    }

    #[test]
    fn test_select_keeps_selection_across_refresh() {
        let store = AccountStore::new();
        store.set_accounts(vec![account("1111"), account("2222")]);
        assert!(store.select("2222"));

        // 같은 계좌가 남아 있는 목록 갱신은 선택 유지
        store.set_accounts(vec![account("2222"), account("3333")]);
        assert_eq!(store.selected().map(|a| a.account_no), Some("2222".to_string()));

        // 선택 계좌가 사라지면 첫 계좌로 돌아감
        store.set_accounts(vec![account("4444")]);
        assert_eq!(store.selected().map(|a| a.account_no), Some("4444".to_string()));
    }

    #[test]
    fn test_select_unknown_account_is_rejected() {
        let store = AccountStore::new();
        store.set_accounts(vec![account("1111")]);

        assert!(!store.select("9999"));
        assert_eq!(store.selected().map(|a| a.account_no), Some("1111".to_string()));
    }

    #[test]
    fn test_order_book_set_and_clear() {
        let store = OrderBookStore::new();
        assert!(store.get().is_none());

        store.set(OrderBookSnapshot {
            code: "005930".to_string(),
            bids: vec![PriceLevel {
                price: "70400".to_string(),
                quantity: "1200".to_string(),
            }],
            asks: vec![],
        });
        assert_eq!(store.get().map(|s| s.code), Some("005930".to_string()));

        store.clear();
        assert!(store.get().is_none());
    }
}
