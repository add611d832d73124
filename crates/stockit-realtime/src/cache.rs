//! 인메모리 TTL 요청 캐시.
//!
//! 같은 요청의 반복 조회를 줄이기 위한 staleTime 방식 캐시입니다.
//! `get`은 TTL 이내의 항목만 반환하며, 만료 항목은 `purge_expired`로
//! 정리합니다.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// TTL 기반 요청 캐시.
#[derive(Debug)]
pub struct RequestCache<T: Clone> {
    ttl: Duration,
    entries: RwLock<HashMap<String, (Instant, T)>>,
}

impl<T: Clone> RequestCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// TTL 이내의 항목만 반환.
    pub fn get(&self, key: &str) -> Option<T> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries
            .get(key)
            .filter(|(inserted, _)| inserted.elapsed() < self.ttl)
            .map(|(_, value)| value.clone())
    }

    pub fn insert(&self, key: impl Into<String>, value: T) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(key.into(), (Instant::now(), value));
    }

    /// 특정 키 무효화.
    pub fn invalidate(&self, key: &str) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.remove(key);
    }

    /// 만료된 항목 일괄 제거. 제거된 개수를 반환합니다.
    pub fn purge_expired(&self) -> usize {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = entries.len();
        entries.retain(|_, (inserted, _)| inserted.elapsed() < self.ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
