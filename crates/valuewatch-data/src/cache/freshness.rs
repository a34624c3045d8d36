//! (종류, 코드) 키를 사용하는 TTL 캐시.
//!
//! 만료는 백그라운드 정리 없이 읽기 시점에 판정합니다. 항목은 삽입 후
//! TTL을 **초과**한 시점부터 만료로 간주합니다.
//!
//! 캐시 인스턴스는 전역 싱글턴이 아니라 명시적으로 주입되며,
//! `invalidate_all`은 이 인스턴스가 가진 항목만 지웁니다.
//!
//! 시계는 `tokio::time::Instant`를 사용하므로 테스트에서
//! `tokio::time::pause`/`advance`로 만료를 재현할 수 있습니다.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// 기본 TTL (1시간).
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// 캐시 데이터 종류.
///
/// 수동 입력 펀더멘털과 수집된 값이 섞이지 않도록 키 공간을 나눕니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Price,
    FundamentalsBundle,
}

impl CacheKind {
    pub const ALL: [CacheKind; 2] = [CacheKind::Price, CacheKind::FundamentalsBundle];
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKind::Price => write!(f, "price"),
            CacheKind::FundamentalsBundle => write!(f, "fundamentals"),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) > self.ttl
    }
}

type CacheKey = (CacheKind, String);

/// 캐시 통계.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub live_entries: usize,
}

/// 동시 읽기/쓰기에 안전한 TTL 캐시.
pub struct FreshnessCache<V> {
    namespace: String,
    default_ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry<V>>>,
}

impl<V: Clone> FreshnessCache<V> {
    /// 기본 TTL(1시간)로 캐시를 생성합니다.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self::with_ttl(namespace, DEFAULT_TTL)
    }

    /// 기본 TTL을 지정해 캐시를 생성합니다.
    pub fn with_ttl(namespace: impl Into<String>, default_ttl: Duration) -> Self {
        Self {
            namespace: namespace.into(),
            default_ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// 만료되지 않은 값을 반환합니다.
    pub fn get(&self, kind: CacheKind, code: &str) -> Option<V> {
        let now = Instant::now();
        let entries = self.read();
        entries
            .get(&(kind, code.trim().to_string()))
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone())
    }

    /// 지정한 TTL로 값을 저장합니다. 같은 키의 기존 값은 교체됩니다.
    pub fn put(&self, kind: CacheKind, code: &str, value: V, ttl: Duration) {
        let entry = CacheEntry {
            value,
            inserted_at: Instant::now(),
            ttl,
        };
        self.write().insert((kind, code.trim().to_string()), entry);
    }

    /// 기본 TTL로 값을 저장합니다.
    pub fn put_default(&self, kind: CacheKind, code: &str, value: V) {
        self.put(kind, code, value, self.default_ttl);
    }

    /// 한 항목을 제거합니다. 제거된 항목이 있으면 `true`.
    pub fn invalidate(&self, kind: CacheKind, code: &str) -> bool {
        self.write().remove(&(kind, code.trim().to_string())).is_some()
    }

    /// 한 종목의 모든 종류 항목을 제거하고 제거 수를 반환합니다.
    pub fn invalidate_code(&self, code: &str) -> usize {
        let code = code.trim();
        let mut entries = self.write();
        CacheKind::ALL
            .iter()
            .filter(|kind| entries.remove(&(**kind, code.to_string())).is_some())
            .count()
    }

    /// 이 캐시 인스턴스의 모든 항목을 제거합니다.
    pub fn invalidate_all(&self) -> usize {
        let mut entries = self.write();
        let removed = entries.len();
        entries.clear();
        debug!(namespace = %self.namespace, removed, "cache cleared");
        removed
    }

    /// 만료된 항목을 정리하고 정리 수를 반환합니다.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.read();
        let total = entries.len();
        let expired = entries.values().filter(|e| e.is_expired(now)).count();
        CacheStats {
            total_entries: total,
            expired_entries: expired,
            live_entries: total - expired,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, CacheEntry<V>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, CacheEntry<V>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V> fmt::Debug for FreshnessCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreshnessCache")
            .field("namespace", &self.namespace)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}
