//! 캐싱 레이어.
//!
//! - Freshness 캐시: (종류, 종목 코드) 키의 TTL 캐시. 수집기가 소유합니다.

pub mod freshness;

pub use freshness::{CacheKind, CacheStats, FreshnessCache, DEFAULT_TTL};
