//! 시세 수집, 신선도 캐시, 평가 파이프라인.
//!
//! 이 crate는 다음을 제공합니다:
//! - (종류, 코드) 키의 TTL 캐시
//! - 필드별 추출 패턴 체인 (CSS 셀렉터 → 정규식 대체 패턴)
//! - 캐시를 소유하는 시세/펀더멘털 수집기
//! - 기준 데이터/보유 종목 파일 로더
//! - 행 단위 평가, 병렬 일괄 평가, 캐시 새로고침

pub mod cache;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod reference;

pub use cache::{CacheKind, CacheStats, FreshnessCache, DEFAULT_TTL};
pub use error::{DataError, FetchError, FetchErrorKind, Result};
pub use pipeline::{PortfolioEvaluator, RefreshReport, ReloadReport};
pub use provider::{
    ExtractionPattern, ExtractionProfile, FieldPatterns, HttpPageSource, MarketDataFetcher,
    PageSource,
};
pub use reference::{load_benchmarks, load_fundamentals, load_holdings, ReferenceData};
