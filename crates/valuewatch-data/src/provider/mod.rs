//! 시세/펀더멘털 Provider 모듈.
//!
//! ## 추출 패턴
//! - `FieldPatterns`: 필드별 우선순위 패턴 체인 (CSS 셀렉터, 정규식)
//! - `ExtractionProfile`: 가격/EPS/BPS/PER/PBR/배당수익률 체인 묶음
//!
//! ## 네이버 금융
//! - `naver::naver_profile()`: `/item/main.naver` 페이지용 기본 체인
//!
//! ## 수집기
//! - `HttpPageSource`: 종목 코드로 페이지를 GET 하는 소스
//! - `MarketDataFetcher`: 캐시 확인 → 요청 → 추출 → 캐시 저장

pub mod fetcher;
pub mod naver;
pub mod pattern;
pub mod source;

pub use fetcher::{MarketDataFetcher, MarketDatum};
pub use naver::naver_profile;
pub use pattern::{normalize_number, ExtractionPattern, ExtractionProfile, FieldPatterns};
pub use source::{HttpPageSource, PageSource};
