//! # ValueWatch Core
//!
//! 개인 주식 포트폴리오의 밸류에이션 핵심 도메인 모델과 순수 계산 로직을 제공합니다.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 종목 펀더멘털 / 섹터 벤치마크 / 보유 종목 모델과 조회 저장소
//! - 밸류에이션 엔진 (이론가, 실현 PER/PBR, 배당수익률, 손익)
//! - 저평가 신호 판정 (트리거 OR 규칙)
//! - 포트폴리오 집계
//! - 설정 관리 및 로깅 인프라

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod signal;
pub mod types;
pub mod valuation;

pub use aggregate::{list_undervalued, summarize, PortfolioSummary, UndervaluedEntry};
pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use signal::{is_undervalued, SignalRule, SignalTrigger};
pub use types::*;
pub use valuation::{evaluate, ValuationResult};
