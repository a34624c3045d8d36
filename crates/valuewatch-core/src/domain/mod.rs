//! 포트폴리오 밸류에이션 도메인 모델.
//!
//! - 종목 펀더멘털 (수동 관리 기준 데이터)
//! - 섹터 벤치마크 (적정 PER/PBR)
//! - 보유 종목
//! - 시세 스냅샷 및 외부 수집 펀더멘털 묶음

mod benchmark;
mod fundamentals;
mod holding;
mod quote;

pub use benchmark::*;
pub use fundamentals::*;
pub use holding::*;
pub use quote::*;
