//! 외부 소스에서 수집한 일시적 데이터.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 현재가 스냅샷. 캐시에만 보관됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub code: String,
    pub price: Option<Decimal>,
    pub fetched_at: DateTime<Utc>,
}

impl QuoteSnapshot {
    pub fn new(code: impl Into<String>, price: Decimal) -> Self {
        Self {
            code: code.into(),
            price: Some(price),
            fetched_at: Utc::now(),
        }
    }

    /// 수집에 실패한 종목의 스냅샷.
    pub fn unavailable(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            price: None,
            fetched_at: Utc::now(),
        }
    }
}

/// 소스 페이지에서 추출한 펀더멘털 묶음.
///
/// 각 필드는 독립적으로 존재/부재하며, 한 필드의 추출 실패가
/// 다른 필드를 막지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsBundle {
    pub code: String,
    pub eps: Option<Decimal>,
    pub bps: Option<Decimal>,
    pub pe: Option<Decimal>,
    pub pb: Option<Decimal>,
    /// 소스가 표시하는 배당수익률 (%)
    pub dividend_yield: Option<Decimal>,
}

impl FundamentalsBundle {
    pub fn empty(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    /// 추출된 필드 수.
    pub fn present_fields(&self) -> usize {
        [self.eps, self.bps, self.pe, self.pb, self.dividend_yield]
            .iter()
            .filter(|v| v.is_some())
            .count()
    }
}
