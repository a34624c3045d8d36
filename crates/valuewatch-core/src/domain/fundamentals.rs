//! 종목별 정적 펀더멘털과 조회 저장소.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{PortfolioError, PortfolioResult};

/// 수동으로 관리되는 종목 펀더멘털.
///
/// 수치 필드가 비어 있으면 "값 없음"이며 0과 구분됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentFundamentals {
    /// 종목 코드 (예: "005930")
    pub code: String,
    /// 섹터명 (벤치마크 조회 키)
    #[serde(default)]
    pub sector: String,
    /// 종목명
    #[serde(default)]
    pub name: String,
    /// 주당순이익 (원)
    #[serde(default)]
    pub eps: Option<Decimal>,
    /// 주당순자산 (원)
    #[serde(default)]
    pub bps: Option<Decimal>,
    /// 주당배당금 (원)
    #[serde(default)]
    pub dividend_per_share: Option<Decimal>,
    /// ROE (%, 예: 12.5)
    #[serde(default)]
    pub roe_percent: Option<Decimal>,
    /// 애널리스트 목표주가 (원)
    #[serde(default)]
    pub analyst_target_price: Option<Decimal>,
    /// 마지막 갱신일
    #[serde(default)]
    pub last_updated: Option<NaiveDate>,
}

impl InstrumentFundamentals {
    /// 코드와 섹터만 채운 빈 펀더멘털을 생성합니다.
    pub fn new(code: impl Into<String>, sector: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            sector: sector.into(),
            name: String::new(),
            eps: None,
            bps: None,
            dividend_per_share: None,
            roe_percent: None,
            analyst_target_price: None,
            last_updated: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_eps(mut self, eps: Decimal) -> Self {
        self.eps = Some(eps);
        self
    }

    pub fn with_bps(mut self, bps: Decimal) -> Self {
        self.bps = Some(bps);
        self
    }

    pub fn with_dividend(mut self, dividend_per_share: Decimal) -> Self {
        self.dividend_per_share = Some(dividend_per_share);
        self
    }

    pub fn with_roe(mut self, roe_percent: Decimal) -> Self {
        self.roe_percent = Some(roe_percent);
        self
    }

    pub fn with_target_price(mut self, target: Decimal) -> Self {
        self.analyst_target_price = Some(target);
        self
    }
}

/// 종목 코드 → 펀더멘털 읽기 전용 조회.
pub trait FundamentalsStore: Send + Sync {
    /// 코드에 해당하는 펀더멘털. 없으면 `None` (에러 아님).
    fn fundamentals(&self, code: &str) -> Option<&InstrumentFundamentals>;

    /// 등록된 전체 종목 코드.
    fn codes(&self) -> Vec<String>;
}

/// 메모리 기반 펀더멘털 저장소.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFundamentalsStore {
    entries: HashMap<String, InstrumentFundamentals>,
}

impl InMemoryFundamentalsStore {
    /// 펀더멘털 목록으로 저장소를 생성합니다.
    ///
    /// 코드가 비었거나 중복되면 설정 에러입니다.
    pub fn from_entries(
        entries: impl IntoIterator<Item = InstrumentFundamentals>,
    ) -> PortfolioResult<Self> {
        let mut map = HashMap::new();
        for entry in entries {
            let code = entry.code.trim().to_string();
            if code.is_empty() {
                return Err(PortfolioError::Configuration(
                    "fundamentals entry with empty code".to_string(),
                ));
            }
            if map.contains_key(&code) {
                return Err(PortfolioError::Configuration(format!(
                    "duplicate fundamentals entry: {}",
                    code
                )));
            }
            map.insert(code, entry);
        }
        Ok(Self { entries: map })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FundamentalsStore for InMemoryFundamentalsStore {
    fn fundamentals(&self, code: &str) -> Option<&InstrumentFundamentals> {
        self.entries.get(code.trim())
    }

    fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.entries.keys().cloned().collect();
        codes.sort();
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_lookup_trims_code() {
        let store = InMemoryFundamentalsStore::from_entries(vec![
            InstrumentFundamentals::new("005930", "반도체").with_eps(dec!(5000)),
        ])
        .unwrap();

        assert!(store.fundamentals(" 005930 ").is_some());
        assert!(store.fundamentals("000660").is_none());
    }

    #[test]
    fn test_duplicate_code_is_configuration_error() {
        let result = InMemoryFundamentalsStore::from_entries(vec![
            InstrumentFundamentals::new("005930", "반도체"),
            InstrumentFundamentals::new("005930", "전자"),
        ]);

        assert!(matches!(result, Err(PortfolioError::Configuration(_))));
    }
}
