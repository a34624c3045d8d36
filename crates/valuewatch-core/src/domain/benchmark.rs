//! 섹터별 적정 배수 벤치마크.
//!
//! 벤치마크 행이 없는 섹터는 전역 기본값(PER 15, PBR 1.0)을 사용합니다.
//! 이 기본값 적용은 에러가 아니라 정상 규칙입니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{PortfolioError, PortfolioResult};

/// 벤치마크가 없을 때의 적정 PER.
pub const DEFAULT_FAIR_PE: Decimal = dec!(15);

/// 벤치마크가 없을 때의 적정 PBR.
pub const DEFAULT_FAIR_PB: Decimal = dec!(1.0);

/// 섹터 적정 PER/PBR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorBenchmark {
    pub sector: String,
    pub fair_pe: Decimal,
    pub fair_pb: Decimal,
    #[serde(default)]
    pub note: String,
}

impl SectorBenchmark {
    pub fn new(sector: impl Into<String>, fair_pe: Decimal, fair_pb: Decimal) -> Self {
        Self {
            sector: sector.into(),
            fair_pe,
            fair_pb,
            note: String::new(),
        }
    }

    /// 섹터에 대한 전역 기본 벤치마크.
    pub fn fallback(sector: impl Into<String>) -> Self {
        Self {
            sector: sector.into(),
            fair_pe: DEFAULT_FAIR_PE,
            fair_pb: DEFAULT_FAIR_PB,
            note: "default".to_string(),
        }
    }

    fn validate(&self) -> PortfolioResult<()> {
        if self.sector.trim().is_empty() {
            return Err(PortfolioError::Configuration(
                "benchmark row with empty sector".to_string(),
            ));
        }
        if self.fair_pe <= Decimal::ZERO || self.fair_pb <= Decimal::ZERO {
            return Err(PortfolioError::Configuration(format!(
                "benchmark for '{}' must have positive fair ratios (pe={}, pb={})",
                self.sector, self.fair_pe, self.fair_pb
            )));
        }
        Ok(())
    }
}

/// 섹터 → 벤치마크 읽기 전용 조회.
pub trait BenchmarkStore: Send + Sync {
    /// 등록된 벤치마크. 없으면 `None`.
    fn benchmark(&self, sector: &str) -> Option<&SectorBenchmark>;

    /// 벤치마크를 찾고, 없으면 기본값으로 대체합니다. 실패하지 않습니다.
    fn resolve(&self, sector: &str) -> SectorBenchmark {
        self.benchmark(sector)
            .cloned()
            .unwrap_or_else(|| SectorBenchmark::fallback(sector.trim()))
    }
}

/// 메모리 기반 벤치마크 저장소.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBenchmarkStore {
    entries: HashMap<String, SectorBenchmark>,
}

impl InMemoryBenchmarkStore {
    /// 벤치마크 목록으로 저장소를 생성합니다.
    ///
    /// 빈 섹터명, 중복 섹터, 0 이하의 적정 배수는 설정 에러입니다.
    pub fn from_entries(entries: impl IntoIterator<Item = SectorBenchmark>) -> PortfolioResult<Self> {
        let mut map = HashMap::new();
        for entry in entries {
            entry.validate()?;
            let key = entry.sector.trim().to_string();
            if map.insert(key.clone(), entry).is_some() {
                return Err(PortfolioError::Configuration(format!(
                    "duplicate benchmark sector: {}",
                    key
                )));
            }
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

impl BenchmarkStore for InMemoryBenchmarkStore {
    fn benchmark(&self, sector: &str) -> Option<&SectorBenchmark> {
        self.entries.get(sector.trim())
    }
}
