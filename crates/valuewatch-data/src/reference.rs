//! 기준 데이터 / 보유 종목 TOML 로더.
//!
//! 파일 형식:
//! ```toml
//! # fundamentals.toml
//! [[instrument]]
//! code = "005930"
//! sector = "반도체"
//! name = "삼성전자"
//! eps = "5000"
//! last_updated = "2024-12-31"
//!
//! # benchmarks.toml
//! [[sector]]
//! sector = "반도체"
//! fair_pe = "12"
//! fair_pb = "1.5"
//!
//! # holdings.toml
//! [[holding]]
//! code = "005930"
//! quantity = 10
//! cost_per_share = "65000"
//! ```
//!
//! 읽기/디코딩/검증 실패는 모두 운영자 설정 오류로 취급됩니다.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use tracing::info;
use valuewatch_core::{
    Holding, InMemoryBenchmarkStore, InMemoryFundamentalsStore, InstrumentFundamentals,
    ReferenceConfig, SectorBenchmark,
};

use crate::error::{DataError, Result};

const INLINE_SOURCE: &str = "<inline>";

#[derive(Debug, Deserialize)]
struct FundamentalsFile {
    #[serde(default)]
    instrument: Vec<InstrumentFundamentals>,
}

#[derive(Debug, Deserialize)]
struct BenchmarksFile {
    #[serde(default)]
    sector: Vec<SectorBenchmark>,
}

#[derive(Debug, Deserialize)]
struct HoldingsFile {
    #[serde(default)]
    holding: Vec<Holding>,
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn decode<T: DeserializeOwned>(text: &str, origin: &Path) -> Result<T> {
    toml::from_str(text).map_err(|source| DataError::Decode {
        path: origin.to_path_buf(),
        source,
    })
}

fn build_fundamentals(file: FundamentalsFile) -> Result<InMemoryFundamentalsStore> {
    Ok(InMemoryFundamentalsStore::from_entries(file.instrument)?)
}

fn build_benchmarks(file: BenchmarksFile) -> Result<InMemoryBenchmarkStore> {
    Ok(InMemoryBenchmarkStore::from_entries(file.sector)?)
}

fn build_holdings(file: HoldingsFile) -> Result<Vec<Holding>> {
    file.holding
        .into_iter()
        .map(|h| Holding::new(h.code, h.quantity, h.cost_per_share).map_err(DataError::from))
        .collect()
}

/// 펀더멘털 TOML 문자열을 파싱합니다.
pub fn parse_fundamentals(text: &str) -> Result<InMemoryFundamentalsStore> {
    build_fundamentals(decode(text, Path::new(INLINE_SOURCE))?)
}

/// 벤치마크 TOML 문자열을 파싱합니다.
pub fn parse_benchmarks(text: &str) -> Result<InMemoryBenchmarkStore> {
    build_benchmarks(decode(text, Path::new(INLINE_SOURCE))?)
}

/// 보유 종목 TOML 문자열을 파싱합니다. 파일 순서를 유지합니다.
pub fn parse_holdings(text: &str) -> Result<Vec<Holding>> {
    build_holdings(decode(text, Path::new(INLINE_SOURCE))?)
}

pub fn load_fundamentals(path: impl AsRef<Path>) -> Result<InMemoryFundamentalsStore> {
    let path = path.as_ref();
    let store = build_fundamentals(decode(&read(path)?, path)?)?;
    info!(path = %path.display(), instruments = store.len(), "fundamentals loaded");
    Ok(store)
}

pub fn load_benchmarks(path: impl AsRef<Path>) -> Result<InMemoryBenchmarkStore> {
    let path = path.as_ref();
    let store = build_benchmarks(decode(&read(path)?, path)?)?;
    info!(path = %path.display(), sectors = store.len(), "benchmarks loaded");
    Ok(store)
}

pub fn load_holdings(path: impl AsRef<Path>) -> Result<Vec<Holding>> {
    let path = path.as_ref();
    let holdings = build_holdings(decode(&read(path)?, path)?)?;
    info!(path = %path.display(), holdings = holdings.len(), "holdings loaded");
    Ok(holdings)
}

/// 설정된 경로에서 읽은 기준 데이터 일체.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub fundamentals: InMemoryFundamentalsStore,
    pub benchmarks: InMemoryBenchmarkStore,
    pub holdings: Vec<Holding>,
}

impl ReferenceData {
    pub fn load(config: &ReferenceConfig) -> Result<Self> {
        Ok(Self {
            fundamentals: load_fundamentals(&config.fundamentals_path)?,
            benchmarks: load_benchmarks(&config.benchmarks_path)?,
            holdings: load_holdings(&config.holdings_path)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use valuewatch_core::{BenchmarkStore, FundamentalsStore, PortfolioError};

    #[test]
    fn test_parse_fundamentals() {
        let store = parse_fundamentals(
            r#"
[[instrument]]
code = "005930"
sector = "반도체"
name = "삼성전자"
eps = "5000"
bps = "50000"
dividend_per_share = "1444"
last_updated = "2024-12-31"

[[instrument]]
code = "035420"
sector = "인터넷"
"#,
        )
        .unwrap();

        let samsung = store.fundamentals("005930").unwrap();
        assert_eq!(samsung.eps, Some(dec!(5000)));
        assert_eq!(samsung.roe_percent, None);
        assert!(samsung.last_updated.is_some());
        assert_eq!(store.fundamentals("035420").unwrap().eps, None);
    }

    #[test]
    fn test_parse_benchmarks_rejects_malformed_table() {
        let store = parse_benchmarks(
            r#"
[[sector]]
sector = "반도체"
fair_pe = "12"
fair_pb = "1.5"
"#,
        )
        .unwrap();
        assert_eq!(store.resolve("반도체").fair_pe, dec!(12));
        assert_eq!(store.resolve("조선").fair_pe, dec!(15));

        let negative = parse_benchmarks(
            r#"
[[sector]]
sector = "반도체"
fair_pe = "-1"
fair_pb = "1.5"
"#,
        );
        let err: PortfolioError = negative.unwrap_err().into();
        assert!(err.is_fatal());

        let missing_field = parse_benchmarks("[[sector]]\nsector = \"반도체\"\n");
        assert!(matches!(missing_field, Err(DataError::Decode { .. })));
    }

    #[test]
    fn test_parse_holdings_keeps_order_and_validates() {
        let holdings = parse_holdings(
            r#"
[[holding]]
code = " 000660 "
quantity = 3
cost_per_share = "120000"

[[holding]]
code = "005930"
quantity = 0
cost_per_share = "65000"
"#,
        )
        .unwrap();
        assert_eq!(holdings[0].code, "000660");
        assert!(!holdings[1].is_active());

        let negative = parse_holdings("[[holding]]\ncode = \"A\"\nquantity = 1\ncost_per_share = \"-5\"\n");
        assert!(matches!(negative, Err(DataError::Invalid(PortfolioError::Configuration(_)))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_benchmarks("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
