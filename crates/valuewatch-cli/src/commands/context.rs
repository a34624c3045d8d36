//! 명령 실행에 필요한 설정, 기준 데이터, 평가기 묶음.

use anyhow::{Context, Result};
use tracing::info;
use valuewatch_core::AppConfig;
use valuewatch_data::{PortfolioEvaluator, ReferenceData};

pub struct AppContext {
    pub reference: ReferenceData,
    pub evaluator: PortfolioEvaluator,
}

impl AppContext {
    /// 설정된 경로에서 기준 데이터를 읽고 평가기를 구성합니다.
    ///
    /// 기준 데이터 오류는 운영자 설정 오류이므로 명령 전체를 중단합니다.
    pub fn load(config: &AppConfig) -> Result<Self> {
        let reference =
            ReferenceData::load(&config.reference).context("Failed to load reference data")?;

        let evaluator = PortfolioEvaluator::from_config(config, &reference)
            .context("Failed to build evaluator")?;

        info!(
            holdings = reference.holdings.len(),
            instruments = reference.fundamentals.len(),
            sectors = reference.benchmarks.len(),
            "reference data ready"
        );

        Ok(Self {
            reference,
            evaluator,
        })
    }

    /// 보유 종목 코드 목록 (빈 코드 제외, 파일 순서).
    pub fn holding_codes(&self) -> Vec<String> {
        self.reference
            .holdings
            .iter()
            .filter(|h| !h.code.is_empty())
            .map(|h| h.code.clone())
            .collect()
    }
}
