//! 보유 종목.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PortfolioError, PortfolioResult};

/// 포트폴리오의 한 행: 종목 코드, 수량, 주당 매입가.
///
/// 코드가 비어 있거나 수량이 0인 행은 비활성 행으로 집계에서 제외됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub quantity: u64,
    #[serde(default)]
    pub cost_per_share: Decimal,
}

impl Holding {
    /// 보유 종목을 생성합니다. 매입가가 음수면 설정 에러입니다.
    pub fn new(
        code: impl Into<String>,
        quantity: u64,
        cost_per_share: Decimal,
    ) -> PortfolioResult<Self> {
        let holding = Self {
            code: code.into().trim().to_string(),
            quantity,
            cost_per_share,
        };
        holding.validate()?;
        Ok(holding)
    }

    /// 매입가 제약을 확인합니다.
    pub fn validate(&self) -> PortfolioResult<()> {
        if self.cost_per_share < Decimal::ZERO {
            return Err(PortfolioError::Configuration(format!(
                "negative cost per share for '{}': {}",
                self.code, self.cost_per_share
            )));
        }
        Ok(())
    }

    /// 집계 대상 행인지 확인합니다.
    pub fn is_active(&self) -> bool {
        !self.code.trim().is_empty() && self.quantity > 0
    }

    /// 수량을 Decimal로 반환합니다.
    pub fn quantity_decimal(&self) -> Decimal {
        Decimal::from(self.quantity)
    }
}
