//! 포트폴리오 집계.
//!
//! 활성 행(코드가 있고 수량이 0보다 큰 행)만 집계합니다. 매입금액/평가금액이
//! 없는 행은 합계에 0으로 더해지지만 종목 수에는 포함됩니다.
//! 합계가 `Decimal` 범위를 넘으면 해당 합계와 그에 의존하는 값은 "값 없음"입니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::Holding;
use crate::types::{format_metric, format_percent, DecimalExt, Metric};
use crate::valuation::ValuationResult;

/// 포트폴리오 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// 집계된 종목 수
    pub count: usize,
    /// 매수 신호 종목 수
    pub signal_count: usize,
    pub total_cost: Metric,
    pub total_value: Metric,
    pub total_profit: Metric,
    /// 총 수익률 (총 매입금액이 0이면 없음)
    pub profit_pct: Metric,
}

impl std::fmt::Display for PortfolioSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "보유 종목: {}개 (매수 신호 {}개)", self.count, self.signal_count)?;
        writeln!(f, "총 매입금액: {}원", format_metric(self.total_cost, 0))?;
        writeln!(f, "총 평가금액: {}원", format_metric(self.total_value, 0))?;
        write!(
            f,
            "총 손익: {}원 ({})",
            format_metric(self.total_profit, 0),
            format_percent(self.profit_pct)
        )
    }
}

/// 저평가 신호 종목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndervaluedEntry {
    pub code: String,
    pub name: String,
}

/// 보유 종목과 평가 결과를 요약합니다.
pub fn summarize(rows: &[(Holding, ValuationResult)]) -> PortfolioSummary {
    let mut count = 0;
    let mut signal_count = 0;
    let mut total_cost = Some(Decimal::ZERO);
    let mut total_value = Some(Decimal::ZERO);

    for (holding, result) in rows.iter().filter(|(h, _)| h.is_active()) {
        count += 1;
        if result.buy_signal {
            signal_count += 1;
        }
        total_cost = checked_sum(total_cost, result.cost_basis);
        total_value = checked_sum(total_value, result.market_value);
        tracing::trace!(code = %holding.code, "row aggregated");
    }

    let total_profit = total_value
        .zip(total_cost)
        .and_then(|(value, cost)| value.checked_sub(cost));
    let profit_pct = total_profit
        .zip(total_cost)
        .and_then(|(profit, cost)| profit.safe_div(cost));

    PortfolioSummary {
        count,
        signal_count,
        total_cost,
        total_value,
        total_profit,
        profit_pct,
    }
}

/// 없는 값은 0으로 더합니다. 오버플로가 나면 이후 합계는 모두 `None`입니다.
fn checked_sum(total: Metric, value: Metric) -> Metric {
    total.and_then(|t| t.checked_add(value.unwrap_or(Decimal::ZERO)))
}

/// 매수 신호가 켜진 종목을 입력 순서대로 나열합니다.
pub fn list_undervalued(rows: &[(Holding, ValuationResult)]) -> Vec<UndervaluedEntry> {
    rows.iter()
        .filter(|(holding, result)| holding.is_active() && result.buy_signal)
        .map(|(holding, result)| UndervaluedEntry {
            code: holding.code.clone(),
            name: result.display_name().to_string(),
        })
        .collect()
}
