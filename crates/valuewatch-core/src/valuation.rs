//! 밸류에이션 엔진.
//!
//! 보유 종목, 펀더멘털, 섹터 벤치마크, 현재가를 결합해 이론가와 실현 배수,
//! 배당수익률, 손익을 계산하는 순수 함수입니다. 입력이 없거나 0이면 해당
//! 지표는 에러 대신 `None`(값 없음)이 됩니다.
//!
//! | 지표 | 계산식 |
//! |------|--------|
//! | PER 이론가 | 적정 PER × EPS |
//! | PBR 이론가 | 적정 PBR × BPS |
//! | 실현 PER | 현재가 / EPS (EPS ≤ 0 이면 없음) |
//! | 실현 PBR | 현재가 / BPS (BPS ≤ 0 이면 없음) |
//! | 배당수익률 | 주당배당금 / 현재가 |
//! | ROE | ROE(%) / 100 |
//! | 평가금액 | 수량 × 현재가 |
//! | 매입금액 | 수량 × 매입가 |
//! | 손익 | 평가금액 − 매입금액 |
//! | 수익률 | 손익 / 매입금액 |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Holding, InstrumentFundamentals, QuoteSnapshot, SectorBenchmark};
use crate::types::{DecimalExt, Metric};

/// 보유 종목 하나의 파생 지표. 저장되지 않고 매번 다시 계산됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub code: String,
    pub name: Option<String>,
    pub sector: Option<String>,

    /// 계산에 사용된 현재가
    pub price: Metric,
    /// 적용된 섹터 적정 PER
    pub fair_pe: Decimal,
    /// 적용된 섹터 적정 PBR
    pub fair_pb: Decimal,
    /// 애널리스트 목표주가
    pub target_price: Metric,

    pub theoretical_price_pe: Metric,
    pub theoretical_price_pb: Metric,
    pub realized_pe: Metric,
    pub realized_pb: Metric,
    /// 배당수익률 (0.03 = 3%)
    pub dividend_yield: Metric,
    /// ROE (0.12 = 12%)
    pub roe: Metric,
    /// 목표주가 대비 상승여력 (0.2 = 20%)
    pub upside_pct: Metric,

    pub market_value: Metric,
    pub cost_basis: Metric,
    pub profit_abs: Metric,
    pub profit_pct: Metric,

    pub buy_signal: bool,
}

impl ValuationResult {
    /// 모든 지표가 없는 결과. 펀더멘털이 없는 종목에 사용됩니다.
    pub fn unavailable(code: impl Into<String>, benchmark: &SectorBenchmark) -> Self {
        Self {
            code: code.into(),
            name: None,
            sector: None,
            price: None,
            fair_pe: benchmark.fair_pe,
            fair_pb: benchmark.fair_pb,
            target_price: None,
            theoretical_price_pe: None,
            theoretical_price_pb: None,
            realized_pe: None,
            realized_pb: None,
            dividend_yield: None,
            roe: None,
            upside_pct: None,
            market_value: None,
            cost_basis: None,
            profit_abs: None,
            profit_pct: None,
            buy_signal: false,
        }
    }

    /// 표시용 종목명 (없으면 빈 문자열).
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// 보유 종목 하나를 평가합니다.
///
/// `buy_signal`은 항상 `false`로 반환되며, 신호 판정은
/// [`crate::signal::SignalRule::apply`]가 담당합니다.
pub fn evaluate(
    holding: &Holding,
    fundamentals: Option<&InstrumentFundamentals>,
    benchmark: &SectorBenchmark,
    quote: Option<&QuoteSnapshot>,
) -> ValuationResult {
    let Some(fundamentals) = fundamentals else {
        return ValuationResult::unavailable(holding.code.clone(), benchmark);
    };

    let price = quote.and_then(|q| q.price);
    let quantity = holding.quantity_decimal();

    let theoretical_price_pe = fundamentals.eps.and_then(|eps| benchmark.fair_pe.safe_mul(eps));
    let theoretical_price_pb = fundamentals.bps.and_then(|bps| benchmark.fair_pb.safe_mul(bps));

    let realized_pe = ratio_over_positive(price, fundamentals.eps);
    let realized_pb = ratio_over_positive(price, fundamentals.bps);

    let dividend_yield = match (fundamentals.dividend_per_share, price) {
        (Some(dps), Some(p)) => dps.safe_div(p),
        _ => None,
    };

    let roe = fundamentals
        .roe_percent
        .and_then(|r| r.safe_div(Decimal::ONE_HUNDRED));

    let upside_pct = match (fundamentals.analyst_target_price, price) {
        (Some(target), Some(p)) => target.safe_div(p).map(|r| r - Decimal::ONE),
        _ => None,
    };

    let cost_basis = quantity.safe_mul(holding.cost_per_share);
    let market_value = price.and_then(|p| quantity.safe_mul(p));
    let profit_abs = match (market_value, cost_basis) {
        (Some(mv), Some(cb)) => mv.checked_sub(cb),
        _ => None,
    };
    let profit_pct = match (profit_abs, cost_basis) {
        (Some(profit), Some(cb)) => profit.safe_div(cb),
        _ => None,
    };

    ValuationResult {
        code: holding.code.clone(),
        name: non_empty(&fundamentals.name),
        sector: non_empty(&fundamentals.sector),
        price,
        fair_pe: benchmark.fair_pe,
        fair_pb: benchmark.fair_pb,
        target_price: fundamentals.analyst_target_price,
        theoretical_price_pe,
        theoretical_price_pb,
        realized_pe,
        realized_pb,
        dividend_yield,
        roe,
        upside_pct,
        market_value,
        cost_basis,
        profit_abs,
        profit_pct,
        buy_signal: false,
    }
}

/// 가격 / 주당지표. 주당지표가 0 이하이면 배수가 의미 없으므로 `None`.
fn ratio_over_positive(price: Metric, per_share: Metric) -> Metric {
    match (price, per_share) {
        (Some(p), Some(v)) if v > Decimal::ZERO => p.safe_div(v),
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SectorBenchmark;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn samsung() -> InstrumentFundamentals {
        InstrumentFundamentals::new("005930", "반도체")
            .with_name("삼성전자")
            .with_eps(dec!(5000))
            .with_bps(dec!(50000))
            .with_dividend(dec!(1400))
            .with_roe(dec!(10))
            .with_target_price(dec!(90000))
    }

    fn holding() -> Holding {
        Holding::new("005930", 10, dec!(60000)).unwrap()
    }

    #[test]
    fn test_full_valuation() {
        let bench = SectorBenchmark::new("반도체", dec!(12), dec!(1.5));
        let quote = QuoteSnapshot::new("005930", dec!(70000));

        let result = evaluate(&holding(), Some(&samsung()), &bench, Some(&quote));

        assert_eq!(result.name.as_deref(), Some("삼성전자"));
        assert_eq!(result.theoretical_price_pe, Some(dec!(60000)));
        assert_eq!(result.theoretical_price_pb, Some(dec!(75000)));
        assert_eq!(result.realized_pe, Some(dec!(14)));
        assert_eq!(result.realized_pb, Some(dec!(1.4)));
        assert_eq!(result.dividend_yield, Some(dec!(0.02)));
        assert_eq!(result.roe, Some(dec!(0.1)));
        assert_eq!(result.cost_basis, Some(dec!(600000)));
        assert_eq!(result.market_value, Some(dec!(700000)));
        assert_eq!(result.profit_abs, Some(dec!(100000)));
        assert_eq!(result.profit_pct.map(|p| p.round_dp(4)), Some(dec!(0.1667)));
        assert_eq!(result.upside_pct.map(|p| p.round_dp(4)), Some(dec!(0.2857)));
        assert!(!result.buy_signal);
    }

    #[test]
    fn test_missing_quote_keeps_static_metrics() {
        let bench = SectorBenchmark::fallback("반도체");
        let result = evaluate(&holding(), Some(&samsung()), &bench, None);

        assert_eq!(result.theoretical_price_pe, Some(dec!(75000)));
        assert_eq!(result.cost_basis, Some(dec!(600000)));
        assert_eq!(result.realized_pe, None);
        assert_eq!(result.dividend_yield, None);
        assert_eq!(result.market_value, None);
        assert_eq!(result.profit_abs, None);
        assert_eq!(result.profit_pct, None);
    }

    #[test]
    fn test_unavailable_quote_snapshot_matches_missing_quote() {
        let bench = SectorBenchmark::fallback("반도체");
        let quote = QuoteSnapshot::unavailable("005930");

        let with_snapshot = evaluate(&holding(), Some(&samsung()), &bench, Some(&quote));
        let without = evaluate(&holding(), Some(&samsung()), &bench, None);

        assert_eq!(with_snapshot, without);
    }

    #[test]
    fn test_missing_fundamentals_is_all_unavailable() {
        let bench = SectorBenchmark::fallback("");
        let quote = QuoteSnapshot::new("999999", dec!(1000));

        let result = evaluate(&holding(), None, &bench, Some(&quote));

        assert_eq!(result, ValuationResult::unavailable("005930", &bench));
        assert_eq!(result.cost_basis, None);
        assert!(!result.buy_signal);
    }

    #[test]
    fn test_zero_price_and_zero_cost() {
        let bench = SectorBenchmark::fallback("반도체");
        let quote = QuoteSnapshot::new("005930", Decimal::ZERO);
        let free = Holding::new("005930", 10, Decimal::ZERO).unwrap();

        let result = evaluate(&free, Some(&samsung()), &bench, Some(&quote));

        assert_eq!(result.dividend_yield, None);
        assert_eq!(result.upside_pct, None);
        assert_eq!(result.market_value, Some(Decimal::ZERO));
        assert_eq!(result.cost_basis, Some(Decimal::ZERO));
        assert_eq!(result.profit_abs, Some(Decimal::ZERO));
        assert_eq!(result.profit_pct, None);
    }

    #[test]
    fn test_negative_eps_has_no_realized_pe() {
        let bench = SectorBenchmark::fallback("바이오");
        let quote = QuoteSnapshot::new("000001", dec!(10000));
        let loss_maker = InstrumentFundamentals::new("000001", "바이오").with_eps(dec!(-300));

        let result = evaluate(&holding(), Some(&loss_maker), &bench, Some(&quote));

        assert_eq!(result.realized_pe, None);
        assert_eq!(result.theoretical_price_pe, Some(dec!(-4500)));
    }

    proptest! {
        #[test]
        fn prop_zero_eps_never_yields_realized_pe(
            price in 1i64..10_000_000,
            qty in 0u64..100_000,
            bps in 0i64..1_000_000,
        ) {
            let fundamentals = InstrumentFundamentals::new("X", "any")
                .with_eps(Decimal::ZERO)
                .with_bps(Decimal::from(bps));
            let holding = Holding::new("X", qty, Decimal::from(price)).unwrap();
            let quote = QuoteSnapshot::new("X", Decimal::from(price));

            let result = evaluate(
                &holding,
                Some(&fundamentals),
                &SectorBenchmark::fallback("any"),
                Some(&quote),
            );

            prop_assert_eq!(result.realized_pe, None);
            if bps == 0 {
                prop_assert_eq!(result.realized_pb, None);
            }
        }
    }
}
