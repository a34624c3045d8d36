//! 저평가 매수 신호 판정.
//!
//! 규칙은 **OR(논리합)** 입니다. 활성화된 트리거 중 하나라도 충족되면 신호가
//! 켜지며, 가중 점수나 AND 조건이 아닙니다. 비교할 값이 하나도 없으면
//! 신호는 `false`입니다.
//!
//! 기본 트리거:
//! - 실현 PER < 섹터 적정 PER
//! - 실현 PBR < 섹터 적정 PBR
//! - 목표주가 > 현재가

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{PortfolioError, PortfolioResult};
use crate::valuation::ValuationResult;

/// 개별 신호 트리거.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalTrigger {
    /// 실현 PER이 적정 PER보다 낮음
    PeBelowFair,
    /// 실현 PBR이 적정 PBR보다 낮음
    PbBelowFair,
    /// 목표주가가 현재가보다 높음
    TargetAbovePrice,
}

impl SignalTrigger {
    pub const ALL: [SignalTrigger; 3] = [
        SignalTrigger::PeBelowFair,
        SignalTrigger::PbBelowFair,
        SignalTrigger::TargetAbovePrice,
    ];

    /// 트리거 조건 충족 여부. 비교 값이 없으면 `false`.
    pub fn fires(&self, result: &ValuationResult) -> bool {
        match self {
            SignalTrigger::PeBelowFair => result.realized_pe.is_some_and(|pe| pe < result.fair_pe),
            SignalTrigger::PbBelowFair => result.realized_pb.is_some_and(|pb| pb < result.fair_pb),
            SignalTrigger::TargetAbovePrice => match (result.target_price, result.price) {
                (Some(target), Some(price)) => target > price,
                _ => false,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignalTrigger::PeBelowFair => "PER<적정",
            SignalTrigger::PbBelowFair => "PBR<적정",
            SignalTrigger::TargetAbovePrice => "목표가>현재가",
        }
    }
}

impl std::str::FromStr for SignalTrigger {
    type Err = PortfolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pe_below_fair" | "pe" => Ok(Self::PeBelowFair),
            "pb_below_fair" | "pb" => Ok(Self::PbBelowFair),
            "target_above_price" | "target" => Ok(Self::TargetAbovePrice),
            other => Err(PortfolioError::Configuration(format!(
                "unknown signal trigger: {}",
                other
            ))),
        }
    }
}

/// 활성화된 트리거 집합으로 정의되는 신호 규칙.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalRule {
    triggers: BTreeSet<SignalTrigger>,
}

impl Default for SignalRule {
    fn default() -> Self {
        Self {
            triggers: SignalTrigger::ALL.into_iter().collect(),
        }
    }
}

impl SignalRule {
    /// 트리거 목록으로 규칙을 생성합니다. 빈 목록은 설정 에러입니다.
    pub fn new(triggers: impl IntoIterator<Item = SignalTrigger>) -> PortfolioResult<Self> {
        let triggers: BTreeSet<_> = triggers.into_iter().collect();
        if triggers.is_empty() {
            return Err(PortfolioError::Configuration(
                "signal rule needs at least one trigger".to_string(),
            ));
        }
        Ok(Self { triggers })
    }

    pub fn triggers(&self) -> impl Iterator<Item = SignalTrigger> + '_ {
        self.triggers.iter().copied()
    }

    /// 하나라도 트리거가 충족되면 `true`.
    pub fn is_undervalued(&self, result: &ValuationResult) -> bool {
        self.triggers.iter().any(|t| t.fires(result))
    }

    /// 충족된 트리거 목록.
    pub fn fired_triggers(&self, result: &ValuationResult) -> Vec<SignalTrigger> {
        self.triggers.iter().copied().filter(|t| t.fires(result)).collect()
    }

    /// 결과의 `buy_signal`을 채워 반환합니다.
    pub fn apply(&self, mut result: ValuationResult) -> ValuationResult {
        result.buy_signal = self.is_undervalued(&result);
        result
    }
}

/// 기본 규칙(세 트리거 OR)으로 저평가 여부를 판정합니다.
pub fn is_undervalued(result: &ValuationResult) -> bool {
    SignalRule::default().is_undervalued(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SectorBenchmark;
    use rust_decimal_macros::dec;

    fn base() -> ValuationResult {
        ValuationResult::unavailable("005930", &SectorBenchmark::new("반도체", dec!(12), dec!(1.5)))
    }

    #[test]
    fn test_no_comparison_fields_never_signals() {
        let result = base();
        assert!(!is_undervalued(&result));
        assert!(SignalRule::default().fired_triggers(&result).is_empty());
    }

    #[test]
    fn test_any_single_trigger_is_enough() {
        let mut pe_only = base();
        pe_only.realized_pe = Some(dec!(8));
        pe_only.realized_pb = Some(dec!(3));
        assert!(is_undervalued(&pe_only));

        let mut pb_only = base();
        pb_only.realized_pb = Some(dec!(1.2));
        assert!(is_undervalued(&pb_only));

        let mut target_only = base();
        target_only.price = Some(dec!(70000));
        target_only.target_price = Some(dec!(80000));
        target_only.realized_pe = Some(dec!(30));
        assert!(is_undervalued(&target_only));
    }

    #[test]
    fn test_boundary_values_do_not_fire() {
        let mut at_fair = base();
        at_fair.realized_pe = Some(dec!(12));
        at_fair.realized_pb = Some(dec!(1.5));
        at_fair.price = Some(dec!(70000));
        at_fair.target_price = Some(dec!(70000));
        assert!(!is_undervalued(&at_fair));
    }

    #[test]
    fn test_target_without_price_does_not_fire() {
        let mut result = base();
        result.target_price = Some(dec!(100000));
        assert!(!SignalTrigger::TargetAbovePrice.fires(&result));
    }

    #[test]
    fn test_configurable_trigger_set() {
        let mut result = base();
        result.price = Some(dec!(70000));
        result.target_price = Some(dec!(90000));
        result.realized_pe = Some(dec!(20));

        let ratios_only =
            SignalRule::new([SignalTrigger::PeBelowFair, SignalTrigger::PbBelowFair]).unwrap();
        assert!(!ratios_only.is_undervalued(&result));
        assert!(SignalRule::default().is_undervalued(&result));
        assert_eq!(
            SignalRule::default().fired_triggers(&result),
            vec![SignalTrigger::TargetAbovePrice]
        );

        let applied = SignalRule::default().apply(result);
        assert!(applied.buy_signal);
    }

    #[test]
    fn test_empty_rule_rejected() {
        assert!(SignalRule::new(Vec::new()).is_err());
        assert!("nonsense".parse::<SignalTrigger>().is_err());
        assert_eq!("target".parse::<SignalTrigger>().unwrap(), SignalTrigger::TargetAbovePrice);
    }
}
