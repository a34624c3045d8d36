//! 정밀한 금융 계산을 위한 Decimal 유틸리티.
//!
//! 계산 결과의 "값 없음"은 `Option<Decimal>`의 `None`으로 표현합니다.
//! 문자열 표식과 숫자가 섞여 이후 산술로 흘러가는 일은 없습니다.

use rust_decimal::{Decimal, RoundingStrategy};

/// 값이 없을 수 있는 계산 지표.
pub type Metric = Option<Decimal>;

/// 화면에 "값 없음"을 표시할 때 쓰는 표식.
pub const UNAVAILABLE_MARK: &str = "-";

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 0으로 나누거나 오버플로가 나면 `None`을 반환하는 나눗셈.
    fn safe_div(&self, rhs: Decimal) -> Metric;

    /// 오버플로 시 `None`을 반환하는 곱셈.
    fn safe_mul(&self, rhs: Decimal) -> Metric;

    /// 퍼센트 문자열로 변환합니다 (예: 0.0525 -> "5.25%"). 오버플로 시 `-`.
    fn to_percentage_string(&self) -> String;

    /// 반올림(0.5 올림)으로 지정 자릿수를 맞춥니다.
    fn round_half_up(&self, dp: u32) -> Decimal;
}

impl DecimalExt for Decimal {
    fn safe_div(&self, rhs: Decimal) -> Metric {
        if rhs.is_zero() {
            return None;
        }
        self.checked_div(rhs)
    }

    fn safe_mul(&self, rhs: Decimal) -> Metric {
        self.checked_mul(rhs)
    }

    fn to_percentage_string(&self) -> String {
        match self.checked_mul(Decimal::ONE_HUNDRED) {
            Some(pct) => format!("{:.2}%", pct.round_half_up(2)),
            None => UNAVAILABLE_MARK.to_string(),
        }
    }

    fn round_half_up(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// 지표를 소수점 `dp` 자리 문자열로 표시합니다. 값이 없으면 `-`.
pub fn format_metric(value: Metric, dp: u32) -> String {
    match value {
        Some(v) => format!("{:.*}", dp as usize, v.round_half_up(dp)),
        None => UNAVAILABLE_MARK.to_string(),
    }
}

/// 비율 지표를 퍼센트로 표시합니다. 값이 없으면 `-`.
pub fn format_percent(value: Metric) -> String {
    value
        .map(|v| v.to_percentage_string())
        .unwrap_or_else(|| UNAVAILABLE_MARK.to_string())
}
