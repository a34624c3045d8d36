//! 네이버 금융 종목 페이지용 추출 체인.
//!
//! `/item/main.naver` 페이지 한 장에서 현재가와 투자지표를 모두 얻습니다.
//! ID 기반 `em` 태그(`_per`, `_eps`, `_pbr`, `_dvr`)가 주 패턴이고,
//! 페이지 구조가 다른 종목(ETF, 우선주 등)을 위해 원문 정규식을 대체 패턴으로 둡니다.
//!
//! HTML 구조 예:
//! ```html
//! <p class="no_today"><em><span class="blind">70,000</span></em></p>
//! <table class="per_table">
//!   <tr><th>PER|EPS</th><td><em id="_per">14.00</em>배 l <em id="_eps">5,000</em>원</td></tr>
//!   <tr><th>PBR|BPS</th><td><em id="_pbr">1.40</em>배 l <em>50,000</em>원</td></tr>
//!   <tr><th>배당수익률</th><td><em id="_dvr">2.00</em>%</td></tr>
//! </table>
//! ```

use valuewatch_core::PortfolioResult;

use super::pattern::{ExtractionPattern, ExtractionProfile, FieldPatterns};

/// 네이버 금융 main 페이지 기본 추출 체인.
pub fn naver_profile() -> PortfolioResult<ExtractionProfile> {
    Ok(ExtractionProfile {
        price: FieldPatterns::new("price")
            .with(ExtractionPattern::css("p.no_today span.blind")?)
            .with(ExtractionPattern::regex(r"현재가\s*([0-9][0-9,]*)")?)
            .with(ExtractionPattern::regex(r#""now"\s*:\s*"?([0-9][0-9,.]*)"#)?),
        eps: FieldPatterns::new("eps")
            .with(ExtractionPattern::css("em#_eps")?)
            .with(ExtractionPattern::regex(
                r"(?s)EPS.{0,300}?<em[^>]*>\s*(-?[0-9][0-9,.]*)\s*</em>",
            )?),
        bps: FieldPatterns::new("bps")
            .with(ExtractionPattern::css("em#_pbr ~ em")?)
            .with(ExtractionPattern::regex(
                r"(?s)BPS.{0,400}?<em>\s*(-?[0-9][0-9,.]*)\s*</em>\s*원",
            )?),
        pe: FieldPatterns::new("pe")
            .with(ExtractionPattern::css("em#_per")?)
            .with(ExtractionPattern::regex(
                r"(?s)PER.{0,300}?<em[^>]*>\s*(-?[0-9][0-9,.]*)\s*</em>\s*배",
            )?),
        pb: FieldPatterns::new("pb")
            .with(ExtractionPattern::css("em#_pbr")?)
            .with(ExtractionPattern::regex(
                r"(?s)PBR.{0,300}?<em[^>]*>\s*(-?[0-9][0-9,.]*)\s*</em>\s*배",
            )?),
        dividend_yield: FieldPatterns::new("dividend_yield")
            .with(ExtractionPattern::css("em#_dvr")?)
            .with(ExtractionPattern::regex(
                r"(?s)배당수익률.{0,300}?<em[^>]*>\s*([0-9][0-9,.]*)\s*</em>",
            )?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::pattern::SourcePage;
    use rust_decimal_macros::dec;

    const MAIN_PAGE: &str = r#"
<html><body>
<div class="rate_info">
  <p class="no_today"><em class="no_up"><span class="blind">70,000</span></em></p>
</div>
<table class="per_table">
  <tr><th>PER l EPS(2024.12)</th>
      <td><em id="_per">14.00</em>배 <span class="bar">l</span> <em id="_eps">5,000</em>원</td></tr>
  <tr><th>PBR l BPS (2024.12)</th>
      <td><em id="_pbr">1.40</em>배 <span class="bar">l</span> <em>50,000</em>원</td></tr>
  <tr><th>배당수익률</th><td><em id="_dvr">2.00</em>%</td></tr>
</table>
</body></html>"#;

    const ALTERNATE_PAGE: &str = r#"
<html><body>
<dl class="blind"><dt>종목 시세 정보</dt><dd>현재가 8,150 전일대비 상승 50</dd></dl>
<table>
  <tr><th>PER</th><td><em class="v">9.80</em>배</td></tr>
  <tr><th>EPS</th><td><em class="v">832</em>원</td></tr>
</table>
</body></html>"#;

    #[test]
    fn test_primary_patterns() {
        let profile = naver_profile().unwrap();
        let page = SourcePage::parse(MAIN_PAGE);

        assert_eq!(profile.price.extract(&page), Some(dec!(70000)));
        assert_eq!(profile.pe.extract(&page), Some(dec!(14.00)));
        assert_eq!(profile.eps.extract(&page), Some(dec!(5000)));
        assert_eq!(profile.pb.extract(&page), Some(dec!(1.40)));
        assert_eq!(profile.bps.extract(&page), Some(dec!(50000)));
        assert_eq!(profile.dividend_yield.extract(&page), Some(dec!(2.00)));
    }

    #[test]
    fn test_fallback_patterns_on_alternate_markup() {
        let profile = naver_profile().unwrap();
        let page = SourcePage::parse(ALTERNATE_PAGE);

        assert_eq!(profile.price.extract(&page), Some(dec!(8150)));
        assert_eq!(profile.pe.extract(&page), Some(dec!(9.80)));
        assert_eq!(profile.eps.extract(&page), Some(dec!(832)));
        assert_eq!(profile.pb.extract(&page), None);
        assert_eq!(profile.bps.extract(&page), None);
    }
}
