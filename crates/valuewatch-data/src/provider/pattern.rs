//! 필드별 추출 패턴 체인.
//!
//! 소스 페이지의 마크업은 종목마다 일관되지 않으므로, 각 필드는
//! 순서가 있는 패턴 목록을 가집니다. 첫 번째로 숫자 값을 만들어 낸 패턴이
//! 이기며, 어떤 패턴도 맞지 않으면 그 필드는 "값 없음"입니다.
//!
//! ```rust,ignore
//! let eps = FieldPatterns::new("eps")
//!     .with(ExtractionPattern::css("em#_eps")?)
//!     .with(ExtractionPattern::regex(r"EPS[^0-9-]*(-?[0-9,.]+)")?);
//! ```

use regex::Regex;
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use std::str::FromStr;
use tracing::{debug, trace};
use valuewatch_core::{PortfolioError, PortfolioResult};

/// 숫자 앞뒤에 붙는 통화/단위 표기.
const UNIT_TOKENS: [&str; 9] = ["KRW", "USD", "원", "배", "%", "₩", "￦", "$", "€"];

/// 추출 텍스트를 Decimal로 정규화합니다.
///
/// 공백, 천 단위 구분자, 통화/단위 표기를 제거한 뒤 남은 문자열 전체가
/// 숫자일 때만 값을 반환합니다. 숫자와 문자가 섞인 값은 거부합니다.
///
/// - "1,234,567" -> 1234567
/// - "₩ 70,000원" -> 70000
/// - "12.34%" -> 12.34
/// - "N/A", "-", "" -> None
pub fn normalize_number(text: &str) -> Option<Decimal> {
    let mut cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    for token in UNIT_TOKENS {
        cleaned = cleaned.replace(token, "");
    }

    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }

    Decimal::from_str(cleaned).ok()
}

/// 파싱된 소스 페이지. 원문과 DOM을 함께 보관합니다.
pub struct SourcePage<'a> {
    raw: &'a str,
    document: Html,
}

impl<'a> SourcePage<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            document: Html::parse_document(raw),
        }
    }
}

/// 단일 추출 패턴.
#[derive(Debug, Clone)]
pub enum ExtractionPattern {
    /// CSS 셀렉터의 `nth`번째 일치 요소 텍스트
    Css {
        selector: Selector,
        nth: usize,
        source: String,
    },
    /// 원문에 대한 정규식. 첫 번째 캡처 그룹(없으면 전체 일치)을 사용합니다.
    Regex(Regex),
}

impl ExtractionPattern {
    /// 첫 번째 일치 요소를 읽는 CSS 패턴.
    pub fn css(selector: &str) -> PortfolioResult<Self> {
        Self::css_nth(selector, 0)
    }

    /// `nth`번째 일치 요소를 읽는 CSS 패턴.
    pub fn css_nth(selector: &str, nth: usize) -> PortfolioResult<Self> {
        let parsed = Selector::parse(selector).map_err(|e| {
            PortfolioError::Configuration(format!("invalid selector '{}': {}", selector, e))
        })?;
        Ok(Self::Css {
            selector: parsed,
            nth,
            source: selector.to_string(),
        })
    }

    /// 정규식 패턴.
    pub fn regex(pattern: &str) -> PortfolioResult<Self> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| PortfolioError::Configuration(format!("invalid pattern '{}': {}", pattern, e)))
    }

    /// 패턴이 가리키는 원본 텍스트.
    fn extract_text(&self, page: &SourcePage<'_>) -> Option<String> {
        match self {
            Self::Css { selector, nth, .. } => page
                .document
                .select(selector)
                .nth(*nth)
                .map(|el| el.text().collect::<String>()),
            Self::Regex(regex) => regex.captures(page.raw).and_then(|caps| {
                caps.get(1)
                    .or_else(|| caps.get(0))
                    .map(|m| m.as_str().to_string())
            }),
        }
    }

    /// 패턴을 적용하고 숫자로 정규화합니다.
    pub fn extract(&self, page: &SourcePage<'_>) -> Option<Decimal> {
        let text = self.extract_text(page)?;
        let value = normalize_number(&text);
        if value.is_none() {
            trace!(pattern = %self, text = %text.trim(), "matched text is not numeric");
        }
        value
    }
}

impl std::fmt::Display for ExtractionPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css { source, nth, .. } => write!(f, "css({})[{}]", source, nth),
            Self::Regex(regex) => write!(f, "regex({})", regex.as_str()),
        }
    }
}

/// 한 필드의 우선순위 패턴 목록 (주 패턴 → 대체 패턴).
#[derive(Debug, Clone)]
pub struct FieldPatterns {
    field: &'static str,
    patterns: Vec<ExtractionPattern>,
}

impl FieldPatterns {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            patterns: Vec::new(),
        }
    }

    /// 패턴을 목록 끝(가장 낮은 우선순위)에 추가합니다.
    pub fn with(mut self, pattern: ExtractionPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// 순서대로 패턴을 시도해 첫 번째 숫자 값을 반환합니다.
    pub fn extract(&self, page: &SourcePage<'_>) -> Option<Decimal> {
        for (index, pattern) in self.patterns.iter().enumerate() {
            if let Some(value) = pattern.extract(page) {
                if index > 0 {
                    debug!(field = self.field, pattern = %pattern, "fallback pattern matched");
                }
                return Some(value);
            }
        }
        None
    }
}

/// 수집기가 사용하는 필드별 패턴 묶음.
#[derive(Debug, Clone)]
pub struct ExtractionProfile {
    pub price: FieldPatterns,
    pub eps: FieldPatterns,
    pub bps: FieldPatterns,
    pub pe: FieldPatterns,
    pub pb: FieldPatterns,
    pub dividend_yield: FieldPatterns,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_number() {
        assert_eq!(normalize_number("1,234,567"), Some(dec!(1234567)));
        assert_eq!(normalize_number(" ₩ 70,000원 "), Some(dec!(70000)));
        assert_eq!(normalize_number("12.34%"), Some(dec!(12.34)));
        assert_eq!(normalize_number("-5.5배"), Some(dec!(-5.5)));
        assert_eq!(normalize_number("+300"), Some(dec!(300)));
        assert_eq!(normalize_number("$1,000.50 USD"), Some(dec!(1000.50)));
    }

    #[test]
    fn test_normalize_rejects_garbled_values() {
        assert_eq!(normalize_number(""), None);
        assert_eq!(normalize_number("-"), None);
        assert_eq!(normalize_number("N/A"), None);
        assert_eq!(normalize_number("12abc34"), None);
        assert_eq!(normalize_number("1.2.3"), None);
    }

    #[test]
    fn test_fallback_pattern_wins_when_primary_misses() {
        let html = r#"<html><body><div class="eps">EPS 4,950원</div></body></html>"#;
        let page = SourcePage::parse(html);

        let chain = FieldPatterns::new("eps")
            .with(ExtractionPattern::css("em#_eps").unwrap())
            .with(ExtractionPattern::regex(r"EPS\s*([0-9,.]+)").unwrap());

        assert_eq!(chain.extract(&page), Some(dec!(4950)));
    }

    #[test]
    fn test_non_numeric_primary_falls_through() {
        let html = r#"<em id="_per">N/A</em><p>PER 11.2배</p>"#;
        let page = SourcePage::parse(html);

        let chain = FieldPatterns::new("pe")
            .with(ExtractionPattern::css("em#_per").unwrap())
            .with(ExtractionPattern::regex(r"PER\s*([0-9.]+)").unwrap());

        assert_eq!(chain.extract(&page), Some(dec!(11.2)));
    }

    #[test]
    fn test_css_nth_and_no_match() {
        let html = r#"<table><tr><td><em>1.10</em></td><td><em>52,000</em></td></tr></table>"#;
        let page = SourcePage::parse(html);

        let second = ExtractionPattern::css_nth("td em", 1).unwrap();
        assert_eq!(second.extract(&page), Some(dec!(52000)));

        let chain = FieldPatterns::new("bps").with(ExtractionPattern::css("em#_bps").unwrap());
        assert_eq!(chain.extract(&page), None);
    }

    #[test]
    fn test_invalid_patterns_are_configuration_errors() {
        assert!(ExtractionPattern::css("em[[").is_err());
        assert!(ExtractionPattern::regex("(unclosed").is_err());
    }
}
