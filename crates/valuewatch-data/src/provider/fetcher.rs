//! 캐시를 경유하는 시세/펀더멘털 수집기.
//!
//! 수집 순서:
//! 1. 캐시 확인 (적중 시 즉시 반환)
//! 2. 소스에 요청 1회 (재시도 없음)
//! 3. 같은 응답에서 현재가와 펀더멘털 필드를 패턴 체인으로 추출
//! 4. 두 결과를 기본 TTL로 캐시에 저장
//!
//! 실패는 기본적으로 캐시하지 않습니다. `with_negative_ttl`을 설정한 경우에만
//! 실패 분류를 짧은 TTL로 기억해 실패 중인 소스에 반복 요청하지 않습니다.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{debug, warn};
use valuewatch_core::{AppConfig, FundamentalsBundle, PortfolioResult, QuoteSnapshot};

use super::naver::naver_profile;
use super::pattern::{ExtractionProfile, SourcePage};
use super::source::{HttpPageSource, PageSource};
use crate::cache::{CacheKind, FreshnessCache};
use crate::error::{FetchError, FetchErrorKind};

/// 캐시에 저장되는 수집 결과.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketDatum {
    Quote(QuoteSnapshot),
    Bundle(FundamentalsBundle),
    /// 네거티브 캐시 항목
    Failed(FetchErrorKind),
}

/// 페이지 한 번에서 추출한 결과.
struct PageData {
    quote: Result<QuoteSnapshot, FetchError>,
    bundle: FundamentalsBundle,
}

/// 시세/펀더멘털 수집기.
pub struct MarketDataFetcher {
    source: Arc<dyn PageSource>,
    profile: ExtractionProfile,
    cache: Arc<FreshnessCache<MarketDatum>>,
    ttl: Duration,
    negative_ttl: Option<Duration>,
}

impl MarketDataFetcher {
    /// 수집기를 생성합니다. 성공 결과는 캐시의 기본 TTL로 저장됩니다.
    pub fn new(
        source: Arc<dyn PageSource>,
        profile: ExtractionProfile,
        cache: Arc<FreshnessCache<MarketDatum>>,
    ) -> Self {
        let ttl = cache.default_ttl();
        Self {
            source,
            profile,
            cache,
            ttl,
            negative_ttl: None,
        }
    }

    /// 실패 결과를 지정한 TTL 동안 기억합니다.
    pub fn with_negative_ttl(mut self, ttl: Duration) -> Self {
        self.negative_ttl = Some(ttl);
        self
    }

    /// 설정으로 HTTP 소스와 네이버 추출 체인을 사용하는 수집기를 만듭니다.
    pub fn from_config(config: &AppConfig) -> PortfolioResult<Self> {
        let source = HttpPageSource::new(&config.source)?;
        let cache = FreshnessCache::with_ttl("market-data", config.cache.ttl());
        let mut fetcher = Self::new(Arc::new(source), naver_profile()?, Arc::new(cache));
        if let Some(ttl) = config.cache.negative_ttl() {
            fetcher = fetcher.with_negative_ttl(ttl);
        }
        Ok(fetcher)
    }

    /// 주입된 캐시 인스턴스.
    pub fn cache(&self) -> &Arc<FreshnessCache<MarketDatum>> {
        &self.cache
    }

    /// 현재가 스냅샷을 가져옵니다.
    ///
    /// 가격 패턴이 하나도 맞지 않으면 `ParseFailure`입니다.
    pub async fn fetch_quote(&self, code: &str) -> Result<QuoteSnapshot, FetchError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(FetchError::NotFound {
                code: String::new(),
            });
        }

        match self.cache.get(CacheKind::Price, code) {
            Some(MarketDatum::Quote(quote)) => {
                debug!(code, "price cache hit");
                return Ok(quote);
            }
            Some(MarketDatum::Failed(kind)) => {
                debug!(code, ?kind, "price negative cache hit");
                return Err(FetchError::replay(kind, code, "price"));
            }
            _ => {}
        }

        self.fetch_page_data(code).await?.quote
    }

    /// 현재가만 가져옵니다.
    pub async fn fetch_price(&self, code: &str) -> Result<Decimal, FetchError> {
        let quote = self.fetch_quote(code).await?;
        quote.price.ok_or_else(|| FetchError::ParseFailure {
            code: code.trim().to_string(),
            field: "price",
        })
    }

    /// 펀더멘털 묶음을 가져옵니다.
    ///
    /// 필드별 추출 실패는 오류가 아니라 해당 필드의 부재입니다.
    /// 오류는 요청 자체가 실패한 경우(`NetworkFailure`, 404의 `NotFound`)뿐입니다.
    pub async fn fetch_fundamentals_bundle(
        &self,
        code: &str,
    ) -> Result<FundamentalsBundle, FetchError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(FetchError::NotFound {
                code: String::new(),
            });
        }

        match self.cache.get(CacheKind::FundamentalsBundle, code) {
            Some(MarketDatum::Bundle(bundle)) => {
                debug!(code, "fundamentals cache hit");
                return Ok(bundle);
            }
            Some(MarketDatum::Failed(kind)) => {
                debug!(code, ?kind, "fundamentals negative cache hit");
                return Err(FetchError::replay(kind, code, "fundamentals"));
            }
            _ => {}
        }

        Ok(self.fetch_page_data(code).await?.bundle)
    }

    /// 한 종목의 캐시 항목을 모두 무효화합니다. 제거된 항목 수를 반환합니다.
    pub fn invalidate(&self, code: &str) -> usize {
        self.cache.invalidate_code(code)
    }

    /// 종목 페이지를 한 번 요청해 현재가와 펀더멘털 묶음을 함께 추출하고
    /// 두 캐시 종류를 모두 채웁니다.
    ///
    /// 현재가와 투자지표는 같은 페이지에 있으므로 두 값은 항상 같은 응답에서 나옵니다.
    async fn fetch_page_data(&self, code: &str) -> Result<PageData, FetchError> {
        let body = match self.source.fetch_page(code).await {
            Ok(body) => body,
            Err(err) => {
                warn!(code, error = %err, "page fetch failed");
                self.remember_failure(CacheKind::Price, code, &err);
                self.remember_failure(CacheKind::FundamentalsBundle, code, &err);
                return Err(err);
            }
        };

        let data = self.extract_page(code, &body);

        match &data.quote {
            Ok(quote) => {
                self.cache
                    .put(CacheKind::Price, code, MarketDatum::Quote(quote.clone()), self.ttl);
                debug!(code, price = ?quote.price, "price fetched");
            }
            Err(err) => {
                warn!(code, error = %err, "price extraction failed");
                self.remember_failure(CacheKind::Price, code, err);
            }
        }

        if data.bundle.present_fields() == 0 {
            warn!(code, "no fundamentals field matched");
        }
        self.cache.put(
            CacheKind::FundamentalsBundle,
            code,
            MarketDatum::Bundle(data.bundle.clone()),
            self.ttl,
        );
        debug!(code, fields = data.bundle.present_fields(), "fundamentals fetched");

        Ok(data)
    }

    fn extract_page(&self, code: &str, body: &str) -> PageData {
        let page = SourcePage::parse(body);

        let quote = self
            .profile
            .price
            .extract(&page)
            .map(|price| QuoteSnapshot::new(code, price))
            .ok_or_else(|| FetchError::ParseFailure {
                code: code.to_string(),
                field: self.profile.price.field(),
            });

        let bundle = FundamentalsBundle {
            code: code.to_string(),
            eps: self.profile.eps.extract(&page),
            bps: self.profile.bps.extract(&page),
            pe: self.profile.pe.extract(&page),
            pb: self.profile.pb.extract(&page),
            dividend_yield: self.profile.dividend_yield.extract(&page),
        };

        PageData { quote, bundle }
    }

    fn remember_failure(&self, kind: CacheKind, code: &str, err: &FetchError) {
        if let Some(ttl) = self.negative_ttl {
            self.cache.put(kind, code, MarketDatum::Failed(err.kind()), ttl);
        }
    }
}

impl std::fmt::Debug for MarketDataFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataFetcher")
            .field("cache", &self.cache)
            .field("ttl", &self.ttl)
            .field("negative_ttl", &self.negative_ttl)
            .finish_non_exhaustive()
    }
}
