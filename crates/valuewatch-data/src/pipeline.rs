//! 보유 종목 평가 파이프라인.
//!
//! 저장소 조회와 수집 결과를 밸류에이션 엔진과 신호 판정에 순서대로 넘기는
//! 명시적 재계산 단계입니다. 일괄 평가는 제한된 동시성으로 수집을 펼친 뒤
//! 입력 순서대로 모읍니다.
//!
//! 수집 실패(`NotFound`, `ParseFailure`, `NetworkFailure`)는 이 경계에서
//! "값 없음"으로 흡수되며, 한 종목의 실패가 다른 종목 평가를 막지 않습니다.

use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, Instrument};
use valuewatch_core::{
    evaluate, holding_span, AppConfig, BenchmarkStore, FundamentalsStore, Holding,
    PortfolioError, PortfolioResult, SignalRule, ValuationResult,
};

use crate::provider::MarketDataFetcher;
use crate::reference::ReferenceData;

/// `refresh_all` 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshReport {
    /// 요청된 코드 수
    pub requested: usize,
    /// 캐시 항목이 있어 무효화된 코드 수
    pub invalidated: usize,
    /// 캐시에 없던 코드 수
    pub not_cached: usize,
}

/// `reload` 결과.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReloadReport {
    pub requested: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 실패한 코드 (완료 순서)
    pub failed_codes: Vec<String>,
}

impl ReloadReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// 포트폴리오 평가기.
pub struct PortfolioEvaluator {
    fetcher: Arc<MarketDataFetcher>,
    fundamentals: Arc<dyn FundamentalsStore>,
    benchmarks: Arc<dyn BenchmarkStore>,
    rule: SignalRule,
    concurrency: usize,
}

impl PortfolioEvaluator {
    /// 기본 신호 규칙과 동시성 4로 평가기를 생성합니다.
    pub fn new(
        fetcher: Arc<MarketDataFetcher>,
        fundamentals: Arc<dyn FundamentalsStore>,
        benchmarks: Arc<dyn BenchmarkStore>,
    ) -> Self {
        Self {
            fetcher,
            fundamentals,
            benchmarks,
            rule: SignalRule::default(),
            concurrency: 4,
        }
    }

    /// 설정과 로드된 기준 데이터로 평가기를 구성합니다.
    pub fn from_config(config: &AppConfig, reference: &ReferenceData) -> PortfolioResult<Self> {
        let fetcher = MarketDataFetcher::from_config(config)?;
        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(reference.fundamentals.clone()),
            Arc::new(reference.benchmarks.clone()),
        )
        .with_rule(config.signal_rule()?)
        .with_concurrency(config.pipeline.concurrency))
    }

    pub fn with_rule(mut self, rule: SignalRule) -> Self {
        self.rule = rule;
        self
    }

    /// 일괄 수집 동시성. 0은 1로 취급합니다.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn fetcher(&self) -> &Arc<MarketDataFetcher> {
        &self.fetcher
    }

    /// 보유 종목 하나를 평가합니다. 실패하지 않습니다.
    ///
    /// 펀더멘털이 없는 종목은 수집 없이 전부 "값 없음"인 결과를 돌려줍니다.
    pub async fn evaluate_holding(&self, holding: &Holding) -> ValuationResult {
        let span = holding_span!("evaluate_holding", holding.code);
        async {
            let Some(fundamentals) = self.fundamentals.fundamentals(&holding.code) else {
                debug!("no fundamentals entry, skipping fetch");
                let benchmark = self.benchmarks.resolve("");
                return ValuationResult::unavailable(holding.code.clone(), &benchmark);
            };

            let benchmark = self.benchmarks.resolve(&fundamentals.sector);
            let quote = match self.fetcher.fetch_quote(&holding.code).await {
                Ok(quote) => Some(quote),
                Err(err) => {
                    debug!(error = %err, "price unavailable");
                    None
                }
            };

            let result = evaluate(holding, Some(fundamentals), &benchmark, quote.as_ref());
            self.rule.apply(result)
        }
        .instrument(span)
        .await
    }

    /// 표 형식 한 행(코드, 수량, 주당 매입가)을 평가합니다.
    ///
    /// 음수 매입가만 설정 에러이며, 그 외 실패는 결과의 "값 없음"으로 나타납니다.
    pub async fn evaluate_row(
        &self,
        code: &str,
        quantity: u64,
        cost_per_share: Decimal,
    ) -> PortfolioResult<ValuationResult> {
        let holding = Holding::new(code, quantity, cost_per_share)?;
        Ok(self.evaluate_holding(&holding).await)
    }

    /// 여러 보유 종목을 제한된 동시성으로 평가합니다. 결과는 입력 순서를 따릅니다.
    pub async fn evaluate_holdings(
        &self,
        holdings: &[Holding],
    ) -> Vec<(Holding, ValuationResult)> {
        info!(
            holdings = holdings.len(),
            concurrency = self.concurrency,
            "evaluating portfolio"
        );

        let results: Vec<ValuationResult> =
            stream::iter(holdings.iter().map(|h| self.evaluate_holding(h)))
                .buffered(self.concurrency)
                .collect()
                .await;

        let signals = results.iter().filter(|r| r.buy_signal).count();
        info!(holdings = results.len(), signals, "portfolio evaluated");

        holdings.iter().cloned().zip(results).collect()
    }

    /// 주어진 코드의 캐시 항목만 무효화합니다.
    ///
    /// 다른 코드의 캐시는 그대로 남습니다. 재수집은 다음 조회 시점에 일어납니다.
    pub fn refresh_all(&self, codes: &[String]) -> RefreshReport {
        let mut report = RefreshReport {
            requested: codes.len(),
            ..Default::default()
        };

        for code in codes {
            if self.fetcher.invalidate(code) > 0 {
                report.invalidated += 1;
            } else {
                report.not_cached += 1;
            }
        }

        info!(
            requested = report.requested,
            invalidated = report.invalidated,
            not_cached = report.not_cached,
            "cache refreshed"
        );
        report
    }

    /// 캐시를 무효화한 뒤 현재가와 펀더멘털 묶음을 즉시 다시 수집합니다.
    pub async fn reload(&self, codes: &[String]) -> ReloadReport {
        self.refresh_all(codes);

        let outcomes: Vec<(String, Result<(), PortfolioError>)> =
            stream::iter(codes.iter().cloned())
                .map(|code| async move {
                    let outcome = self.reload_one(&code).await;
                    (code, outcome)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        let mut report = ReloadReport {
            requested: codes.len(),
            ..Default::default()
        };
        for (code, outcome) in outcomes {
            match outcome {
                Ok(()) => report.succeeded += 1,
                Err(err) => {
                    debug!(code = %code, error = %err, "reload failed");
                    report.failed += 1;
                    report.failed_codes.push(code);
                }
            }
        }

        info!(
            requested = report.requested,
            succeeded = report.succeeded,
            failed = report.failed,
            "reload completed"
        );
        report
    }

    async fn reload_one(&self, code: &str) -> Result<(), PortfolioError> {
        self.fetcher.fetch_quote(code).await?;
        self.fetcher.fetch_fundamentals_bundle(code).await?;
        Ok(())
    }
}

impl std::fmt::Debug for PortfolioEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioEvaluator")
            .field("fetcher", &self.fetcher)
            .field("rule", &self.rule)
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}
