//! 현재가/투자지표 조회와 재수집.

use anyhow::{Context, Result};
use tracing::{debug, warn};
use valuewatch_core::{format_metric, format_percent, AppConfig, FundamentalsBundle, QuoteSnapshot};
use valuewatch_data::MarketDataFetcher;

use super::context::AppContext;

/// 종목별 현재가와 소스가 표시하는 투자지표를 출력합니다.
///
/// 한 종목의 수집 실패는 해당 줄에만 표시되고 나머지 종목은 계속 조회합니다.
pub async fn run_quote(config: &AppConfig, codes: &[String]) -> Result<()> {
    let fetcher = MarketDataFetcher::from_config(config).context("Failed to build fetcher")?;

    println!(
        "{:<8} {:>10} {:>9} {:>10} {:>7} {:>7} {:>7}  {}",
        "CODE", "PRICE", "EPS", "BPS", "PER", "PBR", "DIV", "AS OF"
    );
    println!("{}", "-".repeat(88));

    for code in codes {
        let quote = fetcher.fetch_quote(code).await;
        let bundle = fetcher.fetch_fundamentals_bundle(code).await;

        match (quote, bundle) {
            (Err(err), Err(_)) => {
                warn!(code = %code, error = %err, "quote unavailable");
                println!("{:<8} {}", code, err);
            }
            (quote, bundle) => {
                let quote = quote.unwrap_or_else(|_| QuoteSnapshot::unavailable(code.as_str()));
                let bundle = bundle.unwrap_or_else(|_| FundamentalsBundle::empty(code.as_str()));
                println!("{}", format_quote_line(&quote, &bundle));
            }
        }
    }

    Ok(())
}

/// 캐시를 무효화하고 다시 수집합니다. 코드가 없으면 보유 종목 전체.
pub async fn run_reload(ctx: &AppContext, codes: Vec<String>) -> Result<()> {
    let codes = if codes.is_empty() {
        ctx.holding_codes()
    } else {
        codes
    };

    let report = ctx.evaluator.reload(&codes).await;

    println!(
        "재수집: 요청 {}개, 성공 {}개, 실패 {}개",
        report.requested, report.succeeded, report.failed
    );
    if !report.failed_codes.is_empty() {
        println!("실패 종목: {}", report.failed_codes.join(", "));
    }

    let stats = ctx.evaluator.fetcher().cache().stats();
    debug!(
        live = stats.live_entries,
        expired = stats.expired_entries,
        "market data cache after reload"
    );
    Ok(())
}

fn format_quote_line(quote: &QuoteSnapshot, bundle: &FundamentalsBundle) -> String {
    // 배당수익률은 소스가 퍼센트 숫자로 표시합니다 (2.06 = 2.06%).
    let dividend = bundle
        .dividend_yield
        .map(|v| format!("{}%", v.round_dp(2)))
        .unwrap_or_else(|| format_percent(None));

    format!(
        "{:<8} {:>10} {:>9} {:>10} {:>7} {:>7} {:>7}  {}",
        quote.code,
        format_metric(quote.price, 0),
        format_metric(bundle.eps, 0),
        format_metric(bundle.bps, 0),
        format_metric(bundle.pe, 2),
        format_metric(bundle.pb, 2),
        dividend,
        quote.fetched_at.format("%Y-%m-%d %H:%M:%S")
    )
}
