//! 평가표 출력.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Write;
use tracing::info;
use valuewatch_core::{format_metric, format_percent, ValuationResult};

use super::context::AppContext;

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!(
                "Invalid format: {}. Use: table, csv, json",
                s
            )),
        }
    }
}

/// 한 종목 평가.
pub async fn run_evaluate(
    ctx: &AppContext,
    code: &str,
    quantity: u64,
    cost: Decimal,
    format: OutputFormat,
) -> Result<()> {
    let result = ctx
        .evaluator
        .evaluate_row(code, quantity, cost)
        .await
        .with_context(|| format!("Failed to evaluate {}", code))?;

    println!("{}", render(&[result], format)?);
    Ok(())
}

/// 보유 종목 전체 평가표.
pub async fn run_report(ctx: &AppContext, format: OutputFormat, output: Option<&str>) -> Result<()> {
    let rows = ctx.evaluator.evaluate_holdings(&ctx.reference.holdings).await;
    let results: Vec<ValuationResult> = rows
        .into_iter()
        .filter(|(holding, _)| holding.is_active())
        .map(|(_, result)| result)
        .collect();

    let content = render(&results, format)?;

    if let Some(path) = output {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path))?;
        file.write_all(content.as_bytes())
            .context("Failed to write to file")?;
        info!("Output written to: {}", path);
    } else {
        println!("{}", content);
    }

    Ok(())
}

fn render(results: &[ValuationResult], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_table(results)),
        OutputFormat::Csv => Ok(format_csv(results)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(results).context("Failed to serialize to JSON")
        }
    }
}

/// 테이블 형식 출력.
fn format_table(results: &[ValuationResult]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<8} {:<14} {:>10} {:>10} {:>10} {:>7} {:>7} {:>7} {:>14} {:>8} {:<6}\n",
        "CODE", "NAME", "PRICE", "PE_PRICE", "PB_PRICE", "PER", "PBR", "DIV", "VALUE", "PROFIT",
        "SIGNAL"
    ));
    output.push_str(&"-".repeat(112));
    output.push('\n');

    for r in results {
        output.push_str(&format!(
            "{:<8} {:<14} {:>10} {:>10} {:>10} {:>7} {:>7} {:>7} {:>14} {:>8} {:<6}\n",
            r.code,
            truncate(r.display_name(), 14),
            format_metric(r.price, 0),
            format_metric(r.theoretical_price_pe, 0),
            format_metric(r.theoretical_price_pb, 0),
            format_metric(r.realized_pe, 2),
            format_metric(r.realized_pb, 2),
            format_percent(r.dividend_yield),
            format_metric(r.market_value, 0),
            format_percent(r.profit_pct),
            if r.buy_signal { "BUY" } else { "" }
        ));
    }

    output.push('\n');
    output.push_str(&format!(
        "Total: {} holdings, {} signals",
        results.len(),
        results.iter().filter(|r| r.buy_signal).count()
    ));

    output
}

/// CSV 형식 출력. 값이 없는 칸은 비워 둡니다.
fn format_csv(results: &[ValuationResult]) -> String {
    let mut output = String::new();

    output.push_str(
        "code,name,sector,price,fair_pe,fair_pb,theoretical_price_pe,theoretical_price_pb,\
realized_pe,realized_pb,dividend_yield,roe,upside_pct,market_value,cost_basis,profit_abs,\
profit_pct,buy_signal\n",
    );

    for r in results {
        let cells = [
            r.price,
            Some(r.fair_pe),
            Some(r.fair_pb),
            r.theoretical_price_pe,
            r.theoretical_price_pb,
            r.realized_pe,
            r.realized_pb,
            r.dividend_yield,
            r.roe,
            r.upside_pct,
            r.market_value,
            r.cost_basis,
            r.profit_abs,
            r.profit_pct,
        ]
        .iter()
        .map(|v| v.map(|d| d.normalize().to_string()).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",");

        output.push_str(&format!(
            "{},{},{},{},{}\n",
            r.code,
            escape_csv(r.name.as_deref().unwrap_or("")),
            escape_csv(r.sector.as_deref().unwrap_or("")),
            cells,
            r.buy_signal
        ));
    }

    output
}

/// 문자열 자르기 (UTF-8 안전).
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 1).collect();
        format!("{}…", truncated)
    }
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
