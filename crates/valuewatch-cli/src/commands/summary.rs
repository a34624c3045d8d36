//! 포트폴리오 요약 / 저평가 종목 조회.

use anyhow::Result;
use valuewatch_core::{list_undervalued, summarize, UndervaluedEntry};

use super::context::AppContext;

pub async fn run_summary(ctx: &AppContext) -> Result<()> {
    let rows = ctx.evaluator.evaluate_holdings(&ctx.reference.holdings).await;
    println!("{}", summarize(&rows));
    Ok(())
}

pub async fn run_undervalued(ctx: &AppContext) -> Result<()> {
    let rows = ctx.evaluator.evaluate_holdings(&ctx.reference.holdings).await;
    println!("{}", format_undervalued(&list_undervalued(&rows)));
    Ok(())
}

fn format_undervalued(entries: &[UndervaluedEntry]) -> String {
    if entries.is_empty() {
        return "저평가 신호 종목 없음".to_string();
    }

    let mut output = format!("저평가 신호 종목 {}개\n", entries.len());
    for entry in entries {
        if entry.name.is_empty() {
            output.push_str(&format!("  {}\n", entry.code));
        } else {
            output.push_str(&format!("  {} {}\n", entry.code, entry.name));
        }
    }
    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_undervalued() {
        assert_eq!(format_undervalued(&[]), "저평가 신호 종목 없음");

        let entries = vec![
            UndervaluedEntry {
                code: "005930".to_string(),
                name: "삼성전자".to_string(),
            },
            UndervaluedEntry {
                code: "000660".to_string(),
                name: String::new(),
            },
        ];
        assert_eq!(
            format_undervalued(&entries),
            "저평가 신호 종목 2개\n  005930 삼성전자\n  000660"
        );
    }
}
