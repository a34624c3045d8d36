//! 포트폴리오 밸류에이션 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 보유 종목 전체 평가표
//! valuewatch report
//! valuewatch report --format csv -o report.csv
//!
//! # 한 종목 평가 (수량 10주, 주당 매입가 65,000원)
//! valuewatch evaluate -c 005930 -q 10 -p 65000
//!
//! # 포트폴리오 요약 / 저평가 종목
//! valuewatch summary
//! valuewatch undervalued
//!
//! # 현재가와 투자지표 조회
//! valuewatch quote 005930 000660
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;
use valuewatch_core::{init_logging, AppConfig};

mod commands;

use commands::context::AppContext;
use commands::report::OutputFormat;

#[derive(Parser)]
#[command(name = "valuewatch")]
#[command(about = "ValueWatch - 섹터 적정 배수 기반 포트폴리오 저평가 알림", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 한 종목 평가
    Evaluate {
        /// 종목 코드 (예: 005930)
        #[arg(short, long)]
        code: String,

        /// 보유 수량
        #[arg(short, long)]
        quantity: u64,

        /// 주당 매입가
        #[arg(short = 'p', long)]
        cost: Decimal,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// 보유 종목 전체 평가표
    Report {
        /// 출력 형식 (table, csv, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 포트폴리오 요약
    Summary,

    /// 저평가 신호 종목 목록
    Undervalued,

    /// 현재가와 투자지표 조회
    Quote {
        /// 종목 코드 목록
        #[arg(required = true)]
        codes: Vec<String>,
    },

    /// 캐시를 비우고 다시 수집해 성공/실패 수를 보고
    Reload {
        /// 종목 코드 목록 (생략하면 보유 종목 전체)
        codes: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;

    init_logging(config.log_config())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    debug!(config = %cli.config, "configuration loaded");

    match cli.command {
        Commands::Evaluate {
            code,
            quantity,
            cost,
            format,
        } => {
            let format = OutputFormat::parse(&format)?;
            let ctx = AppContext::load(&config)?;
            commands::report::run_evaluate(&ctx, &code, quantity, cost, format).await?;
        }

        Commands::Report { format, output } => {
            let format = OutputFormat::parse(&format)?;
            let ctx = AppContext::load(&config)?;
            commands::report::run_report(&ctx, format, output.as_deref()).await?;
        }

        Commands::Summary => {
            let ctx = AppContext::load(&config)?;
            commands::summary::run_summary(&ctx).await?;
        }

        Commands::Undervalued => {
            let ctx = AppContext::load(&config)?;
            commands::summary::run_undervalued(&ctx).await?;
        }

        Commands::Quote { codes } => {
            commands::quote::run_quote(&config, &codes).await?;
        }

        Commands::Reload { codes } => {
            let ctx = AppContext::load(&config)?;
            commands::quote::run_reload(&ctx, codes).await?;
        }
    }

    Ok(())
}
