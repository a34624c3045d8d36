//! 설정 관리.
//!
//! TOML 파일을 읽고 `VALUEWATCH__섹션__키` 환경 변수로 덮어씁니다.
//! 모든 섹션은 기본값이 있으므로 파일에 없는 섹션은 기본값을 사용합니다.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PortfolioError, PortfolioResult};
use crate::logging::{LogConfig, LogFormat};
use crate::signal::{SignalRule, SignalTrigger};

/// 코드 자리표시자.
pub const CODE_PLACEHOLDER: &str = "{code}";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub source: SourceConfig,
    pub cache: CacheConfig,
    pub pipeline: PipelineConfig,
    pub reference: ReferenceConfig,
    pub signal: SignalConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// 종목별 평가 span의 진입/종료 이벤트 출력
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
            span_events: false,
        }
    }
}

/// 시세/펀더멘털 소스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// 종목 페이지 URL 템플릿 (`{code}` 포함)
    pub url_template: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    pub user_agent: String,
    /// 대량 수집 시 요청 간 딜레이 (밀리초)
    pub request_delay_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url_template: "https://finance.naver.com/item/main.naver?code={code}".to_string(),
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            request_delay_ms: 0,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// 캐시 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 기본 TTL (초)
    pub ttl_secs: u64,
    /// 실패 결과를 기억할 TTL (초). 없으면 실패를 캐시하지 않습니다.
    pub negative_ttl_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            negative_ttl_secs: None,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn negative_ttl(&self) -> Option<Duration> {
        self.negative_ttl_secs.map(Duration::from_secs)
    }
}

/// 평가 파이프라인 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// 동시 수집 수
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

/// 기준 데이터 파일 경로.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub fundamentals_path: PathBuf,
    pub benchmarks_path: PathBuf,
    pub holdings_path: PathBuf,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            fundamentals_path: PathBuf::from("data/fundamentals.toml"),
            benchmarks_path: PathBuf::from("data/benchmarks.toml"),
            holdings_path: PathBuf::from("data/holdings.toml"),
        }
    }
}

/// 신호 규칙 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalConfig {
    pub triggers: Vec<SignalTrigger>,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            triggers: SignalTrigger::ALL.to_vec(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드하고 검증합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> PortfolioResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("VALUEWATCH")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> PortfolioResult<Self> {
        Self::load("config/default.toml")
    }

    /// 운영자 설정 오류를 검사합니다.
    pub fn validate(&self) -> PortfolioResult<()> {
        if !self.source.url_template.contains(CODE_PLACEHOLDER) {
            return Err(PortfolioError::Configuration(format!(
                "source.url_template must contain {}",
                CODE_PLACEHOLDER
            )));
        }
        if self.source.timeout_secs == 0 {
            return Err(PortfolioError::Configuration(
                "source.timeout_secs must be positive".to_string(),
            ));
        }
        if self.cache.ttl_secs == 0 {
            return Err(PortfolioError::Configuration(
                "cache.ttl_secs must be positive".to_string(),
            ));
        }
        if self.pipeline.concurrency == 0 {
            return Err(PortfolioError::Configuration(
                "pipeline.concurrency must be positive".to_string(),
            ));
        }
        self.signal_rule()?;
        self.logging
            .format
            .parse::<LogFormat>()
            .map_err(PortfolioError::Configuration)?;
        Ok(())
    }

    /// 설정된 트리거로 신호 규칙을 만듭니다.
    pub fn signal_rule(&self) -> PortfolioResult<SignalRule> {
        SignalRule::new(self.signal.triggers.iter().copied())
    }

    /// 로깅 설정으로 변환합니다.
    pub fn log_config(&self) -> LogConfig {
        LogConfig::new(self.logging.level.clone())
            .with_format(self.logging.format.parse().unwrap_or_default())
            .with_span_events(self.logging.span_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.ttl(), Duration::from_secs(3600));
        assert_eq!(config.cache.negative_ttl(), None);
        assert_eq!(config.signal_rule().unwrap(), SignalRule::default());
    }

    #[test]
    fn test_log_config_follows_logging_section() {
        let mut config = AppConfig::default();
        assert!(!config.log_config().with_span_events);

        config.logging.format = "json".to_string();
        config.logging.span_events = true;
        let log = config.log_config();
        assert_eq!(log.format, LogFormat::Json);
        assert!(log.with_span_events);
    }

    #[test]
    fn test_invalid_settings_are_configuration_errors() {
        let mut config = AppConfig::default();
        config.source.url_template = "https://example.com/item".to_string();
        assert!(matches!(config.validate(), Err(PortfolioError::Configuration(_))));

        let mut config = AppConfig::default();
        config.pipeline.concurrency = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.signal.triggers.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.pipeline.concurrency, 4);
    }
}
