//! 종목 페이지 소스.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;
use valuewatch_core::{PortfolioError, PortfolioResult, SourceConfig, CODE_PLACEHOLDER};

use crate::error::FetchError;

/// 종목 코드로 비정형 텍스트/마크업을 가져오는 소스.
///
/// 테스트에서는 호출 횟수를 세는 대역으로 교체할 수 있습니다.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// 종목 페이지 본문을 가져옵니다. 재시도하지 않습니다.
    async fn fetch_page(&self, code: &str) -> Result<String, FetchError>;
}

/// HTTP GET 기반 페이지 소스.
pub struct HttpPageSource {
    client: Client,
    url_template: String,
    /// 요청 전 딜레이 (대량 수집 시 소스 보호용)
    request_delay: Duration,
}

impl HttpPageSource {
    /// 설정으로 소스를 생성합니다.
    pub fn new(config: &SourceConfig) -> PortfolioResult<Self> {
        if !config.url_template.contains(CODE_PLACEHOLDER) {
            return Err(PortfolioError::Configuration(format!(
                "url template '{}' has no {} placeholder",
                config.url_template, CODE_PLACEHOLDER
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| PortfolioError::Configuration(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            client,
            url_template: config.url_template.clone(),
            request_delay: config.request_delay(),
        })
    }

    /// 종목 코드에 해당하는 URL.
    pub fn url_for(&self, code: &str) -> String {
        self.url_template.replace(CODE_PLACEHOLDER, code.trim())
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, code: &str) -> Result<String, FetchError> {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        let url = self.url_for(code);
        debug!(code, url = %url, "requesting source page");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::network(code, "request timed out")
            } else {
                FetchError::network(code, e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                code: code.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::network(code, format!("HTTP {}", status)));
        }

        // Content-Type의 charset(EUC-KR 등)에 맞춰 디코딩됩니다.
        response
            .text()
            .await
            .map_err(|e| FetchError::network(code, e.to_string()))
    }
}
