//! 포트폴리오 밸류에이션 파이프라인의 에러 타입.
//!
//! 조회/수집 경계에서 발생하는 에러는 대부분 "값 없음"으로 흡수되며,
//! 운영자 설정 오류(`Configuration`)만 호출자에게 전파됩니다.

use thiserror::Error;

/// 파이프라인 에러 분류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortfolioError {
    /// 기준 데이터 저장소에 해당 코드가 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 소스에는 접근했으나 추출 패턴이 하나도 맞지 않음
    #[error("파싱 실패: {0}")]
    ParseFailure(String),

    /// 요청 실패 또는 타임아웃
    #[error("네트워크 에러: {0}")]
    NetworkFailure(String),

    /// 잘못된 설정 또는 기준 테이블 (운영자 오류)
    #[error("설정 에러: {0}")]
    Configuration(String),
}

/// 파이프라인 작업을 위한 Result 타입.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

impl PortfolioError {
    /// 계산 전체를 중단해야 하는 에러인지 확인합니다.
    ///
    /// 설정 오류만 치명적이며, 나머지는 해당 필드를 "값 없음"으로 처리합니다.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PortfolioError::Configuration(_))
    }

    /// 호출자가 재시도를 고려할 만한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PortfolioError::NetworkFailure(_))
    }
}

impl From<config::ConfigError> for PortfolioError {
    fn from(err: config::ConfigError) -> Self {
        PortfolioError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_configuration_is_fatal() {
        assert!(PortfolioError::Configuration("dup sector".to_string()).is_fatal());
        assert!(!PortfolioError::NotFound("005930".to_string()).is_fatal());
        assert!(!PortfolioError::ParseFailure("eps".to_string()).is_fatal());
        assert!(!PortfolioError::NetworkFailure("timeout".to_string()).is_fatal());
    }

    #[test]
    fn test_error_retryable() {
        assert!(PortfolioError::NetworkFailure("timeout".to_string()).is_retryable());
        assert!(!PortfolioError::ParseFailure("price".to_string()).is_retryable());
    }
}
