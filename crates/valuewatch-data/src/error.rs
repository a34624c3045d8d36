//! 데이터 모듈 오류 타입.

use std::path::PathBuf;
use thiserror::Error;
use valuewatch_core::PortfolioError;

/// 수집 실패 분류. 네거티브 캐시에 저장됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    NotFound,
    ParseFailure,
    NetworkFailure,
}

/// 시세/펀더멘털 수집 오류.
///
/// 모두 비치명적이며, 파이프라인에서 "값 없음"으로 흡수됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// 소스에 종목 페이지가 없음 (HTTP 404)
    #[error("Instrument not found at source: {code}")]
    NotFound { code: String },

    /// 페이지는 받았지만 어떤 추출 패턴도 맞지 않음
    #[error("No extraction pattern matched {field} for {code}")]
    ParseFailure { code: String, field: &'static str },

    /// 전송 실패, 타임아웃, 2xx 이외 응답
    #[error("Network failure for {code}: {reason}")]
    NetworkFailure { code: String, reason: String },
}

impl FetchError {
    pub fn network(code: &str, reason: impl Into<String>) -> Self {
        FetchError::NetworkFailure {
            code: code.to_string(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::NotFound { .. } => FetchErrorKind::NotFound,
            FetchError::ParseFailure { .. } => FetchErrorKind::ParseFailure,
            FetchError::NetworkFailure { .. } => FetchErrorKind::NetworkFailure,
        }
    }

    /// 네거티브 캐시에 저장된 분류로 오류를 다시 만듭니다.
    pub(crate) fn replay(kind: FetchErrorKind, code: &str, field: &'static str) -> Self {
        match kind {
            FetchErrorKind::NotFound => FetchError::NotFound {
                code: code.to_string(),
            },
            FetchErrorKind::ParseFailure => FetchError::ParseFailure {
                code: code.to_string(),
                field,
            },
            FetchErrorKind::NetworkFailure => {
                FetchError::network(code, "recent failure (negative cache)")
            }
        }
    }
}

impl From<FetchError> for PortfolioError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound { .. } => PortfolioError::NotFound(err.to_string()),
            FetchError::ParseFailure { .. } => PortfolioError::ParseFailure(err.to_string()),
            FetchError::NetworkFailure { .. } => PortfolioError::NetworkFailure(err.to_string()),
        }
    }
}

/// 기준 데이터 파일 로딩 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 파일 읽기 오류
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML 역직렬화 오류
    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// 내용 검증 오류
    #[error(transparent)]
    Invalid(#[from] PortfolioError),
}

impl From<DataError> for PortfolioError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::Invalid(inner) => inner,
            other => PortfolioError::Configuration(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_errors_map_to_non_fatal_kinds() {
        let err: PortfolioError = FetchError::network("005930", "timeout").into();
        assert!(matches!(err, PortfolioError::NetworkFailure(_)));
        assert!(!err.is_fatal());

        let err: PortfolioError = FetchError::ParseFailure {
            code: "005930".to_string(),
            field: "price",
        }
        .into();
        assert!(matches!(err, PortfolioError::ParseFailure(_)));
    }

    #[test]
    fn test_replay_keeps_kind() {
        let err = FetchError::replay(FetchErrorKind::NotFound, "000000", "price");
        assert_eq!(err.kind(), FetchErrorKind::NotFound);
    }

    #[test]
    fn test_load_errors_are_configuration() {
        let err = DataError::Io {
            path: PathBuf::from("missing.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no file"),
        };
        let err: PortfolioError = err.into();
        assert!(err.is_fatal());
    }
}
