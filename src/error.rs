use std::fmt;

/// 설정 로드 오류
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 파일 오류
    FileError(String),
    /// 파싱 오류
    ParseError(String),
    /// 유효성 검사 오류
    ValidationError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileError(msg) => write!(f, "설정 파일 오류: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "설정 파싱 오류: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "설정 유효성 검사 오류: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// 설정 로드 결과
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 분석 오류
///
/// 지표와 탐지기는 데이터가 부족해도 대체값을 돌려주므로, 분석이 실패하는
/// 경우는 빈 시계열과 잘못된 설정뿐입니다.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// 캔들이 하나도 없는 시계열
    EmptySeries,
    /// 분석 설정 오류
    InvalidConfig(ConfigError),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::EmptySeries => write!(f, "cannot analyze empty series"),
            AnalysisError::InvalidConfig(err) => write!(f, "잘못된 분석 설정: {}", err),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::EmptySeries => None,
            AnalysisError::InvalidConfig(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AnalysisError {
    fn from(err: ConfigError) -> Self {
        AnalysisError::InvalidConfig(err)
    }
}

/// 분석 결과
pub type AnalysisResult<T> = Result<T, AnalysisError>;
