pub mod analysis;
pub mod analyzer;
pub mod candle_series;
pub mod config;
pub mod error;
pub mod indicator;
pub mod model;
pub mod summary;

/// 설정 로더
pub mod config_loader;

pub use analysis::{SmcAnalyzer, analyze};
pub use analyzer::{TradeSetup, TradeSetupAnalyzer};
pub use candle_series::CandleSeries;
pub use config::AnalysisConfig;
pub use config_loader::{ConfigFormat, ConfigLoader, ConfigValidation};
pub use error::{AnalysisError, AnalysisResult, ConfigError, ConfigResult};
pub use model::{Candle, OhlcvCandle};
pub use summary::{AnalysisSummary, IndicatorBundle};
