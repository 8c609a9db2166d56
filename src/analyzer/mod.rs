// 구조 분석기 모듈
// 지표 위에서 가격 레벨, 추세선, 시장 구조, 피보나치 레벨을 탐지합니다.

pub mod fibonacci_analyzer;
pub mod market_structure_analyzer;
pub mod support_resistance_analyzer;
pub mod trade_setup_analyzer;
pub mod trendline_analyzer;
pub mod volume_profile_analyzer;

pub use fibonacci_analyzer::{Fibonacci, FibonacciAnalyzer, FibonacciLevel, FibonacciLevels};
pub use market_structure_analyzer::{
    FVGType, FairValueGap, MarketStructure, MarketStructureAnalyzer, OrderBlockZone,
    StructureBreaks, StructureChange, ZoneType,
};
pub use support_resistance_analyzer::{SupportResistance, SupportResistanceAnalyzer};
pub use trade_setup_analyzer::{Bias, Direction, TradeSetup, TradeSetupAnalyzer};
pub use trendline_analyzer::{Trendline, TrendlineAnalyzer, Trendlines};
pub use volume_profile_analyzer::{VolumeProfile, VolumeProfileAnalyzer};
