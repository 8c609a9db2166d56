use common_test_utils::*;

use smc_analysis::analyzer::{SupportResistanceAnalyzer, TrendlineAnalyzer};

#[test]
fn test_support_resistance_analyzer_empty() {
    let analyzer = SupportResistanceAnalyzer::<TestCandle>::new(3, 3, 0.002, 3);
    let levels = analyzer.analyze(&[]);
    assert!(levels.supports.is_empty());
    assert!(levels.resistances.is_empty());
}

#[test]
fn test_support_resistance_sideways_range() {
    // 종가 48, 49, 50, 51 반복: 고점 피봇 51.5, 저점 피봇 47.5
    let candles = create_sideways_candles(120, 50.0, 4.0);
    let analyzer = SupportResistanceAnalyzer::<TestCandle>::new(3, 3, 0.002, 3);
    let levels = analyzer.analyze(&candles);

    assert_eq!(levels.supports, vec![47.5]);
    assert_eq!(levels.resistances, vec![51.5]);
    assert_eq!(levels.nearest_support(), Some(47.5));
    assert_eq!(levels.nearest_resistance(), Some(51.5));
}

#[test]
fn test_support_resistance_wide_tolerance_merges() {
    let candles = create_sideways_candles(120, 50.0, 4.0);
    // 47.5와 51.5의 상대 거리는 약 7.8%
    let analyzer = SupportResistanceAnalyzer::<TestCandle>::new(3, 3, 0.1, 3);
    let levels = analyzer.analyze(&candles);

    assert_eq!(levels.supports, vec![47.5]);
    assert!(levels.resistances.is_empty());
}

#[test]
fn test_trendlines_on_wavy_uptrend() {
    let candles = create_wavy_candles(250, 100.0, 0.5, 2.0, 10);
    let trendlines = TrendlineAnalyzer::<TestCandle>::new(5, 5).analyze(&candles);

    assert!(trendlines.lta.is_defined());
    assert!(trendlines.ltb.is_defined());
}

#[test]
fn test_trendlines_on_monotonic_series() {
    // 단조 상승에서는 피봇이 없음
    let candles = create_uptrend_candles(100, 100.0, 1.0);
    let trendlines = TrendlineAnalyzer::<TestCandle>::new(5, 5).analyze(&candles);

    assert!(!trendlines.lta.is_defined());
    assert!(!trendlines.ltb.is_defined());
}
