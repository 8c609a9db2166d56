use common_test_utils::*;

use smc_analysis::analyzer::{FVGType, MarketStructureAnalyzer, StructureChange, ZoneType};
use smc_analysis::{CandleSeries, analyze};

/// 횡보 후 큰 장대 양봉으로 돌파하는 시계열
fn breakout_candles() -> Vec<TestCandle> {
    let mut candles = create_sideways_candles(60, 50.0, 4.0);
    candles.push(TestCandle::new(60 * 60, 51.0, 60.0, 50.9, 59.0, 5000.0));
    candles.push(TestCandle::new(61 * 60, 59.0, 62.0, 58.5, 61.0, 3000.0));
    candles
}

#[test]
fn test_breakout_structure() {
    let summary = analyze(&CandleSeries::new(breakout_candles())).unwrap();

    let fvg = summary.fvg.unwrap();
    assert_eq!(fvg.gap_type, FVGType::Bullish);
    assert_eq!(fvg.gap_top, 58.5);
    assert_eq!(fvg.gap_bottom, 51.5);

    assert_eq!(summary.bos, Some(StructureChange::BullishBoS));
    assert_eq!(summary.choch, None);

    assert_eq!(summary.order_blocks.len(), 1);
    let zone = &summary.order_blocks[0];
    assert_eq!(zone.zone_type, ZoneType::Supply);
    assert_eq!(zone.level_low, 50.5);
    assert_eq!(zone.level_high, 51.5);
}

#[test]
fn test_breakout_structure_json() {
    let summary = analyze(&CandleSeries::new(breakout_candles())).unwrap();
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["fvg"]["type"], "bullish");
    assert_eq!(json["bos"], "Bullish BoS (higher high)");
    assert!(json["choch"].is_null());
    assert_eq!(json["order_blocks"][0]["type"], "supply");
}

#[test]
fn test_breakdown_sets_choch() {
    let mut candles = create_sideways_candles(60, 50.0, 4.0);
    candles.push(TestCandle::new(60 * 60, 51.0, 51.2, 40.0, 41.0, 5000.0));

    let analyzer = MarketStructureAnalyzer::<TestCandle>::new(3, 3, 200, 20, 1.5, 200, 2);
    let breaks = analyzer.find_structure_breaks(&candles);

    assert_eq!(breaks.choch, Some(StructureChange::BearishChoCH));
    assert_eq!(breaks.bos, None);
}

#[test]
fn test_order_blocks_capped_to_most_recent() {
    let mut candles = create_sideways_candles(40, 50.0, 4.0);
    // 평균 변동폭(1.0)의 1.5배를 넘는 캔들을 세 번 넣음
    for k in 0..3 {
        let index = 40 + 2 * k;
        let close = 50.0 + k as f64;
        candles.push(TestCandle::new(
            index as i64 * 60,
            close,
            close + 0.5,
            close - 0.5,
            close,
            1000.0,
        ));
        candles.push(TestCandle::new(
            (index + 1) as i64 * 60,
            close,
            close + 2.0,
            close - 2.0,
            close + 1.0,
            1000.0,
        ));
    }
    candles.push(TestCandle::new(46 * 60, 52.0, 52.5, 51.5, 52.0, 1000.0));

    let series = CandleSeries::new(candles);
    let analyzer = MarketStructureAnalyzer::<TestCandle>::new(3, 3, 200, 20, 1.5, 200, 2);
    let zones = analyzer.find_order_blocks(series.items());

    assert_eq!(zones.len(), 2);
    assert_eq!(zones[0].level_low, 50.5);
    assert_eq!(zones[1].level_low, 51.5);
}
