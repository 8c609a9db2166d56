use crate::indicator::pivot::PivotBuilder;
use crate::model::Candle;
use serde::{Serialize, Serializer};
use std::fmt::Display;

/// Fair Value Gap 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FVGType {
    /// 불리시 FVG (상승 갭)
    Bullish,
    /// 베어리시 FVG (하락 갭)
    Bearish,
}

/// Fair Value Gap
///
/// 세 캔들 사이에서 가운데 캔들이 메우지 못한 가격 구간입니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FairValueGap {
    /// 갭 방향
    #[serde(rename = "type")]
    pub gap_type: FVGType,
    /// 갭 상단
    pub gap_top: f64,
    /// 갭 하단
    pub gap_bottom: f64,
}

impl Display for FairValueGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FVG({:?}: {:.4} - {:.4})",
            self.gap_type, self.gap_bottom, self.gap_top
        )
    }
}

/// 오더 블록 구역 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    /// 수요 구역 (음봉 뒤 급격한 변동)
    Demand,
    /// 공급 구역
    Supply,
}

/// 오더 블록 구역
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderBlockZone {
    /// 구역 타입
    #[serde(rename = "type")]
    pub zone_type: ZoneType,
    /// 구역 하단 (캔들 저가)
    pub level_low: f64,
    /// 구역 상단 (캔들 고가)
    pub level_high: f64,
}

impl Display for OrderBlockZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "OrderBlock({:?}: {:.4} - {:.4})",
            self.zone_type, self.level_low, self.level_high
        )
    }
}

/// 구조 변화 신호
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureChange {
    /// 최근 고점 피봇 상향 돌파
    BullishBoS,
    /// 최근 저점 피봇 하향 이탈
    BearishChoCH,
}

impl StructureChange {
    /// 표시용 라벨
    pub fn label(&self) -> &'static str {
        match self {
            StructureChange::BullishBoS => "Bullish BoS (higher high)",
            StructureChange::BearishChoCH => "Bearish ChoCH (lower low)",
        }
    }
}

impl Display for StructureChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 라벨 문자열로 직렬화
impl Serialize for StructureChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// BoS / ChoCH 판정 결과 (각각 독립)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StructureBreaks {
    pub bos: Option<StructureChange>,
    pub choch: Option<StructureChange>,
}

/// 시장 구조 분석 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketStructure {
    /// 가장 최근 FVG
    pub fvg: Option<FairValueGap>,
    /// 최근 오더 블록 (오래된 것부터)
    pub order_blocks: Vec<OrderBlockZone>,
    /// 구조 변화 신호
    pub breaks: StructureBreaks,
}

/// 시장 구조 분석기
///
/// FVG, 오더 블록, BoS/ChoCH를 탐지합니다.
#[derive(Debug)]
pub struct MarketStructureAnalyzer<C: Candle> {
    /// 구조 변화 판정용 피봇 탐색기
    pivots: PivotBuilder<C>,
    /// FVG 탐색 최대 캔들 수
    pub fvg_lookback: usize,
    /// 오더 블록 평균 변동폭 기간
    pub range_period: usize,
    /// 오더 블록 판정 배수
    pub expansion: f64,
    /// 오더 블록 탐색 최대 캔들 수
    pub order_block_lookback: usize,
    /// 보고할 오더 블록 최대 개수
    pub max_order_blocks: usize,
}

impl<C: Candle> MarketStructureAnalyzer<C> {
    /// 새 시장 구조 분석기 생성
    pub fn new(
        pivot_left: usize,
        pivot_right: usize,
        fvg_lookback: usize,
        range_period: usize,
        expansion: f64,
        order_block_lookback: usize,
        max_order_blocks: usize,
    ) -> Self {
        MarketStructureAnalyzer {
            pivots: PivotBuilder::new(pivot_left, pivot_right),
            fvg_lookback,
            range_period,
            expansion,
            order_block_lookback,
            max_order_blocks,
        }
    }

    /// 시장 구조 분석
    pub fn analyze(&self, data: &[C]) -> MarketStructure {
        MarketStructure {
            fvg: self.find_fair_value_gap(data),
            order_blocks: self.find_order_blocks(data),
            breaks: self.find_structure_breaks(data),
        }
    }

    /// 가장 최근 Fair Value Gap 탐색
    ///
    /// 최신 캔들부터 거꾸로 lookback 범위 안에서 캔들 i와 i-2를 비교합니다.
    /// 같은 i에서는 불리시를 먼저 확인합니다.
    pub fn find_fair_value_gap(&self, data: &[C]) -> Option<FairValueGap> {
        if data.len() < 3 {
            return None;
        }

        let start = 2.max(data.len().saturating_sub(self.fvg_lookback));
        (start..data.len()).rev().find_map(|i| {
            let first = &data[i - 2];
            let third = &data[i];

            if third.low_price() > first.high_price() {
                Some(FairValueGap {
                    gap_type: FVGType::Bullish,
                    gap_top: third.low_price(),
                    gap_bottom: first.high_price(),
                })
            } else if third.high_price() < first.low_price() {
                Some(FairValueGap {
                    gap_type: FVGType::Bearish,
                    gap_top: first.low_price(),
                    gap_bottom: third.high_price(),
                })
            } else {
                None
            }
        })
    }

    /// 오더 블록 탐색
    ///
    /// 캔들 i의 변동폭(고가-저가)이 i-1 시점 평균 변동폭의 `expansion`배를 넘으면
    /// 캔들 i-1을 오더 블록으로 봅니다. 평균이 정의되지 않았거나 0이면 건너뛰고,
    /// 아직 진행 중인 마지막 캔들은 신호로 쓰지 않습니다.
    ///
    /// # Returns
    /// * `Vec<OrderBlockZone>` - 최근 `max_order_blocks`개 (오래된 것부터)
    pub fn find_order_blocks(&self, data: &[C]) -> Vec<OrderBlockZone> {
        if data.len() < 2 || self.range_period == 0 {
            return Vec::new();
        }

        let ranges: Vec<f64> = data
            .iter()
            .map(|c| c.high_price() - c.low_price())
            .collect();
        let average_at = |end: usize| -> Option<f64> {
            if end + 1 < self.range_period {
                return None;
            }
            let window = &ranges[end + 1 - self.range_period..=end];
            Some(window.iter().sum::<f64>() / self.range_period as f64)
        };

        let start = 1.max(data.len().saturating_sub(self.order_block_lookback));
        let zones: Vec<OrderBlockZone> = (start..data.len() - 1)
            .filter(|&i| match average_at(i - 1) {
                Some(average) if average != 0.0 => ranges[i] > self.expansion * average,
                _ => false,
            })
            .map(|i| {
                let block = &data[i - 1];
                OrderBlockZone {
                    zone_type: if block.is_bearish() {
                        ZoneType::Demand
                    } else {
                        ZoneType::Supply
                    },
                    level_low: block.low_price(),
                    level_high: block.high_price(),
                }
            })
            .collect();

        let skip = zones.len().saturating_sub(self.max_order_blocks);
        zones.into_iter().skip(skip).collect()
    }

    /// BoS / ChoCH 판정
    ///
    /// 최신 종가가 최근 고점 피봇 위면 BoS, 최근 저점 피봇 아래면 ChoCH입니다.
    pub fn find_structure_breaks(&self, data: &[C]) -> StructureBreaks {
        let Some(close) = data.last().map(|c| c.close_price()) else {
            return StructureBreaks::default();
        };
        let pivots = self.pivots.build(data);

        StructureBreaks {
            bos: pivots
                .last_high()
                .filter(|pivot| close > pivot.price)
                .map(|_| StructureChange::BullishBoS),
            choch: pivots
                .last_low()
                .filter(|pivot| close < pivot.price)
                .map(|_| StructureChange::BearishChoCH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OhlcvCandle;
    use chrono::{TimeZone, Utc};

    fn candle(i: usize, open: f64, high: f64, low: f64, close: f64) -> OhlcvCandle {
        OhlcvCandle::new(
            Utc.timestamp_opt(i as i64 * 60, 0).unwrap(),
            open,
            high,
            low,
            close,
            1.0,
        )
    }

    fn analyzer() -> MarketStructureAnalyzer<OhlcvCandle> {
        MarketStructureAnalyzer::new(3, 3, 200, 20, 1.5, 200, 2)
    }

    #[test]
    fn test_bullish_fvg() {
        let data = vec![
            candle(0, 10.0, 11.0, 9.0, 10.5),
            candle(1, 10.5, 14.0, 10.0, 13.5),
            candle(2, 13.5, 15.0, 12.0, 14.5),
        ];
        let fvg = analyzer().find_fair_value_gap(&data).unwrap();
        assert_eq!(fvg.gap_type, FVGType::Bullish);
        assert_eq!(fvg.gap_bottom, 11.0);
        assert_eq!(fvg.gap_top, 12.0);
    }

    #[test]
    fn test_bearish_fvg_most_recent_wins() {
        let data = vec![
            candle(0, 10.0, 11.0, 9.0, 10.5),
            candle(1, 10.5, 14.0, 10.0, 13.5),
            candle(2, 13.5, 15.0, 12.0, 14.5),
            candle(3, 14.5, 15.0, 13.0, 13.5),
            candle(4, 13.0, 11.0, 9.5, 10.0),
        ];
        let fvg = analyzer().find_fair_value_gap(&data).unwrap();
        assert_eq!(fvg.gap_type, FVGType::Bearish);
        assert_eq!(fvg.gap_top, 12.0);
        assert_eq!(fvg.gap_bottom, 11.0);
    }

    #[test]
    fn test_no_fvg_in_overlapping_candles() {
        let data: Vec<OhlcvCandle> = (0..10).map(|i| candle(i, 10.0, 11.0, 9.0, 10.0)).collect();
        assert_eq!(analyzer().find_fair_value_gap(&data), None);
    }

    #[test]
    fn test_order_block_from_range_expansion() {
        // 변동폭 1짜리 캔들 25개 뒤에 변동폭 5짜리 캔들, 그 뒤 캔들 하나
        let mut data: Vec<OhlcvCandle> = (0..25)
            .map(|i| candle(i, 10.5, 11.0, 10.0, 10.2))
            .collect();
        data.push(candle(25, 10.2, 15.0, 10.0, 14.5));
        data.push(candle(26, 14.5, 15.0, 14.0, 14.8));

        let zones = analyzer().find_order_blocks(&data);
        assert_eq!(
            zones,
            vec![OrderBlockZone {
                zone_type: ZoneType::Demand,
                level_low: 10.0,
                level_high: 11.0,
            }]
        );
    }

    #[test]
    fn test_last_candle_is_not_a_signal() {
        let mut data: Vec<OhlcvCandle> = (0..25)
            .map(|i| candle(i, 10.0, 11.0, 10.0, 10.5))
            .collect();
        data.push(candle(25, 10.5, 20.0, 10.0, 19.0));
        assert!(analyzer().find_order_blocks(&data).is_empty());
    }

    #[test]
    fn test_order_blocks_keep_latest_two() {
        let mut data = Vec::new();
        for burst in 0..3 {
            for _ in 0..21 {
                data.push(candle(data.len(), 10.0, 11.0, 10.0, 10.5 + burst as f64 * 0.1));
            }
            data.push(candle(data.len(), 10.0, 20.0, 10.0, 19.0));
        }
        data.push(candle(data.len(), 10.0, 11.0, 10.0, 10.5));

        let zones = analyzer().find_order_blocks(&data);
        assert_eq!(zones.len(), 2);
        assert!(zones.iter().all(|z| z.zone_type == ZoneType::Supply));
    }

    #[test]
    fn test_structure_break_labels() {
        let change = StructureChange::BullishBoS;
        assert_eq!(
            serde_json::to_string(&change).unwrap(),
            r#""Bullish BoS (higher high)""#
        );
        assert_eq!(
            StructureChange::BearishChoCH.to_string(),
            "Bearish ChoCH (lower low)"
        );
    }

    #[test]
    fn test_breakout_above_last_high() {
        // 고점 12인 피봇 뒤에 종가 13으로 돌파
        let mut data = Vec::new();
        for (i, high) in [10.0, 10.5, 11.0, 12.0, 11.0, 10.5, 10.0, 10.2]
            .iter()
            .enumerate()
        {
            data.push(candle(i, high - 1.0, *high, high - 2.0, high - 0.5));
        }
        data.push(candle(8, 11.0, 13.5, 11.0, 13.0));

        let breaks = analyzer().find_structure_breaks(&data);
        assert_eq!(breaks.bos, Some(StructureChange::BullishBoS));
        assert_eq!(breaks.choch, None);
    }
}
