use crate::indicator::pivot::PivotBuilder;
use crate::indicator::utils::round_to;
use crate::model::Candle;
use serde::Serialize;
use std::fmt::Display;

/// 레벨 중복 제거에 사용하는 소수점 자리수
const LEVEL_DECIMALS: i32 = 6;

/// 지지/저항 레벨 분석 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupportResistance {
    /// 현재가 이하 지지선 (가까운 순, 내림차순)
    pub supports: Vec<f64>,
    /// 현재가 초과 저항선 (가까운 순, 오름차순)
    pub resistances: Vec<f64>,
}

impl Display for SupportResistance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SupportResistance(supports: {:?}, resistances: {:?})",
            self.supports, self.resistances
        )
    }
}

impl SupportResistance {
    /// 가장 가까운 지지선
    pub fn nearest_support(&self) -> Option<f64> {
        self.supports.first().copied()
    }

    /// 가장 가까운 저항선
    pub fn nearest_resistance(&self) -> Option<f64> {
        self.resistances.first().copied()
    }
}

/// 가까운 가격 레벨 병합
///
/// 가격을 소수점 6자리로 반올림해 중복을 없앤 뒤 오름차순으로 훑으면서,
/// 마지막으로 남긴 레벨과의 상대 거리가 허용 오차를 넘는 가격만 남깁니다.
/// 0 레벨은 상대 거리 대신 절대 거리로 비교합니다.
///
/// # Arguments
/// * `prices` - 피봇 가격 목록
/// * `tolerance` - 상대 거리 허용 오차
///
/// # Returns
/// * `Vec<f64>` - 오름차순으로 병합된 레벨
pub fn merge_levels(prices: impl IntoIterator<Item = f64>, tolerance: f64) -> Vec<f64> {
    let mut levels: Vec<f64> = prices
        .into_iter()
        .map(|price| round_to(price, LEVEL_DECIMALS))
        .collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup();

    let mut merged: Vec<f64> = Vec::with_capacity(levels.len());
    for level in levels {
        let keep = match merged.last() {
            None => true,
            Some(last) => {
                let distance = (level - last).abs();
                if level == 0.0 {
                    distance > tolerance
                } else {
                    distance / level.abs() > tolerance
                }
            }
        };
        if keep {
            merged.push(level);
        }
    }

    merged
}

/// 지지/저항 분석기
///
/// 피봇 고점과 저점을 한데 모아 병합한 뒤 최신 종가를 기준으로 나눕니다.
#[derive(Debug)]
pub struct SupportResistanceAnalyzer<C: Candle> {
    /// 피봇 탐색기
    pivots: PivotBuilder<C>,
    /// 병합 허용 오차
    tolerance: f64,
    /// 지지/저항 각각 최대 개수
    max_levels: usize,
}

impl<C: Candle> SupportResistanceAnalyzer<C> {
    /// 새 지지/저항 분석기 생성
    ///
    /// # Arguments
    /// * `pivot_left` - 피봇 왼쪽 이웃 수
    /// * `pivot_right` - 피봇 오른쪽 이웃 수
    /// * `tolerance` - 병합 허용 오차
    /// * `max_levels` - 지지/저항 각각 최대 개수
    pub fn new(pivot_left: usize, pivot_right: usize, tolerance: f64, max_levels: usize) -> Self {
        SupportResistanceAnalyzer {
            pivots: PivotBuilder::new(pivot_left, pivot_right),
            tolerance,
            max_levels,
        }
    }

    /// 지지/저항 레벨 분석
    ///
    /// # Arguments
    /// * `data` - 캔들 데이터
    ///
    /// # Returns
    /// * `SupportResistance` - 데이터가 없거나 피봇이 없으면 빈 목록
    pub fn analyze(&self, data: &[C]) -> SupportResistance {
        let Some(close) = data.last().map(|c| c.close_price()) else {
            return SupportResistance::default();
        };

        let pivots = self.pivots.build(data);
        let merged = merge_levels(
            pivots.highs.iter().chain(pivots.lows.iter()).map(|p| p.price),
            self.tolerance,
        );

        let (mut supports, resistances): (Vec<f64>, Vec<f64>) =
            merged.into_iter().partition(|level| *level <= close);
        supports.reverse();
        supports.truncate(self.max_levels);

        SupportResistance {
            supports,
            resistances: resistances.into_iter().take(self.max_levels).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OhlcvCandle;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_merge_keeps_first_seen() {
        // 100.1은 100과 0.1% 차이라서 병합되고, 101은 남음
        let merged = merge_levels([101.0, 100.1, 100.0, 100.0], 0.002);
        assert_eq!(merged, vec![100.0, 101.0]);
    }

    #[test]
    fn test_merge_rounds_to_six_decimals() {
        let merged = merge_levels([1.0000001, 1.0000004], 0.0);
        assert_eq!(merged, vec![1.0]);
    }

    #[test]
    fn test_merge_zero_level() {
        // 0 레벨은 절대 거리로 비교
        assert_eq!(merge_levels([-0.001, 0.0], 0.002), vec![-0.001]);
        assert_eq!(merge_levels([-0.01, 0.0], 0.002), vec![-0.01, 0.0]);
    }

    fn zigzag(len: usize) -> Vec<OhlcvCandle> {
        // 주기 8의 톱니파: 고점 110, 저점 90
        (0..len)
            .map(|i| {
                let phase = (i % 8) as f64;
                let mid = if phase <= 4.0 {
                    90.0 + phase * 5.0
                } else {
                    110.0 - (phase - 4.0) * 5.0
                };
                OhlcvCandle::new(
                    Utc.timestamp_opt(i as i64 * 60, 0).unwrap(),
                    mid,
                    mid + 1.0,
                    mid - 1.0,
                    mid,
                    10.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_partition_by_last_close() {
        let data = zigzag(42);
        let last_close = data.last().unwrap().close;
        let levels = SupportResistanceAnalyzer::new(3, 3, 0.002, 3).analyze(&data);

        assert_eq!(levels.supports, vec![89.0]);
        assert_eq!(levels.resistances, vec![111.0]);
        assert!(levels.supports.iter().all(|s| *s <= last_close));
        assert!(levels.resistances.iter().all(|r| *r > last_close));
    }

    #[test]
    fn test_empty_data() {
        let levels = SupportResistanceAnalyzer::<OhlcvCandle>::new(3, 3, 0.002, 3).analyze(&[]);
        assert_eq!(levels, SupportResistance::default());
    }
}
