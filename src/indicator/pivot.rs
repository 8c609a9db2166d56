use crate::indicator::TABuilder;
use crate::model::Candle;
use serde::Serialize;
use std::fmt::Display;
use std::marker::PhantomData;

/// 피봇 종류
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotKind {
    /// 고점 피봇
    High,
    /// 저점 피봇
    Low,
}

/// 국소 극값(피봇)
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Pivot {
    /// 캔들 인덱스
    pub index: usize,
    /// 피봇 가격 (고점은 고가, 저점은 저가)
    pub price: f64,
    /// 피봇 종류
    pub kind: PivotKind,
}

/// 인덱스 순으로 정렬된 고점/저점 피봇 목록
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Pivots {
    pub highs: Vec<Pivot>,
    pub lows: Vec<Pivot>,
}

impl Display for Pivots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pivots(highs: {}, lows: {})", self.highs.len(), self.lows.len())
    }
}

impl Pivots {
    /// 가장 최근 고점 피봇
    pub fn last_high(&self) -> Option<&Pivot> {
        self.highs.last()
    }

    /// 가장 최근 저점 피봇
    pub fn last_low(&self) -> Option<&Pivot> {
        self.lows.last()
    }

    /// 피봇이 하나도 없는지 확인
    pub fn is_empty(&self) -> bool {
        self.highs.is_empty() && self.lows.is_empty()
    }
}

/// 피봇 탐색기
///
/// 인덱스 i의 고가가 닫힌 구간 [i-left, i+right]의 최고가와 같으면 고점
/// 피봇입니다. 저점도 같은 규칙을 따릅니다. 같은 가격이 여러 번 나오면 조건을
/// 만족하는 인덱스를 모두 보고합니다. 단, 구간 안의 고가가 모두 같으면 고점
/// 피봇이 아닙니다(저점도 동일). 따라서 완전히 평평한 시계열에는 피봇이 없습니다.
#[derive(Debug)]
pub struct PivotBuilder<C: Candle> {
    /// 왼쪽 이웃 수
    left: usize,
    /// 오른쪽 이웃 수
    right: usize,
    _phantom: PhantomData<C>,
}

impl<C> PivotBuilder<C>
where
    C: Candle,
{
    /// 새 피봇 탐색기 생성
    ///
    /// # Arguments
    /// * `left` - 왼쪽 이웃 수
    /// * `right` - 오른쪽 이웃 수
    pub fn new(left: usize, right: usize) -> Self {
        PivotBuilder {
            left,
            right,
            _phantom: PhantomData,
        }
    }

    /// 데이터에서 피봇 탐색
    ///
    /// # Arguments
    /// * `data` - 캔들 데이터
    ///
    /// # Returns
    /// * `Pivots` - 길이가 left+right 이하이면 빈 목록
    pub fn build(&self, data: &[C]) -> Pivots {
        let mut pivots = Pivots::default();
        if data.len() <= self.left + self.right {
            return pivots;
        }

        for i in self.left..data.len() - self.right {
            let window = &data[i - self.left..=i + self.right];

            let (window_low_of_highs, window_high) =
                extremes(window.iter().map(|c| c.high_price()));
            let high = data[i].high_price();
            if high == window_high && window_high > window_low_of_highs {
                pivots.highs.push(Pivot {
                    index: i,
                    price: high,
                    kind: PivotKind::High,
                });
            }

            let (window_low, window_high_of_lows) =
                extremes(window.iter().map(|c| c.low_price()));
            let low = data[i].low_price();
            if low == window_low && window_high_of_lows > window_low {
                pivots.lows.push(Pivot {
                    index: i,
                    price: low,
                    kind: PivotKind::Low,
                });
            }
        }

        pivots
    }
}

/// 값들의 (최소, 최대)
fn extremes(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    })
}

impl<C> TABuilder<Pivots, C> for PivotBuilder<C>
where
    C: Candle,
{
    fn build(&self, data: &[C]) -> Pivots {
        self.build(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OhlcvCandle;
    use chrono::{TimeZone, Utc};

    fn candles(highs_lows: &[(f64, f64)]) -> Vec<OhlcvCandle> {
        highs_lows
            .iter()
            .enumerate()
            .map(|(i, &(high, low))| {
                let mid = (high + low) / 2.0;
                OhlcvCandle::new(
                    Utc.timestamp_opt(i as i64 * 60, 0).unwrap(),
                    mid,
                    high,
                    low,
                    mid,
                    1.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_short_series_has_no_pivots() {
        let data = candles(&[(2.0, 1.0); 6]);
        let pivots = PivotBuilder::new(3, 3).build(&data);
        assert!(pivots.is_empty());
    }

    #[test]
    fn test_single_peak_and_trough() {
        let data = candles(&[
            (10.0, 9.0),
            (11.0, 10.0),
            (15.0, 12.0),
            (11.0, 10.0),
            (10.0, 9.0),
            (9.0, 5.0),
            (10.0, 9.0),
            (11.0, 10.0),
        ]);
        let pivots = PivotBuilder::new(2, 2).build(&data);
        assert_eq!(pivots.highs.len(), 1);
        assert_eq!(pivots.highs[0].index, 2);
        assert_eq!(pivots.highs[0].price, 15.0);
        assert_eq!(pivots.lows.len(), 1);
        assert_eq!(pivots.lows[0].index, 5);
        assert_eq!(pivots.lows[0].kind, PivotKind::Low);
    }

    #[test]
    fn test_flat_series_has_no_pivots() {
        let data = candles(&[(100.0, 100.0); 10]);
        let pivots = PivotBuilder::new(3, 3).build(&data);
        assert!(pivots.is_empty());
    }

    #[test]
    fn test_equal_peaks_are_both_reported() {
        let data = candles(&[
            (10.0, 9.0),
            (12.0, 9.0),
            (12.0, 9.0),
            (10.0, 9.0),
            (9.0, 8.0),
        ]);
        let pivots = PivotBuilder::new(1, 1).build(&data);
        let indices: Vec<usize> = pivots.highs.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![1, 2]);
    }
}
