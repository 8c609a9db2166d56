use crate::indicator::pivot::{Pivot, PivotBuilder};
use crate::model::Candle;
use serde::Serialize;
use std::fmt::Display;

/// 두 피봇을 지나는 추세선
///
/// 피봇이 2개 미만이면 기울기와 현재 값이 모두 None입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Trendline {
    /// 캔들 하나당 가격 변화량
    pub slope: Option<f64>,
    /// 마지막 캔들 인덱스에서의 추세선 값
    pub value_now: Option<f64>,
}

impl Trendline {
    /// 두 피봇을 지나는 직선을 `at` 인덱스에서 평가
    ///
    /// # Arguments
    /// * `first` - 앞선 피봇
    /// * `second` - 나중 피봇
    /// * `at` - 평가할 캔들 인덱스
    fn through(first: &Pivot, second: &Pivot, at: usize) -> Self {
        let slope = (second.price - first.price) / (second.index as f64 - first.index as f64);
        let intercept = first.price - slope * first.index as f64;

        Trendline {
            slope: Some(slope),
            value_now: Some(slope * at as f64 + intercept),
        }
    }

    /// 추세선 존재 여부
    pub fn is_defined(&self) -> bool {
        self.slope.is_some()
    }
}

/// 상승 추세선(LTA)과 하락 추세선(LTB)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Trendlines {
    /// 최근 두 저점을 잇는 지지 추세선
    pub lta: Trendline,
    /// 최근 두 고점을 잇는 저항 추세선
    pub ltb: Trendline,
}

impl Display for Trendlines {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Trendlines(LTA: {:?}, LTB: {:?})",
            self.lta.value_now, self.ltb.value_now
        )
    }
}

/// 추세선 분석기
#[derive(Debug)]
pub struct TrendlineAnalyzer<C: Candle> {
    pivots: PivotBuilder<C>,
}

impl<C: Candle> TrendlineAnalyzer<C> {
    /// 새 추세선 분석기 생성
    ///
    /// # Arguments
    /// * `pivot_left` - 피봇 왼쪽 이웃 수
    /// * `pivot_right` - 피봇 오른쪽 이웃 수
    pub fn new(pivot_left: usize, pivot_right: usize) -> Self {
        TrendlineAnalyzer {
            pivots: PivotBuilder::new(pivot_left, pivot_right),
        }
    }

    /// 최근 두 피봇으로 추세선 계산
    pub fn analyze(&self, data: &[C]) -> Trendlines {
        let pivots = self.pivots.build(data);
        let last_index = data.len().saturating_sub(1);

        let line = |points: &[Pivot]| match points {
            [.., first, second] => Trendline::through(first, second, last_index),
            _ => Trendline::default(),
        };

        Trendlines {
            lta: line(&pivots.lows),
            ltb: line(&pivots.highs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OhlcvCandle;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_line_through_two_pivots() {
        let first = Pivot {
            index: 10,
            price: 100.0,
            kind: crate::indicator::pivot::PivotKind::Low,
        };
        let second = Pivot {
            index: 20,
            price: 110.0,
            ..first
        };
        let line = Trendline::through(&first, &second, 30);
        assert_eq!(line.slope, Some(1.0));
        assert_eq!(line.value_now, Some(120.0));
    }

    #[test]
    fn test_insufficient_pivots() {
        let data: Vec<OhlcvCandle> = (0..5)
            .map(|i| {
                OhlcvCandle::new(
                    Utc.timestamp_opt(i * 60, 0).unwrap(),
                    1.0,
                    2.0,
                    0.5,
                    1.0,
                    1.0,
                )
            })
            .collect();
        let lines = TrendlineAnalyzer::new(5, 5).analyze(&data);
        assert!(!lines.lta.is_defined());
        assert!(!lines.ltb.is_defined());
        assert_eq!(
            serde_json::to_string(&lines.lta).unwrap(),
            r#"{"slope":null,"value_now":null}"#
        );
    }

    #[test]
    fn test_rising_lows() {
        // 주기 12의 파동에 상승 추세를 더한 시계열
        let data: Vec<OhlcvCandle> = (0..60)
            .map(|i| {
                let phase = (i % 12) as f64;
                let wave = if phase <= 6.0 { phase } else { 12.0 - phase };
                let mid = 100.0 + i as f64 * 0.5 + wave * 3.0;
                OhlcvCandle::new(
                    Utc.timestamp_opt(i * 60, 0).unwrap(),
                    mid,
                    mid + 1.0,
                    mid - 1.0,
                    mid,
                    1.0,
                )
            })
            .collect();
        let lines = TrendlineAnalyzer::new(5, 5).analyze(&data);
        assert!(lines.lta.slope.unwrap() > 0.0);
        assert!(lines.ltb.slope.unwrap() > 0.0);
    }
}
