use crate::indicator::TABuilder;
use crate::indicator::atr::calculate_atr_series;
use crate::model::Candle;
use serde::Serialize;
use std::fmt::Display;
use std::marker::PhantomData;

/// 슈퍼트렌드 추세 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    #[serde(rename = "UP")]
    Up,
    #[serde(rename = "DOWN")]
    Down,
}

impl Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "UP"),
            TrendDirection::Down => write!(f, "DOWN"),
        }
    }
}

/// 슈퍼트렌드 정보
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SuperTrend {
    /// 슈퍼트렌드 라인 값
    pub line: f64,
    /// 추세 방향 (종가 >= 라인이면 상승)
    #[serde(rename = "dir")]
    pub direction: TrendDirection,
}

impl Display for SuperTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SuperTrend({:.2}, {})", self.line, self.direction)
    }
}

impl SuperTrend {
    /// 상승 추세인지 확인
    pub fn is_uptrend(&self) -> bool {
        self.direction == TrendDirection::Up
    }
}

/// 밴드 상태 기계의 한 스텝 상태
#[derive(Debug, Clone, Copy)]
struct BandState {
    /// 현재 슈퍼트렌드 라인
    line: f64,
    /// 히스테리시스가 적용된 상단 밴드
    upper: f64,
    /// 히스테리시스가 적용된 하단 밴드
    lower: f64,
}

/// 슈퍼트렌드 계산을 위한 빌더
#[derive(Debug)]
pub struct SuperTrendBuilder<C: Candle> {
    /// ATR 기간
    period: usize,
    /// ATR 승수
    multiplier: f64,
    _phantom: PhantomData<C>,
}

impl<C: Candle> SuperTrendBuilder<C> {
    /// 새 슈퍼트렌드 빌더 생성
    ///
    /// # Arguments
    /// * `period` - ATR 기간
    /// * `multiplier` - ATR 승수
    ///
    /// # Panics
    /// * 기간이 0이거나 승수가 0 이하이면 패닉 발생
    pub fn new(period: usize, multiplier: f64) -> Self {
        if period == 0 {
            panic!("슈퍼트렌드 기간은 0보다 커야 합니다");
        }

        if multiplier <= 0.0 {
            panic!("슈퍼트렌드 승수는 0보다 커야 합니다");
        }

        SuperTrendBuilder {
            period,
            multiplier,
            _phantom: PhantomData,
        }
    }

    /// 캔들마다 슈퍼트렌드 계산
    ///
    /// 첫 라인은 첫 하단 밴드에서 시작합니다. 이후 각 스텝에서 후보 밴드를 다시
    /// 계산하고, 직전 종가가 직전 밴드를 넘어선 경우에만 더 좁은 밴드를 유지한
    /// 뒤 추적 밴드의 유지 또는 전환을 결정합니다.
    ///
    /// # Arguments
    /// * `data` - 캔들 데이터
    ///
    /// # Returns
    /// * `Vec<SuperTrend>` - 입력과 같은 길이의 슈퍼트렌드 시계열
    pub fn build_series(&self, data: &[C]) -> Vec<SuperTrend> {
        let atr = calculate_atr_series(data, self.period);
        let bands: Vec<(f64, f64)> = data
            .iter()
            .zip(atr.iter())
            .map(|(candle, atr)| {
                let mid = candle.median_price();
                (mid + self.multiplier * atr, mid - self.multiplier * atr)
            })
            .collect();

        let Some(&(first_upper, first_lower)) = bands.first() else {
            return Vec::new();
        };

        let mut lines = Vec::with_capacity(data.len());
        lines.push(first_lower);

        (1..data.len()).fold(
            BandState {
                line: first_lower,
                upper: first_upper,
                lower: first_lower,
            },
            |prev, i| {
                let (upper, lower) = bands[i];
                let prev_close = data[i - 1].close_price();
                let close = data[i].close_price();

                let upper = if prev_close > prev.upper {
                    upper.min(prev.upper)
                } else {
                    upper
                };
                let lower = if prev_close < prev.lower {
                    lower.max(prev.lower)
                } else {
                    lower
                };

                let line = if prev.line == prev.upper {
                    if close <= upper { upper } else { lower }
                } else if close >= lower {
                    lower
                } else {
                    upper
                };

                lines.push(line);
                BandState { line, upper, lower }
            },
        );

        data.iter()
            .zip(lines)
            .map(|(candle, line)| SuperTrend {
                line,
                direction: if candle.close_price() >= line {
                    TrendDirection::Up
                } else {
                    TrendDirection::Down
                },
            })
            .collect()
    }

    /// 데이터에서 최신 슈퍼트렌드 생성
    ///
    /// # Returns
    /// * `SuperTrend` - 최신 값 (데이터가 없으면 라인 0, 상승)
    pub fn build(&self, data: &[C]) -> SuperTrend {
        self.build_series(data)
            .last()
            .copied()
            .unwrap_or(SuperTrend {
                line: 0.0,
                direction: TrendDirection::Up,
            })
    }
}

impl<C: Candle> TABuilder<SuperTrend, C> for SuperTrendBuilder<C> {
    fn build(&self, data: &[C]) -> SuperTrend {
        self.build(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OhlcvCandle;
    use chrono::{TimeZone, Utc};

    fn candle(i: usize, high: f64, low: f64, close: f64) -> OhlcvCandle {
        OhlcvCandle::new(
            Utc.timestamp_opt(i as i64 * 60, 0).unwrap(),
            close,
            high,
            low,
            close,
            1.0,
        )
    }

    #[test]
    fn test_seeded_from_first_lower_band() {
        // ATR0 = 2, hl2 = 11 => lower = 11 - 3*2 = 5
        let data = vec![candle(0, 12.0, 10.0, 11.0)];
        let st = SuperTrendBuilder::new(10, 3.0).build(&data);
        assert_eq!(st.line, 5.0);
        assert_eq!(st.direction, TrendDirection::Up);
    }

    #[test]
    fn test_direction_matches_line_for_every_candle() {
        let data: Vec<OhlcvCandle> = (0..200)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.1).sin() * 20.0;
                candle(i, base + 2.0, base - 2.0, base + (i as f64).cos())
            })
            .collect();
        let series = SuperTrendBuilder::new(10, 3.0).build_series(&data);
        for (candle, st) in data.iter().zip(series.iter()) {
            assert_eq!(st.is_uptrend(), candle.close >= st.line);
        }
    }

    #[test]
    fn test_uptrend_ends_up() {
        let data: Vec<OhlcvCandle> = (0..250)
            .map(|i| {
                let base = 100.0 + i as f64;
                candle(i, base + 1.0, base - 1.0, base + 0.5)
            })
            .collect();
        assert!(SuperTrendBuilder::new(10, 3.0).build(&data).is_uptrend());
    }

    #[test]
    fn test_direction_serializes_upper_case() {
        let st = SuperTrend {
            line: 1.0,
            direction: TrendDirection::Down,
        };
        assert_eq!(
            serde_json::to_string(&st).unwrap(),
            r#"{"line":1.0,"dir":"DOWN"}"#
        );
    }
}
