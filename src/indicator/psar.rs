use crate::indicator::TABuilder;
use crate::model::Candle;
use serde::{Serialize, Serializer};
use std::fmt::Display;
use std::marker::PhantomData;

/// 파라볼릭 SAR 상태 기계의 한 스텝 상태
#[derive(Clone, Copy, Debug, PartialEq)]
struct SarState {
    /// 상승 추세 여부
    bullish: bool,
    /// 가속 계수
    af: f64,
    /// 극점 (상승 추세는 최고가, 하락 추세는 최저가)
    ep: f64,
    /// 현재 SAR 값
    sar: f64,
}

/// 파라볼릭 SAR 시계열 계산
///
/// 상승 추세, af = step, ep = 첫 고가, sar = 첫 저가로 시작합니다.
/// 길이가 2 미만이면 종가를 그대로 반환합니다.
///
/// # Arguments
/// * `data` - 캔들 데이터
/// * `step` - 가속 계수 증가분 (초기값)
/// * `max_step` - 가속 계수 상한
pub fn calculate_psar_series<C: Candle>(data: &[C], step: f64, max_step: f64) -> Vec<f64> {
    if data.len() < 2 {
        return data.iter().map(|c| c.close_price()).collect();
    }

    let initial = SarState {
        bullish: true,
        af: step,
        ep: data[0].high_price(),
        sar: data[0].low_price(),
    };

    let mut series = Vec::with_capacity(data.len());
    series.push(initial.sar);

    data.windows(2).fold(initial, |state, pair| {
        let next = advance(state, &pair[0], &pair[1], step, max_step);
        series.push(next.sar);
        next
    });

    series
}

/// 이전 캔들과 현재 캔들로 상태를 한 스텝 진행
fn advance<C: Candle>(state: SarState, prev: &C, current: &C, step: f64, max_step: f64) -> SarState {
    let SarState {
        bullish,
        mut af,
        mut ep,
        sar,
    } = state;
    let sar = sar + af * (ep - sar);

    if bullish {
        let sar = sar.min(prev.low_price()).min(current.low_price());
        if current.high_price() > ep {
            ep = current.high_price();
            af = (af + step).min(max_step);
        }
        if current.low_price() < sar {
            return SarState {
                bullish: false,
                af: step,
                ep: current.low_price(),
                sar: ep,
            };
        }
        SarState {
            bullish,
            af,
            ep,
            sar,
        }
    } else {
        let sar = sar.max(prev.high_price()).max(current.high_price());
        if current.low_price() < ep {
            ep = current.low_price();
            af = (af + step).min(max_step);
        }
        if current.high_price() > sar {
            return SarState {
                bullish: true,
                af: step,
                ep: current.high_price(),
                sar: ep,
            };
        }
        SarState {
            bullish,
            af,
            ep,
            sar,
        }
    }
}

/// 파라볼릭 SAR 계산을 위한 빌더
#[derive(Debug)]
pub struct PSARBuilder<C: Candle> {
    /// 가속 계수 증가분
    step: f64,
    /// 가속 계수 상한
    max_step: f64,
    _phantom: PhantomData<C>,
}

/// 파라볼릭 SAR 기술적 지표
#[derive(Clone, Debug, PartialEq)]
pub struct PSAR {
    /// 최신 SAR 값
    pub value: f64,
}

impl Display for PSAR {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PSAR({:.2})", self.value)
    }
}

impl Serialize for PSAR {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value)
    }
}

impl<C> PSARBuilder<C>
where
    C: Candle,
{
    /// 새 파라볼릭 SAR 빌더 생성
    ///
    /// # Panics
    /// * step이 0 이하이거나 max_step보다 크면 패닉 발생
    pub fn new(step: f64, max_step: f64) -> Self {
        if step <= 0.0 || step > max_step {
            panic!("PSAR 가속 계수는 0 < step <= max_step 이어야 합니다");
        }

        PSARBuilder {
            step,
            max_step,
            _phantom: PhantomData,
        }
    }

    /// 데이터에서 파라볼릭 SAR 생성
    ///
    /// # Returns
    /// * `PSAR` - 최신 SAR 값 (데이터가 없으면 0)
    pub fn build(&self, data: &[C]) -> PSAR {
        let value = calculate_psar_series(data, self.step, self.max_step)
            .last()
            .copied()
            .unwrap_or(0.0);

        PSAR { value }
    }
}

impl<C> TABuilder<PSAR, C> for PSARBuilder<C>
where
    C: Candle,
{
    fn build(&self, data: &[C]) -> PSAR {
        self.build(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OhlcvCandle;
    use chrono::{TimeZone, Utc};

    fn candle(i: usize, high: f64, low: f64) -> OhlcvCandle {
        let close = (high + low) / 2.0;
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
    fn test_single_candle_returns_close() {
        let psar = PSARBuilder::new(0.02, 0.2).build(&[candle(0, 12.0, 8.0)]);
        assert_eq!(psar.value, 10.0);
    }

    #[test]
    fn test_first_steps() {
        // sar0 = 8, ep = 12, af = 0.02
        // i=1: sar = 8 + 0.02*(12-8) = 8.08, min(low0=8, low1=9) => 8.0
        //      high 13 > ep => ep = 13, af = 0.04
        let data = vec![candle(0, 12.0, 8.0), candle(1, 13.0, 9.0)];
        let series = calculate_psar_series(&data, 0.02, 0.2);
        assert_eq!(series, vec![8.0, 8.0]);
    }

    #[test]
    fn test_flip_to_bearish_uses_extreme_point() {
        // i=1: sar = 8.08 -> clamp 8.0, low 5 < 8 => 하락 전환, sar = ep(12)
        let data = vec![candle(0, 12.0, 8.0), candle(1, 11.0, 5.0)];
        let series = calculate_psar_series(&data, 0.02, 0.2);
        assert_eq!(series[1], 12.0);
    }

    #[test]
    fn test_uptrend_sar_below_price() {
        let data: Vec<OhlcvCandle> = (0..50)
            .map(|i| candle(i, 101.0 + i as f64, 99.0 + i as f64))
            .collect();
        let psar = PSARBuilder::new(0.02, 0.2).build(&data);
        assert!(psar.value < data.last().unwrap().low);
    }
}
