use crate::indicator::TABuilder;
use crate::model::Candle;
use serde::{Serialize, Serializer};
use std::fmt::Display;
use std::marker::PhantomData;

/// VWAP 시계열 계산
///
/// 누적(대표가격 * 거래량) / 누적 거래량입니다. 누적 거래량이 0인 자리는
/// 직전 값을 이어 쓰고, 이어 쓸 값이 없는 선행 구간은 그 캔들의 대표가격을
/// 사용합니다.
///
/// # Arguments
/// * `data` - 캔들 데이터
pub fn calculate_vwap_series<C: Candle>(data: &[C]) -> Vec<f64> {
    let mut cumulative_pv = 0.0;
    let mut cumulative_volume = 0.0;
    let mut previous: Option<f64> = None;

    data.iter()
        .map(|candle| {
            let typical = candle.typical_price();
            cumulative_pv += typical * candle.volume();
            cumulative_volume += candle.volume();

            let value = if cumulative_volume != 0.0 {
                cumulative_pv / cumulative_volume
            } else {
                previous.unwrap_or(typical)
            };
            previous = Some(value);
            value
        })
        .collect()
}

/// VWAP 기술적 지표
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VWAP {
    /// 최신 VWAP 값
    pub value: f64,
}

impl Display for VWAP {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VWAP({:.2})", self.value)
    }
}

impl Serialize for VWAP {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value)
    }
}

/// VWAP 계산을 위한 빌더
#[derive(Debug)]
pub struct VWAPBuilder<C: Candle> {
    _phantom: PhantomData<C>,
}

impl<C: Candle> Default for VWAPBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Candle> VWAPBuilder<C> {
    /// 새 VWAP 빌더 생성
    pub fn new() -> Self {
        VWAPBuilder {
            _phantom: PhantomData,
        }
    }

    /// 데이터에서 VWAP 생성
    ///
    /// # Returns
    /// * `VWAP` - 최신 값 (데이터가 없으면 0)
    pub fn build(&self, data: &[C]) -> VWAP {
        let value = calculate_vwap_series(data).last().copied().unwrap_or(0.0);
        VWAP { value }
    }
}

impl<C: Candle> TABuilder<VWAP, C> for VWAPBuilder<C> {
    fn build(&self, data: &[C]) -> VWAP {
        self.build(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OhlcvCandle;
    use chrono::{TimeZone, Utc};

    fn candle(i: usize, price: f64, volume: f64) -> OhlcvCandle {
        OhlcvCandle::new(
            Utc.timestamp_opt(i as i64 * 60, 0).unwrap(),
            price,
            price,
            price,
            price,
            volume,
        )
    }

    #[test]
    fn test_flat_series() {
        let data: Vec<OhlcvCandle> = (0..300).map(|i| candle(i, 100.0, 10.0)).collect();
        assert_eq!(VWAPBuilder::new().build(&data).value, 100.0);
    }

    #[test]
    fn test_volume_weighted() {
        let data = vec![candle(0, 10.0, 1.0), candle(1, 20.0, 3.0)];
        assert_eq!(VWAPBuilder::new().build(&data).value, 17.5);
    }

    #[test]
    fn test_zero_volume_handling() {
        let data = vec![
            candle(0, 10.0, 0.0),
            candle(1, 12.0, 0.0),
            candle(2, 20.0, 2.0),
            candle(3, 30.0, 0.0),
        ];
        let series = calculate_vwap_series(&data);
        // 선행 구간은 직전 값(없으면 대표가격)을 사용
        assert_eq!(series, vec![10.0, 10.0, 20.0, 20.0]);
    }
}
