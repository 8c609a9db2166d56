use crate::indicator::TABuilder;
use crate::indicator::ma::ema::ema_series;
use crate::indicator::utils::true_range_series;
use crate::model::Candle;
use serde::{Serialize, Serializer};
use std::fmt::Display;
use std::marker::PhantomData;

/// ATR 시계열 계산
///
/// True Range의 EMA(alpha = 2/(period+1))입니다. 첫 캔들의 TR은 고가-저가입니다.
///
/// # Arguments
/// * `data` - 캔들 데이터
/// * `period` - ATR 기간
pub fn calculate_atr_series<C: Candle>(data: &[C], period: usize) -> Vec<f64> {
    ema_series(&true_range_series(data), period)
}

/// ATR 단일 값
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ATR {
    /// ATR 계산 기간
    pub period: usize,
    /// ATR 값
    pub value: f64,
}

impl Display for ATR {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ATR({}: {:.4})", self.period, self.value)
    }
}

impl Serialize for ATR {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value)
    }
}

/// ATR 계산을 위한 빌더
#[derive(Debug)]
pub struct ATRBuilder<C: Candle> {
    /// ATR 계산 기간
    period: usize,
    /// 캔들 타입 표시자 (제네릭 타입 표시용)
    _phantom: PhantomData<C>,
}

impl<C: Candle> ATRBuilder<C> {
    /// 새 ATR 빌더 생성
    ///
    /// # Panics
    /// * 기간이 0이면 패닉 발생
    pub fn new(period: usize) -> Self {
        if period == 0 {
            panic!("ATR 기간은 0보다 커야 합니다");
        }

        ATRBuilder {
            period,
            _phantom: PhantomData,
        }
    }

    /// 데이터에서 ATR 생성
    ///
    /// # Returns
    /// * `ATR` - 최신 ATR 값 (데이터가 없으면 0)
    pub fn build(&self, data: &[C]) -> ATR {
        let value = calculate_atr_series(data, self.period)
            .last()
            .copied()
            .unwrap_or(0.0);

        ATR {
            period: self.period,
            value,
        }
    }
}

impl<C: Candle> TABuilder<ATR, C> for ATRBuilder<C> {
    fn build(&self, data: &[C]) -> ATR {
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
    fn test_flat_series_is_zero() {
        let data: Vec<OhlcvCandle> = (0..30).map(|i| candle(i, 100.0, 100.0, 100.0)).collect();
        assert_eq!(ATRBuilder::new(14).build(&data).value, 0.0);
    }

    #[test]
    fn test_first_bar_uses_high_low() {
        let data = vec![candle(0, 12.0, 10.0, 11.0)];
        assert_eq!(ATRBuilder::new(14).build(&data).value, 2.0);
    }

    #[test]
    fn test_gap_uses_previous_close() {
        // TR1 = max(1, |21-11|, |20-11|) = 10, alpha = 0.5 => (2 + 10) / 2
        let data = vec![candle(0, 12.0, 10.0, 11.0), candle(1, 21.0, 20.0, 20.5)];
        let series = calculate_atr_series(&data, 3);
        assert_eq!(series, vec![2.0, 6.0]);
    }
}
