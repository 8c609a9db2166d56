use crate::indicator::TABuilder;
use crate::indicator::ma::MA;
use crate::indicator::utils::close_prices;
use crate::indicator::utils::moving_average::{calculate_ema_alpha, exponential_smoothing};
use crate::model::Candle;
use serde::{Serialize, Serializer};
use std::fmt::Display;
use std::marker::PhantomData;

/// 지수이동평균(EMA) 시계열 계산
///
/// 알파 2/(period+1), 별도의 워밍업 평균 없이 첫 값으로 시드합니다.
///
/// # Arguments
/// * `values` - 가격 시계열
/// * `period` - EMA 기간
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    exponential_smoothing(values, calculate_ema_alpha(period))
}

/// 지수이동평균(EMA) 계산 빌더
#[derive(Debug)]
pub struct EMABuilder<C: Candle> {
    /// EMA 계산 기간
    pub period: usize,
    _phantom: PhantomData<C>,
}

/// 지수이동평균(EMA) 기술적 지표
#[derive(Clone, Debug, PartialEq)]
pub struct EMA {
    /// EMA 계산 기간
    period: usize,
    /// 계산된 EMA 값
    ema: f64,
}

impl Display for EMA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}: {:.2})", self.period, self.ema)
    }
}

/// 요약 출력에서는 값만 직렬화
impl Serialize for EMA {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.ema)
    }
}

impl MA for EMA {
    fn get(&self) -> f64 {
        self.ema
    }

    fn period(&self) -> usize {
        self.period
    }
}

impl<C> EMABuilder<C>
where
    C: Candle,
{
    /// 새 EMA 빌더 생성
    ///
    /// # Panics
    /// * 기간이 0이면 패닉 발생
    pub fn new(period: usize) -> Self {
        if period == 0 {
            panic!("EMA 기간은 0보다 커야 합니다");
        }

        EMABuilder {
            period,
            _phantom: PhantomData,
        }
    }

    /// 데이터에서 EMA 지표 생성
    ///
    /// # Arguments
    /// * `data` - 캔들 데이터
    ///
    /// # Returns
    /// * `EMA` - 최신 EMA 값 (데이터가 없으면 0)
    pub fn build(&self, data: &[C]) -> EMA {
        let ema = ema_series(&close_prices(data), self.period)
            .last()
            .copied()
            .unwrap_or(0.0);

        EMA {
            period: self.period,
            ema,
        }
    }
}

impl<C> TABuilder<EMA, C> for EMABuilder<C>
where
    C: Candle,
{
    fn build(&self, data: &[C]) -> EMA {
        self.build(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OhlcvCandle;
    use chrono::{TimeZone, Utc};

    fn candles(closes: &[f64]) -> Vec<OhlcvCandle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                OhlcvCandle::new(
                    Utc.timestamp_opt(i as i64 * 60, 0).unwrap(),
                    close,
                    close + 1.0,
                    close - 1.0,
                    close,
                    1000.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_ema_seeded_by_first_close() {
        let builder = EMABuilder::<OhlcvCandle>::new(3);
        // alpha = 0.5
        let ema = builder.build(&candles(&[10.0, 20.0, 30.0]));
        assert_eq!(ema.get(), 22.5);
        assert_eq!(ema.period(), 3);
    }

    #[test]
    fn test_ema_single_candle() {
        let builder = EMABuilder::<OhlcvCandle>::new(200);
        assert_eq!(builder.build(&candles(&[42.0])).get(), 42.0);
    }

    #[test]
    fn test_ema_follows_uptrend() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let fast = EMABuilder::<OhlcvCandle>::new(9).build(&candles(&closes));
        let slow = EMABuilder::<OhlcvCandle>::new(21).build(&candles(&closes));
        assert!(fast.get() > slow.get());
    }

    #[test]
    #[should_panic(expected = "EMA 기간은 0보다 커야 합니다")]
    fn test_invalid_period() {
        EMABuilder::<OhlcvCandle>::new(0);
    }

    #[test]
    fn test_empty_data() {
        let ema = EMABuilder::<OhlcvCandle>::new(5).build(&[]);
        assert_eq!(ema.get(), 0.0);
        assert_eq!(ema.period(), 5);
    }
}
