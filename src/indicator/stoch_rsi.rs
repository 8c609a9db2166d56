use crate::indicator::TABuilder;
use crate::indicator::rsi::{RSI_NEUTRAL, calculate_rsi_series};
use crate::indicator::utils::close_prices;
use crate::indicator::utils::moving_average::rolling_mean;
use crate::indicator::utils::rolling::{rolling_max, rolling_min};
use crate::model::Candle;
use serde::Serialize;
use std::fmt::Display;
use std::marker::PhantomData;

/// 스토캐스틱 RSI 계산을 위한 빌더
///
/// RSI를 stoch 기간의 롤링 최소/최대로 정규화한 뒤, K와 D 두 단계의 단순
/// 이동평균을 취합니다. 윈도우가 다 차지 않았거나 최소와 최대가 같아 값을
/// 정의할 수 없는 자리는 50으로 대체합니다.
#[derive(Debug)]
pub struct StochRSIBuilder<C: Candle> {
    /// RSI 기간
    rsi_period: usize,
    /// 정규화 윈도우 크기
    stoch_period: usize,
    /// K 평활 기간
    k_period: usize,
    /// D 평활 기간
    d_period: usize,
    _phantom: PhantomData<C>,
}

/// 스토캐스틱 RSI 기술적 지표 (0-100)
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StochRSI {
    /// 평활 전 정규화 값
    pub raw: f64,
    /// K 라인
    pub k: f64,
    /// D 라인
    pub d: f64,
}

impl Display for StochRSI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StochRSI(raw: {:.2}, k: {:.2}, d: {:.2})",
            self.raw, self.k, self.d
        )
    }
}

impl<C> StochRSIBuilder<C>
where
    C: Candle,
{
    /// 새 스토캐스틱 RSI 빌더 생성
    ///
    /// # Panics
    /// * 기간 중 하나라도 0이면 패닉 발생
    pub fn new(rsi_period: usize, stoch_period: usize, k_period: usize, d_period: usize) -> Self {
        if rsi_period == 0 || stoch_period == 0 || k_period == 0 || d_period == 0 {
            panic!("스토캐스틱 RSI 기간은 0보다 커야 합니다");
        }

        StochRSIBuilder {
            rsi_period,
            stoch_period,
            k_period,
            d_period,
            _phantom: PhantomData,
        }
    }

    /// 데이터에서 스토캐스틱 RSI 생성
    ///
    /// # Arguments
    /// * `data` - 캔들 데이터
    ///
    /// # Returns
    /// * `StochRSI` - 최신 값
    pub fn build(&self, data: &[C]) -> StochRSI {
        let rsi = calculate_rsi_series(&close_prices(data), self.rsi_period);
        let lows = rolling_min(&rsi, self.stoch_period);
        let highs = rolling_max(&rsi, self.stoch_period);

        let stoch: Vec<Option<f64>> = rsi
            .iter()
            .zip(lows.iter().zip(highs.iter()))
            .map(|(value, window)| match window {
                (Some(low), Some(high)) if high > low => Some((value - low) / (high - low)),
                _ => None,
            })
            .collect();

        let k_line = rolling_mean(&stoch, self.k_period);
        let d_line = rolling_mean(&k_line, self.d_period);

        let scaled = |values: &[Option<f64>]| {
            values
                .last()
                .copied()
                .flatten()
                .map(|value| value * 100.0)
                .unwrap_or(RSI_NEUTRAL)
        };

        StochRSI {
            raw: scaled(&stoch),
            k: scaled(&k_line),
            d: scaled(&d_line),
        }
    }
}

impl<C> TABuilder<StochRSI, C> for StochRSIBuilder<C>
where
    C: Candle,
{
    fn build(&self, data: &[C]) -> StochRSI {
        self.build(data)
    }
}
