use crate::indicator::TABuilder;
use crate::indicator::ma::ema::ema_series;
use crate::indicator::utils::close_prices;
use crate::model::Candle;
use serde::Serialize;
use std::fmt::Display;
use std::marker::PhantomData;

/// MACD 시계열 계산 결과
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MACDSeries {
    /// MACD 라인 (빠른 EMA - 느린 EMA)
    pub macd: Vec<f64>,
    /// 시그널 라인 (MACD의 EMA)
    pub signal: Vec<f64>,
    /// 히스토그램 (MACD - 시그널)
    pub histogram: Vec<f64>,
}

/// MACD 시계열 계산
///
/// 세 EMA 모두 첫 값으로 시드하므로 워밍업 구간이 따로 없습니다.
///
/// # Arguments
/// * `values` - 종가 시계열
/// * `fast_period` - 빠른 EMA 기간
/// * `slow_period` - 느린 EMA 기간
/// * `signal_period` - 시그널 EMA 기간
pub fn calculate_macd_series(
    values: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MACDSeries {
    let fast = ema_series(values, fast_period);
    let slow = ema_series(values, slow_period);

    let macd: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
    let signal = ema_series(&macd, signal_period);
    let histogram = macd.iter().zip(signal.iter()).map(|(m, s)| m - s).collect();

    MACDSeries {
        macd,
        signal,
        histogram,
    }
}

/// MACD(Moving Average Convergence Divergence) 계산을 위한 빌더
///
/// MACD는 두 개의 이동평균선(빠른 EMA와 느린 EMA)의 차이를 계산하고,
/// 이 값에 대한 시그널 라인(MACD의 EMA)을 제공하는 기술적 지표입니다.
#[derive(Debug)]
pub struct MACDBuilder<C: Candle> {
    /// 빠른 EMA 기간
    fast_period: usize,
    /// 느린 EMA 기간
    slow_period: usize,
    /// 시그널 라인 기간
    signal_period: usize,
    _phantom: PhantomData<C>,
}

/// MACD(Moving Average Convergence Divergence) 기술적 지표
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MACD {
    #[serde(skip)]
    fast_period: usize,
    #[serde(skip)]
    slow_period: usize,
    #[serde(skip)]
    signal_period: usize,
    /// MACD 라인
    pub macd: f64,
    /// 시그널 라인
    pub signal: f64,
    /// 히스토그램 (MACD - 시그널)
    #[serde(rename = "hist")]
    pub histogram: f64,
}

impl Display for MACD {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({},{},{}: {:.2}, {:.2}, {:.2})",
            self.fast_period,
            self.slow_period,
            self.signal_period,
            self.macd,
            self.signal,
            self.histogram
        )
    }
}

impl<C> MACDBuilder<C>
where
    C: Candle,
{
    /// 새 MACD 빌더 생성
    ///
    /// # Arguments
    /// * `fast_period` - 빠른 EMA 기간
    /// * `slow_period` - 느린 EMA 기간
    /// * `signal_period` - 시그널 라인 기간
    ///
    /// # Panics
    /// * 기간이 0이거나 빠른 기간이 느린 기간 이상이면 패닉 발생
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        if fast_period == 0 || slow_period == 0 || signal_period == 0 {
            panic!("MACD 기간은 0보다 커야 합니다");
        }

        if fast_period >= slow_period {
            panic!("빠른 기간은 느린 기간보다 작아야 합니다");
        }

        MACDBuilder {
            fast_period,
            slow_period,
            signal_period,
            _phantom: PhantomData,
        }
    }

    /// 데이터에서 MACD 지표 생성
    ///
    /// # Arguments
    /// * `data` - 캔들 데이터
    ///
    /// # Returns
    /// * `MACD` - 최신 MACD 값 (데이터가 없으면 0/0/0)
    pub fn build(&self, data: &[C]) -> MACD {
        let series = calculate_macd_series(
            &close_prices(data),
            self.fast_period,
            self.slow_period,
            self.signal_period,
        );

        let last = |values: &[f64]| values.last().copied().unwrap_or(0.0);

        MACD {
            fast_period: self.fast_period,
            slow_period: self.slow_period,
            signal_period: self.signal_period,
            macd: last(&series.macd),
            signal: last(&series.signal),
            histogram: last(&series.histogram),
        }
    }
}

impl<C> TABuilder<MACD, C> for MACDBuilder<C>
where
    C: Candle,
{
    fn build(&self, data: &[C]) -> MACD {
        self.build(data)
    }
}
