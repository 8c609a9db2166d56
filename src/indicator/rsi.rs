use crate::indicator::TABuilder;
use crate::indicator::utils::close_prices;
use crate::indicator::utils::moving_average::{calculate_wilder_alpha, exponential_smoothing};
use crate::model::Candle;
use serde::{Serialize, Serializer};
use std::fmt::Display;
use std::marker::PhantomData;

/// RSI 값을 정의할 수 없을 때 사용하는 중립값
pub const RSI_NEUTRAL: f64 = 50.0;

/// RSI 시계열 계산
///
/// 상승폭/하락폭을 와일더 방식(alpha = 1/period)으로 평활합니다.
/// 첫 캔들의 변화량은 0으로 취급하며, 평균 하락폭이 0이면 RS를 정의할 수
/// 없으므로 50을 반환합니다.
///
/// # Arguments
/// * `values` - 종가 시계열
/// * `period` - RSI 기간
///
/// # Returns
/// * `Vec<f64>` - 입력과 같은 길이의 RSI 시계열 (0-100)
pub fn calculate_rsi_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut gains = Vec::with_capacity(values.len());
    let mut losses = Vec::with_capacity(values.len());

    for (i, value) in values.iter().enumerate() {
        let change = if i == 0 { 0.0 } else { value - values[i - 1] };
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let alpha = calculate_wilder_alpha(period);
    let avg_gains = exponential_smoothing(&gains, alpha);
    let avg_losses = exponential_smoothing(&losses, alpha);

    avg_gains
        .iter()
        .zip(avg_losses.iter())
        .map(|(&avg_gain, &avg_loss)| {
            if avg_loss == 0.0 {
                return RSI_NEUTRAL;
            }
            let rs = avg_gain / avg_loss;
            100.0 - (100.0 / (1.0 + rs))
        })
        .collect()
}

/// 상대강도지수(RSI) 기술적 지표 빌더
#[derive(Debug)]
pub struct RSIBuilder<C: Candle> {
    /// RSI 계산 기간
    period: usize,
    _phantom: PhantomData<C>,
}

/// 상대강도지수(RSI) 기술적 지표
#[derive(Clone, Debug, PartialEq)]
pub struct RSI {
    /// RSI 계산 기간
    period: usize,
    /// RSI 값 (0-100)
    pub value: f64,
}

impl Display for RSI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({}: {:.2})", self.period, self.value)
    }
}

/// 요약 출력에서는 값만 직렬화
impl Serialize for RSI {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value)
    }
}

impl RSI {
    /// RSI 기간 반환
    pub fn period(&self) -> usize {
        self.period
    }

    /// RSI 값 반환
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl<C> RSIBuilder<C>
where
    C: Candle,
{
    /// 새 RSI 빌더 생성
    ///
    /// # Arguments
    /// * `period` - RSI 계산 기간
    ///
    /// # Panics
    /// * 기간이 0이면 패닉 발생
    pub fn new(period: usize) -> Self {
        if period == 0 {
            panic!("RSI 기간은 0보다 커야 합니다");
        }

        Self {
            period,
            _phantom: PhantomData,
        }
    }

    /// 데이터에서 RSI 지표 생성
    ///
    /// # Arguments
    /// * `data` - 캔들 데이터
    ///
    /// # Returns
    /// * `RSI` - 최신 RSI (데이터가 없으면 50)
    pub fn build(&self, data: &[C]) -> RSI {
        let value = calculate_rsi_series(&close_prices(data), self.period)
            .last()
            .copied()
            .unwrap_or(RSI_NEUTRAL);

        RSI {
            period: self.period,
            value,
        }
    }
}

impl<C> TABuilder<RSI, C> for RSIBuilder<C>
where
    C: Candle,
{
    fn build(&self, data: &[C]) -> RSI {
        self.build(data)
    }
}
