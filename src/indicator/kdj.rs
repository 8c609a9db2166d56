use crate::indicator::TABuilder;
use crate::indicator::utils::moving_average::{
    calculate_wilder_alpha, exponential_smoothing_sparse,
};
use crate::indicator::utils::rolling::{rolling_max, rolling_min};
use crate::model::Candle;
use serde::Serialize;
use std::fmt::Display;
use std::marker::PhantomData;

/// KDJ 값을 정의할 수 없을 때 사용하는 중립값
const KDJ_NEUTRAL: f64 = 50.0;

/// KDJ 계산을 위한 빌더
///
/// RSV = (종가 - N기간 최저가) / (N기간 최고가 - N기간 최저가) * 100
/// K = RSV의 와일더 평활, D = K의 와일더 평활, J = 3K - 2D
#[derive(Debug)]
pub struct KDJBuilder<C: Candle> {
    /// RSV 윈도우 크기
    period: usize,
    /// K 평활 기간
    k_period: usize,
    /// D 평활 기간
    d_period: usize,
    _phantom: PhantomData<C>,
}

/// KDJ 기술적 지표
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KDJ {
    pub k: f64,
    pub d: f64,
    /// J 라인 (0-100 범위를 벗어날 수 있음)
    pub j: f64,
}

impl Display for KDJ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KDJ(k: {:.2}, d: {:.2}, j: {:.2})", self.k, self.d, self.j)
    }
}

impl<C> KDJBuilder<C>
where
    C: Candle,
{
    /// 새 KDJ 빌더 생성
    ///
    /// # Panics
    /// * 기간 중 하나라도 0이면 패닉 발생
    pub fn new(period: usize, k_period: usize, d_period: usize) -> Self {
        if period == 0 || k_period == 0 || d_period == 0 {
            panic!("KDJ 기간은 0보다 커야 합니다");
        }

        KDJBuilder {
            period,
            k_period,
            d_period,
            _phantom: PhantomData,
        }
    }

    /// 데이터에서 KDJ 지표 생성
    ///
    /// 고가와 저가가 같은 윈도우의 RSV는 정의되지 않으며, 평활 단계에서 빈
    /// 값으로 취급됩니다. 최종 K/D/J가 정의되지 않으면 50을 사용합니다.
    ///
    /// # Arguments
    /// * `data` - 캔들 데이터
    pub fn build(&self, data: &[C]) -> KDJ {
        let lows: Vec<f64> = data.iter().map(|c| c.low_price()).collect();
        let highs: Vec<f64> = data.iter().map(|c| c.high_price()).collect();
        let lowest = rolling_min(&lows, self.period);
        let highest = rolling_max(&highs, self.period);

        let rsv: Vec<Option<f64>> = data
            .iter()
            .zip(lowest.iter().zip(highest.iter()))
            .map(|(candle, window)| match window {
                (Some(low), Some(high)) if high != low => {
                    Some((candle.close_price() - low) / (high - low) * 100.0)
                }
                _ => None,
            })
            .collect();

        let k_line = exponential_smoothing_sparse(&rsv, calculate_wilder_alpha(self.k_period));
        let d_line = exponential_smoothing_sparse(&k_line, calculate_wilder_alpha(self.d_period));

        let k = k_line.last().copied().flatten();
        let d = d_line.last().copied().flatten();
        let j = match (k, d) {
            (Some(k), Some(d)) => 3.0 * k - 2.0 * d,
            _ => KDJ_NEUTRAL,
        };

        KDJ {
            k: k.unwrap_or(KDJ_NEUTRAL),
            d: d.unwrap_or(KDJ_NEUTRAL),
            j,
        }
    }
}

impl<C> TABuilder<KDJ, C> for KDJBuilder<C>
where
    C: Candle,
{
    fn build(&self, data: &[C]) -> KDJ {
        self.build(data)
    }
}
