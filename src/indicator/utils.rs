// 지표 계산에 공통으로 쓰이는 평활화/롤링 윈도우 함수 모음
use crate::model::Candle;

/// 공통 이동평균 계산 함수들
pub mod moving_average {
    /// 지수이동평균(EMA) 계산을 위한 알파값 계산
    ///
    /// # Arguments
    /// * `period` - EMA 기간
    ///
    /// # Returns
    /// * `f64` - 알파값 2/(period+1)
    pub fn calculate_ema_alpha(period: usize) -> f64 {
        2.0 / (period + 1) as f64
    }

    /// 와일더(Wilder) 평활화 알파값 계산
    ///
    /// RSI, KDJ에서 사용합니다. EMA 알파와 섞어 쓰면 안 됩니다.
    ///
    /// # Arguments
    /// * `period` - 평활화 기간
    ///
    /// # Returns
    /// * `f64` - 알파값 1/period
    pub fn calculate_wilder_alpha(period: usize) -> f64 {
        1.0 / period as f64
    }

    /// 지수이동평균(EMA) 한 스텝 계산
    ///
    /// # Arguments
    /// * `current_price` - 현재 가격
    /// * `previous_ema` - 이전 EMA 값
    /// * `alpha` - 평활화 계수
    ///
    /// # Returns
    /// * `f64` - 계산된 EMA 값
    pub fn calculate_ema_step(current_price: f64, previous_ema: f64, alpha: f64) -> f64 {
        // 상수 구간에서 부동소수 오차가 쌓이지 않도록 같은 값은 그대로 유지
        if current_price == previous_ema {
            return previous_ema;
        }
        alpha * current_price + (1.0 - alpha) * previous_ema
    }

    /// 첫 번째 값으로 시드하는 지수 평활 시계열
    ///
    /// # Arguments
    /// * `values` - 입력 시계열
    /// * `alpha` - 평활화 계수
    ///
    /// # Returns
    /// * `Vec<f64>` - 입력과 같은 길이의 평활 시계열
    pub fn exponential_smoothing(values: &[f64], alpha: f64) -> Vec<f64> {
        let mut result = Vec::with_capacity(values.len());
        let mut previous: Option<f64> = None;
        for &value in values {
            let next = match previous {
                Some(prev) => calculate_ema_step(value, prev, alpha),
                None => value,
            };
            result.push(next);
            previous = Some(next);
        }
        result
    }

    /// 정의되지 않은 값(None)이 섞인 시계열의 지수 평활
    ///
    /// 첫 정의값 이전은 None으로 남습니다. 이후의 None 구간은 직전 평활값을
    /// 이어 쓰고, 그동안 이전 가중치는 스텝마다 (1-alpha)씩 감쇠합니다.
    /// 다음 정의값은 (w*prev + alpha*x)/(w + alpha)로 합쳐집니다.
    ///
    /// # Arguments
    /// * `values` - 입력 시계열
    /// * `alpha` - 평활화 계수
    pub fn exponential_smoothing_sparse(values: &[Option<f64>], alpha: f64) -> Vec<Option<f64>> {
        let mut result = Vec::with_capacity(values.len());
        let mut weighted: Option<f64> = None;
        let mut old_weight = 1.0;

        for value in values {
            match (weighted, value) {
                (Some(prev), observation) => {
                    old_weight *= 1.0 - alpha;
                    if let Some(current) = observation {
                        if prev != *current {
                            weighted = Some(
                                (old_weight * prev + alpha * current) / (old_weight + alpha),
                            );
                        }
                        old_weight = 1.0;
                    }
                }
                (None, Some(current)) => weighted = Some(*current),
                (None, None) => {}
            }
            result.push(weighted);
        }

        result
    }

    /// 롤링 단순평균 시계열
    ///
    /// 윈도우가 다 차지 않았거나 윈도우 안에 None이 있으면 None입니다.
    ///
    /// # Arguments
    /// * `values` - 입력 시계열
    /// * `window` - 윈도우 크기
    pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
        (0..values.len())
            .map(|i| {
                if window == 0 || i + 1 < window {
                    return None;
                }
                let slice = &values[i + 1 - window..=i];
                slice
                    .iter()
                    .copied()
                    .sum::<Option<f64>>()
                    .map(|sum| sum / window as f64)
            })
            .collect()
    }

    /// 마지막 `period`개 값의 단순이동평균
    ///
    /// # Returns
    /// * `Option<f64>` - 데이터가 period보다 적거나 period가 0이면 None
    pub fn calculate_sma(values: &[f64], period: usize) -> Option<f64> {
        if period == 0 || values.len() < period {
            return None;
        }
        let slice = &values[values.len() - period..];
        Some(slice.iter().sum::<f64>() / period as f64)
    }
}

/// 롤링 최소/최대 함수들
pub mod rolling {
    fn rolling_fold(
        values: &[f64],
        window: usize,
        init: f64,
        pick: impl Fn(f64, f64) -> f64,
    ) -> Vec<Option<f64>> {
        (0..values.len())
            .map(|i| {
                if window == 0 || i + 1 < window {
                    return None;
                }
                Some(values[i + 1 - window..=i].iter().fold(init, |a, &b| pick(a, b)))
            })
            .collect()
    }

    /// 롤링 최소값 (윈도우가 차기 전에는 None)
    pub fn rolling_min(values: &[f64], window: usize) -> Vec<Option<f64>> {
        rolling_fold(values, window, f64::INFINITY, f64::min)
    }

    /// 롤링 최대값 (윈도우가 차기 전에는 None)
    pub fn rolling_max(values: &[f64], window: usize) -> Vec<Option<f64>> {
        rolling_fold(values, window, f64::NEG_INFINITY, f64::max)
    }
}

/// True Range 시계열
///
/// TR = max(고가-저가, |고가-이전종가|, |저가-이전종가|), 첫 캔들은 고가-저가
pub fn true_range_series<C: Candle>(data: &[C]) -> Vec<f64> {
    data.iter()
        .enumerate()
        .map(|(i, candle)| {
            let range = candle.high_price() - candle.low_price();
            match i.checked_sub(1).map(|prev| data[prev].close_price()) {
                Some(prev_close) => range
                    .abs()
                    .max((candle.high_price() - prev_close).abs())
                    .max((candle.low_price() - prev_close).abs()),
                None => range.abs(),
            }
        })
        .collect()
}

/// 소수점 `decimals` 자리로 반올림
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// 종가 시계열 추출
pub fn close_prices<C: Candle>(data: &[C]) -> Vec<f64> {
    data.iter().map(|c| c.close_price()).collect()
}
