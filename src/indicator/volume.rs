use crate::indicator::TABuilder;
use crate::indicator::utils::moving_average::calculate_sma;
use crate::model::Candle;
use serde::Serialize;
use std::fmt::Display;
use std::marker::PhantomData;

/// 볼륨 기반 지표 빌더
///
/// 최신 거래량과 특정 기간의 단순 평균 거래량을 비교합니다.
#[derive(Debug)]
pub struct VolumeBuilder<C: Candle> {
    /// 평균 계산 기간
    period: usize,
    _phantom: PhantomData<C>,
}

/// 볼륨 분석 결과
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Volume {
    /// 평균 계산 기간
    #[serde(skip)]
    period: usize,
    /// 최신 캔들 거래량
    pub last: f64,
    /// 평균 거래량 (캔들이 기간보다 적으면 None)
    pub average: Option<f64>,
}

impl Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.average {
            Some(average) => write!(
                f,
                "Volume({}: last={:.2}, avg={:.2})",
                self.period, self.last, average
            ),
            None => write!(f, "Volume({}: last={:.2}, avg=n/a)", self.period, self.last),
        }
    }
}

impl Volume {
    /// 평균 대비 최신 거래량 비율
    ///
    /// # Returns
    /// * `Option<f64>` - 평균이 없거나 0이면 None
    pub fn ratio(&self) -> Option<f64> {
        self.average
            .filter(|average| *average > 0.0)
            .map(|average| self.last / average)
    }
}

impl<C> VolumeBuilder<C>
where
    C: Candle,
{
    /// 새 볼륨 빌더 생성
    ///
    /// # Arguments
    /// * `period` - 평균 계산 기간
    ///
    /// # Panics
    /// * 기간이 0이면 패닉 발생
    pub fn new(period: usize) -> Self {
        if period == 0 {
            panic!("볼륨 계산 기간은 0보다 커야 합니다");
        }

        VolumeBuilder {
            period,
            _phantom: PhantomData,
        }
    }

    /// 데이터에서 볼륨 지표 생성
    ///
    /// # Arguments
    /// * `data` - 캔들 데이터
    ///
    /// # Returns
    /// * `Volume` - 계산된 볼륨 지표
    pub fn build(&self, data: &[C]) -> Volume {
        let volumes: Vec<f64> = data.iter().map(|c| c.volume()).collect();

        Volume {
            period: self.period,
            last: volumes.last().copied().unwrap_or(0.0),
            average: calculate_sma(&volumes, self.period),
        }
    }
}

impl<C> TABuilder<Volume, C> for VolumeBuilder<C>
where
    C: Candle,
{
    fn build(&self, data: &[C]) -> Volume {
        self.build(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OhlcvCandle;
    use chrono::{TimeZone, Utc};

    fn candles(volumes: &[f64]) -> Vec<OhlcvCandle> {
        volumes
            .iter()
            .enumerate()
            .map(|(i, &volume)| {
                OhlcvCandle::new(
                    Utc.timestamp_opt(i as i64 * 60, 0).unwrap(),
                    1.0,
                    1.0,
                    1.0,
                    1.0,
                    volume,
                )
            })
            .collect()
    }

    #[test]
    fn test_average_requires_full_window() {
        let builder = VolumeBuilder::new(21);
        let volume = builder.build(&candles(&[10.0; 20]));
        assert_eq!(volume.last, 10.0);
        assert_eq!(volume.average, None);
        assert_eq!(volume.ratio(), None);

        let volume = builder.build(&candles(&[10.0; 21]));
        assert_eq!(volume.average, Some(10.0));
        assert_eq!(volume.ratio(), Some(1.0));
    }

    #[test]
    fn test_average_uses_latest_window() {
        let mut volumes = vec![1000.0; 5];
        volumes.extend([2.0, 4.0]);
        let volume = VolumeBuilder::new(2).build(&candles(&volumes));
        assert_eq!(volume.average, Some(3.0));
        assert_eq!(volume.last, 4.0);
    }

    #[test]
    fn test_missing_average_serializes_as_null() {
        let volume = VolumeBuilder::new(21).build(&candles(&[5.0]));
        assert_eq!(
            serde_json::to_string(&volume).unwrap(),
            r#"{"last":5.0,"average":null}"#
        );
    }
}
