use crate::model::Candle;
use serde::Serialize;
use std::fmt::Display;

/// 같은 폭의 구간 경계 생성
///
/// 마지막 경계는 최대값과 정확히 같습니다.
fn bin_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    let step = (max - min) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|k| min + k as f64 * step).collect();
    if let Some(last) = edges.last_mut() {
        *last = max;
    }
    edges
}

/// 값이 속한 구간 인덱스
///
/// 각 구간은 왼쪽이 닫히고 오른쪽이 열려 있으며, 마지막 구간만 양쪽이 닫혀
/// 있습니다. 부동소수 오차로 인한 경계 오판은 실제 경계값으로 보정합니다.
fn bin_index(value: f64, edges: &[f64]) -> usize {
    let bins = edges.len() - 1;
    let first = edges[0];
    let last = edges[bins];
    let norm = bins as f64 / (last - first);

    let mut index = (((value - first) * norm) as usize).min(bins - 1);
    if index > 0 && value < edges[index] {
        index -= 1;
    }
    if index + 1 < bins && value >= edges[index + 1] {
        index += 1;
    }
    index
}

/// 거래량 가중 종가 히스토그램의 최빈 구간(POC) 중간 가격
///
/// 종가 범위를 `bins`개의 같은 폭 구간으로 나누고 거래량을 누적한 뒤 가장
/// 무거운 구간(동률이면 앞 구간)의 중간 가격을 반환합니다. 모든 종가가 같으면
/// 범위를 [c-0.5, c+0.5]로 넓힙니다. 캔들이 2개 미만이면 마지막 종가입니다.
///
/// # Arguments
/// * `data` - 캔들 데이터
/// * `bins` - 구간 수
///
/// # Returns
/// * `Option<f64>` - 데이터가 없으면 None
pub fn calculate_poc<C: Candle>(data: &[C], bins: usize) -> Option<f64> {
    let last_close = data.last()?.close_price();
    if data.len() < 2 || bins == 0 {
        return Some(last_close);
    }

    let (mut min, mut max) = data
        .iter()
        .map(|c| c.close_price())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let edges = bin_edges(min, max, bins);
    let mut histogram = vec![0.0; bins];
    for candle in data {
        histogram[bin_index(candle.close_price(), &edges)] += candle.volume();
    }

    let heaviest = histogram
        .iter()
        .enumerate()
        .fold(0, |best, (i, weight)| {
            if *weight > histogram[best] { i } else { best }
        });

    Some((edges[heaviest] + edges[heaviest + 1]) / 2.0)
}

/// 누적 거래량 델타(CVD)
///
/// 종가가 직전보다 내려가지 않았으면 거래량을 더하고, 내려갔으면 뺍니다.
/// 첫 캔들은 내려가지 않은 것으로 봅니다.
pub fn calculate_cvd<C: Candle>(data: &[C]) -> f64 {
    data.iter()
        .enumerate()
        .map(|(i, candle)| {
            let change = match i {
                0 => 0.0,
                _ => candle.close_price() - data[i - 1].close_price(),
            };
            if change >= 0.0 {
                candle.volume()
            } else {
                -candle.volume()
            }
        })
        .sum()
}

/// 볼륨 프로파일 분석 결과
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeProfile {
    /// 최대 거래량 가격 (Point of Control)
    pub poc: f64,
    /// 누적 거래량 델타
    pub cvd: f64,
}

impl Display for VolumeProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VolumeProfile(poc: {:.4}, cvd: {:.2})", self.poc, self.cvd)
    }
}

/// 볼륨 프로파일 분석기
#[derive(Debug, Clone, Copy)]
pub struct VolumeProfileAnalyzer {
    /// 히스토그램 구간 수
    bins: usize,
}

impl VolumeProfileAnalyzer {
    /// 새 볼륨 프로파일 분석기 생성
    ///
    /// # Arguments
    /// * `bins` - 히스토그램 구간 수
    pub fn new(bins: usize) -> Self {
        VolumeProfileAnalyzer { bins }
    }

    /// POC와 CVD 계산
    ///
    /// # Returns
    /// * `Option<VolumeProfile>` - 데이터가 없으면 None
    pub fn analyze<C: Candle>(&self, data: &[C]) -> Option<VolumeProfile> {
        Some(VolumeProfile {
            poc: calculate_poc(data, self.bins)?,
            cvd: calculate_cvd(data),
        })
    }
}
