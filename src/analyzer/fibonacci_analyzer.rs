use crate::model::Candle;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt::Display;

/// 되돌림 비율 (라벨, 저가로부터의 비율)
const RETRACEMENT_RATIOS: [(&str, f64); 6] = [
    ("0.236", 0.236),
    ("0.382", 0.382),
    ("0.5", 0.5),
    ("0.618", 0.618),
    ("0.786", 0.786),
    ("1.0", 1.0),
];

/// 확장 비율 (라벨, 고가 위로의 초과분)
const EXTENSION_RATIOS: [(&str, f64); 4] = [
    ("1.272", 0.272),
    ("1.414", 0.414),
    ("1.618", 0.618),
    ("2.0", 1.0),
];

/// 피보나치 레벨 하나
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibonacciLevel {
    /// 비율 라벨 ("0.618" 등)
    pub ratio: &'static str,
    /// 레벨 가격
    pub price: f64,
}

/// 비율 순으로 정렬된 피보나치 레벨 목록
///
/// `{"비율": 가격}` 맵으로 직렬화됩니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FibonacciLevels(Vec<FibonacciLevel>);

impl FibonacciLevels {
    /// 비율 라벨로 가격 조회
    pub fn get(&self, ratio: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|level| level.ratio == ratio)
            .map(|level| level.price)
    }

    /// 모든 레벨
    pub fn levels(&self) -> &[FibonacciLevel] {
        &self.0
    }
}

impl Serialize for FibonacciLevels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for level in &self.0 {
            map.serialize_entry(level.ratio, &level.price)?;
        }
        map.end()
    }
}

/// 피보나치 되돌림/확장 레벨
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Fibonacci {
    pub retracement: FibonacciLevels,
    pub extension: FibonacciLevels,
}

impl Display for Fibonacci {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Fibonacci(0.618: {:?}, 1.618: {:?})",
            self.retracement.get("0.618"),
            self.extension.get("1.618")
        )
    }
}

impl Fibonacci {
    /// 스윙 고가/저가로부터 레벨 계산
    ///
    /// 되돌림은 저가 + r*(고가-저가), 확장은 고가 + (r-1)*(고가-저가)입니다.
    /// 고가와 저가가 같으면 모든 레벨이 한 가격으로 겹칩니다.
    pub fn from_range(high: f64, low: f64) -> Self {
        let diff = high - low;

        let retracement = RETRACEMENT_RATIOS
            .iter()
            .map(|&(ratio, r)| FibonacciLevel {
                ratio,
                price: if r == 1.0 { high } else { low + r * diff },
            })
            .collect();

        let extension = EXTENSION_RATIOS
            .iter()
            .map(|&(ratio, excess)| FibonacciLevel {
                ratio,
                price: high + excess * diff,
            })
            .collect();

        Fibonacci {
            retracement: FibonacciLevels(retracement),
            extension: FibonacciLevels(extension),
        }
    }
}

/// 피보나치 분석기
#[derive(Debug, Clone, Copy)]
pub struct FibonacciAnalyzer {
    /// 스윙 범위를 찾을 최근 캔들 수
    lookback: usize,
}

impl FibonacciAnalyzer {
    /// 새 피보나치 분석기 생성
    pub fn new(lookback: usize) -> Self {
        FibonacciAnalyzer { lookback }
    }

    /// 최근 캔들의 최고가/최저가로 피보나치 레벨 계산
    ///
    /// # Returns
    /// * `Option<Fibonacci>` - 데이터가 없으면 None
    pub fn analyze<C: Candle>(&self, data: &[C]) -> Option<Fibonacci> {
        let recent = &data[data.len().saturating_sub(self.lookback)..];
        if recent.is_empty() {
            return None;
        }

        let high = recent
            .iter()
            .map(|c| c.high_price())
            .fold(f64::NEG_INFINITY, f64::max);
        let low = recent
            .iter()
            .map(|c| c.low_price())
            .fold(f64::INFINITY, f64::min);

        Some(Fibonacci::from_range(high, low))
    }
}
