use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// 캔들 데이터 인터페이스
///
/// 모든 지표와 분석기는 이 트레이트를 통해서만 캔들 값에 접근합니다.
pub trait Candle: Clone + Debug + Display + Send + Sync {
    /// 캔들 시작 시간
    fn datetime(&self) -> DateTime<Utc>;

    /// 시가
    fn open_price(&self) -> f64;

    /// 고가
    fn high_price(&self) -> f64;

    /// 저가
    fn low_price(&self) -> f64;

    /// 종가
    fn close_price(&self) -> f64;

    /// 거래량
    fn volume(&self) -> f64;

    /// 중간 가격 (고가+저가)/2
    fn median_price(&self) -> f64 {
        (self.high_price() + self.low_price()) / 2.0
    }

    /// 대표 가격 (고가+저가+종가)/3
    fn typical_price(&self) -> f64 {
        (self.high_price() + self.low_price() + self.close_price()) / 3.0
    }

    /// 음봉 여부 (종가가 시가보다 낮음)
    fn is_bearish(&self) -> bool {
        self.close_price() < self.open_price()
    }
}

/// OHLCV 캔들
///
/// 외부 시세 제공자에서 받아온 캔들을 그대로 담는 값 타입입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvCandle {
    /// 캔들 시작 시간
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvCandle {
    /// 새 캔들 생성
    pub fn new(
        open_time: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        OhlcvCandle {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl Display for OhlcvCandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Candle({}, o={}, h={}, l={}, c={}, v={})",
            self.open_time.to_rfc3339(),
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume
        )
    }
}

impl Candle for OhlcvCandle {
    fn datetime(&self) -> DateTime<Utc> {
        self.open_time
    }

    fn open_price(&self) -> f64 {
        self.open
    }

    fn high_price(&self) -> f64 {
        self.high
    }

    fn low_price(&self) -> f64 {
        self.low
    }

    fn close_price(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}
