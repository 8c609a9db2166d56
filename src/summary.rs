use crate::analyzer::fibonacci_analyzer::Fibonacci;
use crate::analyzer::market_structure_analyzer::{FairValueGap, OrderBlockZone, StructureChange};
use crate::analyzer::trendline_analyzer::Trendlines;
use crate::indicator::atr::ATR;
use crate::indicator::kdj::KDJ;
use crate::indicator::ma::{EMAs, MA};
use crate::indicator::macd::MACD;
use crate::indicator::psar::PSAR;
use crate::indicator::rsi::RSI;
use crate::indicator::stoch_rsi::StochRSI;
use crate::indicator::supertrend::SuperTrend;
use crate::indicator::volume::Volume;
use crate::indicator::vwap::VWAP;
use serde::Serialize;
use std::fmt::Display;

/// 오실레이터/추세 추종 지표 묶음
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorBundle {
    pub rsi: RSI,
    pub macd: MACD,
    pub stoch_rsi: StochRSI,
    pub kdj: KDJ,
    pub psar: PSAR,
    pub atr: ATR,
    pub supertrend: SuperTrend,
    pub vwap: VWAP,
}

impl Display for IndicatorBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}, {}, {}, {}",
            self.rsi,
            self.macd,
            self.stoch_rsi,
            self.kdj,
            self.psar,
            self.atr,
            self.supertrend,
            self.vwap
        )
    }
}

/// 기술적 분석 요약
///
/// 호출마다 새로 만들어지는 불변 값입니다. 값이 없는 항목은 JSON에서
/// `null`로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    /// 기간별 EMA (`{"9": .., "21": ..}`)
    pub emas: EMAs,
    /// 최신 거래량과 평균 거래량
    pub volume: Volume,
    /// 지지선 (가까운 순)
    pub supports: Vec<f64>,
    /// 저항선 (가까운 순)
    pub resistances: Vec<f64>,
    /// 상승/하락 추세선
    pub trendlines: Trendlines,
    /// 볼륨 프로파일 최빈 가격
    pub poc: f64,
    /// 누적 거래량 델타
    pub cvd: f64,
    /// 가장 최근 FVG
    pub fvg: Option<FairValueGap>,
    /// Break of Structure
    pub bos: Option<StructureChange>,
    /// Change of Character
    pub choch: Option<StructureChange>,
    /// 최근 오더 블록 (오래된 것부터)
    pub order_blocks: Vec<OrderBlockZone>,
    /// 오실레이터/추세 추종 지표
    pub indicators: IndicatorBundle,
    /// 피보나치 되돌림/확장
    pub fibonacci: Fibonacci,
}

impl AnalysisSummary {
    /// 특정 기간의 EMA 값
    pub fn ema(&self, period: usize) -> Option<f64> {
        self.emas.get(&period).map(|ema| ema.get())
    }

    /// 가장 가까운 지지선
    pub fn nearest_support(&self) -> Option<f64> {
        self.supports.first().copied()
    }

    /// 가장 가까운 저항선
    pub fn nearest_resistance(&self) -> Option<f64> {
        self.resistances.first().copied()
    }
}

impl Display for AnalysisSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AnalysisSummary {{ supports: {:?}, resistances: {:?}, poc: {:.4}, cvd: {:.2}, {} }}",
            self.supports, self.resistances, self.poc, self.cvd, self.indicators
        )
    }
}
