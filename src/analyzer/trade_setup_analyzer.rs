use crate::indicator::ma::MA;
use crate::indicator::{is_regular_arrangement, is_reverse_arrangement};
use crate::summary::AnalysisSummary;
use serde::Serialize;
use std::fmt::Display;

/// 추세 편향 판단에 쓰는 EMA 개수 (짧은 기간부터)
const BIAS_EMA_COUNT: usize = 3;

/// EMA 배열로 판단한 추세 편향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

/// 진입 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

/// 요약으로부터 도출한 교육용 매매 설정
///
/// 평가나 백테스트 대상이 아닙니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeSetup {
    pub bias: Bias,
    pub direction: Direction,
    /// 진입가
    pub entry: f64,
    /// 목표가 목록
    pub targets: Vec<f64>,
    /// 손절가
    pub stop: f64,
}

impl Display for TradeSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TradeSetup({:?} {:?}: entry={:.4}, targets={:?}, stop={:.4})",
            self.bias, self.direction, self.entry, self.targets, self.stop
        )
    }
}

/// 매매 설정 분석기
#[derive(Debug, Clone, Copy, Default)]
pub struct TradeSetupAnalyzer;

impl TradeSetupAnalyzer {
    /// 짧은 기간 EMA 세 개의 배열로 추세 편향 판단
    ///
    /// 정배열(짧은 기간이 가장 높음)이면 상승, 역배열이면 하락, 나머지는 중립입니다.
    /// EMA가 세 개보다 적으면 중립입니다.
    pub fn bias(summary: &AnalysisSummary) -> Bias {
        let values: Vec<f64> = summary
            .emas
            .get_all()
            .into_iter()
            .take(BIAS_EMA_COUNT)
            .map(|ema| ema.get())
            .collect();

        if values.len() < BIAS_EMA_COUNT {
            return Bias::Neutral;
        }

        if is_regular_arrangement(values.clone()) {
            Bias::Bullish
        } else if is_reverse_arrangement(values) {
            Bias::Bearish
        } else {
            Bias::Neutral
        }
    }

    /// 요약으로부터 매매 설정 도출
    ///
    /// # Arguments
    /// * `summary` - 분석 요약
    ///
    /// # Returns
    /// * `TradeSetup` - 진입가, 목표가, 손절가
    pub fn analyze(&self, summary: &AnalysisSummary) -> TradeSetup {
        let bias = Self::bias(summary);
        let supports = &summary.supports;
        let resistances = &summary.resistances;
        let poc = summary.poc;

        let (entry, targets, stop) = match bias {
            Bias::Bullish if !resistances.is_empty() => {
                let entry = supports.first().copied().unwrap_or(poc);
                let stop = match supports.as_slice() {
                    [_, second, ..] => *second,
                    [first] => first * 0.99,
                    [] => poc * 0.98,
                };
                (entry, resistances.iter().take(3).copied().collect(), stop)
            }
            Bias::Bearish if !supports.is_empty() => {
                let entry = resistances.first().copied().unwrap_or(poc);
                let stop = match resistances.as_slice() {
                    [_, second, ..] => *second,
                    [first] => first * 1.01,
                    [] => poc * 1.02,
                };
                (entry, supports.iter().take(3).copied().collect(), stop)
            }
            _ => {
                let targets = resistances
                    .iter()
                    .take(2)
                    .chain(supports.iter().take(1))
                    .copied()
                    .collect();
                (poc, targets, poc * 0.98)
            }
        };

        TradeSetup {
            bias,
            direction: match bias {
                Bias::Bearish => Direction::Short,
                Bias::Bullish | Bias::Neutral => Direction::Long,
            },
            entry,
            targets,
            stop,
        }
    }
}
