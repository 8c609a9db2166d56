// 분석 오케스트레이터
// 시계열 검증 -> 지표 -> 구조 탐지 -> 피보나치 -> 요약 조립 순서로 실행합니다.

use crate::analyzer::{
    FibonacciAnalyzer, MarketStructureAnalyzer, SupportResistanceAnalyzer, TrendlineAnalyzer,
    VolumeProfileAnalyzer,
};
use crate::candle_series::CandleSeries;
use crate::config::AnalysisConfig;
use crate::config_loader::ConfigValidation;
use crate::error::{AnalysisError, AnalysisResult};
use crate::indicator::atr::ATRBuilder;
use crate::indicator::kdj::KDJBuilder;
use crate::indicator::ma::EMAsBuilderFactory;
use crate::indicator::macd::MACDBuilder;
use crate::indicator::psar::PSARBuilder;
use crate::indicator::rsi::RSIBuilder;
use crate::indicator::stoch_rsi::StochRSIBuilder;
use crate::indicator::supertrend::SuperTrendBuilder;
use crate::indicator::volume::VolumeBuilder;
use crate::indicator::vwap::VWAPBuilder;
use crate::model::Candle;
use crate::summary::{AnalysisSummary, IndicatorBundle};
use log::{debug, trace};

/// SMC 기술적 분석기
///
/// 설정만 보관하며 호출 사이에 상태를 공유하지 않습니다. 같은 입력에는
/// 항상 같은 요약을 반환합니다.
#[derive(Debug, Clone, Default)]
pub struct SmcAnalyzer {
    config: AnalysisConfig,
}

impl SmcAnalyzer {
    /// 설정으로 분석기 생성
    ///
    /// # Arguments
    /// * `config` - 분석 설정
    ///
    /// # Returns
    /// * `AnalysisResult<SmcAnalyzer>` - 설정이 유효하지 않으면 오류
    pub fn new(config: AnalysisConfig) -> AnalysisResult<Self> {
        config.validate()?;
        Ok(SmcAnalyzer { config })
    }

    /// 분석 설정 참조
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// 캔들 목록을 시계열로 만든 뒤 분석
    pub fn analyze_candles<C: Candle + 'static>(
        &self,
        candles: Vec<C>,
    ) -> AnalysisResult<AnalysisSummary> {
        self.analyze(&CandleSeries::new(candles))
    }

    /// 캔들 시계열 분석
    ///
    /// # Arguments
    /// * `series` - 시간 오름차순 캔들 시계열
    ///
    /// # Returns
    /// * `AnalysisResult<AnalysisSummary>` - 빈 시계열이면 `AnalysisError::EmptySeries`
    pub fn analyze<C: Candle + 'static>(
        &self,
        series: &CandleSeries<C>,
    ) -> AnalysisResult<AnalysisSummary> {
        let Some(last) = series.last() else {
            return Err(AnalysisError::EmptySeries);
        };
        debug!(
            "분석 시작: 캔들 {}개, 마지막 종가 {}",
            series.len(),
            last.close_price()
        );

        let data = series.items();
        let cfg = &self.config;

        // 지표
        let emas = EMAsBuilderFactory::build::<C>(&cfg.trend.ema_periods).from_series(series);
        let volume = VolumeBuilder::<C>::new(cfg.trend.volume_ma_period).build(data);
        trace!("EMA: {:?}, {}", emas.get_all(), volume);

        let indicators = self.build_indicators(data);
        trace!("지표: {}", indicators);

        // 구조 탐지
        let levels = SupportResistanceAnalyzer::<C>::new(
            cfg.levels.pivot_left,
            cfg.levels.pivot_right,
            cfg.levels.merge_tolerance,
            cfg.levels.max_levels,
        )
        .analyze(data);
        trace!("{}", levels);

        let trendlines =
            TrendlineAnalyzer::<C>::new(cfg.trendline.pivot_left, cfg.trendline.pivot_right)
                .analyze(data);
        trace!("{}", trendlines);

        let profile = VolumeProfileAnalyzer::new(cfg.volume_profile.bins)
            .analyze(data)
            .ok_or(AnalysisError::EmptySeries)?;
        trace!("{}", profile);

        let structure = MarketStructureAnalyzer::<C>::new(
            cfg.structure.pivot_left,
            cfg.structure.pivot_right,
            cfg.structure.fvg_lookback,
            cfg.structure.order_block_range_period,
            cfg.structure.order_block_expansion,
            cfg.structure.order_block_lookback,
            cfg.structure.max_order_blocks,
        )
        .analyze(data);
        trace!(
            "FVG: {:?}, 오더 블록: {}개, BoS: {:?}, ChoCH: {:?}",
            structure.fvg,
            structure.order_blocks.len(),
            structure.breaks.bos,
            structure.breaks.choch
        );

        // 피보나치
        let fibonacci = FibonacciAnalyzer::new(cfg.fibonacci.lookback)
            .analyze(data)
            .ok_or(AnalysisError::EmptySeries)?;
        trace!("{}", fibonacci);

        let summary = AnalysisSummary {
            emas,
            volume,
            supports: levels.supports,
            resistances: levels.resistances,
            trendlines,
            poc: profile.poc,
            cvd: profile.cvd,
            fvg: structure.fvg,
            bos: structure.breaks.bos,
            choch: structure.breaks.choch,
            order_blocks: structure.order_blocks,
            indicators,
            fibonacci,
        };

        debug!("분석 완료: {}", summary);
        Ok(summary)
    }

    /// 오실레이터/추세 추종 지표 묶음 계산
    fn build_indicators<C: Candle>(&self, data: &[C]) -> IndicatorBundle {
        let osc = &self.config.oscillators;

        IndicatorBundle {
            rsi: RSIBuilder::new(osc.rsi_period).build(data),
            macd: MACDBuilder::new(osc.macd_fast, osc.macd_slow, osc.macd_signal).build(data),
            stoch_rsi: StochRSIBuilder::new(
                osc.stoch_rsi_period,
                osc.stoch_period,
                osc.stoch_k,
                osc.stoch_d,
            )
            .build(data),
            kdj: KDJBuilder::new(osc.kdj_period, osc.kdj_k, osc.kdj_d).build(data),
            psar: PSARBuilder::new(osc.psar_step, osc.psar_max_step).build(data),
            atr: ATRBuilder::new(osc.atr_period).build(data),
            supertrend: SuperTrendBuilder::new(osc.supertrend_period, osc.supertrend_multiplier)
                .build(data),
            vwap: VWAPBuilder::new().build(data),
        }
    }
}

/// 기본 설정으로 캔들 시계열 분석
///
/// # Arguments
/// * `series` - 시간 오름차순 캔들 시계열
pub fn analyze<C: Candle + 'static>(series: &CandleSeries<C>) -> AnalysisResult<AnalysisSummary> {
    SmcAnalyzer::default().analyze(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OhlcvCandle;

    #[test]
    fn test_empty_series_is_error() {
        let series = CandleSeries::<OhlcvCandle>::new(Vec::new());
        assert_eq!(analyze(&series), Err(AnalysisError::EmptySeries));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = AnalysisConfig::default();
        config.oscillators.macd_slow = 2;
        assert!(matches!(
            SmcAnalyzer::new(config),
            Err(AnalysisError::InvalidConfig(_))
        ));
    }
}
