// 분석 파라미터 설정
// 모든 섹션은 기본값을 가지므로 설정 파일에는 바꾸려는 값만 적으면 됩니다.

use crate::config_loader::ConfigValidation;
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// 추세 이동평균 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// EMA 기간 목록 (오름차순)
    pub ema_periods: Vec<usize>,
    /// 평균 거래량 기간
    pub volume_ma_period: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        TrendConfig {
            ema_periods: vec![9, 21, 80, 200],
            volume_ma_period: 21,
        }
    }
}

/// 지지/저항 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelsConfig {
    pub pivot_left: usize,
    pub pivot_right: usize,
    /// 병합 허용 오차 (상대 거리, 0.002 = 0.2%)
    pub merge_tolerance: f64,
    /// 지지/저항 각각 최대 개수
    pub max_levels: usize,
}

impl Default for LevelsConfig {
    fn default() -> Self {
        LevelsConfig {
            pivot_left: 3,
            pivot_right: 3,
            merge_tolerance: 0.002,
            max_levels: 3,
        }
    }
}

/// 추세선 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendlineConfig {
    pub pivot_left: usize,
    pub pivot_right: usize,
}

impl Default for TrendlineConfig {
    fn default() -> Self {
        TrendlineConfig {
            pivot_left: 5,
            pivot_right: 5,
        }
    }
}

/// 볼륨 프로파일 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeProfileConfig {
    /// 히스토그램 구간 수
    pub bins: usize,
}

impl Default for VolumeProfileConfig {
    fn default() -> Self {
        VolumeProfileConfig { bins: 50 }
    }
}

/// 시장 구조(FVG, 오더 블록, BoS/ChoCH) 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    pub pivot_left: usize,
    pub pivot_right: usize,
    /// FVG 탐색 최대 캔들 수
    pub fvg_lookback: usize,
    /// 오더 블록 평균 변동폭 기간
    pub order_block_range_period: usize,
    /// 오더 블록 판정 배수
    pub order_block_expansion: f64,
    /// 오더 블록 탐색 최대 캔들 수
    pub order_block_lookback: usize,
    /// 보고할 오더 블록 최대 개수
    pub max_order_blocks: usize,
}

impl Default for StructureConfig {
    fn default() -> Self {
        StructureConfig {
            pivot_left: 3,
            pivot_right: 3,
            fvg_lookback: 200,
            order_block_range_period: 20,
            order_block_expansion: 1.5,
            order_block_lookback: 200,
            max_order_blocks: 2,
        }
    }
}

/// 오실레이터/추세 추종 지표 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorConfig {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub stoch_rsi_period: usize,
    pub stoch_period: usize,
    pub stoch_k: usize,
    pub stoch_d: usize,
    pub kdj_period: usize,
    pub kdj_k: usize,
    pub kdj_d: usize,
    pub psar_step: f64,
    pub psar_max_step: f64,
    pub atr_period: usize,
    pub supertrend_period: usize,
    pub supertrend_multiplier: f64,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        OscillatorConfig {
            rsi_period: 9,
            macd_fast: 6,
            macd_slow: 13,
            macd_signal: 4,
            stoch_rsi_period: 8,
            stoch_period: 5,
            stoch_k: 5,
            stoch_d: 3,
            kdj_period: 5,
            kdj_k: 3,
            kdj_d: 3,
            psar_step: 0.02,
            psar_max_step: 0.2,
            atr_period: 14,
            supertrend_period: 10,
            supertrend_multiplier: 3.0,
        }
    }
}

/// 피보나치 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FibonacciConfig {
    /// 스윙 범위를 찾을 최근 캔들 수
    pub lookback: usize,
}

impl Default for FibonacciConfig {
    fn default() -> Self {
        FibonacciConfig { lookback: 150 }
    }
}

/// 전체 분석 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub trend: TrendConfig,
    pub levels: LevelsConfig,
    pub trendline: TrendlineConfig,
    pub volume_profile: VolumeProfileConfig,
    pub structure: StructureConfig,
    pub oscillators: OscillatorConfig,
    pub fibonacci: FibonacciConfig,
}

/// 0보다 커야 하는 기간 값 검사
fn require_positive(name: &str, value: usize) -> ConfigResult<()> {
    if value == 0 {
        return Err(ConfigError::ValidationError(format!(
            "{}은(는) 0보다 커야 합니다",
            name
        )));
    }
    Ok(())
}

impl ConfigValidation for AnalysisConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.trend.ema_periods.is_empty() {
            return Err(ConfigError::ValidationError(
                "EMA 기간 목록이 비어 있습니다".to_string(),
            ));
        }

        for period in &self.trend.ema_periods {
            require_positive("trend.ema_periods", *period)?;
        }

        if self.trend.ema_periods.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ConfigError::ValidationError(format!(
                "EMA 기간은 오름차순이어야 합니다: {:?}",
                self.trend.ema_periods
            )));
        }

        require_positive("trend.volume_ma_period", self.trend.volume_ma_period)?;

        if !(self.levels.merge_tolerance >= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "병합 허용 오차는 0 이상이어야 합니다: {}",
                self.levels.merge_tolerance
            )));
        }

        require_positive("volume_profile.bins", self.volume_profile.bins)?;
        require_positive("structure.fvg_lookback", self.structure.fvg_lookback)?;
        require_positive(
            "structure.order_block_range_period",
            self.structure.order_block_range_period,
        )?;
        require_positive(
            "structure.order_block_lookback",
            self.structure.order_block_lookback,
        )?;

        if !(self.structure.order_block_expansion > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "오더 블록 배수는 0보다 커야 합니다: {}",
                self.structure.order_block_expansion
            )));
        }

        let osc = &self.oscillators;
        require_positive("oscillators.rsi_period", osc.rsi_period)?;
        require_positive("oscillators.macd_fast", osc.macd_fast)?;
        require_positive("oscillators.macd_signal", osc.macd_signal)?;
        if osc.macd_slow <= osc.macd_fast {
            return Err(ConfigError::ValidationError(format!(
                "느린 EMA 기간({})은 빠른 EMA 기간({})보다 커야 합니다",
                osc.macd_slow, osc.macd_fast
            )));
        }
        require_positive("oscillators.stoch_rsi_period", osc.stoch_rsi_period)?;
        require_positive("oscillators.stoch_period", osc.stoch_period)?;
        require_positive("oscillators.stoch_k", osc.stoch_k)?;
        require_positive("oscillators.stoch_d", osc.stoch_d)?;
        require_positive("oscillators.kdj_period", osc.kdj_period)?;
        require_positive("oscillators.kdj_k", osc.kdj_k)?;
        require_positive("oscillators.kdj_d", osc.kdj_d)?;
        require_positive("oscillators.atr_period", osc.atr_period)?;
        require_positive("oscillators.supertrend_period", osc.supertrend_period)?;

        if !(osc.psar_step > 0.0 && osc.psar_step <= osc.psar_max_step) {
            return Err(ConfigError::ValidationError(format!(
                "PSAR 가속 계수는 0 < step <= max_step 이어야 합니다: {} / {}",
                osc.psar_step, osc.psar_max_step
            )));
        }

        if !(osc.supertrend_multiplier > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "슈퍼트렌드 승수는 0보다 커야 합니다: {}",
                osc.supertrend_multiplier
            )));
        }

        require_positive("fibonacci.lookback", self.fibonacci.lookback)?;

        Ok(())
    }
}
