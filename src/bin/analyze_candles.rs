use log::{debug, error, info};
use smc_analysis::{
    AnalysisConfig, CandleSeries, ConfigFormat, ConfigLoader, OhlcvCandle, SmcAnalyzer,
    TradeSetupAnalyzer,
};
use std::env;
use std::path::{Path, PathBuf};

/// 에러 메시지를 로그와 표준 출력에 남기고 종료
fn fail(message: String) -> ! {
    error!("{}", message);
    println!("{}", message);
    std::process::exit(1);
}

/// JSON 캔들 파일 로드
fn load_candles(path: &Path) -> Result<Vec<OhlcvCandle>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("캔들 파일 읽기 실패: {} - {}", path.display(), e))?;

    serde_json::from_str(&content)
        .map_err(|e| format!("캔들 파일 파싱 실패: {} - {}", path.display(), e))
}

fn main() {
    // 로그 초기화
    env_logger::init();

    info!("캔들 분석기 시작");

    let args: Vec<String> = env::args().collect();
    debug!("커맨드 라인 인수: {:?}", args);

    if args.len() < 2 {
        error!("인수가 충분하지 않습니다. 캔들 파일 경로가 필요합니다.");
        println!("사용법: {} <캔들_JSON_파일> [설정_파일_경로]", args[0]);
        println!("설정 파일은 JSON 또는 TOML 형식을 지원합니다.");
        return;
    }

    let candle_path = PathBuf::from(&args[1]);
    let candles = load_candles(&candle_path).unwrap_or_else(|e| fail(e));
    info!("캔들 {}개 로드: {}", candles.len(), candle_path.display());

    // 설정 파일 (지정되지 않은 경우 기본 설정 사용)
    let config = match args.get(2) {
        Some(path) => {
            debug!("사용자 지정 설정 파일 사용: {}", path);
            ConfigLoader::load_from_file::<AnalysisConfig>(Path::new(path), ConfigFormat::Auto)
                .unwrap_or_else(|e| fail(format!("설정 로드 실패: {}", e)))
        }
        None => {
            debug!("기본 설정 사용");
            AnalysisConfig::default()
        }
    };

    let analyzer =
        SmcAnalyzer::new(config).unwrap_or_else(|e| fail(format!("분석기 생성 실패: {}", e)));

    let series = CandleSeries::new(candles);
    let summary = analyzer
        .analyze(&series)
        .unwrap_or_else(|e| fail(format!("분석 실패: {}", e)));
    let setup = TradeSetupAnalyzer.analyze(&summary);
    info!("{}", setup);

    let output = serde_json::json!({
        "summary": summary,
        "trade_setup": setup,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(format!("결과 직렬화 실패: {}", e)),
    }
}
