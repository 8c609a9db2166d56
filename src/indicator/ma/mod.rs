pub mod ema;

use crate::indicator::{TAs, TAsBuilder};
use crate::model::Candle;
use ema::{EMA, EMABuilder};
use std::fmt::Debug;
use std::fmt::Display;

/// 이동평균(Moving Average) 인터페이스
pub trait MA: Display + Send + Debug {
    /// 이동평균 계산 기간
    fn period(&self) -> usize;

    /// 현재 이동평균 값
    fn get(&self) -> f64;
}

/// 여러 기간의 지수이동평균 컬렉션 타입
pub type EMAs = TAs<usize, EMA>;

/// 여러 기간의 지수이동평균 빌더 타입
pub type EMAsBuilder<C> = TAsBuilder<usize, EMA, C>;

/// 이동평균 컬렉션 빌더 팩토리
pub struct EMAsBuilderFactory;

impl EMAsBuilderFactory {
    /// 여러 기간의 EMA 빌더 생성
    ///
    /// # Arguments
    /// * `periods` - EMA 계산 기간 목록 (오름차순)
    ///
    /// # Panics
    /// * 빈 기간 목록이나 오름차순이 아닌 기간 목록이 제공되면 패닉 발생
    pub fn build<C: Candle + 'static>(periods: &[usize]) -> EMAsBuilder<C> {
        if periods.is_empty() {
            panic!("이동평균 기간 목록이 비어 있습니다");
        }

        if periods.windows(2).any(|w| w[1] <= w[0]) {
            panic!(
                "이동평균 기간은 오름차순으로 정렬되어야 합니다: {:?}",
                periods
            );
        }

        EMAsBuilder::new("emas".to_owned(), periods, |period| {
            Box::new(EMABuilder::<C>::new(*period))
        })
    }
}
