use crate::model::Candle;

/// 분석 대상 캔들 시계열
///
/// 데이터는 datetime 기준으로 오름차순 정렬되어 저장됩니다 (가장 오래된 데이터가 먼저 옴).
/// 같은 시간의 캔들이 여러 개 있으면 입력에서 마지막으로 나온 캔들만 남깁니다.
#[derive(Debug, Clone)]
pub struct CandleSeries<C: Candle> {
    items: Vec<C>,
}

impl<C> CandleSeries<C>
where
    C: Candle,
{
    /// 새로운 CandleSeries 인스턴스를 생성합니다.
    ///
    /// # Arguments
    /// * `items` - 캔들 목록 (순서 무관)
    ///
    /// # Returns
    /// * `CandleSeries<C>` - 정렬 및 중복 제거된 시계열
    pub fn new(mut items: Vec<C>) -> CandleSeries<C> {
        // 안정 정렬이므로 같은 시간의 캔들은 입력 순서를 유지함
        items.sort_by_key(|a| a.datetime());

        let before = items.len();
        let mut deduped: Vec<C> = Vec::with_capacity(items.len());
        for item in items {
            match deduped.last_mut() {
                Some(last) if last.datetime() == item.datetime() => *last = item,
                _ => deduped.push(item),
            }
        }

        if deduped.len() != before {
            log::debug!(
                "중복 캔들 {}개 제거 ({} -> {})",
                before - deduped.len(),
                before,
                deduped.len()
            );
        }

        CandleSeries { items: deduped }
    }

    /// 캔들 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 시계열이 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 가장 오래된 캔들
    pub fn first(&self) -> Option<&C> {
        self.items.first()
    }

    /// 가장 최근 캔들
    pub fn last(&self) -> Option<&C> {
        self.items.last()
    }

    /// 지정된 인덱스의 캔들을 반환합니다.
    ///
    /// # Arguments
    /// * `index` - 0이 가장 오래된 캔들
    pub fn get(&self, index: usize) -> Option<&C> {
        self.items.get(index)
    }

    /// 시간 순서로 정렬된 캔들 슬라이스
    pub fn items(&self) -> &[C] {
        &self.items
    }

    /// 최근 `n`개 캔들 (시계열이 더 짧으면 전체)
    pub fn tail(&self, n: usize) -> &[C] {
        let start = self.items.len().saturating_sub(n);
        &self.items[start..]
    }

    /// 가장 최근 종가
    pub fn last_close(&self) -> Option<f64> {
        self.items.last().map(|c| c.close_price())
    }
}

impl<C: Candle> From<Vec<C>> for CandleSeries<C> {
    fn from(items: Vec<C>) -> Self {
        CandleSeries::new(items)
    }
}
