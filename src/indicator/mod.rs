// 기술적 지표 모듈
// 캔들 시계열 전체를 받아 지표의 최신 값을 계산합니다.

pub mod atr;
pub mod kdj;
pub mod ma;
pub mod macd;
pub mod pivot;
pub mod psar;
pub mod rsi;
pub mod stoch_rsi;
pub mod supertrend;
pub mod utils;
pub mod volume;
pub mod vwap;

use std::collections::HashMap;
use std::fmt::Debug;
use std::fmt::Display;
use std::hash::Hash;

use crate::candle_series::CandleSeries;
use crate::model::Candle;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// 기술적 지표(TA)의 컬렉션을 관리하는 구조체
///
/// 여러 기술적 지표를 키-값 쌍으로 저장하고 관리합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct TAs<K, T>
where
    K: PartialEq + Eq + Hash + std::fmt::Debug,
{
    /// 이 컬렉션의 이름
    name: String,
    /// 순서가 유지되는 키 목록
    keys: Vec<K>,
    /// 키-값 쌍으로 저장된 기술적 지표
    data: HashMap<K, T>,
}

impl<K, T> Display for TAs<K, T>
where
    K: PartialEq + Eq + Hash + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TAs({})", self.name)
    }
}

/// 키 순서대로 `{"키": 값}` 맵으로 직렬화
impl<K, T> Serialize for TAs<K, T>
where
    K: PartialEq + Eq + Hash + std::fmt::Debug + Display,
    T: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keys.len()))?;
        for key in &self.keys {
            if let Some(value) = self.data.get(key) {
                map.serialize_entry(&key.to_string(), value)?;
            }
        }
        map.end()
    }
}

/// 값들의 배열 정렬 여부를 확인하는 내부 함수
///
/// # Arguments
/// * `values` - 확인할 값들의 벡터
/// * `init` - 초기 비교값
/// * `cmp` - 비교 함수
///
/// # Returns
/// * `bool` - 정렬 조건 만족 여부
fn is_arrangement(values: Vec<f64>, init: f64, cmp: impl Fn(f64, f64) -> bool) -> bool {
    if values.is_empty() {
        return true;
    }

    let mut prev = init;
    for value in values {
        if !cmp(value, prev) {
            return false;
        }
        prev = value;
    }

    true
}

/// 값들이 내림차순으로 정렬되어 있는지 확인
pub(crate) fn is_regular_arrangement(values: Vec<f64>) -> bool {
    is_arrangement(values, f64::MAX, |current, prev| current < prev)
}

/// 값들이 오름차순으로 정렬되어 있는지 확인
pub(crate) fn is_reverse_arrangement(values: Vec<f64>) -> bool {
    is_arrangement(values, f64::MIN, |current, prev| current > prev)
}

impl<K, T> TAs<K, T>
where
    K: PartialEq + Eq + Hash + std::fmt::Debug,
{
    /// 새로운 TAs 인스턴스 생성
    ///
    /// # Arguments
    /// * `name` - 컬렉션 이름
    /// * `keys` - 키 목록
    /// * `data` - 키-값 데이터
    pub fn new(name: String, keys: Vec<K>, data: HashMap<K, T>) -> TAs<K, T> {
        TAs { name, keys, data }
    }

    /// 지정된 키에 해당하는 값 참조 반환
    ///
    /// # Arguments
    /// * `key` - 검색할 키
    ///
    /// # Returns
    /// * `Option<&T>` - 찾은 값 참조 (키가 없으면 None)
    pub fn get(&self, key: &K) -> Option<&T> {
        self.data.get(key)
    }

    /// 키 순서대로 모든 값의 참조 벡터 반환
    pub fn get_all(&self) -> Vec<&T> {
        self.keys
            .iter()
            .filter_map(|key| self.data.get(key))
            .collect::<Vec<_>>()
    }

    /// 값들이 키 순서대로 내림차순(정배열)인지 확인
    ///
    /// # Arguments
    /// * `get_value` - 값 추출 함수
    pub fn is_regular_arrangement(&self, get_value: impl Fn(&T) -> f64) -> bool {
        let values = self.get_all().into_iter().map(get_value).collect::<Vec<_>>();
        is_regular_arrangement(values)
    }

    /// 값들이 키 순서대로 오름차순(역배열)인지 확인
    ///
    /// # Arguments
    /// * `get_value` - 값 추출 함수
    pub fn is_reverse_arrangement(&self, get_value: impl Fn(&T) -> f64) -> bool {
        let values = self.get_all().into_iter().map(get_value).collect::<Vec<_>>();
        is_reverse_arrangement(values)
    }
}

/// 기술적 지표 생성 인터페이스
///
/// 빌더는 상태를 갖지 않으며 호출마다 전체 캔들로부터 다시 계산합니다.
pub trait TABuilder<T, C: Candle>: Send + Sync + std::fmt::Debug {
    /// 시계열에서 기술적 지표 생성
    ///
    /// # Arguments
    /// * `series` - 캔들 시계열
    fn from_series(&self, series: &CandleSeries<C>) -> T {
        self.build(series.items())
    }

    /// 데이터에서 기술적 지표 생성
    ///
    /// # Arguments
    /// * `data` - 시간 오름차순 캔들 슬라이스
    fn build(&self, data: &[C]) -> T;
}

/// 여러 기술적 지표 빌더를 관리하는 구조체
pub struct TAsBuilder<K, T, C: Candle> {
    /// 이 빌더 컬렉션의 이름
    name: String,
    /// 순서가 유지되는 키 목록
    keys: Vec<K>,
    /// 각 키에 대응하는 개별 빌더
    builders: HashMap<K, Box<dyn TABuilder<T, C>>>,
}

impl<K, T, C> TAsBuilder<K, T, C>
where
    K: PartialEq + Eq + Hash + Clone + std::fmt::Debug,
    C: Candle,
{
    /// 새 TAsBuilder 인스턴스 생성
    ///
    /// # Arguments
    /// * `name` - 빌더 이름
    /// * `keys` - 키 목록
    /// * `gen_builder` - 각 키에 대한 빌더 생성 함수
    pub fn new(
        name: String,
        keys: &[K],
        gen_builder: impl Fn(&K) -> Box<dyn TABuilder<T, C>>,
    ) -> TAsBuilder<K, T, C> {
        let mut builders: HashMap<K, Box<dyn TABuilder<T, C>>> = HashMap::new();
        for key in keys {
            builders.insert(key.clone(), gen_builder(key));
        }

        TAsBuilder {
            name,
            keys: keys.to_vec(),
            builders,
        }
    }

    /// 시계열에서 기술적 지표 컬렉션 생성
    pub fn from_series(&self, series: &CandleSeries<C>) -> TAs<K, T> {
        self.build(series.items())
    }

    /// 데이터에서 기술적 지표 컬렉션 생성
    ///
    /// # Arguments
    /// * `data` - 캔들 데이터 슬라이스
    pub fn build(&self, data: &[C]) -> TAs<K, T> {
        let mut tas: HashMap<K, T> = HashMap::new();
        for (key, builder) in self.builders.iter() {
            tas.insert(key.clone(), builder.build(data));
        }

        TAs::new(self.name.to_owned(), self.keys.clone(), tas)
    }
}

impl<K: std::fmt::Debug, T, C> std::fmt::Debug for TAsBuilder<K, T, C>
where
    C: Candle,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TAsBuilder")
            .field("name", &self.name)
            .field("keys", &self.keys)
            .field("builders", &format!("<{} builders>", self.builders.len()))
            .finish()
    }
}
