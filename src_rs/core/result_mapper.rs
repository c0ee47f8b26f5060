// 목적:
// - 집계 결과 문서를 애플리케이션 레코드로 복원하고 DB 반환 순서를 보존한다.
//
// 설명:
// - 결과 키를 한 번에 모아 하이드레이션을 단 1회 호출한다(N+1 금지).
// - 하이드레이션 결과에 없는 키는 인덱싱 이후 삭제된 레코드로 보고 조용히 건너뛴다.
// - lazy_map은 첫 소비 시점까지 하이드레이션을 미루고, 키->레코드 인덱스만 메모리에 둔다.
//
// 디자인 패턴:
// - 매퍼(Mapper) + 지연 반복자(Lazy Iterator).
//
// 참조:
// - src_rs/core/pipeline_compiler.rs
// - src_rs/api/search_engine.rs

use bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::core::errors::{CoreError, CoreResult};
use crate::core::pipeline_compiler::COUNT_FIELD;

/// 검색 인덱스 항목과 원본 레코드를 잇는 식별자다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchKey {
    Int(i64),
    Str(String),
}

impl SearchKey {
    pub fn from_bson(value: &Bson) -> Option<Self> {
        match value {
            Bson::Int32(number) => Some(SearchKey::Int(i64::from(*number))),
            Bson::Int64(number) => Some(SearchKey::Int(*number)),
            Bson::String(text) => Some(SearchKey::Str(text.clone())),
            Bson::ObjectId(oid) => Some(SearchKey::Str(oid.to_hex())),
            _ => None,
        }
    }

    pub fn to_bson(&self) -> Bson {
        match self {
            SearchKey::Int(number) => Bson::Int64(*number),
            SearchKey::Str(text) => Bson::String(text.clone()),
        }
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchKey::Int(number) => write!(f, "{}", number),
            SearchKey::Str(text) => f.write_str(text),
        }
    }
}

impl From<i64> for SearchKey {
    fn from(value: i64) -> Self {
        SearchKey::Int(value)
    }
}

impl From<i32> for SearchKey {
    fn from(value: i32) -> Self {
        SearchKey::Int(i64::from(value))
    }
}

impl From<&str> for SearchKey {
    fn from(value: &str) -> Self {
        SearchKey::Str(value.to_string())
    }
}

impl From<String> for SearchKey {
    fn from(value: String) -> Self {
        SearchKey::Str(value)
    }
}

/// DB가 반환한 결과 한 건이다. count는 하한 추정 총 건수다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub key: SearchKey,
    pub count: i64,
}

impl ResultRecord {
    pub fn new(key: impl Into<SearchKey>, count: i64) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

/// 집계 결과 문서 목록을 ResultRecord 목록으로 변환한다.
pub fn parse_results(documents: &[Document]) -> CoreResult<Vec<ResultRecord>> {
    documents
        .iter()
        .enumerate()
        .map(|(position, document)| parse_result(position, document))
        .collect()
}

fn parse_result(position: usize, document: &Document) -> CoreResult<ResultRecord> {
    let raw_key = document.get("_id").ok_or_else(|| CoreError::InvalidResult {
        position,
        reason: "_id 필드가 없습니다".to_string(),
    })?;
    let key = SearchKey::from_bson(raw_key).ok_or_else(|| CoreError::InvalidResult {
        position,
        reason: format!("_id 타입을 검색 키로 쓸 수 없습니다: {:?}", raw_key.element_type()),
    })?;

    let count = match document.get(COUNT_FIELD) {
        Some(Bson::Int32(number)) => i64::from(*number),
        Some(Bson::Int64(number)) => *number,
        Some(Bson::Double(number)) if number.fract() == 0.0 => *number as i64,
        Some(other) => {
            return Err(CoreError::InvalidResult {
                position,
                reason: format!(
                    "{} 필드 타입이 정수가 아닙니다: key={}, type={:?}",
                    COUNT_FIELD,
                    key,
                    other.element_type()
                ),
            })
        }
        None => {
            return Err(CoreError::InvalidResult {
                position,
                reason: format!("{} 필드가 없습니다: key={}", COUNT_FIELD, key),
            })
        }
    };

    Ok(ResultRecord { key, count })
}

/// 결과 순서 그대로 키만 추출한다.
pub fn map_ids(results: &[ResultRecord]) -> Vec<SearchKey> {
    results.iter().map(|record| record.key.clone()).collect()
}

/// 첫 결과의 하한 추정 총 건수를 반환한다. 결과가 없으면 0이다.
pub fn total_count(results: &[ResultRecord]) -> u64 {
    results
        .first()
        .map(|record| u64::try_from(record.count).unwrap_or(0))
        .unwrap_or(0)
}

/// 결과 키로 레코드를 한 번에 하이드레이션하고 결과 순서대로 정렬한다.
pub fn map<R, H, K>(results: &[ResultRecord], hydrate: H, key_of: K) -> CoreResult<Vec<R>>
where
    H: FnOnce(Vec<SearchKey>) -> CoreResult<Vec<R>>,
    K: Fn(&R) -> SearchKey,
{
    if results.is_empty() {
        return Ok(Vec::new());
    }

    let keys = unique_keys(results);
    let wanted = keys.iter().cloned().collect::<HashSet<_>>();

    let mut index = HashMap::<SearchKey, R>::with_capacity(wanted.len());
    for record in hydrate(keys)? {
        let key = key_of(&record);
        if wanted.contains(&key) {
            index.entry(key).or_insert(record);
        }
    }

    let mut ordered = Vec::with_capacity(index.len());
    for result in results {
        if let Some(record) = index.remove(&result.key) {
            ordered.push(record);
        }
    }

    let missing = results.len().saturating_sub(ordered.len());
    if missing > 0 {
        tracing::debug!(missing, "하이드레이션 결과에 없는 검색 키를 건너뜀");
    }

    Ok(ordered)
}

/// map과 같은 순서 계약을 지연 반복자로 제공한다.
pub fn lazy_map<R, H, I, K>(results: &[ResultRecord], hydrate: H, key_of: K) -> LazyMapped<R, H, K>
where
    H: FnOnce(Vec<SearchKey>) -> CoreResult<I>,
    I: IntoIterator<Item = CoreResult<R>>,
    K: Fn(&R) -> SearchKey,
{
    LazyMapped {
        order: map_ids(results).into_iter(),
        hydrate: Some(hydrate),
        key_of,
        index: HashMap::new(),
        finished: results.is_empty(),
    }
}

pub struct LazyMapped<R, H, K> {
    order: std::vec::IntoIter<SearchKey>,
    hydrate: Option<H>,
    key_of: K,
    index: HashMap<SearchKey, R>,
    finished: bool,
}

impl<R, H, I, K> LazyMapped<R, H, K>
where
    H: FnOnce(Vec<SearchKey>) -> CoreResult<I>,
    I: IntoIterator<Item = CoreResult<R>>,
    K: Fn(&R) -> SearchKey,
{
    fn load(&mut self, hydrate: H) -> CoreResult<()> {
        let keys = unique_ordered(self.order.as_slice());
        let wanted = keys.iter().cloned().collect::<HashSet<_>>();

        for item in hydrate(keys)? {
            let record = item?;
            let key = (self.key_of)(&record);
            if wanted.contains(&key) {
                self.index.entry(key).or_insert(record);
            }
        }

        Ok(())
    }
}

impl<R, H, I, K> Iterator for LazyMapped<R, H, K>
where
    H: FnOnce(Vec<SearchKey>) -> CoreResult<I>,
    I: IntoIterator<Item = CoreResult<R>>,
    K: Fn(&R) -> SearchKey,
{
    type Item = CoreResult<R>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if let Some(hydrate) = self.hydrate.take() {
            if let Err(error) = self.load(hydrate) {
                self.finished = true;
                return Some(Err(error));
            }
        }

        for key in self.order.by_ref() {
            if let Some(record) = self.index.remove(&key) {
                return Some(Ok(record));
            }
        }

        self.finished = true;
        None
    }
}

fn unique_keys(results: &[ResultRecord]) -> Vec<SearchKey> {
    let mut seen = HashSet::with_capacity(results.len());
    results
        .iter()
        .filter(|record| seen.insert(record.key.clone()))
        .map(|record| record.key.clone())
        .collect()
}

fn unique_ordered(keys: &[SearchKey]) -> Vec<SearchKey> {
    let mut seen = HashSet::with_capacity(keys.len());
    keys.iter()
        .filter(|key| seen.insert((*key).clone()))
        .cloned()
        .collect()
}
