// 목적:
// - 전문 검색 요청의 타입 모델을 정의한다.
//
// 설명:
// - 자유 텍스트 질의, 동등/포함/제외 필터, 정렬, soft delete 범위, 페이지 정보를 명시적 필드로 보관한다.
// - 필터와 정렬은 호출자가 추가한 순서를 그대로 유지한다.
//
// 디자인 패턴:
// - 값 객체(Value Object) + 빌더(Builder).
//
// 참조:
// - src_rs/core/pipeline_compiler.rs

use bson::Bson;
use serde::{Deserialize, Serialize};

use crate::core::errors::{CoreError, CoreResult};

pub const DEFAULT_INDEX_NAME: &str = "scout";
pub const SOFT_DELETE_FIELD: &str = "__soft_deleted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// 파이프라인 정렬 값(1/-1)으로 변환한다.
    pub fn as_order(self) -> i32 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftDeleteMode {
    #[default]
    None,
    ExcludeDeleted,
    OnlyDeleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualityFilter {
    pub path: String,
    pub value: Bson,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetFilter {
    pub path: String,
    pub values: Vec<Bson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortField {
    pub path: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub query: String,
    pub equality_filters: Vec<EqualityFilter>,
    pub in_filters: Vec<SetFilter>,
    pub not_in_filters: Vec<SetFilter>,
    pub sort: Vec<SortField>,
    pub soft_delete: SoftDeleteMode,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// 비어 있으면 엔진 설정의 인덱스 이름(없으면 "scout")을 쓴다.
    pub index_name: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn where_eq(mut self, path: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.equality_filters.push(EqualityFilter {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    pub fn where_in<V: Into<Bson>>(
        mut self,
        path: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.in_filters.push(SetFilter {
            path: path.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn where_not_in<V: Into<Bson>>(
        mut self,
        path: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.not_in_filters.push(SetFilter {
            path: path.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn order_by(mut self, path: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push(SortField {
            path: path.into(),
            direction,
        });
        self
    }

    pub fn take(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// 사용할 검색 인덱스 이름을 지정한다.
    pub fn within(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// 명시된 인덱스 이름이 없을 때만 `index_name`을 채운다.
    pub fn within_default(mut self, index_name: impl Into<String>) -> Self {
        if self.index_name.is_none() {
            self.index_name = Some(index_name.into());
        }
        self
    }

    pub fn resolved_index_name(&self) -> &str {
        self.index_name.as_deref().unwrap_or(DEFAULT_INDEX_NAME)
    }

    pub fn exclude_trashed(mut self) -> Self {
        self.soft_delete = SoftDeleteMode::ExcludeDeleted;
        self
    }

    pub fn only_trashed(mut self) -> Self {
        self.soft_delete = SoftDeleteMode::OnlyDeleted;
        self
    }

    /// 파이프라인 컴파일 전에 호출자 계약을 검증한다.
    pub fn validate(&self) -> CoreResult<()> {
        if self.resolved_index_name().trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "index_name은 비어 있을 수 없습니다".to_string(),
            ));
        }

        for filter in &self.equality_filters {
            validate_path(&filter.path)?;
            if !is_scalar(&filter.value) {
                return Err(CoreError::invalid_filter(
                    &filter.path,
                    format!(
                        "equals 값은 스칼라여야 합니다: type={:?}",
                        filter.value.element_type()
                    ),
                ));
            }
        }

        for filter in self.in_filters.iter().chain(self.not_in_filters.iter()) {
            validate_set_filter(filter)?;
        }

        let mut seen = Vec::<&str>::with_capacity(self.sort.len());
        for field in &self.sort {
            if field.path.trim().is_empty() {
                return Err(CoreError::InvalidInput(
                    "정렬 path는 비어 있을 수 없습니다".to_string(),
                ));
            }
            if seen.contains(&field.path.as_str()) {
                return Err(CoreError::InvalidInput(format!(
                    "정렬 path가 중복되었습니다: {}",
                    field.path
                )));
            }
            seen.push(field.path.as_str());
        }

        if self.limit == Some(0) {
            return Err(CoreError::InvalidInput(
                "limit은 1 이상이어야 합니다".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_path(path: &str) -> CoreResult<()> {
    if path.trim().is_empty() {
        return Err(CoreError::invalid_filter(path, "path는 비어 있을 수 없습니다"));
    }
    Ok(())
}

fn validate_set_filter(filter: &SetFilter) -> CoreResult<()> {
    validate_path(&filter.path)?;

    if filter.values.is_empty() {
        return Err(CoreError::invalid_filter(
            &filter.path,
            "in 값 집합은 최소 1개 이상이어야 합니다",
        ));
    }

    if let Some((index, value)) = filter
        .values
        .iter()
        .enumerate()
        .find(|(_, value)| !is_scalar(value))
    {
        return Err(CoreError::invalid_filter(
            &filter.path,
            format!(
                "in 값은 스칼라여야 합니다: index={}, type={:?}",
                index,
                value.element_type()
            ),
        ));
    }

    Ok(())
}

/// `equals`/`in` 연산자가 비교할 수 있는 값인지 판정한다.
pub fn is_scalar(value: &Bson) -> bool {
    matches!(
        value,
        Bson::Boolean(_)
            | Bson::Int32(_)
            | Bson::Int64(_)
            | Bson::Double(_)
            | Bson::Decimal128(_)
            | Bson::String(_)
            | Bson::ObjectId(_)
            | Bson::DateTime(_)
            | Bson::Binary(_)
            | Bson::Null
    )
}
