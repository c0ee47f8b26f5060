// 목적:
// - Atlas Search 인덱스 메타데이터 모델과 해석 규칙을 제공한다.
//
// 설명:
// - $listSearchIndexes 결과에서 이름/종류/상태/대상 컬럼을 뽑는다.
// - Atlas Search를 지원하지 않는 서버의 오류 코드를 판정한다.
//
// 참조:
// - src_rs/index/mongo_repo.rs
// - src_rs/api/search_engine.rs

use bson::{doc, Bson, Document};
use mongodb::{SearchIndexModel, SearchIndexType};
use serde::{Deserialize, Serialize};

use crate::core::errors::{CoreError, CoreResult};

/// 검색 명령을 인식하지 못하는 서버 오류 코드 목록이다.
///
/// - 59: no such command `createSearchIndexes`
/// - 40324: unrecognized pipeline stage `$listSearchIndexes`
/// - 115: search index commands are only supported with Atlas
/// - 6047401: `$listSearchIndexes` is only allowed on Atlas
/// - 31082: search requires additional mongot configuration
pub const SEARCH_NOT_SUPPORTED_CODES: [i32; 5] = [59, 40324, 115, 6047401, 31082];

pub fn is_search_not_supported_code(code: i32) -> bool {
    SEARCH_NOT_SUPPORTED_CODES.contains(&code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchIndexKind {
    #[default]
    Search,
    VectorSearch,
}

impl SearchIndexKind {
    pub fn to_driver_type(self) -> SearchIndexType {
        match self {
            SearchIndexKind::Search => SearchIndexType::Search,
            SearchIndexKind::VectorSearch => SearchIndexType::VectorSearch,
        }
    }

    pub fn parse(value: &str) -> CoreResult<Self> {
        match value {
            "search" => Ok(SearchIndexKind::Search),
            "vectorSearch" => Ok(SearchIndexKind::VectorSearch),
            other => Err(CoreError::Serialization(format!(
                "알 수 없는 검색 인덱스 종류입니다: {}",
                other
            ))),
        }
    }
}

/// 드라이버의 createSearchIndexes 요청 모델을 만든다.
pub fn search_index_model(name: &str, kind: SearchIndexKind, definition: Document) -> SearchIndexModel {
    SearchIndexModel::builder()
        .definition(definition)
        .name(name.to_string())
        .index_type(kind.to_driver_type())
        .build()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndexInfo {
    pub name: String,
    pub kind: SearchIndexKind,
    pub status: String,
    pub columns: Vec<String>,
}

impl SearchIndexInfo {
    pub fn is_ready(&self) -> bool {
        self.status == "READY"
    }

    /// $listSearchIndexes 결과 문서 하나를 해석한다.
    pub fn from_document(document: &Document) -> CoreResult<Self> {
        let name = document
            .get_str("name")
            .map_err(|error| CoreError::Serialization(format!("search index name 파싱 실패: {}", error)))?
            .to_string();

        let kind = match document.get_str("type") {
            Ok(value) => SearchIndexKind::parse(value)?,
            Err(_) => SearchIndexKind::Search,
        };

        let status = document.get_str("status").unwrap_or("UNKNOWN").to_string();

        let definition = document
            .get_document("latestDefinition")
            .ok()
            .cloned()
            .unwrap_or_default();

        Ok(Self {
            name,
            kind,
            status,
            columns: definition_columns(kind, &definition),
        })
    }
}

fn definition_columns(kind: SearchIndexKind, definition: &Document) -> Vec<String> {
    match kind {
        SearchIndexKind::Search => {
            let Ok(mappings) = definition.get_document("mappings") else {
                return Vec::new();
            };

            let mut columns = Vec::new();
            if mappings.get_bool("dynamic").unwrap_or(false) {
                columns.push("dynamic".to_string());
            }
            if let Ok(fields) = mappings.get_document("fields") {
                columns.extend(fields.keys().cloned());
            }
            columns
        }
        SearchIndexKind::VectorSearch => definition
            .get_array("fields")
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|field| match field {
                        Bson::Document(field) => field.get_str("path").ok().map(str::to_string),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// 모든 필드를 동적으로 색인하는 기본 검색 인덱스 정의다.
pub fn dynamic_definition() -> Document {
    doc! { "mappings": { "dynamic": true } }
}
