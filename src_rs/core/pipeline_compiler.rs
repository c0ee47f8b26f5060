// 목적:
// - 검색 요청을 Atlas Search 집계 파이프라인으로 컴파일한다.
//
// 설명:
// - $search -> $addFields -> ($skip) -> ($limit) 순서의 스테이지를 결정적으로 생성한다.
// - I/O 없이 순수 계산만 수행하므로 같은 요청은 항상 같은 파이프라인을 만든다.
//
// 디자인 패턴:
// - 순수 함수 컴파일러(Pure Compiler).
//
// 참조:
// - src_rs/core/search_request.rs
// - src_rs/api/search_engine.rs

use bson::{doc, Bson, Document};

use crate::core::errors::CoreResult;
use crate::core::search_request::{SearchRequest, SetFilter, SoftDeleteMode, SOFT_DELETE_FIELD};

pub const COUNT_FIELD: &str = "__count";
pub const LOWER_BOUND_COUNT: &str = "$$SEARCH_META.count.lowerBound";
pub const FUZZY_MAX_EDITS: i32 = 2;
pub const TEXT_SCORE_BOOST: i32 = 5;

/// 컴파일이 끝난 집계 파이프라인이다. 생성 후에는 변경할 수 없다.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPipeline {
    stages: Vec<Document>,
}

impl CompiledPipeline {
    pub fn stages(&self) -> &[Document] {
        &self.stages
    }

    pub fn into_stages(self) -> Vec<Document> {
        self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// 검색 요청을 집계 파이프라인으로 변환한다.
pub fn compile(request: &SearchRequest) -> CoreResult<CompiledPipeline> {
    request.validate()?;

    let mut search = doc! { "index": request.resolved_index_name() };

    let compound = build_compound(request);
    if !compound.is_empty() {
        search.insert("compound", compound);
    }

    search.insert("count", doc! { "type": "lowerBound" });

    if !request.sort.is_empty() {
        let mut sort = Document::new();
        for field in &request.sort {
            sort.insert(field.path.as_str(), field.direction.as_order());
        }
        search.insert("sort", sort);
    }

    let mut stages = vec![
        doc! { "$search": search },
        doc! { "$addFields": { COUNT_FIELD: LOWER_BOUND_COUNT } },
    ];

    if let Some(offset) = request.offset {
        stages.push(doc! { "$skip": to_i64(offset) });
    }
    if let Some(limit) = request.limit {
        stages.push(doc! { "$limit": to_i64(limit) });
    }

    tracing::debug!(
        index = %request.resolved_index_name(),
        stages = stages.len(),
        "검색 파이프라인 컴파일 완료"
    );

    Ok(CompiledPipeline { stages })
}

fn build_compound(request: &SearchRequest) -> Document {
    let mut compound = Document::new();

    if !request.query.is_empty() {
        compound.insert(
            "should",
            vec![
                Bson::Document(doc! {
                    "text": {
                        "query": request.query.as_str(),
                        "path": { "wildcard": "*" },
                        "fuzzy": { "maxEdits": FUZZY_MAX_EDITS },
                        "score": { "boost": { "value": TEXT_SCORE_BOOST } },
                    }
                }),
                Bson::Document(doc! {
                    "wildcard": {
                        "query": format!("{}*", request.query),
                        "path": { "wildcard": "*" },
                        "allowAnalyzedField": true,
                    }
                }),
            ],
        );
        compound.insert("minimumShouldMatch", 1);
    }

    let mut filter = Vec::<Bson>::new();
    for equality in &request.equality_filters {
        filter.push(equals_clause(&equality.path, equality.value.clone()));
    }
    for set in &request.in_filters {
        filter.push(in_clause(set));
    }
    match request.soft_delete {
        SoftDeleteMode::None => {}
        SoftDeleteMode::ExcludeDeleted => {
            filter.push(equals_clause(SOFT_DELETE_FIELD, Bson::Boolean(false)))
        }
        SoftDeleteMode::OnlyDeleted => {
            filter.push(equals_clause(SOFT_DELETE_FIELD, Bson::Boolean(true)))
        }
    }
    if !filter.is_empty() {
        compound.insert("filter", filter);
    }

    let must_not = request
        .not_in_filters
        .iter()
        .map(in_clause)
        .collect::<Vec<_>>();
    if !must_not.is_empty() {
        compound.insert("mustNot", must_not);
    }

    compound
}

fn equals_clause(path: &str, value: Bson) -> Bson {
    Bson::Document(doc! { "equals": { "path": path, "value": value } })
}

fn in_clause(filter: &SetFilter) -> Bson {
    Bson::Document(doc! {
        "in": {
            "path": filter.path.as_str(),
            "value": filter.values.clone(),
        }
    })
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
