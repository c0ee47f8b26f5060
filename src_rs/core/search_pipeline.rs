// 목적:
// - 검색 작업의 핵심 파이프라인을 실행한다.
//
// 설명:
// - 요청 컴파일 -> 집계 실행 -> 결과 해석 -> 키/총 건수 추출 순서로 처리한다.
// - 레코드 하이드레이션은 호출 측 저장소가 담당하므로 결과 순서대로 키만 돌려준다.
//
// 디자인 패턴:
// - 파이프라인(Pipeline).
//
// 참조:
// - src_rs/api/search_engine.rs
// - src_rs/index/mongo_repo.rs

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::api::search_engine::SearchEngine;
use crate::core::config::{MongoConfigPayload, ScoutConfigPayload};
use crate::core::errors::{CoreError, CoreResult};
use crate::core::result_mapper::{ResultRecord, SearchKey};
use crate::core::search_request::SearchRequest;
use crate::index::backend::SearchBackend;
use crate::index::mongo_repo::MongoRepository;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PagePayload {
    pub per_page: u64,
    pub page: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequestPayload {
    pub job_id: String,
    pub searchable_as: String,
    pub request: SearchRequest,
    #[serde(default)]
    pub page: Option<PagePayload>,
    pub mongo: MongoConfigPayload,
    #[serde(default)]
    pub scout: ScoutConfigPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMetricsPayload {
    pub result_count: usize,
    pub elapsed_ms: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultPayload {
    pub job_id: String,
    pub keys: Vec<SearchKey>,
    pub total: u64,
    pub results: Vec<ResultRecord>,
    pub metrics: SearchMetricsPayload,
}

/// 검색 파이프라인을 실행한다.
pub async fn execute_search(payload: SearchRequestPayload) -> CoreResult<SearchResultPayload> {
    let repository = MongoRepository::new(&payload.mongo).await?;
    let engine = SearchEngine::new(repository, payload.scout.clone())?;
    run_search(&engine, payload).await
}

/// 주입된 엔진으로 검색 페이로드를 처리한다.
pub async fn run_search<B: SearchBackend>(
    engine: &SearchEngine<B>,
    payload: SearchRequestPayload,
) -> CoreResult<SearchResultPayload> {
    validate_payload(&payload)?;

    let started = Instant::now();
    let results = match payload.page {
        Some(page) => {
            engine
                .paginate(&payload.searchable_as, &payload.request, page.per_page, page.page)
                .await?
        }
        None => engine.search(&payload.searchable_as, &payload.request).await?,
    };

    let metrics = SearchMetricsPayload {
        result_count: results.len(),
        elapsed_ms: started.elapsed().as_millis(),
    };

    Ok(SearchResultPayload {
        job_id: payload.job_id,
        keys: engine.map_ids(&results),
        total: engine.total_count(&results),
        results,
        metrics,
    })
}

fn validate_payload(payload: &SearchRequestPayload) -> CoreResult<()> {
    if payload.job_id.trim().is_empty() {
        return Err(CoreError::InvalidInput(
            "job_id는 비어 있을 수 없습니다".to_string(),
        ));
    }

    if payload.searchable_as.trim().is_empty() {
        return Err(CoreError::InvalidInput(
            "searchable_as는 비어 있을 수 없습니다".to_string(),
        ));
    }

    Ok(())
}
