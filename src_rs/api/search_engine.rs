// 목적:
// - Scout 스타일 검색 엔진 파사드를 제공한다.
//
// 설명:
// - 검색 요청 컴파일 -> 집계 실행 -> 결과 해석 흐름과, 인덱스 적재/삭제/생성 작업을 한곳에 모은다.
// - 저장소 구현은 생성자로 주입받으며 전역 상태를 사용하지 않는다.
// - 인덱스 준비 대기는 고정 간격, 고정 횟수의 폴링이며 backoff를 두지 않는다.
//
// 디자인 패턴:
// - 파사드(Facade) + 의존성 주입(Dependency Injection).
//
// 참조:
// - src_rs/core/pipeline_compiler.rs
// - src_rs/core/result_mapper.rs
// - src_rs/index/backend.rs

use crate::core::config::ScoutConfigPayload;
use crate::core::errors::{CoreError, CoreResult};
use crate::core::ingestion_pipeline::{build_index_writes, IndexableRecord};
use crate::core::pipeline_compiler::compile;
use crate::core::result_mapper::{self, parse_results, ResultRecord, SearchKey};
use crate::core::search_request::SearchRequest;
use crate::index::backend::SearchBackend;
use crate::index::naming::{ensure_distinct_namespace, index_collection_name};
use crate::index::search_index::{dynamic_definition, SearchIndexInfo, SearchIndexKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexWriteSummary {
    pub upserted: u64,
    pub removed: u64,
}

pub struct SearchEngine<B> {
    backend: B,
    config: ScoutConfigPayload,
}

impl<B: SearchBackend> SearchEngine<B> {
    pub fn new(backend: B, config: ScoutConfigPayload) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self { backend, config })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &ScoutConfigPayload {
        &self.config
    }

    /// 모델의 검색 대상 이름에 prefix를 붙인 인덱스 컬렉션 이름이다.
    pub fn index_collection(&self, searchable_as: &str) -> CoreResult<String> {
        index_collection_name(&self.config.prefix, searchable_as)
    }

    /// 인덱스 컬렉션이 모델 컬렉션과 겹치면 오류를 반환한다.
    pub fn ensure_distinct_namespace(
        &self,
        database: &str,
        searchable_as: &str,
        model_collection: &str,
    ) -> CoreResult<()> {
        let collection = self.index_collection(searchable_as)?;
        ensure_distinct_namespace(database, &collection, model_collection)
    }

    pub async fn search(
        &self,
        searchable_as: &str,
        request: &SearchRequest,
    ) -> CoreResult<Vec<ResultRecord>> {
        let collection = self.index_collection(searchable_as)?;
        let request = request
            .clone()
            .within_default(self.config.index_name.as_str());
        let pipeline = compile(&request)?;

        tracing::debug!(
            collection = %collection,
            index = %request.resolved_index_name(),
            stages = pipeline.len(),
            "검색 집계 실행"
        );

        let documents = self
            .backend
            .aggregate(&collection, pipeline.into_stages())
            .await?;
        parse_results(&documents)
    }

    /// page는 1부터 시작한다.
    pub async fn paginate(
        &self,
        searchable_as: &str,
        request: &SearchRequest,
        per_page: u64,
        page: u64,
    ) -> CoreResult<Vec<ResultRecord>> {
        if per_page == 0 {
            return Err(CoreError::InvalidInput(
                "per_page는 1 이상이어야 합니다".to_string(),
            ));
        }
        if page == 0 {
            return Err(CoreError::InvalidInput(
                "page는 1 이상이어야 합니다".to_string(),
            ));
        }

        let offset = (page - 1).saturating_mul(per_page);
        let paged = request.clone().skip(offset).take(per_page);
        self.search(searchable_as, &paged).await
    }

    pub fn map_ids(&self, results: &[ResultRecord]) -> Vec<SearchKey> {
        result_mapper::map_ids(results)
    }

    pub fn total_count(&self, results: &[ResultRecord]) -> u64 {
        result_mapper::total_count(results)
    }

    pub async fn update(
        &self,
        searchable_as: &str,
        records: &[IndexableRecord],
    ) -> CoreResult<IndexWriteSummary> {
        if records.is_empty() {
            return Ok(IndexWriteSummary::default());
        }

        let collection = self.index_collection(searchable_as)?;
        let batch = build_index_writes(records, self.config.soft_delete);

        let mut summary = IndexWriteSummary::default();
        if !batch.upserts.is_empty() {
            summary.upserted = self.backend.upsert_many(&collection, batch.upserts).await?;
        }
        if !batch.removals.is_empty() {
            summary.removed = self
                .backend
                .delete_by_keys(&collection, &batch.removals)
                .await?;
        }

        tracing::debug!(
            collection = %collection,
            upserted = summary.upserted,
            removed = summary.removed,
            "검색 인덱스 갱신"
        );
        Ok(summary)
    }

    pub async fn delete(&self, searchable_as: &str, keys: &[SearchKey]) -> CoreResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let collection = self.index_collection(searchable_as)?;
        self.backend.delete_by_keys(&collection, keys).await
    }

    pub async fn flush(&self, searchable_as: &str) -> CoreResult<u64> {
        let collection = self.index_collection(searchable_as)?;
        self.backend.delete_all(&collection).await
    }

    /// 인덱스 컬렉션과 동적 매핑 검색 인덱스를 만들고 READY가 될 때까지 기다린다.
    pub async fn create_index(&self, searchable_as: &str) -> CoreResult<()> {
        let collection = self.index_collection(searchable_as)?;

        self.backend.create_collection(&collection).await?;
        self.backend
            .create_search_index(
                &collection,
                &self.config.index_name,
                SearchIndexKind::Search,
                dynamic_definition(),
            )
            .await?;

        tracing::info!(
            collection = %collection,
            index = %self.config.index_name,
            "검색 인덱스 생성 요청 완료"
        );

        self.wait_until_ready(searchable_as, &self.config.index_name)
            .await
    }

    pub async fn delete_index(&self, searchable_as: &str) -> CoreResult<()> {
        let collection = self.index_collection(searchable_as)?;
        self.backend.drop_collection(&collection).await?;

        tracing::info!(collection = %collection, "검색 인덱스 컬렉션 삭제");
        Ok(())
    }

    pub async fn search_indexes(&self, searchable_as: &str) -> CoreResult<Vec<SearchIndexInfo>> {
        let collection = self.index_collection(searchable_as)?;
        self.backend.list_search_indexes(&collection).await
    }

    pub async fn wait_until_ready(&self, searchable_as: &str, index_name: &str) -> CoreResult<()> {
        let collection = self.index_collection(searchable_as)?;
        let attempts = self.config.index_poll_attempts;

        for attempt in 1..=attempts {
            let indexes = self.backend.list_search_indexes(&collection).await?;
            let ready = indexes
                .iter()
                .any(|index| index.name == index_name && index.is_ready());
            if ready {
                tracing::debug!(collection = %collection, index = %index_name, attempt, "검색 인덱스 준비 완료");
                return Ok(());
            }

            if attempt < attempts {
                tokio::time::sleep(self.config.poll_interval()).await;
            }
        }

        tracing::warn!(collection = %collection, index = %index_name, attempts, "검색 인덱스 준비 대기 시간 초과");
        Err(CoreError::IndexNotReady {
            index: index_name.to_string(),
            attempts,
        })
    }
}
