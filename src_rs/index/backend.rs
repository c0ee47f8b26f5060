// 목적:
// - 검색 엔진이 의존하는 저장소 협력자 계약을 정의한다.
//
// 설명:
// - 집계 실행, 일괄 upsert/삭제, 검색 인덱스 관리 기능을 한 trait로 묶는다.
// - 엔진은 전역 상태를 찾지 않고 생성자로 주입받은 구현만 사용한다.
//
// 디자인 패턴:
// - 어댑터(Adapter) + 의존성 주입(Dependency Injection).
//
// 참조:
// - src_rs/index/mongo_repo.rs
// - src_rs/api/search_engine.rs

use bson::Document;
use std::future::Future;

use crate::core::errors::CoreResult;
use crate::core::result_mapper::SearchKey;
use crate::index::search_index::{SearchIndexInfo, SearchIndexKind};

pub trait SearchBackend: Send + Sync {
    /// 파이프라인을 실행하고 결과 문서를 순서대로 반환한다.
    fn aggregate(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> impl Future<Output = CoreResult<Vec<Document>>> + Send;

    /// `{q, u, upsert}` 문장 묶음을 한 번의 왕복으로 실행한다.
    fn upsert_many(
        &self,
        collection: &str,
        statements: Vec<Document>,
    ) -> impl Future<Output = CoreResult<u64>> + Send;

    fn delete_by_keys(
        &self,
        collection: &str,
        keys: &[SearchKey],
    ) -> impl Future<Output = CoreResult<u64>> + Send;

    fn delete_all(&self, collection: &str) -> impl Future<Output = CoreResult<u64>> + Send;

    /// 컬렉션이 이미 있으면 성공으로 취급한다.
    fn create_collection(&self, collection: &str) -> impl Future<Output = CoreResult<()>> + Send;

    fn create_search_index(
        &self,
        collection: &str,
        name: &str,
        kind: SearchIndexKind,
        definition: Document,
    ) -> impl Future<Output = CoreResult<()>> + Send;

    fn list_search_indexes(
        &self,
        collection: &str,
    ) -> impl Future<Output = CoreResult<Vec<SearchIndexInfo>>> + Send;

    fn drop_collection(&self, collection: &str) -> impl Future<Output = CoreResult<()>> + Send;
}
