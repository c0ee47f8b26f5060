// 목적:
// - 검색 인덱스 컬렉션 적재 작업의 핵심 파이프라인을 실행한다.
//
// 설명:
// - 레코드 목록을 upsert 문장과 삭제 키로 나누고, 작업 종류(update/delete/flush/인덱스 관리)별로 분기한다.
// - 검색 필드가 비어 있는 레코드는 upsert 대신 인덱스에서 제거한다.
//
// 디자인 패턴:
// - 명령 패턴(Command) 기반 분기.
//
// 참조:
// - src_rs/api/search_engine.rs
// - src_rs/index/mongo_repo.rs

use bson::{doc, Document};
use serde::{Deserialize, Serialize};

use crate::api::search_engine::SearchEngine;
use crate::core::config::{MongoConfigPayload, ScoutConfigPayload};
use crate::core::errors::{CoreError, CoreResult};
use crate::core::result_mapper::SearchKey;
use crate::core::search_request::SOFT_DELETE_FIELD;
use crate::index::mongo_repo::MongoRepository;

/// 검색 인덱스에 반영할 레코드 한 건이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexableRecord {
    pub key: SearchKey,
    #[serde(default)]
    pub fields: Document,
    #[serde(default)]
    pub trashed: bool,
}

impl IndexableRecord {
    pub fn new(key: impl Into<SearchKey>, fields: Document) -> Self {
        Self {
            key: key.into(),
            fields,
            trashed: false,
        }
    }

    pub fn trashed(mut self, trashed: bool) -> Self {
        self.trashed = trashed;
        self
    }
}

/// update 작업 한 번에 보낼 upsert 문장과 제거 키 묶음이다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexWriteBatch {
    pub upserts: Vec<Document>,
    pub removals: Vec<SearchKey>,
}

/// 레코드 목록을 update 명령 문장(`{q, u, upsert}`)과 제거 키로 변환한다.
pub fn build_index_writes(records: &[IndexableRecord], soft_delete: bool) -> IndexWriteBatch {
    let mut batch = IndexWriteBatch::default();

    for record in records {
        let mut fields = record.fields.clone();
        fields.remove("_id");

        if fields.is_empty() {
            batch.removals.push(record.key.clone());
            continue;
        }

        if soft_delete {
            fields.insert(SOFT_DELETE_FIELD, record.trashed);
        }

        batch.upserts.push(doc! {
            "q": { "_id": record.key.to_bson() },
            "u": { "$set": fields },
            "upsert": true,
        });
    }

    batch
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionRequestPayload {
    pub operation: String,
    pub searchable_as: String,
    #[serde(default)]
    pub records: Vec<IndexableRecord>,
    #[serde(default)]
    pub keys: Vec<SearchKey>,
    pub mongo: MongoConfigPayload,
    #[serde(default)]
    pub scout: ScoutConfigPayload,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestionResultPayload {
    pub operation: String,
    pub upserted: u64,
    pub removed: u64,
}

/// 적재 파이프라인을 실행한다.
pub async fn execute_ingestion(payload: IngestionRequestPayload) -> CoreResult<IngestionResultPayload> {
    if payload.operation.trim().is_empty() {
        return Err(CoreError::InvalidInput(
            "operation은 비어 있을 수 없습니다".to_string(),
        ));
    }

    let repository = MongoRepository::new(&payload.mongo).await?;
    let engine = SearchEngine::new(repository, payload.scout.clone())?;
    let searchable_as = payload.searchable_as.as_str();

    match payload.operation.as_str() {
        "update" => {
            let summary = engine.update(searchable_as, &payload.records).await?;
            Ok(IngestionResultPayload {
                operation: payload.operation,
                upserted: summary.upserted,
                removed: summary.removed,
            })
        }
        "delete" => {
            let removed = engine.delete(searchable_as, &payload.keys).await?;
            Ok(IngestionResultPayload {
                operation: payload.operation,
                upserted: 0,
                removed,
            })
        }
        "flush" => {
            let removed = engine.flush(searchable_as).await?;
            Ok(IngestionResultPayload {
                operation: payload.operation,
                upserted: 0,
                removed,
            })
        }
        "create_index" => {
            engine.create_index(searchable_as).await?;
            Ok(IngestionResultPayload {
                operation: payload.operation,
                ..IngestionResultPayload::default()
            })
        }
        "delete_index" => {
            engine.delete_index(searchable_as).await?;
            Ok(IngestionResultPayload {
                operation: payload.operation,
                ..IngestionResultPayload::default()
            })
        }
        _ => Err(CoreError::InvalidInput(format!(
            "지원하지 않는 operation입니다: {}",
            payload.operation
        ))),
    }
}
