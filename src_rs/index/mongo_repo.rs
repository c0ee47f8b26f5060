// 목적:
// - MongoDB 기반 검색 저장소 접근을 담당한다.
//
// 설명:
// - 집계 실행, update 명령 기반 일괄 upsert, 키 기반 삭제, Atlas Search 인덱스 관리를 제공한다.
// - 드라이버 오류는 이 경계에서 CoreError로 변환하고, 검색 미지원 코드는 별도 variant로 분리한다.
//
// 디자인 패턴:
// - 저장소 패턴(Repository Pattern).
//
// 참조:
// - src_rs/index/backend.rs
// - src_rs/index/search_index.rs

use bson::{doc, Bson, Document};
use futures_util::TryStreamExt;
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use std::time::Duration;

use crate::core::config::MongoConfigPayload;
use crate::core::errors::{CoreError, CoreResult};
use crate::core::result_mapper::SearchKey;
use crate::index::backend::SearchBackend;
use crate::index::naming::validate_collection_name;
use crate::index::search_index::{
    is_search_not_supported_code, search_index_model, SearchIndexInfo, SearchIndexKind,
};

const NAMESPACE_EXISTS_CODE: i32 = 48;

pub struct MongoRepository {
    database: Database,
}

impl MongoRepository {
    pub async fn new(config: &MongoConfigPayload) -> CoreResult<Self> {
        config.validate()?;

        let mut options = ClientOptions::parse(config.uri.as_str())
            .await
            .map_err(|error| CoreError::InvalidConfig(format!("mongo.uri 파싱 실패: {}", error)))?;
        options.app_name = config.app_name.clone();
        options.min_pool_size = Some(config.pool_min);
        options.max_pool_size = Some(config.pool_max.max(config.pool_min));
        options.connect_timeout = Some(Duration::from_millis(config.connect_timeout_ms.max(1)));
        options.server_selection_timeout =
            Some(Duration::from_millis(config.server_selection_timeout_ms.max(1)));

        let client = Client::with_options(options)
            .map_err(|error| CoreError::Db(format!("MongoDB 클라이언트 생성 실패: {}", error)))?;

        Ok(Self::from_database(client.database(&config.database)))
    }

    pub fn from_database(database: Database) -> Self {
        Self { database }
    }

    fn collection(&self, name: &str) -> CoreResult<Collection<Document>> {
        validate_collection_name(name, "collection")?;
        Ok(self.database.collection::<Document>(name))
    }
}

impl SearchBackend for MongoRepository {
    async fn aggregate(&self, collection: &str, pipeline: Vec<Document>) -> CoreResult<Vec<Document>> {
        let cursor = self
            .collection(collection)?
            .aggregate(pipeline)
            .await
            .map_err(|error| map_mongo_error("aggregate 실행 실패", error))?;

        cursor
            .try_collect::<Vec<_>>()
            .await
            .map_err(|error| map_mongo_error("aggregate 커서 읽기 실패", error))
    }

    async fn upsert_many(&self, collection: &str, statements: Vec<Document>) -> CoreResult<u64> {
        if statements.is_empty() {
            return Ok(0);
        }
        validate_collection_name(collection, "collection")?;

        let command = doc! {
            "update": collection,
            "updates": statements,
            "ordered": true,
        };
        let response = self
            .database
            .run_command(command)
            .await
            .map_err(|error| map_mongo_error("update 명령 실패", error))?;

        if let Ok(write_errors) = response.get_array("writeErrors") {
            if !write_errors.is_empty() {
                return Err(CoreError::Db(format!(
                    "update 명령 일부 실패: collection={}, writeErrors={:?}",
                    collection, write_errors
                )));
            }
        }

        let affected = match response.get("n") {
            Some(Bson::Int32(number)) => u64::try_from(*number).unwrap_or(0),
            Some(Bson::Int64(number)) => u64::try_from(*number).unwrap_or(0),
            _ => 0,
        };
        Ok(affected)
    }

    async fn delete_by_keys(&self, collection: &str, keys: &[SearchKey]) -> CoreResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let key_values = keys.iter().map(SearchKey::to_bson).collect::<Vec<_>>();
        let result = self
            .collection(collection)?
            .delete_many(doc! { "_id": { "$in": key_values } })
            .await
            .map_err(|error| map_mongo_error("검색 문서 삭제 실패", error))?;

        Ok(result.deleted_count)
    }

    async fn delete_all(&self, collection: &str) -> CoreResult<u64> {
        let result = self
            .collection(collection)?
            .delete_many(doc! {})
            .await
            .map_err(|error| map_mongo_error("검색 문서 전체 삭제 실패", error))?;

        Ok(result.deleted_count)
    }

    async fn create_collection(&self, collection: &str) -> CoreResult<()> {
        validate_collection_name(collection, "collection")?;

        match self.database.create_collection(collection).await {
            Ok(()) => Ok(()),
            Err(error) if command_code(&error) == Some(NAMESPACE_EXISTS_CODE) => Ok(()),
            Err(error) => Err(map_mongo_error("컬렉션 생성 실패", error)),
        }
    }

    async fn create_search_index(
        &self,
        collection: &str,
        name: &str,
        kind: SearchIndexKind,
        definition: Document,
    ) -> CoreResult<()> {
        self.collection(collection)?
            .create_search_index(search_index_model(name, kind, definition))
            .await
            .map_err(|error| map_mongo_error("검색 인덱스 생성 실패", error))?;

        Ok(())
    }

    async fn list_search_indexes(&self, collection: &str) -> CoreResult<Vec<SearchIndexInfo>> {
        let documents = self
            .collection(collection)?
            .list_search_indexes()
            .await
            .map_err(|error| map_mongo_error("검색 인덱스 조회 실패", error))?
            .try_collect::<Vec<_>>()
            .await
            .map_err(|error| map_mongo_error("검색 인덱스 커서 읽기 실패", error))?;

        documents.iter().map(SearchIndexInfo::from_document).collect()
    }

    async fn drop_collection(&self, collection: &str) -> CoreResult<()> {
        self.collection(collection)?
            .drop()
            .await
            .map_err(|error| map_mongo_error("컬렉션 삭제 실패", error))
    }
}

fn command_code(error: &MongoError) -> Option<i32> {
    match error.kind.as_ref() {
        ErrorKind::Command(command_error) => Some(command_error.code),
        _ => None,
    }
}

fn map_mongo_error(context: &str, error: MongoError) -> CoreError {
    if let ErrorKind::Command(command_error) = error.kind.as_ref() {
        if is_search_not_supported_code(command_error.code) {
            return CoreError::SearchNotSupported {
                code: command_error.code,
                message: command_error.message.clone(),
            };
        }
    }

    CoreError::Db(format!("{}: {}", context, error))
}
