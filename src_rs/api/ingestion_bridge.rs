// 목적:
// - 호스트 언어 어댑터에서 호출 가능한 적재 브릿지를 제공한다.
//
// 설명:
// - update/delete/flush/create_index/delete_index 작업 페이로드(JSON)를 실행한다.
//
// 참조:
// - src_rs/core/ingestion_pipeline.rs

use crate::api::search_bridge::create_runtime;
use crate::core::errors::{CoreError, CoreResult};
use crate::core::ingestion_pipeline::{execute_ingestion, IngestionRequestPayload};
use crate::core::logging::{init_tracing, DEFAULT_LOG_FILTER};

#[derive(Debug, Default)]
pub struct IngestionBridge;

impl IngestionBridge {
    pub fn new() -> Self {
        init_tracing(DEFAULT_LOG_FILTER);
        Self
    }

    /// 적재 작업 페이로드(JSON)를 실행하고 결과 JSON을 반환한다.
    pub fn execute(&self, payload_json: &str) -> CoreResult<String> {
        let payload: IngestionRequestPayload = serde_json::from_str(payload_json).map_err(|error| {
            CoreError::Serialization(format!("적재 페이로드 JSON 파싱에 실패했습니다: {}", error))
        })?;

        let runtime = create_runtime()?;
        let result = runtime.block_on(execute_ingestion(payload))?;

        serde_json::to_string(&result)
            .map_err(|error| CoreError::Serialization(format!("적재 결과 직렬화 실패: {}", error)))
    }
}
