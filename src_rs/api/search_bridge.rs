// 목적:
// - 호스트 언어 어댑터에서 호출 가능한 검색 브릿지를 제공한다.
//
// 설명:
// - JSON 페이로드를 입력받아 Rust 검색 파이프라인을 실행하고,
//   결과 순서가 보존된 키 목록과 총 건수를 JSON 문자열로 반환한다.
//
// 디자인 패턴:
// - 파사드(Facade) + 실패 빠르게(Fail Fast).
//
// 참조:
// - src_rs/core/search_pipeline.rs

use tokio::runtime::{Builder, Runtime};

use crate::core::errors::{CoreError, CoreResult};
use crate::core::logging::{init_tracing, DEFAULT_LOG_FILTER};
use crate::core::pipeline_compiler::compile;
use crate::core::search_pipeline::{execute_search, SearchRequestPayload};
use crate::core::search_request::SearchRequest;

/// 검색 브릿지다.
#[derive(Debug, Default)]
pub struct SearchBridge;

impl SearchBridge {
    pub fn new() -> Self {
        init_tracing(DEFAULT_LOG_FILTER);
        Self
    }

    /// 검색 작업 페이로드(JSON)를 실행하고 결과 JSON을 반환한다.
    pub fn execute(&self, payload_json: &str) -> CoreResult<String> {
        let payload: SearchRequestPayload = serde_json::from_str(payload_json).map_err(|error| {
            CoreError::Serialization(format!("검색 페이로드 JSON 파싱에 실패했습니다: {}", error))
        })?;

        let runtime = create_runtime()?;
        let result = runtime.block_on(execute_search(payload))?;

        serde_json::to_string(&result)
            .map_err(|error| CoreError::Serialization(format!("검색 결과 직렬화 실패: {}", error)))
    }

    /// 검색 요청(JSON)을 DB 호출 없이 파이프라인 JSON 배열로 컴파일한다.
    pub fn compile(&self, request_json: &str) -> CoreResult<String> {
        let request: SearchRequest = serde_json::from_str(request_json).map_err(|error| {
            CoreError::Serialization(format!("검색 요청 JSON 파싱에 실패했습니다: {}", error))
        })?;

        let stages = compile(&request)?
            .into_stages()
            .into_iter()
            .map(|stage| bson::Bson::Document(stage).into_relaxed_extjson())
            .collect::<Vec<_>>();

        serde_json::to_string(&stages)
            .map_err(|error| CoreError::Serialization(format!("파이프라인 직렬화 실패: {}", error)))
    }
}

pub(crate) fn create_runtime() -> CoreResult<Runtime> {
    Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|error| CoreError::Runtime(format!("Tokio 런타임 생성 실패: {}", error)))
}
