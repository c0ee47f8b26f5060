// 목적:
// - 핵심 런타임 계층 모듈을 선언한다.
//
// 설명:
// - 요청 모델, 파이프라인 컴파일러, 결과 매퍼, 검색/적재 파이프라인과 공통 오류 모델을 분리한다.
//
// 디자인 패턴:
// - 명시적 오류 모델(Explicit Error Model).
//
// 참조:
// - src_rs/core/errors.rs
// - src_rs/core/pipeline_compiler.rs
// - src_rs/core/result_mapper.rs

pub mod config;
pub mod errors;
pub mod ingestion_pipeline;
pub mod logging;
pub mod pipeline_compiler;
pub mod result_mapper;
pub mod search_pipeline;
pub mod search_request;
