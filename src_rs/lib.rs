// 목적:
// - Atlas Scout 검색 코어 크레이트의 진입점을 제공한다.
//
// 설명:
// - 검색 요청 -> 집계 파이프라인 컴파일과 결과 -> 정렬된 레코드 매핑이 핵심이다.
// - MongoDB 저장소와 JSON 브릿지는 이 핵심을 감싸는 바깥 계층이다.
//
// 디자인 패턴:
// - 계층형 모듈 구조(api/core/index).
//
// 참조:
// - src_rs/core/pipeline_compiler.rs
// - src_rs/core/result_mapper.rs
// - src_rs/api/search_engine.rs

pub mod api;
pub mod core;
pub mod index;

pub use crate::api::ingestion_bridge::IngestionBridge;
pub use crate::api::search_bridge::SearchBridge;
pub use crate::api::search_engine::{IndexWriteSummary, SearchEngine};
pub use crate::core::errors::{CoreError, CoreResult};
pub use crate::core::pipeline_compiler::{compile, CompiledPipeline};
pub use crate::core::result_mapper::{lazy_map, map, LazyMapped, ResultRecord, SearchKey};
pub use crate::core::search_request::{SearchRequest, SoftDeleteMode, SortDirection};
