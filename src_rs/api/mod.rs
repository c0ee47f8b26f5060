// 목적:
// - 외부 호출 경계 모듈을 선언한다.
//
// 설명:
// - Rust 호출자를 위한 엔진 파사드와, 호스트 언어 어댑터를 위한 JSON 브릿지를 분리한다.
//
// 디자인 패턴:
// - 모듈 분리(Module Separation).
//
// 참조:
// - src_rs/api/search_engine.rs
// - src_rs/api/search_bridge.rs
// - src_rs/api/ingestion_bridge.rs

pub mod ingestion_bridge;
pub mod search_bridge;
pub mod search_engine;
