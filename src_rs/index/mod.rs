// 목적:
// - MongoDB 검색 인덱스 계층 모듈을 선언한다.
//
// 설명:
// - 저장소 계약, MongoDB 구현, 이름 규칙, 검색 인덱스 메타데이터를 분리해 유지보수성을 확보한다.
//
// 디자인 패턴:
// - 저장소 패턴(Repository Pattern).
//
// 참조:
// - src_rs/index/backend.rs
// - src_rs/index/mongo_repo.rs

pub mod backend;
pub mod mongo_repo;
pub mod naming;
pub mod search_index;
