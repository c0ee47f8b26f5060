// 목적:
// - Rust 코어 계층의 표준 오류 타입을 정의한다.
//
// 설명:
// - 입력/설정/DB/하이드레이션/직렬화 오류를 명시적으로 구분해 호출자에게 전달한다.
// - Atlas Search 미지원 배포는 별도 variant로 분리해 호출자가 기능을 건너뛸 수 있게 한다.
//
// 디자인 패턴:
// - 도메인 오류 열거형(Domain Error Enum).
//
// 참조:
// - src_rs/core/pipeline_compiler.rs
// - src_rs/core/result_mapper.rs
// - src_rs/index/mongo_repo.rs

use thiserror::Error;

/// 코어 계층에서 공통으로 사용하는 오류 열거형이다.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("입력값이 유효하지 않습니다: {0}")]
    InvalidInput(String),
    #[error("필터가 유효하지 않습니다: path={path}, {reason}")]
    InvalidFilter { path: String, reason: String },
    #[error("설정값이 유효하지 않습니다: {0}")]
    InvalidConfig(String),
    #[error("검색 결과 문서가 유효하지 않습니다: position={position}, {reason}")]
    InvalidResult { position: usize, reason: String },
    #[error("이 배포에서는 Atlas Search를 지원하지 않습니다: code={code}, {message}")]
    SearchNotSupported { code: i32, message: String },
    #[error("검색 인덱스가 준비되지 않았습니다: index={index}, attempts={attempts}")]
    IndexNotReady { index: String, attempts: u32 },
    #[error("데이터베이스 작업에 실패했습니다: {0}")]
    Db(String),
    #[error("레코드 하이드레이션에 실패했습니다: {0}")]
    Hydration(String),
    #[error("직렬화/역직렬화에 실패했습니다: {0}")]
    Serialization(String),
    #[error("런타임 처리 중 오류가 발생했습니다: {0}")]
    Runtime(String),
}

impl CoreError {
    /// 검색 기능 자체가 없는 배포에서 발생한 오류인지 판정한다.
    pub fn is_search_not_supported(&self) -> bool {
        matches!(self, CoreError::SearchNotSupported { .. })
    }

    pub(crate) fn invalid_filter(path: &str, reason: impl Into<String>) -> Self {
        CoreError::InvalidFilter {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
