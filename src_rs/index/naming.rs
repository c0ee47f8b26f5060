// 목적:
// - 검색 인덱스 컬렉션 이름 관련 공통 유틸리티를 제공한다.
//
// 설명:
// - 컬렉션 이름 검증, prefix 결합, 모델 컬렉션과의 네임스페이스 충돌 검사를 담당한다.
//
// 디자인 패턴:
// - 가드 함수(Guard Function).
//
// 참조:
// - src_rs/api/search_engine.rs

use crate::core::errors::{CoreError, CoreResult};

/// 컬렉션 이름으로 허용되지 않는 값을 거부한다.
pub fn validate_collection_name(value: &str, field_name: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidConfig(format!(
            "{}는 비어 있을 수 없습니다",
            field_name
        )));
    }

    if value.contains('$') || value.contains('\0') {
        return Err(CoreError::InvalidConfig(format!(
            "{}에는 '$'나 NUL 문자를 사용할 수 없습니다: {}",
            field_name, value
        )));
    }

    if value.starts_with("system.") {
        return Err(CoreError::InvalidConfig(format!(
            "{}는 system. 네임스페이스를 사용할 수 없습니다: {}",
            field_name, value
        )));
    }

    Ok(())
}

/// prefix와 모델의 검색 대상 이름을 합쳐 인덱스 컬렉션 이름을 만든다.
pub fn index_collection_name(prefix: &str, searchable_as: &str) -> CoreResult<String> {
    validate_collection_name(searchable_as, "searchable_as")?;

    let name = format!("{}{}", prefix, searchable_as);
    validate_collection_name(&name, "index collection")?;
    Ok(name)
}

/// 인덱스 컬렉션이 모델 자신의 컬렉션과 겹치지 않는지 확인한다.
pub fn ensure_distinct_namespace(
    database: &str,
    index_collection: &str,
    model_collection: &str,
) -> CoreResult<()> {
    if index_collection == model_collection {
        return Err(CoreError::InvalidConfig(format!(
            "검색 인덱스 컬렉션 \"{}.{}\"은 모델 컬렉션과 달라야 합니다. prefix를 설정하거나 별도 데이터베이스를 사용하세요",
            database, index_collection
        )));
    }

    Ok(())
}
