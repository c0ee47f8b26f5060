// 목적:
// - MongoDB 연결 설정과 Scout 엔진 설정 페이로드를 정의한다.
//
// 설명:
// - 옵션 배열 대신 이름 있는 필드로 설정을 받고, 사용 전에 validate로 빠르게 실패한다.
//
// 디자인 패턴:
// - 설정 페이로드(Config Payload) + 실패 빠르게(Fail Fast).
//
// 참조:
// - src_rs/index/mongo_repo.rs
// - src_rs/api/search_engine.rs

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::errors::{CoreError, CoreResult};
use crate::core::search_request::DEFAULT_INDEX_NAME;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfigPayload {
    pub uri: String,
    pub database: String,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub pool_min: u32,
    #[serde(default = "default_pool_max")]
    pub pool_max: u32,
    #[serde(default = "default_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub server_selection_timeout_ms: u64,
}

fn default_pool_max() -> u32 {
    10
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl MongoConfigPayload {
    pub fn validate(&self) -> CoreResult<()> {
        if self.uri.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "mongo.uri는 비어 있을 수 없습니다".to_string(),
            ));
        }

        if self.database.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "mongo.database는 비어 있을 수 없습니다".to_string(),
            ));
        }

        if self.pool_max == 0 {
            return Err(CoreError::InvalidConfig(
                "mongo.pool_max는 1 이상이어야 합니다".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfigPayload {
    pub prefix: String,
    pub soft_delete: bool,
    pub index_name: String,
    pub index_poll_interval_ms: u64,
    pub index_poll_attempts: u32,
}

impl Default for ScoutConfigPayload {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            soft_delete: false,
            index_name: DEFAULT_INDEX_NAME.to_string(),
            index_poll_interval_ms: 1_000,
            index_poll_attempts: 10,
        }
    }
}

impl ScoutConfigPayload {
    pub fn validate(&self) -> CoreResult<()> {
        if self.index_name.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "scout.index_name은 비어 있을 수 없습니다".to_string(),
            ));
        }

        if self.index_poll_attempts == 0 {
            return Err(CoreError::InvalidConfig(
                "scout.index_poll_attempts는 1 이상이어야 합니다".to_string(),
            ));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.index_poll_interval_ms)
    }
}
