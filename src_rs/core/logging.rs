// 목적:
// - tracing 구독자를 초기화한다.
//
// 설명:
// - RUST_LOG가 있으면 우선 사용하고, 없으면 기본 지시자로 필터를 만든다.
// - 이미 전역 구독자가 설치된 경우에는 아무것도 하지 않는다.
//
// 참조:
// - src_rs/api/search_bridge.rs

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "warn,atlas_scout=info";

/// 구독자를 설치했으면 true, 이미 설치되어 있었으면 false를 반환한다.
pub fn init_tracing(default_filter: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
