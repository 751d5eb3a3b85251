//! 日誌初始化

use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日誌輸出，級別由 `RUST_LOG` 控制（預設 info）
///
/// 重複呼叫不會出錯，之後的呼叫不產生作用。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
