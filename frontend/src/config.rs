//! 运行时配置模块
//!
//! 默认值可以在编译期通过环境变量覆盖（WASM 运行时读不到进程环境）：
//! - `INVENTORY_API_URL`: 后端 API 根地址

use std::time::Duration;

use inventory_shared::DEFAULT_PAGE_SIZE;
use leptos::prelude::*;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
/// 凭据在 LocalStorage 中的键名
pub const TOKEN_STORAGE_KEY: &str = "token";

const DEFAULT_NOTICE_TIMEOUT: Duration = Duration::from_secs(3);
const DEFAULT_SAVE_REDIRECT_DELAY: Duration = Duration::from_secs(1);

/// 应用配置
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// 后端 API 根地址（不含末尾斜杠）
    pub api_base_url: String,
    /// 提示框自动关闭时间
    pub notice_timeout: Duration,
    /// 保存商品成功后跳转前的等待时间
    pub save_redirect_delay: Duration,
    /// 商品列表每页条数
    pub page_size: u32,
}

impl AppConfig {
    pub fn load() -> Self {
        Self::with_base_url(option_env!("INVENTORY_API_URL"))
    }

    fn with_base_url(base_url: Option<&str>) -> Self {
        let api_base_url = base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Self {
            api_base_url,
            notice_timeout: DEFAULT_NOTICE_TIMEOUT,
            save_redirect_delay: DEFAULT_SAVE_REDIRECT_DELAY,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::load()
    }
}

/// 从 Context 获取配置，未提供时使用默认配置
pub fn use_config() -> AppConfig {
    use_context::<AppConfig>().unwrap_or_else(AppConfig::load)
}
