//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 路由服务通过注入的认证信号来检查认证状态。
//!
//! 凭据即服务端签发的 token，保存在 LocalStorage 中，刷新页面后仍然有效。

use leptos::logging::log;
use leptos::prelude::*;

use crate::api::HttpInventoryApi;
use crate::config::{AppConfig, TOKEN_STORAGE_KEY, use_config};
use crate::web::KeyValueStore;

/// 认证状态
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    /// 服务端签发的 token（仅在认证成功后存在）
    pub token: Option<String>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    /// 创建新的认证上下文
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_authenticated())
    }

    /// 构建携带当前 token 的 API 客户端
    pub fn api(&self, config: &AppConfig) -> HttpInventoryApi {
        HttpInventoryApi::new(
            config.api_base_url.clone(),
            self.state.get_untracked().token,
        )
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 当前页面使用的 API 客户端
///
/// 页面在认证状态变化后会重新挂载，因此在组件初始化时获取一次即可。
pub fn use_api() -> HttpInventoryApi {
    use_auth().api(&use_config())
}

/// 读取已保存的 token，空字符串视为不存在
pub fn load_token(store: &impl KeyValueStore) -> Option<String> {
    store
        .get(TOKEN_STORAGE_KEY)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// 初始化认证状态
///
/// 必须在路由服务创建之前调用，以便初始路由的守卫能看到已保存的凭据。
pub fn init_auth(ctx: &AuthContext, store: &impl KeyValueStore) {
    let token = load_token(store);
    if token.is_some() {
        log!("[Auth] Restored stored credential.");
    }
    ctx.set_state.set(AuthState { token });
}

/// 保存 token 并更新状态
///
/// 导航将由路由服务的认证状态监听自动处理。
pub fn sign_in(ctx: &AuthContext, store: &impl KeyValueStore, token: String) {
    if !store.set(TOKEN_STORAGE_KEY, &token) {
        log!("[Auth] Failed to persist credential, session will not survive a reload.");
    }
    ctx.set_state.set(AuthState { token: Some(token) });
}

/// 注销并清除状态
///
/// 注意：不需要手动导航，路由服务会监听认证状态变化并自动重定向
pub fn logout(ctx: &AuthContext, store: &impl KeyValueStore) {
    store.delete(TOKEN_STORAGE_KEY);
    ctx.set_state.set(AuthState::default());
    log!("[Auth] Signed out.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::MemoryStorage;

    #[test]
    fn missing_or_blank_token_is_not_a_credential() {
        let store = MemoryStorage::default();
        assert_eq!(load_token(&store), None);
        store.set(TOKEN_STORAGE_KEY, "   ");
        assert_eq!(load_token(&store), None);
    }

    #[test]
    fn stored_token_is_restored() {
        let store = MemoryStorage::default();
        store.set(TOKEN_STORAGE_KEY, "abc123");
        assert_eq!(load_token(&store).as_deref(), Some("abc123"));
    }

    #[test]
    fn sign_in_then_logout_round_trips_through_storage() {
        let store = MemoryStorage::default();
        let ctx = AuthContext::new();

        sign_in(&ctx, &store, "abc123".to_string());
        assert!(ctx.state.get_untracked().is_authenticated());
        assert_eq!(store.get(TOKEN_STORAGE_KEY).as_deref(), Some("abc123"));

        logout(&ctx, &store);
        assert!(!ctx.state.get_untracked().is_authenticated());
        assert_eq!(store.get(TOKEN_STORAGE_KEY), None);
    }
}
