//! 库存管理控制台前端
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态管理
//! - `api`: 远程库存服务客户端
//! - `workflow`: 页面操作流程（校验、调用、提示）
//! - `components`: UI 组件层

mod api;
mod auth;
mod config;
mod error;
mod notice;
mod workflow;
mod components {
    mod confirm;
    pub mod dashboard;
    mod icons;
    mod layout;
    pub mod login;
    mod notice;
    pub mod product_form;
    pub mod product_list;
    pub mod stock;
    mod stock_badge;
    pub mod variant_list;
}

use crate::auth::{AuthContext, init_auth};
use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginPage;
use crate::components::product_form::ProductFormPage;
use crate::components::product_list::ProductListPage;
use crate::components::stock::StockPage;
use crate::components::variant_list::VariantListPage;
use crate::config::AppConfig;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装（fetch、History、LocalStorage、setTimeout），
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;
    mod timer;

    pub use http::{HttpClient, HttpRequestBuilder, HttpResponse};
    pub use storage::{KeyValueStore, LocalStorage};
    pub use timer::Timeout;

    #[cfg(test)]
    pub use storage::memory::MemoryStorage;
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Products => view! { <ProductListPage /> }.into_any(),
        AppRoute::ProductNew => view! { <ProductFormPage product_id=None /> }.into_any(),
        AppRoute::ProductEdit(id) => view! { <ProductFormPage product_id=Some(id) /> }.into_any(),
        AppRoute::ProductVariants(id) => view! { <VariantListPage product_id=id /> }.into_any(),
        AppRoute::Stock(tab) => view! { <StockPage tab=tab /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center space-y-4">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl">"Page not found"</p>
                    <Link to=AppRoute::Dashboard class="btn btn-primary btn-sm">
                        "Back to Dashboard"
                    </Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 配置
    provide_context(AppConfig::load());

    // 2. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 3. 初始化认证状态（从 LocalStorage 加载 token），必须早于路由服务创建
    init_auth(&auth_ctx, &web::LocalStorage);

    // 4. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        // 5. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
