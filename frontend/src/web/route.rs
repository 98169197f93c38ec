//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、路径解析以及认证守卫规则。

use std::fmt::Display;

use inventory_shared::ProductId;

/// 库存管理页的标签页，对应 `?action=` 查询参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockTab {
    #[default]
    View,
    Add,
    Remove,
    History,
}

impl StockTab {
    pub const ALL: [StockTab; 4] = [
        StockTab::View,
        StockTab::Add,
        StockTab::Remove,
        StockTab::History,
    ];

    /// 未知的 action 回落到默认标签页
    pub fn from_action(action: &str) -> Self {
        match action {
            "add" => Self::Add,
            "remove" => Self::Remove,
            "history" => Self::History,
            _ => Self::View,
        }
    }

    pub fn as_action(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Add => "add",
            Self::Remove => "remove",
            Self::History => "history",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::View => "Current Stock",
            Self::Add => "Add Stock",
            Self::Remove => "Remove Stock",
            Self::History => "Stock History",
        }
    }
}

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面
    #[default]
    Login,
    /// 仪表盘 (需要认证)
    Dashboard,
    /// 商品列表
    Products,
    /// 新建商品
    ProductNew,
    /// 编辑商品
    ProductEdit(ProductId),
    /// 商品的可售变体列表
    ProductVariants(ProductId),
    /// 库存管理
    Stock(StockTab),
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL（path + 可选的 query）解析为路由枚举
    pub fn from_path(url: &str) -> Self {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Dashboard,
            ["login"] => Self::Login,
            ["products"] => Self::Products,
            ["products", "new"] => Self::ProductNew,
            ["products", id, "edit"] => parse_id(id).map_or(Self::NotFound, Self::ProductEdit),
            ["products", id, "variants"] => {
                parse_id(id).map_or(Self::NotFound, Self::ProductVariants)
            }
            ["stock"] => Self::Stock(stock_tab_from_query(query)),
            ["reports"] => Self::Stock(StockTab::History),
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Dashboard => "/".to_string(),
            Self::Products => "/products".to_string(),
            Self::ProductNew => "/products/new".to_string(),
            Self::ProductEdit(id) => format!("/products/{}/edit", id),
            Self::ProductVariants(id) => format!("/products/{}/variants", id),
            Self::Stock(tab) => format!("/stock?action={}", tab.as_action()),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::NotFound)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }

    /// 根据认证状态决定最终落地的路由
    ///
    /// 页面只会在守卫通过后挂载，因此未认证时受保护页面不会发出任何请求。
    pub fn guard(self, is_authenticated: bool) -> Self {
        if self.requires_auth() && !is_authenticated {
            Self::auth_failure_redirect()
        } else if self.should_redirect_when_authenticated() && is_authenticated {
            Self::auth_success_redirect()
        } else {
            self
        }
    }

    /// 导航栏高亮所属的分区
    pub fn section(&self) -> Option<NavSection> {
        match self {
            Self::Dashboard => Some(NavSection::Dashboard),
            Self::Products | Self::ProductNew | Self::ProductEdit(_) | Self::ProductVariants(_) => {
                Some(NavSection::Products)
            }
            Self::Stock(_) => Some(NavSection::Stock),
            Self::Login | Self::NotFound => None,
        }
    }
}

/// 导航栏分区
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSection {
    Dashboard,
    Products,
    Stock,
}

fn parse_id(segment: &str) -> Option<ProductId> {
    ProductId::parse_str(segment).ok()
}

fn stock_tab_from_query(query: &str) -> StockTab {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "action")
        .map(|(_, value)| StockTab::from_action(&value))
        .unwrap_or_default()
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "5f0c2a3e-8f4e-4a55-9b8e-2f1d5b7c9a10";

    fn id() -> ProductId {
        ProductId::parse_str(ID).unwrap()
    }

    #[test]
    fn parses_known_paths() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/products/"), AppRoute::Products);
        assert_eq!(AppRoute::from_path("/products/new"), AppRoute::ProductNew);
        assert_eq!(
            AppRoute::from_path(&format!("/products/{}/variants", ID)),
            AppRoute::ProductVariants(id())
        );
        assert_eq!(
            AppRoute::from_path(&format!("/products/{}/edit", ID)),
            AppRoute::ProductEdit(id())
        );
        assert_eq!(AppRoute::from_path("/reports"), AppRoute::Stock(StockTab::History));
    }

    #[test]
    fn stock_action_comes_from_query() {
        assert_eq!(
            AppRoute::from_path("/stock?action=remove"),
            AppRoute::Stock(StockTab::Remove)
        );
        assert_eq!(AppRoute::from_path("/stock"), AppRoute::Stock(StockTab::View));
        assert_eq!(
            AppRoute::from_path("/stock?action=bogus"),
            AppRoute::Stock(StockTab::View)
        );
    }

    #[test]
    fn malformed_ids_are_not_found() {
        assert_eq!(AppRoute::from_path("/products/42/variants"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/nowhere"), AppRoute::NotFound);
    }

    #[test]
    fn paths_round_trip() {
        let routes = [
            AppRoute::Login,
            AppRoute::Dashboard,
            AppRoute::Products,
            AppRoute::ProductNew,
            AppRoute::ProductEdit(id()),
            AppRoute::ProductVariants(id()),
            AppRoute::Stock(StockTab::History),
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn protected_routes_fall_back_to_login_without_credential() {
        let protected = [
            AppRoute::Dashboard,
            AppRoute::Products,
            AppRoute::ProductNew,
            AppRoute::ProductEdit(id()),
            AppRoute::ProductVariants(id()),
            AppRoute::Stock(StockTab::Add),
        ];
        for route in protected {
            assert_eq!(route.guard(false), AppRoute::Login);
        }
    }

    #[test]
    fn authenticated_users_skip_login() {
        assert_eq!(AppRoute::Login.guard(true), AppRoute::Dashboard);
        assert_eq!(AppRoute::Login.guard(false), AppRoute::Login);
        assert_eq!(AppRoute::Products.guard(true), AppRoute::Products);
        assert_eq!(AppRoute::NotFound.guard(false), AppRoute::NotFound);
    }
}
