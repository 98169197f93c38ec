use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod date;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
/// DRF TokenAuthentication 使用的认证前缀
pub const TOKEN_SCHEME: &str = "Token";
/// 低于该数量的库存视为"低库存"（与服务端仪表盘阈值一致）
pub const LOW_STOCK_THRESHOLD: i64 = 10;
/// 服务端分页的默认每页条数
pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub type ProductId = Uuid;
pub type VariantId = Uuid;

// =========================================================
// 商品 (Products)
// =========================================================

/// 商品记录
///
/// 字段名沿用服务端的 PascalCase 命名，在此统一映射为 snake_case。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "ProductID", default)]
    pub number: Option<i64>,
    #[serde(rename = "ProductCode")]
    pub code: String,
    #[serde(rename = "ProductName")]
    pub name: String,
    /// 图片 URL（服务端存储的文件地址）
    #[serde(rename = "ProductImage", default)]
    pub image: Option<String>,
    #[serde(rename = "HSNCode", default)]
    pub tax_code: Option<String>,
    #[serde(rename = "IsFavourite", default)]
    pub is_favourite: bool,
    #[serde(rename = "Active", default = "default_active")]
    pub active: bool,
    #[serde(rename = "TotalStock", default)]
    pub total_stock: Option<Decimal>,
    #[serde(rename = "CreatedDate", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "UpdatedDate", default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// 变体定义（名称 + 选项值），即表单中编辑的部分
    #[serde(default)]
    pub variants: Vec<VariantDefinition>,
    /// 已生成的可售变体 (SKU)
    #[serde(default)]
    pub product_variants: Vec<ProductVariant>,
}

fn default_active() -> bool {
    true
}

impl Product {
    /// 图片 URL 中的文件名部分，用于编辑时展示"当前图片"
    pub fn image_file_name(&self) -> Option<&str> {
        let url = self.image.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        let path = url.split(['?', '#']).next().unwrap_or(url);
        path.rsplit('/').find(|segment| !segment.is_empty())
    }
}

/// 变体定义：一个维度（如 "Color"）及其选项值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub options: Vec<OptionValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub value: String,
}

impl OptionValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            id: None,
            value: value.into(),
        }
    }
}

/// 生成 SKU：`{商品编码}-{变体名}`
pub fn derive_sku(product_code: &str, variant_name: &str) -> String {
    format!("{}-{}", product_code.trim(), variant_name.trim())
}

// =========================================================
// 可售变体 (Product Variants)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product: ProductId,
    pub sku: String,
    #[serde(default)]
    pub options: Vec<OptionLabel>,
    /// 当前库存，由服务端根据出入库记录计算，客户端只读
    #[serde(default)]
    pub current_stock: Decimal,
    #[serde(default)]
    pub product_name: String,
}

impl ProductVariant {
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::classify(self.current_stock)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionLabel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub variant_name: String,
    pub option_value: String,
}

impl std::fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.variant_name, self.option_value)
    }
}

/// 新建可售变体的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProductVariant {
    pub product: ProductId,
    pub name: String,
    pub sku: String,
    pub options: Vec<NewVariantOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVariantOption {
    pub name: String,
    pub value: String,
}

/// 更新可售变体（目前只允许修改 SKU）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariantUpdate {
    pub product: ProductId,
    pub sku: String,
}

// =========================================================
// 库存 (Stock)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::In => "IN",
            TransactionType::Out => "OUT",
        }
    }
}

/// 库存出入库请求，对应 `add_stock` / `remove_stock`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockTransactionRequest {
    pub product_variant: VariantId,
    pub quantity: Decimal,
    pub transaction_type: TransactionType,
    pub notes: String,
}

/// 库存流水报表中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReportEntry {
    pub id: Uuid,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub sku: String,
    pub quantity: Decimal,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 库存水位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    OutOfStock,
    Low,
    InStock,
}

impl StockLevel {
    pub fn classify(quantity: Decimal) -> Self {
        if quantity <= Decimal::ZERO {
            StockLevel::OutOfStock
        } else if quantity < Decimal::from(LOW_STOCK_THRESHOLD) {
            StockLevel::Low
        } else {
            StockLevel::InStock
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockLevel::OutOfStock => "Out of Stock",
            StockLevel::Low => "Low Stock",
            StockLevel::InStock => "In Stock",
        }
    }
}

// =========================================================
// 仪表盘 (Dashboard)
// =========================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    Week,
    Month,
    Year,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::Week, TimeRange::Month, TimeRange::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Year => "year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Week => "Week",
            TimeRange::Month => "Month",
            TimeRange::Year => "Year",
        }
    }
}

/// 仪表盘统计数据，所有聚合计算都在服务端完成
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub total_products: u64,
    pub inventory_value: f64,
    pub low_stock_items: u64,
    pub recent_transactions: Vec<StockReportEntry>,
    pub stock_status: StockStatus,
    pub stock_trends: Vec<TrendPoint>,
    pub category_distribution: Vec<CategoryShare>,
    pub inventory_value_history: Vec<ValuePoint>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockStatus {
    pub in_stock: u64,
    pub low_stock: u64,
    pub out_of_stock: u64,
}

/// 各库存状态所占百分比
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StockStatusShare {
    pub in_stock: f64,
    pub low_stock: f64,
    pub out_of_stock: f64,
}

impl StockStatus {
    pub fn total(&self) -> u64 {
        self.in_stock + self.low_stock + self.out_of_stock
    }

    pub fn shares(&self) -> StockStatusShare {
        let total = self.total();
        if total == 0 {
            return StockStatusShare::default();
        }
        let pct = |count: u64| count as f64 / total as f64 * 100.0;
        StockStatusShare {
            in_stock: pct(self.in_stock),
            low_stock: pct(self.low_stock),
            out_of_stock: pct(self.out_of_stock),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendPoint {
    #[serde(alias = "date", alias = "name")]
    pub label: String,
    pub stock_in: f64,
    pub stock_out: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryShare {
    #[serde(alias = "category")]
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuePoint {
    #[serde(alias = "date", alias = "name")]
    pub label: String,
    pub value: f64,
}

// =========================================================
// 通用响应 (Common Responses)
// =========================================================

/// DRF 分页响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn total_pages(&self, page_size: u32) -> u32 {
        let size = u64::from(page_size.max(1));
        (self.count.div_ceil(size)).max(1) as u32
    }
}

/// 列表接口可能分页也可能不分页，两种形式都接受
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paged(Page<T>),
    Plain(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Paged(page) => page.results,
            Listing::Plain(items) => items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeCheckResponse {
    pub exists: bool,
}

/// 只携带提示信息的响应，如 `{"detail": "Stock added successfully."}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub detail: Option<String>,
}
