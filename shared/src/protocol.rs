use crate::date::ReportPeriod;
use crate::{
    ApiMessage, CodeCheckResponse, Credentials, DashboardStats, Listing, NewProductVariant, Page,
    Product, ProductId, ProductVariant, ProductVariantUpdate, StockReportEntry,
    StockTransactionRequest, TimeRange, TokenResponse, TransactionType, VariantId,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// The request value itself is the JSON body for methods that carry one; path
/// parameters and query parameters are skipped during serialization.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    fn method(&self) -> HttpMethod;
    /// The URL path relative to the API base, with the trailing slash the server expects.
    fn path(&self) -> String;
    /// Query string parameters, empty values are dropped by the client.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

// =========================================================
// Paths shared with multipart endpoints
// =========================================================

pub const PRODUCTS_PATH: &str = "/products/";

pub fn product_path(id: ProductId) -> String {
    format!("{}{}/", PRODUCTS_PATH, id)
}

// =========================================================
// Auth
// =========================================================

impl ApiRequest for Credentials {
    type Response = TokenResponse;
    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }
    fn path(&self) -> String {
        "/get-token/".to_string()
    }
}

// =========================================================
// Products
// =========================================================

/// List products (paginated, optional search)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListProductsRequest {
    pub search: String,
    pub page: u32,
}

impl ApiRequest for ListProductsRequest {
    type Response = Page<Product>;
    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }
    fn path(&self) -> String {
        PRODUCTS_PATH.to_string()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("search", self.search.trim().to_string()),
            ("page", self.page.max(1).to_string()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetProductRequest {
    #[serde(skip)]
    pub id: ProductId,
}

impl ApiRequest for GetProductRequest {
    type Response = Product;
    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }
    fn path(&self) -> String {
        product_path(self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteProductRequest {
    #[serde(skip)]
    pub id: ProductId,
}

impl ApiRequest for DeleteProductRequest {
    type Response = ();
    fn method(&self) -> HttpMethod {
        HttpMethod::Delete
    }
    fn path(&self) -> String {
        product_path(self.id)
    }
}

/// Ask whether a product code is already taken
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckProductCodeRequest {
    #[serde(skip)]
    pub code: String,
}

impl ApiRequest for CheckProductCodeRequest {
    type Response = CodeCheckResponse;
    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }
    fn path(&self) -> String {
        format!("{}check-code/", PRODUCTS_PATH)
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("code", self.code.clone())]
    }
}

/// Generate every option combination of a product as purchasable variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateVariantsRequest {
    #[serde(skip)]
    pub id: ProductId,
}

impl ApiRequest for GenerateVariantsRequest {
    type Response = Vec<ProductVariant>;
    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }
    fn path(&self) -> String {
        format!("{}generate_variants/", product_path(self.id))
    }
}

// =========================================================
// Product variants
// =========================================================

const PRODUCT_VARIANTS_PATH: &str = "/product-variants/";

fn product_variant_path(id: VariantId) -> String {
    format!("{}{}/", PRODUCT_VARIANTS_PATH, id)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListProductVariantsRequest {
    #[serde(skip)]
    pub product_id: Option<ProductId>,
}

impl ApiRequest for ListProductVariantsRequest {
    type Response = Listing<ProductVariant>;
    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }
    fn path(&self) -> String {
        PRODUCT_VARIANTS_PATH.to_string()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        self.product_id
            .map(|id| vec![("product_id", id.to_string())])
            .unwrap_or_default()
    }
}

impl ApiRequest for NewProductVariant {
    type Response = ProductVariant;
    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }
    fn path(&self) -> String {
        PRODUCT_VARIANTS_PATH.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProductVariantRequest {
    #[serde(skip)]
    pub id: VariantId,
    #[serde(flatten)]
    pub update: ProductVariantUpdate,
}

impl ApiRequest for UpdateProductVariantRequest {
    type Response = ProductVariant;
    fn method(&self) -> HttpMethod {
        HttpMethod::Put
    }
    fn path(&self) -> String {
        product_variant_path(self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteProductVariantRequest {
    #[serde(skip)]
    pub id: VariantId,
}

impl ApiRequest for DeleteProductVariantRequest {
    type Response = ();
    fn method(&self) -> HttpMethod {
        HttpMethod::Delete
    }
    fn path(&self) -> String {
        product_variant_path(self.id)
    }
}

// =========================================================
// Stock
// =========================================================

/// `IN` goes to `add_stock`, `OUT` to `remove_stock`
impl ApiRequest for StockTransactionRequest {
    type Response = ApiMessage;
    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }
    fn path(&self) -> String {
        match self.transaction_type {
            TransactionType::In => "/stock/add_stock/".to_string(),
            TransactionType::Out => "/stock/remove_stock/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReportRequest {
    #[serde(skip)]
    pub period: ReportPeriod,
}

impl ApiRequest for StockReportRequest {
    type Response = Vec<StockReportEntry>;
    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }
    fn path(&self) -> String {
        "/stock/report/".to_string()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        self.period.query()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStatsRequest {
    #[serde(skip)]
    pub time_range: TimeRange,
}

impl ApiRequest for DashboardStatsRequest {
    type Response = DashboardStats;
    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }
    fn path(&self) -> String {
        "/stock/dashboard_stats/".to_string()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("time_range", self.time_range.as_str().to_string())]
    }
}
