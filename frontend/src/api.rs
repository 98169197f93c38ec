//! 库存服务 API 客户端
//!
//! `InventoryApi` 是页面与工作流依赖的接口；`HttpInventoryApi` 基于 fetch 实现，
//! 负责拼接 base URL、注入 `Authorization: Token <token>` 以及解析响应。

use async_trait::async_trait;
use inventory_shared::date::ReportPeriod;
use inventory_shared::protocol::{
    ApiRequest, CheckProductCodeRequest, DashboardStatsRequest, DeleteProductRequest,
    DeleteProductVariantRequest, GenerateVariantsRequest, GetProductRequest, HttpMethod,
    ListProductVariantsRequest, ListProductsRequest, PRODUCTS_PATH, StockReportRequest,
    UpdateProductVariantRequest, product_path,
};
use inventory_shared::{
    ApiMessage, Credentials, DashboardStats, HEADER_AUTHORIZATION, NewProductVariant, Page,
    Product, ProductId, ProductVariant, ProductVariantUpdate, StockReportEntry,
    StockTransactionRequest, TOKEN_SCHEME, TimeRange, VariantDefinition, VariantId,
};
use serde::de::DeserializeOwned;
use web_sys::FormData;

use crate::error::{ApiError, ApiResult};
use crate::web::{HttpClient, HttpRequestBuilder, HttpResponse};

/// 商品表单的提交内容（multipart）
///
/// `F` 为图片文件类型：浏览器中是 `web_sys::File`，测试中可以是任意可克隆类型。
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSubmission<F> {
    pub name: String,
    pub code: String,
    pub tax_code: String,
    pub is_favourite: bool,
    pub active: bool,
    pub variants: Vec<VariantDefinition>,
    /// 仅当用户选择了新文件时才有值；为 None 时不发送图片字段，服务端保留原图
    pub image: Option<F>,
}

impl<F> ProductSubmission<F> {
    /// multipart 中的文本字段
    pub fn text_fields(&self) -> ApiResult<Vec<(&'static str, String)>> {
        let variants = serde_json::to_string(&self.variants)
            .map_err(|e| ApiError::Request(format!("failed to encode variants: {}", e)))?;

        Ok(vec![
            ("ProductName", self.name.clone()),
            ("ProductCode", self.code.clone()),
            ("HSNCode", self.tax_code.clone()),
            ("IsFavourite", self.is_favourite.to_string()),
            ("Active", self.active.to_string()),
            ("variants", variants),
        ])
    }
}

/// 库存服务接口
#[async_trait(?Send)]
pub trait InventoryApi {
    /// 上传的图片文件类型
    type File: Clone + 'static;

    async fn obtain_token(&self, credentials: &Credentials) -> ApiResult<String>;

    async fn list_products(&self, query: &ListProductsRequest) -> ApiResult<Page<Product>>;
    async fn get_product(&self, id: ProductId) -> ApiResult<Product>;
    async fn create_product(&self, submission: &ProductSubmission<Self::File>)
    -> ApiResult<Product>;
    async fn update_product(
        &self,
        id: ProductId,
        submission: &ProductSubmission<Self::File>,
    ) -> ApiResult<Product>;
    async fn delete_product(&self, id: ProductId) -> ApiResult<()>;
    /// 返回编码是否已被占用
    async fn check_product_code(&self, code: &str) -> ApiResult<bool>;
    async fn generate_variants(&self, id: ProductId) -> ApiResult<Vec<ProductVariant>>;

    async fn list_product_variants(
        &self,
        product_id: Option<ProductId>,
    ) -> ApiResult<Vec<ProductVariant>>;
    async fn create_product_variant(&self, variant: &NewProductVariant)
    -> ApiResult<ProductVariant>;
    async fn update_product_variant(
        &self,
        id: VariantId,
        update: &ProductVariantUpdate,
    ) -> ApiResult<ProductVariant>;
    async fn delete_product_variant(&self, id: VariantId) -> ApiResult<()>;

    async fn record_stock(&self, transaction: &StockTransactionRequest) -> ApiResult<ApiMessage>;
    async fn stock_report(&self, period: ReportPeriod) -> ApiResult<Vec<StockReportEntry>>;
    async fn dashboard_stats(&self, time_range: TimeRange) -> ApiResult<DashboardStats>;
}

/// 拼接请求 URL，空值的查询参数会被丢弃
pub fn build_url(base_url: &str, path: &str, query: &[(&str, String)]) -> String {
    let base = base_url.trim_end_matches('/');
    let mut url = if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    };

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut has_params = false;
    for (key, value) in query.iter().filter(|(_, v)| !v.trim().is_empty()) {
        serializer.append_pair(key, value);
        has_params = true;
    }
    if has_params {
        url.push('?');
        url.push_str(&serializer.finish());
    }
    url
}

/// 解析响应体：非 2xx 转换为 `ApiError::Server`，空响应体（如 204）按 `null` 解析
pub fn parse_body<T: DeserializeOwned>(status: u16, ok: bool, body: &str) -> ApiResult<T> {
    if !ok {
        return Err(ApiError::from_response(status, body));
    }
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// 基于 fetch 的实现
#[derive(Clone, Debug, PartialEq)]
pub struct HttpInventoryApi {
    base_url: String,
    token: Option<String>,
}

impl HttpInventoryApi {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, token }
    }

    fn authorize(&self, builder: HttpRequestBuilder) -> HttpRequestBuilder {
        match &self.token {
            Some(token) => builder.header(
                HEADER_AUTHORIZATION,
                &format!("{} {}", TOKEN_SCHEME, token),
            ),
            None => builder,
        }
    }

    async fn decode<T: DeserializeOwned>(response: HttpResponse) -> ApiResult<T> {
        let status = response.status();
        let ok = response.ok();
        let body = response.text().await?;
        parse_body(status, ok, &body)
    }

    /// 发送 JSON 请求
    async fn send<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        let method = request.method();
        let url = build_url(&self.base_url, &request.path(), &request.query());
        let mut builder = self.authorize(HttpClient::request(method, &url));

        if method.has_body() {
            let body = serde_json::to_string(request)
                .map_err(|e| ApiError::Request(format!("failed to encode body: {}", e)))?;
            builder = builder.json(body);
        }

        Self::decode(builder.send().await?).await
    }

    /// 发送商品 multipart 表单
    async fn send_product_form(
        &self,
        method: HttpMethod,
        path: &str,
        submission: &ProductSubmission<web_sys::File>,
    ) -> ApiResult<Product> {
        let form =
            FormData::new().map_err(|e| ApiError::Request(format!("FormData: {:?}", e)))?;

        for (key, value) in submission.text_fields()? {
            form.append_with_str(key, &value)
                .map_err(|e| ApiError::Request(format!("failed to append {}: {:?}", key, e)))?;
        }
        if let Some(file) = &submission.image {
            form.append_with_blob_and_filename("ProductImage", file, &file.name())
                .map_err(|e| ApiError::Request(format!("failed to append image: {:?}", e)))?;
        }

        let url = build_url(&self.base_url, path, &[]);
        let builder = self.authorize(HttpClient::request(method, &url)).form(form);
        Self::decode(builder.send().await?).await
    }
}

#[async_trait(?Send)]
impl InventoryApi for HttpInventoryApi {
    type File = web_sys::File;

    async fn obtain_token(&self, credentials: &Credentials) -> ApiResult<String> {
        Ok(self.send(credentials).await?.token)
    }

    async fn list_products(&self, query: &ListProductsRequest) -> ApiResult<Page<Product>> {
        self.send(query).await
    }

    async fn get_product(&self, id: ProductId) -> ApiResult<Product> {
        self.send(&GetProductRequest { id }).await
    }

    async fn create_product(
        &self,
        submission: &ProductSubmission<Self::File>,
    ) -> ApiResult<Product> {
        self.send_product_form(HttpMethod::Post, PRODUCTS_PATH, submission)
            .await
    }

    async fn update_product(
        &self,
        id: ProductId,
        submission: &ProductSubmission<Self::File>,
    ) -> ApiResult<Product> {
        self.send_product_form(HttpMethod::Put, &product_path(id), submission)
            .await
    }

    async fn delete_product(&self, id: ProductId) -> ApiResult<()> {
        self.send(&DeleteProductRequest { id }).await
    }

    async fn check_product_code(&self, code: &str) -> ApiResult<bool> {
        let request = CheckProductCodeRequest {
            code: code.to_string(),
        };
        Ok(self.send(&request).await?.exists)
    }

    async fn generate_variants(&self, id: ProductId) -> ApiResult<Vec<ProductVariant>> {
        self.send(&GenerateVariantsRequest { id }).await
    }

    async fn list_product_variants(
        &self,
        product_id: Option<ProductId>,
    ) -> ApiResult<Vec<ProductVariant>> {
        let listing = self
            .send(&ListProductVariantsRequest { product_id })
            .await?;
        Ok(listing.into_items())
    }

    async fn create_product_variant(
        &self,
        variant: &NewProductVariant,
    ) -> ApiResult<ProductVariant> {
        self.send(variant).await
    }

    async fn update_product_variant(
        &self,
        id: VariantId,
        update: &ProductVariantUpdate,
    ) -> ApiResult<ProductVariant> {
        let request = UpdateProductVariantRequest {
            id,
            update: update.clone(),
        };
        self.send(&request).await
    }

    async fn delete_product_variant(&self, id: VariantId) -> ApiResult<()> {
        self.send(&DeleteProductVariantRequest { id }).await
    }

    async fn record_stock(&self, transaction: &StockTransactionRequest) -> ApiResult<ApiMessage> {
        self.send(transaction).await
    }

    async fn stock_report(&self, period: ReportPeriod) -> ApiResult<Vec<StockReportEntry>> {
        self.send(&StockReportRequest { period }).await
    }

    async fn dashboard_stats(&self, time_range: TimeRange) -> ApiResult<DashboardStats> {
        self.send(&DashboardStatsRequest { time_range }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_shared::OptionValue;

    #[test]
    fn url_drops_blank_query_values() {
        let url = build_url(
            "http://localhost:8000/api/",
            "/products/",
            &[("search", "  ".to_string()), ("page", "2".to_string())],
        );
        assert_eq!(url, "http://localhost:8000/api/products/?page=2");
    }

    #[test]
    fn url_encodes_query_values() {
        let url = build_url(
            "http://localhost:8000/api",
            "/products/check-code/",
            &[("code", "A&B 1".to_string())],
        );
        assert_eq!(
            url,
            "http://localhost:8000/api/products/check-code/?code=A%26B+1"
        );
    }

    #[test]
    fn empty_success_body_decodes_as_unit() {
        let parsed: ApiResult<()> = parse_body(204, true, "");
        assert_eq!(parsed, Ok(()));
    }

    #[test]
    fn error_status_keeps_server_detail() {
        let parsed: ApiResult<ApiMessage> =
            parse_body(400, false, r#"{"detail": "Insufficient stock available."}"#);
        let err = parsed.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.server_message(), Some("Insufficient stock available."));
    }

    #[test]
    fn garbage_success_body_is_a_decode_error() {
        let parsed: ApiResult<ApiMessage> = parse_body(200, true, "<html>");
        assert!(matches!(parsed, Err(ApiError::Decode(_))));
    }

    #[test]
    fn submission_encodes_variants_as_json() {
        let submission: ProductSubmission<()> = ProductSubmission {
            name: "Shirt".to_string(),
            code: "SH".to_string(),
            tax_code: String::new(),
            is_favourite: false,
            active: true,
            variants: vec![VariantDefinition {
                id: None,
                name: "Color".to_string(),
                options: vec![OptionValue::new("red"), OptionValue::new("blue")],
            }],
            image: None,
        };
        let fields = submission.text_fields().unwrap();
        assert_eq!(fields[3], ("IsFavourite", "false".to_string()));
        assert_eq!(fields[4], ("Active", "true".to_string()));
        assert_eq!(
            fields[5].1,
            r#"[{"name":"Color","options":[{"value":"red"},{"value":"blue"}]}]"#
        );
    }
}
