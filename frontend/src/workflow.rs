//! 页面操作流程
//!
//! 每个流程都是"本地校验 -> 调用 API -> 产出提示/跳转"，
//! 只依赖 `InventoryApi`，页面组件负责把结果写回各自的信号。

use inventory_shared::protocol::ListProductsRequest;
use inventory_shared::{
    Credentials, DashboardStats, Page, Product, ProductId, ProductVariant, ProductVariantUpdate,
    StockReportEntry, VariantId,
};
use leptos::logging::{error, warn};
use rust_decimal::Decimal;

use crate::api::{InventoryApi, ProductSubmission};
use crate::components::dashboard::view_state::StatsTicket;
use crate::components::product_form::form_state::{CodeCheckOutcome, CodeCheckTicket, ProductForm};
use crate::components::stock::filters::HistoryFilter;
use crate::components::stock::form_state::{self, StockForm};
use crate::components::variant_list::draft::NewVariantDraft;
use crate::error::ApiResult;
use crate::notice::Notice;
use crate::web::route::AppRoute;

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";
pub const PRODUCT_SAVED: &str = "Product saved successfully";
pub const PRODUCT_SAVE_FAILED: &str = "An error occurred while saving the product";
pub const DASHBOARD_LOAD_FAILED: &str = "Failed to load dashboard data";

/// 成功时带提示的操作结果，失败时只有提示
pub type ActionResult<T> = Result<(T, Notice), Notice>;

// =========================================================
// 登录
// =========================================================

/// 换取 token；两个字段都必须填写
pub async fn login<A: InventoryApi>(
    api: &A,
    username: &str,
    password: &str,
) -> Result<String, Notice> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(Notice::error(FILL_ALL_FIELDS));
    }
    let credentials = Credentials {
        username: username.trim().to_string(),
        password: password.to_string(),
    };
    api.obtain_token(&credentials).await.map_err(|e| {
        warn!("[Login] Token request failed: {}", e);
        Notice::error(INVALID_CREDENTIALS)
    })
}

// =========================================================
// 商品
// =========================================================

/// 通过本地校验、等待发送的商品保存请求
///
/// 从表单中取出后与表单解耦，保存期间表单上的变化（如编码检查结果）不受影响。
#[derive(Debug)]
pub struct ProductSave<F> {
    pub product_id: Option<ProductId>,
    pub submission: ProductSubmission<F>,
}

/// 商品保存结果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// 保存成功，稍后跳转到该商品的变体列表
    Saved { notice: Notice, redirect: AppRoute },
    Failed { notice: Notice },
}

/// 标记全部字段并校验；未通过时返回 `None`，错误已显示在表单上
pub fn prepare_product_save<F: Clone>(form: &mut ProductForm<F>) -> Option<ProductSave<F>> {
    let submission = form.prepare_submission()?;
    Some(ProductSave {
        product_id: form.product_id(),
        submission,
    })
}

pub async fn save_product<A: InventoryApi>(
    api: &A,
    save: &ProductSave<A::File>,
) -> SubmitOutcome {
    let saved = match save.product_id {
        Some(id) => api.update_product(id, &save.submission).await,
        None => api.create_product(&save.submission).await,
    };

    match saved {
        Ok(product) => SubmitOutcome::Saved {
            notice: Notice::success(PRODUCT_SAVED),
            redirect: AppRoute::ProductVariants(product.id),
        },
        Err(e) => {
            error!("[ProductForm] Save failed: {}", e);
            SubmitOutcome::Failed {
                notice: Notice::from_api_error(&e, PRODUCT_SAVE_FAILED),
            }
        }
    }
}

/// 执行编码唯一性检查，结果交给 `ProductForm::apply_code_check`
pub async fn check_product_code<A: InventoryApi>(
    api: &A,
    ticket: &CodeCheckTicket,
) -> CodeCheckOutcome {
    match api.check_product_code(&ticket.code).await {
        Ok(true) => CodeCheckOutcome::Taken,
        Ok(false) => CodeCheckOutcome::Available,
        Err(e) => {
            warn!("[ProductForm] Code check for {} failed: {}", ticket.code, e);
            CodeCheckOutcome::Failed
        }
    }
}

pub async fn load_product<A: InventoryApi>(api: &A, id: ProductId) -> Result<Product, Notice> {
    api.get_product(id).await.map_err(|e| {
        error!("[ProductForm] Failed to load product {}: {}", id, e);
        Notice::from_api_error(&e, "Failed to load product")
    })
}

pub async fn load_products<A: InventoryApi>(
    api: &A,
    query: &ListProductsRequest,
) -> Result<Page<Product>, Notice> {
    api.list_products(query).await.map_err(|e| {
        error!("[Products] Failed to fetch products: {}", e);
        Notice::error("Failed to fetch products")
    })
}

pub async fn delete_product<A: InventoryApi>(api: &A, id: ProductId) -> Result<Notice, Notice> {
    match api.delete_product(id).await {
        Ok(()) => Ok(Notice::success("Product deleted successfully")),
        Err(e) => {
            error!("[Products] Failed to delete product {}: {}", id, e);
            Err(Notice::error("Failed to delete product"))
        }
    }
}

// =========================================================
// 可售变体
// =========================================================

/// 变体列表页的数据：商品本身与它的可售变体
pub async fn load_variant_page<A: InventoryApi>(
    api: &A,
    product_id: ProductId,
) -> Result<(Product, Vec<ProductVariant>), Notice> {
    fetch_variant_page(api, product_id).await.map_err(|e| {
        error!("[Variants] Failed to fetch product data: {}", e);
        Notice::from_api_error(&e, "Failed to fetch product data")
    })
}

async fn fetch_variant_page<A: InventoryApi>(
    api: &A,
    product_id: ProductId,
) -> ApiResult<(Product, Vec<ProductVariant>)> {
    let product = api.get_product(product_id).await?;
    let variants = api.list_product_variants(Some(product_id)).await?;
    Ok((product, variants))
}

pub async fn create_variant<A: InventoryApi>(
    api: &A,
    product: &Product,
    draft: &NewVariantDraft,
) -> ActionResult<ProductVariant> {
    let Some(request) = draft.to_request(product) else {
        return Err(Notice::error("Variant name is required"));
    };
    match api.create_product_variant(&request).await {
        Ok(variant) => Ok((variant, Notice::success("Variant created successfully"))),
        Err(e) => Err(Notice::from_api_error(&e, "Failed to create variant")),
    }
}

pub async fn update_variant_sku<A: InventoryApi>(
    api: &A,
    variant: &ProductVariant,
    sku: &str,
) -> ActionResult<ProductVariant> {
    let sku = sku.trim();
    if sku.is_empty() {
        return Err(Notice::error("SKU is required"));
    }
    let update = ProductVariantUpdate {
        product: variant.product,
        sku: sku.to_string(),
    };
    match api.update_product_variant(variant.id, &update).await {
        Ok(updated) => Ok((updated, Notice::success("Variant updated successfully"))),
        Err(e) => Err(Notice::from_api_error(&e, "Failed to update variant")),
    }
}

pub async fn delete_variant<A: InventoryApi>(api: &A, id: VariantId) -> ActionResult<VariantId> {
    match api.delete_product_variant(id).await {
        Ok(()) => Ok((id, Notice::success("Variant deleted successfully"))),
        Err(e) => Err(Notice::from_api_error(&e, "Failed to delete variant")),
    }
}

/// 由服务端根据选项组合生成全部可售变体
pub async fn generate_variants<A: InventoryApi>(
    api: &A,
    product_id: ProductId,
) -> ActionResult<Vec<ProductVariant>> {
    match api.generate_variants(product_id).await {
        Ok(variants) => Ok((variants, Notice::success("Variants generated successfully"))),
        Err(e) => Err(Notice::from_api_error(&e, "Failed to generate variants")),
    }
}

// =========================================================
// 库存
// =========================================================

/// 出入库表单提交结果
#[derive(Debug, Clone, PartialEq)]
pub enum StockOutcome {
    /// 本地校验未通过，没有发出请求
    Invalid,
    Recorded(Notice),
    Failed(Notice),
}

/// 提交出入库；`available` 为所选变体最后一次拉取到的库存
///
/// 成功后表单被重置。
pub async fn submit_stock_form<A: InventoryApi>(
    api: &A,
    form: &mut StockForm,
    available: Option<Decimal>,
) -> StockOutcome {
    let Some(request) = form.prepare(available) else {
        return StockOutcome::Invalid;
    };
    let direction = request.transaction_type;

    match api.record_stock(&request).await {
        Ok(_) => {
            form.reset();
            StockOutcome::Recorded(Notice::success(form_state::success_message(direction)))
        }
        Err(e) => {
            error!("[Stock] {} transaction failed: {}", direction.as_str(), e);
            StockOutcome::Failed(Notice::from_api_error(
                &e,
                form_state::failure_message(direction),
            ))
        }
    }
}

pub async fn load_stock_variants<A: InventoryApi>(api: &A) -> Result<Vec<ProductVariant>, Notice> {
    api.list_product_variants(None).await.map_err(|e| {
        error!("[Stock] Failed to fetch product variants: {}", e);
        Notice::error("Failed to fetch product variants")
    })
}

/// 按日期区间拉取流水；区间无效时不发请求
pub async fn load_stock_history<A: InventoryApi>(
    api: &A,
    filter: &HistoryFilter,
) -> Result<Vec<StockReportEntry>, Notice> {
    let period = filter.period().map_err(|e| Notice::error(e.to_string()))?;
    api.stock_report(period).await.map_err(|e| {
        error!("[Stock] Failed to fetch stock history: {}", e);
        Notice::error("Failed to fetch stock history")
    })
}

// =========================================================
// 仪表盘
// =========================================================

/// 按凭证中的时间范围拉取统计数据
pub async fn load_dashboard<A: InventoryApi>(
    api: &A,
    ticket: StatsTicket,
) -> ApiResult<DashboardStats> {
    let result = api.dashboard_stats(ticket.range).await;
    if let Err(e) = &result {
        error!(
            "[Dashboard] Stats request #{} ({}) failed: {}",
            ticket.seq,
            ticket.range.as_str(),
            e
        );
    }
    result
}

#[cfg(test)]
mod tests;
