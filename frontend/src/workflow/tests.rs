use super::*;
use crate::api::ProductSubmission;
use crate::components::dashboard::view_state::{DashboardState, StatsUpdate};
use crate::components::product_form::form_state::{CodeAvailability, CODE_TAKEN, NAME_REQUIRED};
use crate::components::stock::form_state::EXCEEDS_AVAILABLE;
use crate::error::ApiError;
use async_trait::async_trait;
use inventory_shared::date::ReportPeriod;
use inventory_shared::{
    ApiMessage, NewProductVariant, StockTransactionRequest, TimeRange, TransactionType,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

// =========================================================
// Mock API
// =========================================================

const SAVED_ID: u128 = 42;

#[derive(Default)]
struct MockApi {
    /// Operation log to verify which endpoints were hit
    log: RefCell<Vec<String>>,
    /// Codes reported as already in use
    taken_codes: RefCell<HashSet<String>>,
    /// Operations that fail with the given error
    failures: RefCell<HashMap<&'static str, ApiError>>,
    /// Last multipart submission received
    last_submission: RefCell<Option<ProductSubmission<String>>>,
}

impl MockApi {
    fn new() -> Self {
        Self::default()
    }

    fn push_log(&self, msg: String) {
        self.log.borrow_mut().push(msg);
    }

    fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    fn fail(&self, op: &'static str, err: ApiError) {
        self.failures.borrow_mut().insert(op, err);
    }

    fn check(&self, op: &'static str) -> ApiResult<()> {
        match self.failures.borrow().get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn product(id: ProductId, code: &str) -> Product {
    Product {
        id,
        number: None,
        code: code.to_string(),
        name: "T-Shirt".to_string(),
        image: None,
        tax_code: None,
        is_favourite: false,
        active: true,
        total_stock: None,
        created_at: None,
        updated_at: None,
        variants: Vec::new(),
        product_variants: Vec::new(),
    }
}

fn variant(id: u128, stock: i64) -> ProductVariant {
    ProductVariant {
        id: Uuid::from_u128(id),
        product: Uuid::from_u128(SAVED_ID),
        sku: format!("TS-{}", id),
        options: Vec::new(),
        current_stock: Decimal::from(stock),
        product_name: "T-Shirt".to_string(),
    }
}

#[async_trait(?Send)]
impl InventoryApi for MockApi {
    type File = String;

    async fn obtain_token(&self, credentials: &Credentials) -> ApiResult<String> {
        self.push_log(format!("obtain_token:{}", credentials.username));
        self.check("obtain_token")?;
        Ok("token-123".to_string())
    }

    async fn list_products(&self, query: &ListProductsRequest) -> ApiResult<Page<Product>> {
        self.push_log(format!("list_products:{}", query.page));
        self.check("list_products")?;
        Ok(Page {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        })
    }

    async fn get_product(&self, id: ProductId) -> ApiResult<Product> {
        self.push_log(format!("get_product:{}", id));
        self.check("get_product")?;
        Ok(product(id, "TS"))
    }

    async fn create_product(&self, submission: &ProductSubmission<String>) -> ApiResult<Product> {
        self.push_log(format!("create_product:{}", submission.code));
        self.check("create_product")?;
        *self.last_submission.borrow_mut() = Some(submission.clone());
        Ok(product(Uuid::from_u128(SAVED_ID), &submission.code))
    }

    async fn update_product(
        &self,
        id: ProductId,
        submission: &ProductSubmission<String>,
    ) -> ApiResult<Product> {
        self.push_log(format!("update_product:{}", id));
        self.check("update_product")?;
        *self.last_submission.borrow_mut() = Some(submission.clone());
        Ok(product(id, &submission.code))
    }

    async fn delete_product(&self, id: ProductId) -> ApiResult<()> {
        self.push_log(format!("delete_product:{}", id));
        self.check("delete_product")
    }

    async fn check_product_code(&self, code: &str) -> ApiResult<bool> {
        self.push_log(format!("check_product_code:{}", code));
        self.check("check_product_code")?;
        Ok(self.taken_codes.borrow().contains(code))
    }

    async fn generate_variants(&self, id: ProductId) -> ApiResult<Vec<ProductVariant>> {
        self.push_log(format!("generate_variants:{}", id));
        self.check("generate_variants")?;
        Ok(vec![variant(1, 0), variant(2, 0)])
    }

    async fn list_product_variants(
        &self,
        product_id: Option<ProductId>,
    ) -> ApiResult<Vec<ProductVariant>> {
        self.push_log(format!("list_product_variants:{:?}", product_id));
        self.check("list_product_variants")?;
        Ok(vec![variant(1, 5)])
    }

    async fn create_product_variant(
        &self,
        request: &NewProductVariant,
    ) -> ApiResult<ProductVariant> {
        self.push_log(format!("create_product_variant:{}", request.sku));
        self.check("create_product_variant")?;
        let mut created = variant(3, 0);
        created.sku = request.sku.clone();
        Ok(created)
    }

    async fn update_product_variant(
        &self,
        id: VariantId,
        update: &ProductVariantUpdate,
    ) -> ApiResult<ProductVariant> {
        self.push_log(format!("update_product_variant:{}:{}", id, update.sku));
        self.check("update_product_variant")?;
        let mut updated = variant(1, 5);
        updated.sku = update.sku.clone();
        Ok(updated)
    }

    async fn delete_product_variant(&self, id: VariantId) -> ApiResult<()> {
        self.push_log(format!("delete_product_variant:{}", id));
        self.check("delete_product_variant")
    }

    async fn record_stock(&self, transaction: &StockTransactionRequest) -> ApiResult<ApiMessage> {
        self.push_log(format!(
            "record_stock:{}:{}",
            transaction.transaction_type.as_str(),
            transaction.quantity
        ));
        self.check("record_stock")?;
        Ok(ApiMessage::default())
    }

    async fn stock_report(&self, period: ReportPeriod) -> ApiResult<Vec<StockReportEntry>> {
        self.push_log(format!("stock_report:{:?}", period.query()));
        self.check("stock_report")?;
        Ok(Vec::new())
    }

    async fn dashboard_stats(&self, time_range: TimeRange) -> ApiResult<DashboardStats> {
        self.push_log(format!("dashboard_stats:{}", time_range.as_str()));
        self.check("dashboard_stats")?;
        let total_products = match time_range {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Year => 365,
        };
        Ok(DashboardStats {
            total_products,
            ..Default::default()
        })
    }
}

fn server_error(detail: Option<&str>) -> ApiError {
    ApiError::Server {
        status: 400,
        message: detail.map(str::to_string),
    }
}

fn valid_form() -> ProductForm<String> {
    let mut form = ProductForm::create();
    form.set_name("T-Shirt".to_string());
    form.set_code("TS".to_string());
    form.set_variant_name(0, "Color".to_string());
    form.set_option_value(0, 0, "red".to_string());
    form
}

/// 准备并保存表单，校验未通过时返回 `None`
async fn submit(api: &MockApi, form: &mut ProductForm<String>) -> Option<SubmitOutcome> {
    let save = prepare_product_save(form)?;
    Some(save_product(api, &save).await)
}

// =========================================================
// Login
// =========================================================

#[tokio::test]
async fn login_requires_both_fields() {
    let api = MockApi::new();
    let result = login(&api, "admin", "").await;
    assert_eq!(result, Err(Notice::error(FILL_ALL_FIELDS)));
    assert!(api.log().is_empty());
}

#[tokio::test]
async fn login_returns_token_or_generic_failure() {
    let api = MockApi::new();
    assert_eq!(login(&api, " admin ", "pw").await, Ok("token-123".to_string()));
    assert_eq!(api.log(), vec!["obtain_token:admin"]);

    api.fail("obtain_token", server_error(Some("Unable to log in")));
    assert_eq!(
        login(&api, "admin", "bad").await,
        Err(Notice::error(INVALID_CREDENTIALS))
    );
}

// =========================================================
// Product form
// =========================================================

#[tokio::test]
async fn empty_product_form_never_reaches_the_server() {
    let api = MockApi::new();
    let mut form = ProductForm::create();

    assert_eq!(submit(&api, &mut form).await, None);
    assert_eq!(form.name_error(), Some(NAME_REQUIRED));
    assert!(form.code_error().is_some());
    assert!(api.log().is_empty());
}

#[tokio::test]
async fn emptied_option_list_blocks_submission() {
    let api = MockApi::new();
    let mut form = valid_form();
    form.add_variant();
    assert_eq!(form.variants[1].options.len(), 1);
    form.remove_variant(1);
    form.remove_option(0, 0);

    assert_eq!(submit(&api, &mut form).await, None);
    assert!(api.log().is_empty());
}

#[tokio::test]
async fn saved_product_redirects_to_its_variants() {
    let api = MockApi::new();
    let mut form = valid_form();

    let outcome = submit(&api, &mut form).await;
    assert_eq!(
        outcome,
        Some(SubmitOutcome::Saved {
            notice: Notice::success(PRODUCT_SAVED),
            redirect: AppRoute::ProductVariants(Uuid::from_u128(SAVED_ID)),
        })
    );
    assert_eq!(api.log(), vec!["create_product:TS"]);
}

#[tokio::test]
async fn editing_updates_in_place_and_keeps_the_image() {
    let api = MockApi::new();
    let id = Uuid::from_u128(5);
    let mut existing = product(id, "TS");
    existing.image = Some("http://localhost:8000/media/uploads/shirt.png".to_string());
    existing.variants = vec![inventory_shared::VariantDefinition {
        id: None,
        name: "Size".to_string(),
        options: vec![inventory_shared::OptionValue::new("L")],
    }];
    let mut form = ProductForm::<String>::edit(&existing);

    let outcome = submit(&api, &mut form).await;
    assert!(matches!(outcome, Some(SubmitOutcome::Saved { redirect: AppRoute::ProductVariants(r), .. }) if r == id));
    assert_eq!(api.log(), vec![format!("update_product:{}", id)]);
    let sent = api.last_submission.borrow().clone().unwrap();
    assert_eq!(sent.image, None);
}

#[tokio::test]
async fn save_failure_prefers_server_message() {
    let api = MockApi::new();
    api.fail("create_product", server_error(Some("ProductCode: already exists.")));
    let outcome = submit(&api, &mut valid_form()).await;
    assert_eq!(
        outcome,
        Some(SubmitOutcome::Failed {
            notice: Notice::error("ProductCode: already exists.")
        })
    );

    api.fail("create_product", ApiError::Network("offline".to_string()));
    let outcome = submit(&api, &mut valid_form()).await;
    assert_eq!(
        outcome,
        Some(SubmitOutcome::Failed {
            notice: Notice::error(PRODUCT_SAVE_FAILED)
        })
    );
}

#[tokio::test]
async fn code_check_landing_during_save_stays_on_the_form() {
    let api = MockApi::new();
    api.taken_codes.borrow_mut().insert("TS-OLD".to_string());
    let mut form = valid_form();
    let ticket = form.set_code("TS-OLD".to_string()).unwrap();

    let save = prepare_product_save(&mut form).unwrap();
    assert_eq!(form.code_check(), CodeAvailability::Checking);

    // 检查结果在请求发出之后、保存完成之前到达
    let outcome = check_product_code(&api, &ticket).await;
    assert!(form.apply_code_check(&ticket, outcome));
    let saved = save_product(&api, &save).await;

    assert!(matches!(saved, SubmitOutcome::Saved { .. }));
    assert_eq!(save.submission.code, "TS-OLD");
    assert_eq!(form.code_check(), CodeAvailability::Taken);
    assert_eq!(form.code_error(), Some(CODE_TAKEN));
    assert!(prepare_product_save(&mut form).is_none());
}

#[tokio::test]
async fn out_of_order_code_checks_keep_the_latest_answer() {
    let api = MockApi::new();
    api.taken_codes.borrow_mut().insert("TS".to_string());
    let mut form = valid_form();

    let stale = form.set_code("TS".to_string()).unwrap();
    let latest = form.set_code("TS-NEW".to_string()).unwrap();

    let latest_result = check_product_code(&api, &latest).await;
    let stale_result = check_product_code(&api, &stale).await;
    assert!(form.apply_code_check(&latest, latest_result));
    assert!(!form.apply_code_check(&stale, stale_result));
    assert_eq!(form.code_error(), None);

    let retaken = form.set_code("TS".to_string()).unwrap();
    let result = check_product_code(&api, &retaken).await;
    form.apply_code_check(&retaken, result);
    assert_eq!(form.code_error(), Some(CODE_TAKEN));
}

#[tokio::test]
async fn failed_code_check_is_reported_as_error() {
    let api = MockApi::new();
    api.fail("check_product_code", ApiError::Network("offline".to_string()));
    let mut form = valid_form();
    let ticket = form.set_code("TS-9".to_string()).unwrap();
    assert_eq!(check_product_code(&api, &ticket).await, CodeCheckOutcome::Failed);
}

// =========================================================
// Products and variants
// =========================================================

#[tokio::test]
async fn delete_product_uses_fixed_messages() {
    let api = MockApi::new();
    let id = Uuid::from_u128(5);
    assert_eq!(
        delete_product(&api, id).await,
        Ok(Notice::success("Product deleted successfully"))
    );
    api.fail("delete_product", server_error(Some("Protected")));
    assert_eq!(
        delete_product(&api, id).await,
        Err(Notice::error("Failed to delete product"))
    );
}

#[tokio::test]
async fn variant_page_loads_product_then_variants() {
    let api = MockApi::new();
    let id = Uuid::from_u128(SAVED_ID);
    let (loaded, variants) = load_variant_page(&api, id).await.unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(variants.len(), 1);
    assert_eq!(
        api.log(),
        vec![
            format!("get_product:{}", id),
            format!("list_product_variants:Some({})", id)
        ]
    );
}

#[tokio::test]
async fn new_variant_sku_is_derived_from_product_code() {
    let api = MockApi::new();
    let owner = product(Uuid::from_u128(SAVED_ID), "TS");
    let draft = NewVariantDraft {
        name: "Blue".to_string(),
        options: vec!["M".to_string()],
    };
    let (created, notice) = create_variant(&api, &owner, &draft).await.unwrap();
    assert_eq!(created.sku, "TS-Blue");
    assert_eq!(notice, Notice::success("Variant created successfully"));

    let unnamed = NewVariantDraft::default();
    assert!(create_variant(&api, &owner, &unnamed).await.is_err());
    assert_eq!(api.log(), vec!["create_product_variant:TS-Blue"]);
}

#[tokio::test]
async fn blank_sku_update_is_rejected_locally() {
    let api = MockApi::new();
    let target = variant(1, 5);
    assert!(update_variant_sku(&api, &target, "  ").await.is_err());
    assert!(api.log().is_empty());

    let (updated, _) = update_variant_sku(&api, &target, "TS-XL").await.unwrap();
    assert_eq!(updated.sku, "TS-XL");
}

#[tokio::test]
async fn variant_actions_fall_back_to_generic_messages() {
    let api = MockApi::new();
    api.fail("delete_product_variant", ApiError::Network("offline".to_string()));
    api.fail("generate_variants", server_error(Some("Product has no options")));

    assert_eq!(
        delete_variant(&api, Uuid::from_u128(1)).await,
        Err(Notice::error("Failed to delete variant"))
    );
    assert_eq!(
        generate_variants(&api, Uuid::from_u128(SAVED_ID)).await,
        Err(Notice::error("Product has no options"))
    );
}

// =========================================================
// Stock
// =========================================================

#[tokio::test]
async fn over_removal_is_blocked_without_a_request() {
    let api = MockApi::new();
    let mut form = StockForm::preselected(TransactionType::Out, Uuid::from_u128(1));
    form.quantity = "8".to_string();

    let outcome = submit_stock_form(&api, &mut form, Some(Decimal::from(5))).await;
    assert_eq!(outcome, StockOutcome::Invalid);
    assert_eq!(
        form.visible_errors(Some(Decimal::from(5))).quantity,
        Some(EXCEEDS_AVAILABLE)
    );
    assert!(api.log().is_empty());
}

#[tokio::test]
async fn recorded_stock_resets_the_form() {
    let api = MockApi::new();
    let mut form = StockForm::preselected(TransactionType::In, Uuid::from_u128(1));
    form.quantity = "12.5".to_string();

    let outcome = submit_stock_form(&api, &mut form, None).await;
    assert_eq!(
        outcome,
        StockOutcome::Recorded(Notice::success("Stock added successfully"))
    );
    assert!(form.quantity.is_empty());
    assert_eq!(api.log(), vec!["record_stock:IN:12.5"]);
}

#[tokio::test]
async fn stock_failure_keeps_input_and_uses_detail() {
    let api = MockApi::new();
    api.fail("record_stock", server_error(Some("Insufficient stock available.")));
    let mut form = StockForm::preselected(TransactionType::Out, Uuid::from_u128(1));
    form.quantity = "2".to_string();

    let outcome = submit_stock_form(&api, &mut form, Some(Decimal::from(5))).await;
    assert_eq!(
        outcome,
        StockOutcome::Failed(Notice::error("Insufficient stock available."))
    );
    assert_eq!(form.quantity, "2");

    api.fail("record_stock", ApiError::Network("offline".to_string()));
    let outcome = submit_stock_form(&api, &mut form, Some(Decimal::from(5))).await;
    assert_eq!(
        outcome,
        StockOutcome::Failed(Notice::error("Failed to remove stock"))
    );
}

#[tokio::test]
async fn reversed_history_period_is_not_sent() {
    let api = MockApi::new();
    let filter = HistoryFilter {
        start: "2024-03-10".to_string(),
        end: "2024-03-01".to_string(),
        sku: String::new(),
    };
    assert!(load_stock_history(&api, &filter).await.is_err());
    assert!(api.log().is_empty());

    let open = HistoryFilter::default();
    assert_eq!(load_stock_history(&api, &open).await, Ok(Vec::new()));
    assert_eq!(api.log(), vec!["stock_report:[]"]);
}

// =========================================================
// Dashboard
// =========================================================

#[tokio::test]
async fn range_change_refetches_and_replaces_figures() {
    let api = MockApi::new();
    let mut state = DashboardState::new();

    let initial = state.refresh();
    let result = load_dashboard(&api, initial).await;
    assert_eq!(state.apply(initial, result), StatsUpdate::Loaded);

    let month = state.select_range(TimeRange::Month);
    let result = load_dashboard(&api, month).await;
    assert_eq!(state.apply(month, result), StatsUpdate::Loaded);

    assert_eq!(api.log(), vec!["dashboard_stats:week", "dashboard_stats:month"]);
    assert_eq!(state.stats.as_ref().map(|s| s.total_products), Some(30));
}

#[tokio::test]
async fn late_response_for_an_old_range_is_ignored() {
    let api = MockApi::new();
    let mut state = DashboardState::new();

    let week = state.refresh();
    let year = state.select_range(TimeRange::Year);

    let year_result = load_dashboard(&api, year).await;
    let week_result = load_dashboard(&api, week).await;
    assert_eq!(state.apply(year, year_result), StatsUpdate::Loaded);
    assert_eq!(state.apply(week, week_result), StatsUpdate::Stale);
    assert_eq!(state.stats.as_ref().map(|s| s.total_products), Some(365));
}

#[tokio::test]
async fn dashboard_failure_clears_figures() {
    let api = MockApi::new();
    let mut state = DashboardState::new();
    let first = state.refresh();
    let result = load_dashboard(&api, first).await;
    state.apply(first, result);

    api.fail("dashboard_stats", ApiError::Network("offline".to_string()));
    let second = state.refresh();
    let result = load_dashboard(&api, second).await;
    assert_eq!(state.apply(second, result), StatsUpdate::Failed);
    assert_eq!(state.stats, None);
}
