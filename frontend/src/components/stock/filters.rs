//! 库存页的客户端过滤
//!
//! 服务端只按日期过滤流水，SKU 过滤与变体搜索都在客户端完成。

use inventory_shared::date::{PeriodError, ReportPeriod, parse_date_input};
use inventory_shared::{ProductVariant, StockReportEntry};

/// 库存流水的过滤条件，字段保存 `<input>` 的原始值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub start: String,
    pub end: String,
    pub sku: String,
}

impl HistoryFilter {
    /// 发送给服务端的日期区间，无法解析的日期视为未填写
    pub fn period(&self) -> Result<ReportPeriod, PeriodError> {
        ReportPeriod::new(parse_date_input(&self.start), parse_date_input(&self.end))
    }

    pub fn matches(&self, entry: &StockReportEntry) -> bool {
        contains_ignore_case(&entry.sku, &self.sku)
    }

    pub fn apply<'a>(&self, entries: &'a [StockReportEntry]) -> Vec<&'a StockReportEntry> {
        entries.iter().filter(|entry| self.matches(entry)).collect()
    }
}

/// 按商品名或 SKU 搜索变体
pub fn search_variants<'a>(variants: &'a [ProductVariant], query: &str) -> Vec<&'a ProductVariant> {
    variants
        .iter()
        .filter(|v| contains_ignore_case(&v.product_name, query) || contains_ignore_case(&v.sku, query))
        .collect()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
