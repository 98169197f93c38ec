use inventory_shared::StockLevel;
use leptos::prelude::*;
use rust_decimal::Decimal;

/// 库存数量徽章，颜色随库存水位变化
#[component]
pub fn StockBadge(quantity: Decimal) -> impl IntoView {
    let class = match StockLevel::classify(quantity) {
        StockLevel::InStock => "badge badge-success badge-sm",
        StockLevel::Low => "badge badge-warning badge-sm",
        StockLevel::OutOfStock => "badge badge-error badge-sm",
    };
    let title = StockLevel::classify(quantity).label();

    view! { <span class=class title=title>{quantity.normalize().to_string()}</span> }
}
