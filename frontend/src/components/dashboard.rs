pub mod view_state;

use crate::auth::use_api;
use crate::components::icons::*;
use crate::components::layout::Layout;
use crate::components::notice::NoticeToast;
use crate::notice::Notice;
use crate::workflow::{DASHBOARD_LOAD_FAILED, load_dashboard};
use inventory_shared::date::format_timestamp;
use inventory_shared::{DashboardStats, TimeRange, TransactionType};
use leptos::prelude::*;
use leptos::task::spawn_local;

use view_state::{DashboardState, StatsUpdate};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = use_api();
    let state = RwSignal::new(DashboardState::new());
    let notice = RwSignal::new(Option::<Notice>::None);

    // None 表示按当前范围刷新
    let request = move |range: Option<TimeRange>| {
        let ticket = state.try_update(|s| match range {
            Some(range) => s.select_range(range),
            None => s.refresh(),
        });
        let Some(ticket) = ticket else { return };
        let api = api.clone();
        spawn_local(async move {
            let result = load_dashboard(&api, ticket).await;
            if state.try_update(|s| s.apply(ticket, result)) == Some(StatsUpdate::Failed) {
                notice.set(Some(Notice::error(DASHBOARD_LOAD_FAILED)));
            }
        });
    };

    // 初始加载
    request(None);

    let loading = move || state.with(|s| s.loading);
    let stats = move || state.with(|s| s.stats.clone());

    let range_buttons = {
        let request = request.clone();
        TimeRange::ALL
            .into_iter()
            .map(|range| {
                let request = request.clone();
                view! {
                    <button
                        class=move || if state.with(|s| s.range == range) { "btn btn-sm join-item btn-primary" } else { "btn btn-sm join-item" }
                        on:click=move |_| request(Some(range))
                    >
                        {range.label()}
                    </button>
                }
            })
            .collect_view()
    };

    view! {
        <Layout>
            <NoticeToast notice=notice />

            <div class="flex flex-wrap items-center justify-between gap-4">
                <h2 class="text-2xl font-bold">"Dashboard"</h2>
                <div class="flex items-center gap-2">
                    <div class="join">{range_buttons}</div>
                    <button
                        on:click=move |_| request(None)
                        disabled=loading
                        class="btn btn-ghost btn-circle"
                    >
                        <RefreshCw attr:class=move || if loading() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                    </button>
                </div>
            </div>

            {move || match stats() {
                Some(stats) => view! { <StatsPanels stats=stats shares=state.with(|s| s.stock_shares()) /> }.into_any(),
                None if loading() => view! {
                    <div class="flex justify-center py-16">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }.into_any(),
                None => view! {
                    <div class="text-center py-16 text-base-content/50">"No data available"</div>
                }.into_any(),
            }}
        </Layout>
    }
}

#[component]
fn StatsPanels(stats: DashboardStats, shares: inventory_shared::StockStatusShare) -> impl IntoView {
    let status = stats.stock_status;

    let recent = stats
        .recent_transactions
        .iter()
        .take(5)
        .map(|tx| {
            let badge = match tx.transaction_type {
                TransactionType::In => "badge badge-success",
                TransactionType::Out => "badge badge-error",
            };
            view! {
                <tr>
                    <td>{format_timestamp(&tx.created_at)}</td>
                    <td>{tx.product_name.clone()}</td>
                    <td class="font-mono text-sm">{tx.sku.clone()}</td>
                    <td><span class=badge>{tx.transaction_type.as_str()}</span></td>
                    <td class="text-right">{tx.quantity.normalize().to_string()}</td>
                </tr>
            }
        })
        .collect_view();

    let trends = stats
        .stock_trends
        .iter()
        .map(|point| {
            view! {
                <tr>
                    <td>{point.label.clone()}</td>
                    <td class="text-right text-success">{format!("{:.0}", point.stock_in)}</td>
                    <td class="text-right text-error">{format!("{:.0}", point.stock_out)}</td>
                </tr>
            }
        })
        .collect_view();

    let categories = stats
        .category_distribution
        .iter()
        .map(|share| {
            view! {
                <tr>
                    <td>{share.name.clone()}</td>
                    <td class="text-right">{format!("{:.0}", share.value)}</td>
                </tr>
            }
        })
        .collect_view();

    let value_history = stats
        .inventory_value_history
        .iter()
        .map(|point| {
            view! {
                <tr>
                    <td>{point.label.clone()}</td>
                    <td class="text-right">{format!("{:.2}", point.value)}</td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-figure text-primary"><Package attr:class="h-8 w-8" /></div>
                <div class="stat-title">"Total Products"</div>
                <div class="stat-value text-primary">{stats.total_products}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Inventory Value"</div>
                <div class="stat-value text-secondary">{format!("{:.2}", stats.inventory_value)}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Low Stock Items"</div>
                <div class="stat-value text-warning">{stats.low_stock_items}</div>
            </div>
        </div>

        <div class="grid gap-8 md:grid-cols-2">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Stock Status"</h3>
                    <StatusRow label="In Stock" count=status.in_stock percent=shares.in_stock bar="progress progress-success" />
                    <StatusRow label="Low Stock" count=status.low_stock percent=shares.low_stock bar="progress progress-warning" />
                    <StatusRow label="Out of Stock" count=status.out_of_stock percent=shares.out_of_stock bar="progress progress-error" />
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <h3 class="card-title p-6 pb-2">"Recent Transactions"</h3>
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Date"</th>
                                    <th>"Product"</th>
                                    <th>"SKU"</th>
                                    <th>"Type"</th>
                                    <th class="text-right">"Quantity"</th>
                                </tr>
                            </thead>
                            <tbody>{recent}</tbody>
                        </table>
                    </div>
                </div>
            </div>

            <SeriesTable title="Stock Trends" headers=vec!["Period", "Stock In", "Stock Out"]>
                {trends}
            </SeriesTable>
            <SeriesTable title="Category Distribution" headers=vec!["Category", "Value"]>
                {categories}
            </SeriesTable>
            <SeriesTable title="Inventory Value History" headers=vec!["Period", "Value"]>
                {value_history}
            </SeriesTable>
        </div>
    }
}

#[component]
fn StatusRow(
    label: &'static str,
    count: u64,
    percent: f64,
    bar: &'static str,
) -> impl IntoView {
    view! {
        <div>
            <div class="flex justify-between text-sm">
                <span>{label}</span>
                <span>{format!("{} ({:.1}%)", count, percent)}</span>
            </div>
            <progress class=bar value=format!("{:.1}", percent) max="100"></progress>
        </div>
    }
}

#[component]
fn SeriesTable(title: &'static str, headers: Vec<&'static str>, children: Children) -> impl IntoView {
    let head = headers
        .into_iter()
        .enumerate()
        .map(|(i, h)| {
            let class = if i == 0 { "" } else { "text-right" };
            view! { <th class=class>{h}</th> }
        })
        .collect_view();

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <h3 class="card-title p-6 pb-2">{title}</h3>
                <div class="overflow-x-auto w-full max-h-80">
                    <table class="table table-zebra table-sm w-full">
                        <thead><tr>{head}</tr></thead>
                        <tbody>{children()}</tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}
