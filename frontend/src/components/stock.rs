//! 库存管理页面
//!
//! 四个标签页：当前库存、入库、出库、流水。标签页写入 `?action=`，
//! 切换时只同步地址栏，不重新挂载页面。

pub mod filters;
pub mod form_state;

use crate::auth::use_api;
use crate::components::icons::*;
use crate::components::layout::Layout;
use crate::components::notice::NoticeToast;
use crate::components::stock_badge::StockBadge;
use crate::notice::Notice;
use crate::web::route::{AppRoute, StockTab};
use crate::web::router::use_router;
use crate::workflow::{self, StockOutcome};
use inventory_shared::date::format_timestamp;
use inventory_shared::{ProductVariant, StockReportEntry, TransactionType, VariantId};
use leptos::prelude::*;
use leptos::task::spawn_local;
use rust_decimal::Decimal;

use filters::{HistoryFilter, search_variants};
use form_state::StockForm;

/// 所选变体最后一次拉取到的库存
fn available_stock(variants: &[ProductVariant], id: Option<VariantId>) -> Option<Decimal> {
    let id = id?;
    variants.iter().find(|v| v.id == id).map(|v| v.current_stock)
}

#[component]
pub fn StockPage(tab: StockTab) -> impl IntoView {
    let api = use_api();
    let router = use_router();

    let active_tab = RwSignal::new(tab);
    let variants = RwSignal::new(Vec::<ProductVariant>::new());
    let loading = RwSignal::new(false);
    let notice = RwSignal::new(Option::<Notice>::None);
    // 出入库成功后重新拉取库存
    let reload = RwSignal::new(0u32);

    let add_form = RwSignal::new(StockForm::new(TransactionType::In));
    let remove_form = RwSignal::new(StockForm::new(TransactionType::Out));

    Effect::new(move |_| {
        reload.track();
        loading.set(true);
        let api = api.clone();
        spawn_local(async move {
            match workflow::load_stock_variants(&api).await {
                Ok(list) => variants.set(list),
                Err(n) => notice.set(Some(n)),
            }
            loading.set(false);
        });
    });

    let switch_tab = move |next: StockTab| {
        active_tab.set(next);
        router.sync_location(&AppRoute::Stock(next));
    };

    // 通过标签页进入的表单不锁定变体
    let open_tab = move |next: StockTab| {
        match next {
            StockTab::Add => add_form.set(StockForm::new(TransactionType::In)),
            StockTab::Remove => remove_form.set(StockForm::new(TransactionType::Out)),
            StockTab::View | StockTab::History => {}
        }
        switch_tab(next);
    };

    let preselect = Callback::new(move |(direction, id): (TransactionType, VariantId)| {
        match direction {
            TransactionType::In => {
                add_form.set(StockForm::preselected(direction, id));
                switch_tab(StockTab::Add);
            }
            TransactionType::Out => {
                remove_form.set(StockForm::preselected(direction, id));
                switch_tab(StockTab::Remove);
            }
        }
    });

    let on_recorded = Callback::new(move |_: ()| reload.update(|r| *r += 1));

    let tabs = StockTab::ALL
        .into_iter()
        .map(|t| {
            view! {
                <a
                    role="tab"
                    class=move || if active_tab.get() == t { "tab tab-active" } else { "tab" }
                    on:click=move |_| open_tab(t)
                >
                    {t.label()}
                </a>
            }
        })
        .collect_view();

    view! {
        <Layout>
            <NoticeToast notice=notice />

            <div class="flex flex-wrap items-center justify-between gap-4">
                <h2 class="text-2xl font-bold">"Stock Management"</h2>
                <button
                    class="btn btn-ghost btn-circle"
                    disabled=move || loading.get()
                    on:click=move |_| reload.update(|r| *r += 1)
                >
                    <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                </button>
            </div>

            <div role="tablist" class="tabs tabs-boxed bg-base-100 shadow">{tabs}</div>

            {move || match active_tab.get() {
                StockTab::View => view! {
                    <StockView variants=variants loading=loading on_preselect=preselect />
                }.into_any(),
                StockTab::Add => view! {
                    <StockFormPanel form=add_form variants=variants notice=notice on_recorded=on_recorded />
                }.into_any(),
                StockTab::Remove => view! {
                    <StockFormPanel form=remove_form variants=variants notice=notice on_recorded=on_recorded />
                }.into_any(),
                StockTab::History => view! { <HistoryPanel notice=notice /> }.into_any(),
            }}
        </Layout>
    }
}

#[component]
fn StockView(
    variants: RwSignal<Vec<ProductVariant>>,
    loading: RwSignal<bool>,
    on_preselect: Callback<(TransactionType, VariantId)>,
) -> impl IntoView {
    let query = RwSignal::new(String::new());

    let rows = move || {
        let query = query.get();
        variants.with(|list| {
            search_variants(list, &query)
                .into_iter()
                .map(|v| {
                    let id = v.id;
                    let options = v
                        .options
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    view! {
                        <tr>
                            <td>{v.product_name.clone()}</td>
                            <td class="font-mono text-sm">{v.sku.clone()}</td>
                            <td class="text-sm text-base-content/70">{options}</td>
                            <td class="text-right"><StockBadge quantity=v.current_stock /></td>
                            <td>
                                <div class="flex justify-end gap-1">
                                    <button
                                        class="btn btn-success btn-xs gap-1"
                                        on:click=move |_| on_preselect.run((TransactionType::In, id))
                                    >
                                        <Plus attr:class="h-3 w-3" /> "Add"
                                    </button>
                                    <button
                                        class="btn btn-error btn-xs gap-1"
                                        on:click=move |_| on_preselect.run((TransactionType::Out, id))
                                    >
                                        <Minus attr:class="h-3 w-3" /> "Remove"
                                    </button>
                                </div>
                            </td>
                        </tr>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="p-4">
                    <label class="input input-bordered input-sm flex items-center gap-2 max-w-sm">
                        <Search attr:class="h-4 w-4 opacity-70" />
                        <input
                            type="search"
                            class="grow"
                            placeholder="Search by product or SKU"
                            on:input=move |ev| query.set(event_target_value(&ev))
                            prop:value=query
                        />
                    </label>
                </div>
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Product"</th>
                                <th>"SKU"</th>
                                <th>"Options"</th>
                                <th class="text-right">"Stock"</th>
                                <th class="text-right">"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show
                                when=move || !variants.with(Vec::is_empty)
                                fallback=move || view! {
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            {move || if loading.get() { "Loading..." } else { "No product variants" }}
                                        </td>
                                    </tr>
                                }
                            >
                                {rows}
                            </Show>
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}

#[component]
fn StockFormPanel(
    form: RwSignal<StockForm>,
    variants: RwSignal<Vec<ProductVariant>>,
    notice: RwSignal<Option<Notice>>,
    on_recorded: Callback<()>,
) -> impl IntoView {
    let api = use_api();
    let submitting = RwSignal::new(false);

    let direction = form.with_untracked(|f| f.direction);
    let (title, button_class, button_label) = match direction {
        TransactionType::In => ("Add Stock", "btn btn-success", "Add Stock"),
        TransactionType::Out => ("Remove Stock", "btn btn-error", "Remove Stock"),
    };

    let available =
        move || variants.with(|list| available_stock(list, form.with(|f| f.variant)));
    let errors = move || form.with(|f| f.visible_errors(available()));

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let mut draft = form.get_untracked();
        let stock = variants.with_untracked(|list| available_stock(list, draft.variant));
        submitting.set(true);
        let api = api.clone();
        spawn_local(async move {
            let outcome = workflow::submit_stock_form(&api, &mut draft, stock).await;
            form.set(draft);
            submitting.set(false);
            match outcome {
                StockOutcome::Invalid => {}
                StockOutcome::Recorded(n) => {
                    notice.set(Some(n));
                    on_recorded.run(());
                }
                StockOutcome::Failed(n) => notice.set(Some(n)),
            }
        });
    };

    let options = move || {
        variants.with(|list| {
            list.iter()
                .map(|v| {
                    let value = v.id.to_string();
                    let selected = form.with(|f| f.variant == Some(v.id));
                    view! {
                        <option value=value selected=selected>
                            {format!("{} ({}) - {}", v.product_name, v.sku, v.current_stock.normalize())}
                        </option>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <div class="card bg-base-100 shadow-xl max-w-xl">
            <form class="card-body space-y-2" on:submit=on_submit>
                <h3 class="card-title">{title}</h3>
                <fieldset class="space-y-2" disabled=move || submitting.get()>
                    <div class="form-control">
                        <label for="stock_variant" class="label">
                            <span class="label-text">"Product Variant"</span>
                        </label>
                        <select id="stock_variant"
                            class="select select-bordered w-full"
                            disabled=move || form.with(|f| f.locked)
                            on:change=move |ev| {
                                let id = event_target_value(&ev).parse().ok();
                                form.update(|f| f.set_variant(id));
                            }
                        >
                            <option value="" selected=move || form.with(|f| f.variant.is_none())>
                                "Select a variant"
                            </option>
                            {options}
                        </select>
                        <label class="label">
                            {move || errors().variant.map(|e| view! { <span class="label-text-alt text-error">{e}</span> })}
                            {move || available().map(|q| view! {
                                <span class="label-text-alt">{format!("Available: {}", q.normalize())}</span>
                            })}
                        </label>
                    </div>

                    <div class="form-control">
                        <label for="stock_quantity" class="label">
                            <span class="label-text">"Quantity"</span>
                        </label>
                        <input id="stock_quantity"
                            type="text"
                            inputmode="decimal"
                            on:input=move |ev| form.update(|f| f.quantity = event_target_value(&ev))
                            prop:value=move || form.with(|f| f.quantity.clone())
                            class=move || if errors().quantity.is_some() { "input input-bordered input-error w-full" } else { "input input-bordered w-full" }
                        />
                        {move || errors().quantity.map(|e| view! {
                            <label class="label"><span class="label-text-alt text-error">{e}</span></label>
                        })}
                    </div>

                    <div class="form-control">
                        <label for="stock_notes" class="label">
                            <span class="label-text">"Notes"</span>
                        </label>
                        <textarea id="stock_notes"
                            class="textarea textarea-bordered"
                            rows="3"
                            on:input=move |ev| form.update(|f| f.notes = event_target_value(&ev))
                            prop:value=move || form.with(|f| f.notes.clone())
                        ></textarea>
                    </div>

                    <div class="card-actions justify-end pt-2">
                        <button type="submit" class=button_class>
                            <Show when=move || submitting.get()>
                                <span class="loading loading-spinner"></span>
                            </Show>
                            {button_label}
                        </button>
                    </div>
                </fieldset>
            </form>
        </div>
    }
}

#[component]
fn HistoryPanel(notice: RwSignal<Option<Notice>>) -> impl IntoView {
    let api = use_api();
    let filter = RwSignal::new(HistoryFilter::default());
    let entries = RwSignal::new(Vec::<StockReportEntry>::new());
    let loading = RwSignal::new(false);

    let fetch = move || {
        let current = filter.get_untracked();
        loading.set(true);
        let api = api.clone();
        spawn_local(async move {
            match workflow::load_stock_history(&api, &current).await {
                Ok(list) => entries.set(list),
                Err(n) => notice.set(Some(n)),
            }
            loading.set(false);
        });
    };

    fetch();

    let rows = move || {
        let sku_filter = filter.get();
        entries.with(|list| {
            sku_filter
                .apply(list)
                .into_iter()
                .map(|entry| {
                    let badge = match entry.transaction_type {
                        TransactionType::In => "badge badge-success badge-sm",
                        TransactionType::Out => "badge badge-error badge-sm",
                    };
                    view! {
                        <tr>
                            <td class="whitespace-nowrap">{format_timestamp(&entry.created_at)}</td>
                            <td>{entry.product_name.clone()}</td>
                            <td class="font-mono text-sm">{entry.sku.clone()}</td>
                            <td><span class=badge>{entry.transaction_type.as_str()}</span></td>
                            <td class="text-right">{entry.quantity.normalize().to_string()}</td>
                            <td class="text-sm text-base-content/70">{entry.notes.clone().unwrap_or_default()}</td>
                        </tr>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <form
                    class="flex flex-wrap items-end gap-4 p-4"
                    on:submit={
                        let fetch = fetch.clone();
                        move |ev: leptos::web_sys::SubmitEvent| {
                            ev.prevent_default();
                            fetch();
                        }
                    }
                >
                    <div class="form-control">
                        <label for="history_start" class="label"><span class="label-text">"Start Date"</span></label>
                        <input id="history_start"
                            type="date"
                            class="input input-bordered input-sm"
                            on:input=move |ev| filter.update(|f| f.start = event_target_value(&ev))
                            prop:value=move || filter.with(|f| f.start.clone())
                        />
                    </div>
                    <div class="form-control">
                        <label for="history_end" class="label"><span class="label-text">"End Date"</span></label>
                        <input id="history_end"
                            type="date"
                            class="input input-bordered input-sm"
                            on:input=move |ev| filter.update(|f| f.end = event_target_value(&ev))
                            prop:value=move || filter.with(|f| f.end.clone())
                        />
                    </div>
                    <div class="form-control">
                        <label for="history_sku" class="label"><span class="label-text">"SKU"</span></label>
                        <input id="history_sku"
                            type="search"
                            placeholder="Filter by SKU"
                            class="input input-bordered input-sm"
                            on:input=move |ev| filter.update(|f| f.sku = event_target_value(&ev))
                            prop:value=move || filter.with(|f| f.sku.clone())
                        />
                    </div>
                    <button type="submit" class="btn btn-primary btn-sm" disabled=move || loading.get()>
                        "Apply"
                    </button>
                </form>

                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Date"</th>
                                <th>"Product"</th>
                                <th>"SKU"</th>
                                <th>"Type"</th>
                                <th class="text-right">"Quantity"</th>
                                <th>"Notes"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show
                                when=move || !entries.with(Vec::is_empty)
                                fallback=move || view! {
                                    <tr>
                                        <td colspan="6" class="text-center py-8 text-base-content/50">
                                            {move || if loading.get() { "Loading..." } else { "No transactions found" }}
                                        </td>
                                    </tr>
                                }
                            >
                                {rows}
                            </Show>
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}
