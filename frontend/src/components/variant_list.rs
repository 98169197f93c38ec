//! 商品的可售变体 (SKU) 列表页
//!
//! 支持新建、修改 SKU、删除，以及让服务端按选项组合批量生成变体。

pub mod draft;

use crate::auth::use_api;
use crate::components::confirm::ConfirmDialog;
use crate::components::icons::*;
use crate::components::layout::Layout;
use crate::components::notice::NoticeToast;
use crate::components::stock_badge::StockBadge;
use crate::notice::Notice;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use crate::workflow;
use inventory_shared::{Product, ProductId, ProductVariant, VariantId};
use leptos::prelude::*;
use leptos::task::spawn_local;

use draft::NewVariantDraft;

/// 用新结果替换同 id 的变体，其余追加到末尾
fn merge_variants(existing: &mut Vec<ProductVariant>, incoming: Vec<ProductVariant>) {
    for variant in incoming {
        match existing.iter_mut().find(|v| v.id == variant.id) {
            Some(slot) => *slot = variant,
            None => existing.push(variant),
        }
    }
}

#[component]
pub fn VariantListPage(product_id: ProductId) -> impl IntoView {
    let api = use_api();

    let product = RwSignal::new(Option::<Product>::None);
    let variants = RwSignal::new(Vec::<ProductVariant>::new());
    let loading = RwSignal::new(true);
    let notice = RwSignal::new(Option::<Notice>::None);

    let editing = RwSignal::new(Option::<(VariantId, String)>::None);
    let pending_delete = RwSignal::new(Option::<ProductVariant>::None);
    let show_add = RwSignal::new(false);
    let draft = RwSignal::new(NewVariantDraft::default());
    let busy = RwSignal::new(false);

    {
        let api = api.clone();
        spawn_local(async move {
            match workflow::load_variant_page(&api, product_id).await {
                Ok((p, list)) => {
                    product.set(Some(p));
                    variants.set(list);
                }
                Err(n) => notice.set(Some(n)),
            }
            loading.set(false);
        });
    }

    let on_generate = {
        let api = api.clone();
        move |_| {
            busy.set(true);
            let api = api.clone();
            spawn_local(async move {
                match workflow::generate_variants(&api, product_id).await {
                    Ok((generated, n)) => {
                        variants.update(|list| merge_variants(list, generated));
                        notice.set(Some(n));
                    }
                    Err(n) => notice.set(Some(n)),
                }
                busy.set(false);
            });
        }
    };

    let on_create = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let Some(current) = product.get_untracked() else {
                return;
            };
            busy.set(true);
            let api = api.clone();
            let request = draft.get_untracked();
            spawn_local(async move {
                match workflow::create_variant(&api, &current, &request).await {
                    Ok((created, n)) => {
                        variants.update(|list| list.push(created));
                        draft.set(NewVariantDraft::default());
                        show_add.set(false);
                        notice.set(Some(n));
                    }
                    Err(n) => notice.set(Some(n)),
                }
                busy.set(false);
            });
        }
    };

    let on_save_sku = Callback::new({
        let api = api.clone();
        move |variant: ProductVariant| {
            let Some((_, sku)) = editing.get_untracked() else {
                return;
            };
            busy.set(true);
            let api = api.clone();
            spawn_local(async move {
                match workflow::update_variant_sku(&api, &variant, &sku).await {
                    Ok((updated, n)) => {
                        variants.update(|list| merge_variants(list, vec![updated]));
                        editing.set(None);
                        notice.set(Some(n));
                    }
                    Err(n) => notice.set(Some(n)),
                }
                busy.set(false);
            });
        }
    });

    let on_confirm_delete = move |_: ()| {
        let Some(variant) = pending_delete.get_untracked() else {
            return;
        };
        busy.set(true);
        let api = api.clone();
        spawn_local(async move {
            match workflow::delete_variant(&api, variant.id).await {
                Ok((id, n)) => {
                    variants.update(|list| list.retain(|v| v.id != id));
                    notice.set(Some(n));
                }
                Err(n) => notice.set(Some(n)),
            }
            pending_delete.set(None);
            busy.set(false);
        });
    };

    let delete_message = Signal::derive(move || {
        pending_delete.with(|v| {
            v.as_ref()
                .map(|v| format!("Delete variant {}? This cannot be undone.", v.sku))
                .unwrap_or_default()
        })
    });

    view! {
        <Layout>
            <NoticeToast notice=notice />

            <div class="flex flex-wrap items-center justify-between gap-4">
                <div class="flex items-center gap-4">
                    <Link to=AppRoute::Products class="btn btn-ghost btn-sm btn-circle">
                        <ArrowLeft attr:class="h-5 w-5" />
                    </Link>
                    <div>
                        <h2 class="text-2xl font-bold">
                            {move || product.with(|p| p.as_ref().map(|p| p.name.clone()).unwrap_or_else(|| "Product Variants".to_string()))}
                        </h2>
                        <p class="text-sm text-base-content/60 font-mono">
                            {move || product.with(|p| p.as_ref().map(|p| p.code.clone()).unwrap_or_default())}
                        </p>
                    </div>
                </div>
                <div class="flex items-center gap-2">
                    <Link to=AppRoute::ProductEdit(product_id) class="btn btn-ghost btn-sm gap-2">
                        <Pencil attr:class="h-4 w-4" /> "Edit Product"
                    </Link>
                    <button
                        class="btn btn-outline btn-sm gap-2"
                        disabled=move || busy.get() || product.with(Option::is_none)
                        on:click=on_generate
                    >
                        <Sparkles attr:class="h-4 w-4" /> "Generate Variants"
                    </button>
                    <button
                        class="btn btn-primary btn-sm gap-2"
                        disabled=move || product.with(Option::is_none)
                        on:click=move |_| show_add.set(true)
                    >
                        <Plus attr:class="h-4 w-4" /> "Add Variant"
                    </button>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
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
                                            <td colspan="4" class="text-center py-8 text-base-content/50">
                                                {move || if loading.get() { "Loading..." } else { "No variants yet" }}
                                            </td>
                                        </tr>
                                    }
                                >
                                    <For
                                        each=move || variants.get()
                                        key=|v| (v.id, v.sku.clone(), v.current_stock)
                                        children=move |variant| view! {
                                            <VariantRow
                                                variant=variant
                                                editing=editing
                                                pending_delete=pending_delete
                                                busy=busy
                                                on_save=on_save_sku
                                            />
                                        }
                                    />
                                </Show>
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>

            // 新建变体
            <div class=move || if show_add.get() { "modal modal-open" } else { "modal" }>
                <div class="modal-box">
                    <h3 class="font-bold text-lg">"Add Variant"</h3>
                    <form on:submit=on_create class="space-y-4 pt-4">
                        <div class="form-control">
                            <label for="variant_name" class="label">
                                <span class="label-text">"Variant Name"</span>
                            </label>
                            <input id="variant_name"
                                type="text"
                                placeholder="Large / Red"
                                on:input=move |ev| draft.update(|d| d.name = event_target_value(&ev))
                                prop:value=move || draft.with(|d| d.name.clone())
                                class="input input-bordered w-full"
                            />
                            <label class="label">
                                <span class="label-text-alt font-mono">
                                    {move || {
                                        let code = product.with(|p| p.as_ref().map(|p| p.code.clone()).unwrap_or_default());
                                        let name = draft.with(|d| d.name.clone());
                                        format!("SKU: {}", inventory_shared::derive_sku(&code, name.trim()))
                                    }}
                                </span>
                            </label>
                        </div>

                        <div class="space-y-2">
                            <span class="label-text">"Options"</span>
                            {move || {
                                (0..draft.with(|d| d.options.len()))
                                    .map(|i| view! {
                                        <div class="flex gap-2">
                                            <input
                                                type="text"
                                                on:input=move |ev| draft.update(|d| d.set_option(i, event_target_value(&ev)))
                                                prop:value=move || draft.with(|d| d.options.get(i).cloned().unwrap_or_default())
                                                class="input input-bordered input-sm flex-1"
                                            />
                                            <button
                                                type="button"
                                                class="btn btn-ghost btn-sm"
                                                on:click=move |_| draft.update(|d| d.remove_option(i))
                                            >
                                                <Minus attr:class="h-4 w-4" />
                                            </button>
                                        </div>
                                    })
                                    .collect_view()
                            }}
                            <button
                                type="button"
                                class="btn btn-ghost btn-xs gap-1"
                                on:click=move |_| draft.update(|d| d.add_option())
                            >
                                <Plus attr:class="h-3 w-3" /> "Add Option"
                            </button>
                        </div>

                        <div class="modal-action">
                            <button
                                type="button"
                                class="btn btn-ghost"
                                disabled=move || busy.get()
                                on:click=move |_| show_add.set(false)
                            >
                                "Cancel"
                            </button>
                            <button
                                type="submit"
                                class="btn btn-primary"
                                disabled=move || busy.get() || !draft.with(|d| d.can_submit())
                            >
                                "Create"
                            </button>
                        </div>
                    </form>
                </div>
            </div>

            <ConfirmDialog
                open=Signal::derive(move || pending_delete.with(Option::is_some))
                title="Delete Variant"
                message=delete_message
                busy=busy
                on_confirm=on_confirm_delete
                on_cancel=move |_: ()| pending_delete.set(None)
            />
        </Layout>
    }
}

#[component]
fn VariantRow(
    variant: ProductVariant,
    editing: RwSignal<Option<(VariantId, String)>>,
    pending_delete: RwSignal<Option<ProductVariant>>,
    busy: RwSignal<bool>,
    on_save: Callback<ProductVariant>,
) -> impl IntoView {
    let id = variant.id;
    let is_editing = move || editing.with(|e| matches!(e, Some((current, _)) if *current == id));
    let options = variant
        .options
        .iter()
        .map(|label| view! { <span class="badge badge-ghost badge-sm">{label.to_string()}</span> })
        .collect_view();

    let sku = variant.sku.clone();
    let for_save = variant.clone();
    let for_delete = variant.clone();

    view! {
        <tr>
            <td class="font-mono text-sm">
                <Show
                    when=is_editing
                    fallback=move || view! { <span>{sku.clone()}</span> }
                >
                    <input
                        type="text"
                        class="input input-bordered input-xs w-full max-w-xs font-mono"
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            editing.update(|e| if let Some((_, sku)) = e { *sku = value });
                        }
                        prop:value=move || editing.with(|e| e.as_ref().map(|(_, s)| s.clone()).unwrap_or_default())
                    />
                </Show>
            </td>
            <td><div class="flex flex-wrap gap-1">{options}</div></td>
            <td class="text-right"><StockBadge quantity=variant.current_stock /></td>
            <td>
                <div class="flex justify-end gap-1">
                    <Show
                        when=is_editing
                        fallback={
                            let variant = variant.clone();
                            move || {
                                let start = (variant.id, variant.sku.clone());
                                view! {
                                    <button
                                        class="btn btn-ghost btn-xs"
                                        title="Edit SKU"
                                        on:click=move |_| editing.set(Some(start.clone()))
                                    >
                                        <Pencil attr:class="h-4 w-4" />
                                    </button>
                                }
                            }
                        }
                    >
                        {
                            let for_save = for_save.clone();
                            view! {
                                <button
                                    class="btn btn-primary btn-xs"
                                    disabled=move || busy.get()
                                    on:click=move |_| on_save.run(for_save.clone())
                                >
                                    "Save"
                                </button>
                                <button class="btn btn-ghost btn-xs" on:click=move |_| editing.set(None)>
                                    "Cancel"
                                </button>
                            }
                        }
                    </Show>
                    <button
                        class="btn btn-ghost btn-xs text-error"
                        title="Delete"
                        on:click=move |_| pending_delete.set(Some(for_delete.clone()))
                    >
                        <Trash attr:class="h-4 w-4" />
                    </button>
                </div>
            </td>
        </tr>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn variant(id: u128, sku: &str, stock: i64) -> ProductVariant {
        ProductVariant {
            id: Uuid::from_u128(id),
            product: Uuid::from_u128(1),
            sku: sku.to_string(),
            options: Vec::new(),
            current_stock: Decimal::from(stock),
            product_name: "T-Shirt".to_string(),
        }
    }

    #[test]
    fn merge_replaces_matching_ids_and_appends_new_ones() {
        let mut list = vec![variant(10, "TS-S", 3), variant(11, "TS-M", 0)];
        merge_variants(&mut list, vec![variant(11, "TS-M2", 5), variant(12, "TS-L", 0)]);

        let skus: Vec<&str> = list.iter().map(|v| v.sku.as_str()).collect();
        assert_eq!(skus, ["TS-S", "TS-M2", "TS-L"]);
        assert_eq!(list[1].current_stock, Decimal::from(5));
    }

    #[test]
    fn merge_into_empty_list_keeps_server_order() {
        let mut list = Vec::new();
        merge_variants(&mut list, vec![variant(2, "B", 0), variant(1, "A", 0)]);
        assert_eq!(list[0].id, Uuid::from_u128(2));
        assert_eq!(list[1].id, Uuid::from_u128(1));
    }
}
