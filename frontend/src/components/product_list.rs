use crate::auth::use_api;
use crate::config::use_config;
use crate::components::confirm::ConfirmDialog;
use crate::components::icons::*;
use crate::components::layout::Layout;
use crate::components::notice::NoticeToast;
use crate::components::stock_badge::StockBadge;
use crate::notice::Notice;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use crate::workflow;
use inventory_shared::protocol::ListProductsRequest;
use inventory_shared::Product;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ProductListPage() -> impl IntoView {
    let api = use_api();
    let page_size = use_config().page_size;

    let query = RwSignal::new(ListProductsRequest {
        search: String::new(),
        page: 1,
    });
    let search_input = RwSignal::new(String::new());
    let products = RwSignal::new(Vec::<Product>::new());
    let total_pages = RwSignal::new(1u32);
    let total_count = RwSignal::new(0u64);
    let loading = RwSignal::new(false);
    let notice = RwSignal::new(Option::<Notice>::None);
    // 删除后重新拉取当前页
    let reload = RwSignal::new(0u32);

    let pending_delete = RwSignal::new(Option::<Product>::None);
    let deleting = RwSignal::new(false);

    {
        let api = api.clone();
        Effect::new(move |_| {
            let request = query.get();
            reload.track();
            loading.set(true);

            let api = api.clone();
            spawn_local(async move {
                let result = workflow::load_products(&api, &request).await;
                // 翻页或搜索条件已变，丢弃旧响应
                if query.get_untracked() != request {
                    return;
                }
                loading.set(false);
                match result {
                    Ok(page) => {
                        total_pages.set(page.total_pages(page_size));
                        total_count.set(page.count);
                        products.set(page.results);
                    }
                    Err(n) => {
                        products.set(Vec::new());
                        notice.set(Some(n));
                    }
                }
            });
        });
    }

    let on_search = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        query.set(ListProductsRequest {
            search: search_input.get_untracked(),
            page: 1,
        });
    };

    let go_to_page = move |page: u32| {
        query.update(|q| q.page = page.clamp(1, total_pages.get_untracked()));
    };

    let on_confirm_delete = move |_: ()| {
        let Some(product) = pending_delete.get_untracked() else {
            return;
        };
        deleting.set(true);
        let api = api.clone();
        spawn_local(async move {
            let result = workflow::delete_product(&api, product.id).await;
            deleting.set(false);
            pending_delete.set(None);
            match result {
                Ok(n) => {
                    notice.set(Some(n));
                    reload.update(|r| *r += 1);
                }
                Err(n) => notice.set(Some(n)),
            }
        });
    };

    let delete_message = Signal::derive(move || {
        pending_delete.with(|p| {
            p.as_ref()
                .map(|p| format!("Delete \"{}\" ({})? This cannot be undone.", p.name, p.code))
                .unwrap_or_default()
        })
    });

    view! {
        <Layout>
            <NoticeToast notice=notice />

            <div class="flex flex-wrap items-center justify-between gap-4">
                <div>
                    <h2 class="text-2xl font-bold">"Products"</h2>
                    <p class="text-sm text-base-content/60">{move || format!("{} products", total_count.get())}</p>
                </div>
                <div class="flex items-center gap-2">
                    <form on:submit=on_search class="join">
                        <input
                            type="search"
                            placeholder="Search products..."
                            class="input input-bordered input-sm join-item"
                            on:input=move |ev| search_input.set(event_target_value(&ev))
                            prop:value=search_input
                        />
                        <button type="submit" class="btn btn-sm join-item">
                            <Search attr:class="h-4 w-4" />
                        </button>
                    </form>
                    <Link to=AppRoute::ProductNew class="btn btn-primary btn-sm gap-2">
                        <Plus attr:class="h-4 w-4" /> "Add Product"
                    </Link>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Product"</th>
                                    <th>"Code"</th>
                                    <th>"HSN Code"</th>
                                    <th>"Status"</th>
                                    <th class="text-right">"Stock"</th>
                                    <th class="text-right">"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show
                                    when=move || !products.with(Vec::is_empty)
                                    fallback=move || view! {
                                        <tr>
                                            <td colspan="6" class="text-center py-8 text-base-content/50">
                                                {move || if loading.get() { "Loading..." } else { "No products found" }}
                                            </td>
                                        </tr>
                                    }
                                >
                                    <For
                                        each=move || products.get()
                                        key=|p| p.id
                                        children=move |product| {
                                            view! { <ProductRow product=product pending_delete=pending_delete /> }
                                        }
                                    />
                                </Show>
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>

            <div class="flex justify-center">
                <div class="join">
                    <button
                        class="join-item btn btn-sm"
                        disabled=move || query.with(|q| q.page <= 1)
                        on:click=move |_| go_to_page(query.get_untracked().page.saturating_sub(1))
                    >
                        "«"
                    </button>
                    <button class="join-item btn btn-sm btn-disabled">
                        {move || format!("Page {} of {}", query.with(|q| q.page), total_pages.get())}
                    </button>
                    <button
                        class="join-item btn btn-sm"
                        disabled=move || query.with(|q| q.page) >= total_pages.get()
                        on:click=move |_| go_to_page(query.get_untracked().page + 1)
                    >
                        "»"
                    </button>
                </div>
            </div>

            <ConfirmDialog
                open=Signal::derive(move || pending_delete.with(Option::is_some))
                title="Delete Product"
                message=delete_message
                busy=deleting
                on_confirm=on_confirm_delete
                on_cancel=move |_: ()| pending_delete.set(None)
            />
        </Layout>
    }
}

#[component]
fn ProductRow(product: Product, pending_delete: RwSignal<Option<Product>>) -> impl IntoView {
    let id = product.id;
    let stock = product.total_stock.unwrap_or_default();
    let status = if product.active {
        view! { <span class="badge badge-success badge-outline badge-sm">"Active"</span> }.into_any()
    } else {
        view! { <span class="badge badge-ghost badge-sm">"Inactive"</span> }.into_any()
    };
    let variant_count = product.variants.len();
    let to_delete = product.clone();

    view! {
        <tr>
            <td>
                <div class="flex items-center gap-3">
                    {product.image.clone().filter(|url| !url.trim().is_empty()).map(|url| view! {
                        <div class="avatar">
                            <div class="mask mask-squircle w-10 h-10">
                                <img src=url alt="" />
                            </div>
                        </div>
                    })}
                    <div>
                        <div class="font-bold">
                            {product.name.clone()}
                            {product.is_favourite.then(|| view! { <span class="ml-1 text-warning">"★"</span> })}
                        </div>
                        <div class="text-xs text-base-content/60">
                            {format!("{} variant types", variant_count)}
                        </div>
                    </div>
                </div>
            </td>
            <td class="font-mono text-sm">{product.code.clone()}</td>
            <td>{product.tax_code.clone().unwrap_or_default()}</td>
            <td>{status}</td>
            <td class="text-right">
                <StockBadge quantity=stock />
            </td>
            <td>
                <div class="flex justify-end gap-1">
                    <Link to=AppRoute::ProductVariants(id) class="btn btn-ghost btn-xs gap-1">
                        <Layers attr:class="h-4 w-4" /> "Variants"
                    </Link>
                    <Link to=AppRoute::ProductEdit(id) class="btn btn-ghost btn-xs gap-1">
                        <Pencil attr:class="h-4 w-4" /> "Edit"
                    </Link>
                    <button
                        class="btn btn-ghost btn-xs text-error"
                        title="Delete"
                        on:click=move |_| pending_delete.set(Some(to_delete.clone()))
                    >
                        <Trash attr:class="h-4 w-4" />
                    </button>
                </div>
            </td>
        </tr>
    }
}
