//! 商品新建/编辑页面
//!
//! 表单状态集中在 `form_state::ProductForm` 中，放进一个本地信号驱动界面；
//! 子组件只负责渲染与把输入事件转发为表单方法调用。

pub mod form_state;

mod basic_info_form;
mod variants_section;

use crate::auth::use_api;
use crate::components::icons::ArrowLeft;
use crate::components::layout::Layout;
use crate::components::notice::NoticeToast;
use crate::config::use_config;
use crate::notice::Notice;
use crate::web::Timeout;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use crate::workflow::{self, SubmitOutcome};
use inventory_shared::ProductId;
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;

use basic_info_form::BasicInfoForm;
use form_state::ProductForm;
use variants_section::VariantsSection;

/// 表单信号；`web_sys::File` 不能跨线程，使用本地存储
pub type FormSignal = RwSignal<ProductForm<web_sys::File>, LocalStorage>;

#[component]
pub fn ProductFormPage(product_id: Option<ProductId>) -> impl IntoView {
    let api = use_api();
    let config = use_config();
    let router = use_router();

    let form: FormSignal = RwSignal::new_local(ProductForm::create());
    let loading = RwSignal::new(product_id.is_some());
    let saving = RwSignal::new(false);
    let notice = RwSignal::new(Option::<Notice>::None);
    // 卸载页面时取消尚未触发的跳转
    let redirect_timer = StoredValue::new_local(None::<Timeout>);

    if let Some(id) = product_id {
        let api = api.clone();
        spawn_local(async move {
            match workflow::load_product(&api, id).await {
                Ok(product) => form.set(ProductForm::edit(&product)),
                Err(n) => notice.set(Some(n)),
            }
            loading.set(false);
        });
    }

    let on_code_input = {
        let api = api.clone();
        Callback::new(move |value: String| {
            let Some(ticket) = form.try_update(|f| f.set_code(value)).flatten() else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                let outcome = workflow::check_product_code(&api, &ticket).await;
                form.update(|f| {
                    if !f.apply_code_check(&ticket, outcome) {
                        log!("[ProductForm] Dropped stale code check for {}", ticket.code);
                    }
                });
            });
        })
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }

        // 校验错误直接留在表单信号上；保存结果不回写表单
        let Some(save) = form.try_update(workflow::prepare_product_save).flatten() else {
            return;
        };
        saving.set(true);

        let api = api.clone();
        let delay = config.save_redirect_delay;
        spawn_local(async move {
            let outcome = workflow::save_product(&api, &save).await;
            saving.set(false);
            match outcome {
                SubmitOutcome::Saved { notice: n, redirect } => {
                    notice.set(Some(n));
                    redirect_timer.set_value(Some(Timeout::new(delay, move || {
                        router.navigate_to(redirect)
                    })));
                }
                SubmitOutcome::Failed { notice: n } => notice.set(Some(n)),
            }
        });
    };

    let title = if product_id.is_some() {
        "Edit Product"
    } else {
        "New Product"
    };

    view! {
        <Layout>
            <NoticeToast notice=notice />

            <div class="flex items-center gap-4">
                <Link to=AppRoute::Products class="btn btn-ghost btn-sm btn-circle">
                    <ArrowLeft attr:class="h-5 w-5" />
                </Link>
                <h2 class="text-2xl font-bold">{title}</h2>
            </div>

            <Show
                when=move || !loading.get()
                fallback=|| view! {
                    <div class="flex justify-center py-16">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
            >
                <form on:submit=on_submit.clone() class="card bg-base-100 shadow-xl">
                    <fieldset class="card-body space-y-4" disabled=move || saving.get()>
                        <BasicInfoForm form=form on_code_input=on_code_input />
                        <VariantsSection form=form />

                        <div class="card-actions justify-end pt-4">
                            <Link to=AppRoute::Products class="btn btn-ghost">
                                "Cancel"
                            </Link>
                            <button type="submit" class="btn btn-primary">
                                <Show when=move || saving.get()>
                                    <span class="loading loading-spinner"></span>
                                </Show>
                                "Save Product"
                            </button>
                        </div>
                    </fieldset>
                </form>
            </Show>
        </Layout>
    }
}
