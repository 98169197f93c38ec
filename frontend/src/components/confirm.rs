use leptos::prelude::*;

/// 删除等不可撤销操作前的确认框
#[component]
pub fn ConfirmDialog(
    #[prop(into)] open: Signal<bool>,
    title: &'static str,
    #[prop(into)] message: Signal<String>,
    #[prop(into)] busy: Signal<bool>,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <div class=move || if open.get() { "modal modal-open" } else { "modal" }>
            <div class="modal-box">
                <h3 class="font-bold text-lg">{title}</h3>
                <p class="py-4 text-base-content/70">{move || message.get()}</p>
                <div class="modal-action">
                    <button
                        class="btn btn-ghost"
                        disabled=move || busy.get()
                        on:click=move |_| on_cancel.run(())
                    >
                        "Cancel"
                    </button>
                    <button
                        class="btn btn-error"
                        disabled=move || busy.get()
                        on:click=move |_| on_confirm.run(())
                    >
                        <Show when=move || busy.get()>
                            <span class="loading loading-spinner"></span>
                        </Show>
                        "Delete"
                    </button>
                </div>
            </div>
            <div class="modal-backdrop" on:click=move |_| {
                if !busy.get_untracked() {
                    on_cancel.run(())
                }
            }></div>
        </div>
    }
}
