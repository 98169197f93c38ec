//! 提示框组件
//!
//! 右上角的短暂提示，超时自动关闭，也可手动关闭。
//! 新提示到来时旧的计时器被替换，不会提前关掉新提示。

use leptos::prelude::*;

use crate::config::use_config;
use crate::notice::Notice;
use crate::web::Timeout;

#[component]
pub fn NoticeToast(notice: RwSignal<Option<Notice>>) -> impl IntoView {
    let timeout = use_config().notice_timeout;
    let timer = StoredValue::new_local(None::<Timeout>);

    Effect::new(move |_| {
        let next = if notice.with(Option::is_some) {
            Some(Timeout::new(timeout, move || notice.set(None)))
        } else {
            None
        };
        // 替换即取消旧的计时器
        timer.set_value(next);
    });

    view! {
        <Show when=move || notice.with(Option::is_some)>
            <div class="toast toast-top toast-end z-50">
                <div role="alert" class=move || {
                    notice.with(|n| n.as_ref().map(Notice::alert_class).unwrap_or_default())
                }>
                    <span>{move || notice.with(|n| n.as_ref().map(|n| n.message.clone()).unwrap_or_default())}</span>
                    <button class="btn btn-ghost btn-xs" on:click=move |_| notice.set(None)>
                        "✕"
                    </button>
                </div>
            </div>
        </Show>
    }
}
