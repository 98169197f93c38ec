//! 基础信息表单组件
//!
//! 商品名称、编码、HSN 编码、标记位与图片的输入。

use leptos::prelude::*;
use web_sys::HtmlInputElement;

use super::FormSignal;
use super::form_state::CodeAvailability;

#[component]
pub fn BasicInfoForm(form: FormSignal, on_code_input: Callback<String>) -> impl IntoView {
    let name_error = move || form.with(|f| f.name_error());
    let code_error = move || form.with(|f| f.code_error());
    let code_check = move || form.with(|f| f.code_check());
    let image_name = move || form.with(|f| f.image.file_name().map(str::to_string));

    let on_image_change = move |ev: leptos::ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            let name = file.name();
            form.update(|f| f.select_image(name, file));
        }
    };

    view! {
        <div class="grid gap-4 md:grid-cols-2">
            <div class="form-control">
                <label for="product_name" class="label">
                    <span class="label-text">"Product Name"</span>
                </label>
                <input id="product_name"
                    type="text"
                    on:input=move |ev| form.update(|f| f.set_name(event_target_value(&ev)))
                    on:blur=move |_| form.update(|f| f.blur_name())
                    prop:value=move || form.with(|f| f.name.value.clone())
                    class=move || if name_error().is_some() { "input input-bordered input-error w-full" } else { "input input-bordered w-full" }
                />
                {move || name_error().map(|e| view! {
                    <label class="label"><span class="label-text-alt text-error">{e}</span></label>
                })}
            </div>

            <div class="form-control">
                <label for="product_code" class="label">
                    <span class="label-text">"Product Code"</span>
                    <Show when=move || code_check() == CodeAvailability::Checking>
                        <span class="loading loading-dots loading-xs"></span>
                    </Show>
                </label>
                <input id="product_code"
                    type="text"
                    on:input=move |ev| on_code_input.run(event_target_value(&ev))
                    on:blur=move |_| form.update(|f| f.blur_code())
                    prop:value=move || form.with(|f| f.code.value.clone())
                    class=move || if code_error().is_some() { "input input-bordered input-error w-full" } else { "input input-bordered w-full" }
                />
                {move || code_error().map(|e| view! {
                    <label class="label"><span class="label-text-alt text-error">{e}</span></label>
                })}
            </div>

            <div class="form-control">
                <label for="hsn_code" class="label">
                    <span class="label-text">"HSN Code"</span>
                </label>
                <input id="hsn_code"
                    type="text"
                    on:input=move |ev| form.update(|f| f.set_tax_code(event_target_value(&ev)))
                    prop:value=move || form.with(|f| f.tax_code.clone())
                    class="input input-bordered w-full"
                />
            </div>

            <div class="form-control">
                <label for="product_image" class="label">
                    <span class="label-text">"Product Image"</span>
                    {move || image_name().map(|name| view! {
                        <span class="label-text-alt truncate max-w-48">{name}</span>
                    })}
                </label>
                <input id="product_image"
                    type="file"
                    accept="image/*"
                    on:change=on_image_change
                    class="file-input file-input-bordered w-full"
                />
            </div>
        </div>

        <div class="flex flex-wrap gap-8">
            <label class="label cursor-pointer gap-2">
                <input type="checkbox"
                    class="checkbox checkbox-primary"
                    prop:checked=move || form.with(|f| f.is_favourite)
                    on:change=move |ev| form.update(|f| f.set_favourite(event_target_checked(&ev)))
                />
                <span class="label-text">"Favourite"</span>
            </label>
            <label class="label cursor-pointer gap-2">
                <input type="checkbox"
                    class="toggle toggle-success"
                    prop:checked=move || form.with(|f| f.active)
                    on:change=move |ev| form.update(|f| f.set_active(event_target_checked(&ev)))
                />
                <span class="label-text">"Active"</span>
            </label>
        </div>
    }
}
