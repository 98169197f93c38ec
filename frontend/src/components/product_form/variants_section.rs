//! 变体与选项编辑区
//!
//! 只在变体/选项数量变化时重建列表，输入时只更新对应字段。

use leptos::prelude::*;

use super::FormSignal;
use crate::components::icons::{Plus, Trash};

#[component]
pub fn VariantsSection(form: FormSignal) -> impl IntoView {
    let variant_count = Memo::new(move |_| form.with(|f| f.variants.len()));

    view! {
        <div class="divider">"Variants"</div>

        <div class="space-y-4">
            {move || {
                (0..variant_count.get())
                    .map(|index| view! { <VariantCard form=form index=index /> })
                    .collect_view()
            }}
        </div>

        <button
            type="button"
            class="btn btn-outline btn-sm gap-2"
            on:click=move |_| form.update(|f| f.add_variant())
        >
            <Plus attr:class="h-4 w-4" /> "Add Variant"
        </button>
    }
}

#[component]
fn VariantCard(form: FormSignal, index: usize) -> impl IntoView {
    let option_count = Memo::new(move |_| {
        form.with(|f| f.variants.get(index).map_or(0, |v| v.options.len()))
    });
    let name_error = move || form.with(|f| f.variant_name_error(index));
    let missing_options = move || form.with(|f| f.missing_options_error(index));

    view! {
        <div class="card card-bordered border-base-300 bg-base-200/50">
            <div class="card-body p-4 space-y-2">
                <div class="flex items-start gap-2">
                    <div class="form-control flex-1">
                        <input
                            type="text"
                            placeholder="Variant name (e.g. Color)"
                            on:input=move |ev| form.update(|f| f.set_variant_name(index, event_target_value(&ev)))
                            on:blur=move |_| form.update(|f| f.blur_variant_name(index))
                            prop:value=move || form.with(|f| {
                                f.variants.get(index).map(|v| v.name.value.clone()).unwrap_or_default()
                            })
                            class=move || if name_error().is_some() { "input input-bordered input-sm input-error w-full" } else { "input input-bordered input-sm w-full" }
                        />
                        {move || name_error().map(|e| view! {
                            <span class="text-error text-xs mt-1">{e}</span>
                        })}
                    </div>
                    <button
                        type="button"
                        class="btn btn-ghost btn-sm text-error"
                        title="Remove variant"
                        on:click=move |_| form.update(|f| f.remove_variant(index))
                    >
                        <Trash attr:class="h-4 w-4" />
                    </button>
                </div>

                <div class="pl-4 space-y-2">
                    {move || {
                        (0..option_count.get())
                            .map(|option| view! { <OptionRow form=form variant=index option=option /> })
                            .collect_view()
                    }}
                    {move || missing_options().map(|e| view! {
                        <span class="text-error text-xs">{e}</span>
                    })}
                    <button
                        type="button"
                        class="btn btn-ghost btn-xs gap-1"
                        on:click=move |_| form.update(|f| f.add_option(index))
                    >
                        <Plus attr:class="h-3 w-3" /> "Add Option"
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
fn OptionRow(form: FormSignal, variant: usize, option: usize) -> impl IntoView {
    let error = move || form.with(|f| f.option_error(variant, option));

    view! {
        <div class="flex items-start gap-2">
            <div class="flex-1">
                <input
                    type="text"
                    placeholder="Option value (e.g. Red)"
                    on:input=move |ev| form.update(|f| f.set_option_value(variant, option, event_target_value(&ev)))
                    on:blur=move |_| form.update(|f| f.blur_option(variant, option))
                    prop:value=move || form.with(|f| {
                        f.variants
                            .get(variant)
                            .and_then(|v| v.options.get(option))
                            .map(|o| o.value.clone())
                            .unwrap_or_default()
                    })
                    class=move || if error().is_some() { "input input-bordered input-xs input-error w-full" } else { "input input-bordered input-xs w-full" }
                />
                {move || error().map(|e| view! { <span class="text-error text-xs">{e}</span> })}
            </div>
            <button
                type="button"
                class="btn btn-ghost btn-xs"
                title="Remove option"
                on:click=move |_| form.update(|f| f.remove_option(variant, option))
            >
                "✕"
            </button>
        </div>
    }
}
