//! 页面外框：导航栏 + 内容区

use leptos::prelude::*;

use crate::auth::{logout, use_auth};
use crate::components::icons::*;
use crate::web::LocalStorage;
use crate::web::route::{AppRoute, NavSection, StockTab};
use crate::web::router::{Link, use_router};

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let section = move || router.current_route().get().section();

    let link_class = move |target: NavSection| {
        if section() == Some(target) {
            "btn btn-ghost btn-sm gap-2 btn-active"
        } else {
            "btn btn-ghost btn-sm gap-2"
        }
    };

    let on_logout = move |_| logout(&auth, &LocalStorage);

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <Warehouse attr:class="text-primary h-6 w-6" />
                        <span class="text-xl font-bold px-2">"Inventory Console"</span>
                    </div>
                    <div class="flex-none gap-2">
                        <span class=move || link_class(NavSection::Dashboard)>
                            <Link to=AppRoute::Dashboard class="flex items-center gap-2">
                                <LayoutDashboard attr:class="h-4 w-4" /> "Dashboard"
                            </Link>
                        </span>
                        <span class=move || link_class(NavSection::Products)>
                            <Link to=AppRoute::Products class="flex items-center gap-2">
                                <Package attr:class="h-4 w-4" /> "Products"
                            </Link>
                        </span>
                        <span class=move || link_class(NavSection::Stock)>
                            <Link to=AppRoute::Stock(StockTab::View) class="flex items-center gap-2">
                                <Warehouse attr:class="h-4 w-4" /> "Stock"
                            </Link>
                        </span>
                        <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                            <LogOut attr:class="h-4 w-4" /> "Logout"
                        </button>
                    </div>
                </div>

                {children()}
            </div>
        </div>
    }
}
