use clinic_admin::MutationOptions;
use clinic_shared::UserRole;
use leptos::prelude::*;

use crate::components::forms::{UserFields, UserFormState};
use crate::hooks::use_api_mutation;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 自助注册不能创建管理员
const SELF_SERVICE_ROLES: &[UserRole] = &[UserRole::Patient, UserRole::Doctor];

#[component]
pub fn RegisterPage() -> impl IntoView {
    let router = use_router();
    let form = UserFormState::new(UserRole::Patient);

    let register = use_api_mutation(
        move || {
            MutationOptions::default()
                .success_message("Registration successful! Please login to continue.")
                .on_success(move |_| router.navigate(AppRoute::Login.to_path()))
        },
        |api, request| async move { api.register(&request).await },
    );

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if let Some(request) = form.validated() {
            register.mutate(request);
        }
    };

    view! {
        <div class="min-h-screen flex items-center justify-center bg-base-200 p-4">
            <div class="card w-full max-w-2xl bg-base-100 shadow-2xl">
                <div class="card-body">
                    <div class="text-center">
                        <h1 class="text-2xl font-bold">"Create Account"</h1>
                        <p class="text-base-content/70">"Join our healthcare appointment system"</p>
                    </div>
                    <form class="mt-6 space-y-6" on:submit=on_submit>
                        <UserFields form=form roles=SELF_SERVICE_ROLES />
                        <button type="submit" class="btn btn-primary w-full" disabled=move || register.is_pending()>
                            {move || if register.is_pending() { "Creating Account..." } else { "Create Account" }}
                        </button>
                    </form>
                    <p class="text-center text-sm mt-4">
                        "Already have an account? "
                        <Link to=AppRoute::Login.to_path() class=Signal::derive(|| "link link-primary".to_string())>
                            "Sign in"
                        </Link>
                    </p>
                </div>
            </div>
        </div>
    }
}
