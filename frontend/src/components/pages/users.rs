//! 用户管理页（仅管理员）

use clinic_admin::query::keys;
use clinic_admin::{MutationOptions, QueryKey, QueryOptions};
use clinic_shared::date::format_date;
use clinic_shared::display::{capitalize, format_currency};
use clinic_shared::{User, UserFilter, UserRole};
use leptos::prelude::*;

use crate::components::dialog::Modal;
use crate::components::forms::{UserFields, UserFormState};
use crate::components::loading::Spinner;
use crate::hooks::{QueryHandle, use_api_mutation, use_api_query};

/// 管理员可以创建任意角色
const CREATABLE_ROLES: &[UserRole] = &UserRole::ALL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserTab {
    All,
    Doctors,
    Patients,
}

impl UserTab {
    const ALL: [UserTab; 3] = [UserTab::All, UserTab::Doctors, UserTab::Patients];

    fn label(&self) -> &'static str {
        match self {
            UserTab::All => "All Users",
            UserTab::Doctors => "Doctors",
            UserTab::Patients => "Patients",
        }
    }
}

fn role_badge_class(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "badge badge-secondary",
        UserRole::Doctor => "badge badge-info",
        UserRole::Patient => "badge badge-success",
    }
}

fn len_of(query: QueryHandle<Vec<User>>) -> usize {
    query.data().map(|l| l.len()).unwrap_or(0)
}

#[component]
pub fn UsersPage() -> impl IntoView {
    let all = use_api_query(
        || keys::users(&UserFilter::default()),
        QueryOptions::default,
        |api| async move { api.users(UserFilter::default()).await },
    );
    let patients = use_api_query(keys::patients, QueryOptions::default, |api| async move {
        api.patients().await
    });
    let doctors = use_api_query(keys::doctors, QueryOptions::default, |api| async move {
        api.doctors().await
    });

    let tab = RwSignal::new(UserTab::All);
    let search = RwSignal::new(String::new());
    let create_open = RwSignal::new(false);
    let form = UserFormState::new(UserRole::Patient);

    let create = use_api_mutation(
        move || {
            MutationOptions::default()
                .success_message("User created successfully")
                .invalidate(QueryKey::new("users"))
                .invalidate(keys::patients())
                .invalidate(keys::doctors())
                .on_success(move |_| {
                    form.reset();
                    create_open.set(false);
                })
        },
        |api, request| async move { api.register(&request).await },
    );

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if let Some(request) = form.validated() {
            create.mutate(request);
        }
    };

    let current = move || match tab.get() {
        UserTab::All => all,
        UserTab::Doctors => doctors,
        UserTab::Patients => patients,
    };

    let table = move || {
        let query = current();
        if query.is_loading() && query.data().is_none() {
            return view! { <Spinner label="Loading users..." /> }.into_any();
        }
        if let Some(err) = query.error() {
            return view! { <div class="alert alert-error">{err.to_string()}</div> }.into_any();
        }

        let term = search.get().trim().to_lowercase();
        let list: Vec<User> = query
            .data()
            .map(|l| {
                l.iter()
                    .filter(|u| term.is_empty() || u.full_name.to_lowercase().contains(&term))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if list.is_empty() {
            return view! {
                <div class="text-center py-8 text-base-content/60">"No users found."</div>
            }
            .into_any();
        }

        let doctor_columns = tab.get() == UserTab::Doctors;
        view! {
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Mobile"</th>
                        <th>"Type"</th>
                        <th>"Joined"</th>
                        {doctor_columns.then(|| view! {
                            <th>"Specialization"</th>
                            <th>"Fee"</th>
                            <th>"Experience"</th>
                        })}
                    </tr>
                </thead>
                <tbody>
                    {list
                        .into_iter()
                        .map(|u| {
                            let doctor_cells = doctor_columns.then(|| {
                                view! {
                                    <td>{u.specialization.clone().unwrap_or_else(|| "Not specified".to_string())}</td>
                                    <td>{u.consultation_fee.map(format_currency).unwrap_or_else(|| "N/A".to_string())}</td>
                                    <td>
                                        {u.experience_years
                                            .map(|y| format!("{y} years"))
                                            .unwrap_or_else(|| "N/A".to_string())}
                                    </td>
                                }
                            });
                            view! {
                                <tr>
                                    <td>
                                        <div class="font-medium">{u.full_name.clone()}</div>
                                        <div class="text-sm text-base-content/60">{u.email.clone()}</div>
                                    </td>
                                    <td>{u.mobile_number.clone()}</td>
                                    <td>
                                        <span class=role_badge_class(u.user_type)>
                                            {capitalize(u.user_type.as_str())}
                                        </span>
                                    </td>
                                    <td>{format_date(&u.created_at)}</td>
                                    {doctor_cells}
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_any()
    };

    let stat = move |title: &'static str, hint: &'static str, query: QueryHandle<Vec<User>>| {
        view! {
            <div class="stat">
                <div class="stat-title">{title}</div>
                <div class="stat-value">{move || len_of(query)}</div>
                <div class="stat-desc">{hint}</div>
            </div>
        }
    };

    view! {
        <div class="grid gap-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Users"</h1>
                    <p class="text-base-content/60">"Manage patients, doctors, and administrators"</p>
                </div>
                <button class="btn btn-primary" on:click=move |_| create_open.set(true)>
                    "Add User"
                </button>
            </div>

            <div class="stats stats-vertical md:stats-horizontal shadow bg-base-100">
                {stat("Total Users", "All registered users", all)}
                {stat("Doctors", "Medical professionals", doctors)}
                {stat("Patients", "Registered patients", patients)}
            </div>

            <div class="card bg-base-100 shadow">
                <div class="card-body space-y-4">
                    <div>
                        <h2 class="card-title">"User Management"</h2>
                        <p class="text-sm text-base-content/60">"View and manage all system users"</p>
                    </div>
                    <div class="flex flex-col md:flex-row md:items-center md:justify-between gap-4">
                        <div role="tablist" class="tabs tabs-boxed">
                            {UserTab::ALL
                                .into_iter()
                                .map(|t| view! {
                                    <a
                                        role="tab"
                                        class=move || if tab.get() == t { "tab tab-active" } else { "tab" }
                                        on:click=move |_| tab.set(t)
                                    >
                                        {t.label()}
                                    </a>
                                })
                                .collect_view()}
                        </div>
                        <input
                            type="search"
                            class="input input-bordered w-full md:w-72"
                            placeholder="Search users..."
                            on:input=move |ev| search.set(event_target_value(&ev))
                            prop:value=search
                        />
                    </div>
                    <div class="overflow-x-auto">{table}</div>
                </div>
            </div>
        </div>

        <Modal
            open=create_open
            title="Create New User"
            description="Add a new user to the system. Fill in the required information below."
        >
            <form class="space-y-4" on:submit=on_submit>
                <UserFields form=form roles=CREATABLE_ROLES />
                <div class="modal-action">
                    <button type="button" class="btn btn-ghost" on:click=move |_| create_open.set(false)>
                        "Cancel"
                    </button>
                    <button type="submit" class="btn btn-primary" disabled=move || create.is_pending()>
                        {move || if create.is_pending() { "Creating..." } else { "Create User" }}
                    </button>
                </div>
            </form>
        </Modal>
    }
}
