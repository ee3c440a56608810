//! 预约管理页：列表、检索、详情与状态流转
//!
//! 管理员可以代患者创建预约。

use clinic_admin::query::keys;
use clinic_admin::{ApiClient, ApiResult, AuthState, MutationOptions, QueryKey, QueryOptions};
use clinic_shared::date::format_date_time;
use clinic_shared::display::capitalize;
use clinic_shared::{Appointment, AppointmentFilter, AppointmentStatus, UserRole};
use leptos::prelude::*;

use crate::auth::use_auth;
use crate::components::badges::StatusBadge;
use crate::components::dialog::Modal;
use crate::components::forms::{BookingFields, BookingFormState};
use crate::components::loading::Spinner;
use crate::components::pages::dashboard::{doctor_name, patient_name};
use crate::hooks::{use_api_mutation, use_api_query};
use crate::toast::use_toasts;

fn status_action_label(status: AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Confirmed => "Confirm",
        AppointmentStatus::Completed => "Mark Completed",
        AppointmentStatus::Cancelled => "Cancel",
        AppointmentStatus::Pending => "Reset to Pending",
    }
}

fn status_action_class(status: AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Cancelled => "btn btn-sm btn-outline btn-error",
        AppointmentStatus::Completed => "btn btn-sm btn-success",
        _ => "btn btn-sm btn-primary",
    }
}

/// 列表范围：填了起止日期按日期筛选，医生只看自己的，其余看全部
#[derive(Debug, Clone, PartialEq)]
enum ListScope {
    All,
    Doctor(i64),
    Dates { from: String, to: String },
}

impl ListScope {
    /// `from`/`to` 是 `<input type="date">` 的值（`YYYY-MM-DD`），任一为空则不按日期筛选
    fn of(auth: &AuthState, from: &str, to: &str) -> Self {
        if !from.is_empty() && !to.is_empty() {
            // 后端把 date_to 往后延一天，两端都取零点即可覆盖整天
            return Self::Dates {
                from: format!("{from}T00:00:00"),
                to: format!("{to}T00:00:00"),
            };
        }
        match auth.user() {
            Some(user) if user.user_type == UserRole::Doctor => Self::Doctor(user.id),
            _ => Self::All,
        }
    }

    fn filter(&self) -> AppointmentFilter {
        match self {
            Self::All => AppointmentFilter::default(),
            Self::Doctor(id) => AppointmentFilter::for_doctor(*id),
            Self::Dates { from, to } => AppointmentFilter::date_range(from.as_str(), to.as_str()),
        }
    }

    async fn load(self, api: ApiClient) -> ApiResult<Vec<Appointment>> {
        match self {
            Self::All => api.appointments(AppointmentFilter::default()).await,
            Self::Doctor(id) => api.appointments_for_doctor(id).await,
            Self::Dates { from, to } => api.appointments_by_date_range(&from, &to).await,
        }
    }
}

fn matches_search(appointment: &Appointment, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty() || patient_name(appointment).to_lowercase().contains(&term)
}

#[component]
pub fn AppointmentsPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let role = move || auth.state.get().role();
    let is_admin = move || role() == Some(UserRole::Admin);

    let date_from = RwSignal::new(String::new());
    let date_to = RwSignal::new(String::new());
    let scope = Memo::new(move |_| {
        date_from.with(|from| date_to.with(|to| ListScope::of(&auth.state.get(), from, to)))
    });

    let appointments = use_api_query(
        move || keys::appointments(&scope.get().filter()),
        QueryOptions::default,
        move |api| {
            let scope = scope.get_untracked();
            async move { scope.load(api).await }
        },
    );
    let patients = use_api_query(
        keys::patients,
        move || QueryOptions::default().enabled(is_admin()),
        |api| async move { api.patients().await },
    );
    let doctors = use_api_query(
        keys::doctors,
        move || QueryOptions::default().enabled(is_admin()),
        |api| async move { api.doctors().await },
    );

    let search = RwSignal::new(String::new());
    let selected = RwSignal::new(None::<i64>);
    let create_open = RwSignal::new(false);
    let form = BookingFormState::new();

    let update_status = use_api_mutation(
        || {
            MutationOptions::default()
                .success_message("Appointment status updated successfully")
                .invalidate(QueryKey::new("appointments"))
        },
        |api, (id, status): (i64, AppointmentStatus)| async move {
            api.update_appointment_status(id, status).await
        },
    );

    let create = use_api_mutation(
        move || {
            MutationOptions::default()
                .success_message("Appointment created successfully")
                .invalidate(QueryKey::new("appointments"))
                .on_success(move |_| {
                    form.reset();
                    create_open.set(false);
                })
        },
        |api, request| async move { api.create_appointment(&request).await },
    );

    let on_create = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if let Some(request) = form.validated(toasts, true) {
            create.mutate(request);
        }
    };

    let visible = move || {
        let term = search.get();
        appointments
            .data()
            .map(|list| {
                list.iter()
                    .filter(|a| matches_search(a, &term))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    };

    let detail = move || {
        let id = selected.get()?;
        appointments
            .data()
            .and_then(|list| list.iter().find(|a| a.id == id).cloned())
    };

    let table = move || {
        if appointments.is_loading() && appointments.data().is_none() {
            return view! { <Spinner label="Loading appointments..." /> }.into_any();
        }
        let list = visible();
        if list.is_empty() {
            return view! {
                <div class="text-center py-8 text-base-content/60">"No appointments found"</div>
            }
            .into_any();
        }
        view! {
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Patient"</th>
                        <th>"Doctor"</th>
                        <th>"Date"</th>
                        <th>"Time"</th>
                        <th>"Status"</th>
                    </tr>
                </thead>
                <tbody>
                    {list
                        .into_iter()
                        .map(|a| {
                            let id = a.id;
                            let when = format_date_time(&a.appointment_datetime);
                            view! {
                                <tr
                                    class=move || {
                                        if selected.get() == Some(id) { "hover cursor-pointer bg-base-200" } else { "hover cursor-pointer" }
                                    }
                                    on:click=move |_| selected.set(Some(id))
                                >
                                    <td class="font-medium">{patient_name(&a)}</td>
                                    <td>{doctor_name(&a)}</td>
                                    <td>{when.date}</td>
                                    <td>{when.time}</td>
                                    <td><StatusBadge status=a.status /></td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_any()
    };

    let detail_card = move || {
        let Some(a) = detail() else {
            return view! {
                <div class="card bg-base-100 shadow">
                    <div class="card-body text-base-content/60">
                        "Select an appointment to see its details"
                    </div>
                </div>
            }
            .into_any();
        };

        let id = a.id;
        let when = format_date_time(&a.appointment_datetime);
        let actions = role()
            .map(|role| a.status.transitions_for(role))
            .unwrap_or_default();
        let patient = a.patient.clone();

        view! {
            <div class="card bg-base-100 shadow">
                <div class="card-body text-sm space-y-3">
                    <h3 class="card-title">{format!("Appointment #{id}")}</h3>
                    <p class="text-base-content/60">{format!("{} at {}", when.date, when.time)}</p>

                    <div class="font-semibold">"Appointment Details"</div>
                    <ul class="grid gap-2">
                        <li class="flex justify-between">
                            <span class="text-base-content/60">"Doctor"</span>
                            <span>{doctor_name(&a)}</span>
                        </li>
                        <li class="flex justify-between">
                            <span class="text-base-content/60">"Status"</span>
                            <StatusBadge status=a.status />
                        </li>
                        <li class="flex justify-between gap-4">
                            <span class="text-base-content/60">"Notes"</span>
                            <span class="text-right">
                                {a.notes.clone().unwrap_or_else(|| "No notes".to_string())}
                            </span>
                        </li>
                    </ul>

                    <div class="divider my-0"></div>
                    <div class="font-semibold">"Patient Information"</div>
                    <ul class="grid gap-2">
                        <li class="flex justify-between">
                            <span class="text-base-content/60">"Name"</span>
                            <span>{patient_name(&a)}</span>
                        </li>
                        <li class="flex justify-between">
                            <span class="text-base-content/60">"Email"</span>
                            <span>{patient.as_ref().map(|p| p.email.clone()).unwrap_or_else(|| "N/A".to_string())}</span>
                        </li>
                        <li class="flex justify-between">
                            <span class="text-base-content/60">"Phone"</span>
                            <span>{patient.as_ref().map(|p| p.mobile_number.clone()).unwrap_or_else(|| "N/A".to_string())}</span>
                        </li>
                    </ul>

                    {(!actions.is_empty()).then(|| view! {
                        <div class="card-actions justify-end pt-2">
                            {actions
                                .into_iter()
                                .map(|status| view! {
                                    <button
                                        class=status_action_class(status)
                                        disabled=move || update_status.is_pending()
                                        on:click=move |_| update_status.mutate((id, status))
                                    >
                                        {status_action_label(status)}
                                    </button>
                                })
                                .collect_view()}
                        </div>
                    })}
                </div>
            </div>
        }
        .into_any()
    };

    view! {
        <div class="grid gap-6 lg:grid-cols-3">
            <div class="lg:col-span-2 card bg-base-100 shadow">
                <div class="card-body space-y-4">
                    <div class="flex flex-col md:flex-row md:items-center md:justify-between gap-4">
                        <div>
                            <h2 class="card-title">"Appointments"</h2>
                            <p class="text-sm text-base-content/60">
                                {move || {
                                    if is_admin() { "Manage all patient appointments" } else { "View and manage your appointments" }
                                }}
                            </p>
                        </div>
                        <Show when=is_admin>
                            <button class="btn btn-primary btn-sm" on:click=move |_| create_open.set(true)>
                                "New Appointment"
                            </button>
                        </Show>
                    </div>
                    <div class="flex flex-col md:flex-row gap-2 md:items-center">
                        <input
                            type="search"
                            class="input input-bordered w-full md:w-80"
                            placeholder="Search by patient name..."
                            on:input=move |ev| search.set(event_target_value(&ev))
                            prop:value=search
                        />
                        <input
                            type="date"
                            class="input input-bordered input-sm"
                            title="From"
                            on:input=move |ev| date_from.set(event_target_value(&ev))
                            prop:value=date_from
                        />
                        <input
                            type="date"
                            class="input input-bordered input-sm"
                            title="To"
                            on:input=move |ev| date_to.set(event_target_value(&ev))
                            prop:value=date_to
                        />
                        <Show when=move || !date_from.get().is_empty() || !date_to.get().is_empty()>
                            <button
                                class="btn btn-ghost btn-sm"
                                on:click=move |_| {
                                    date_from.set(String::new());
                                    date_to.set(String::new());
                                }
                            >
                                "Clear dates"
                            </button>
                        </Show>
                    </div>
                    <div class="overflow-x-auto">{table}</div>
                    <p class="text-xs text-base-content/60">
                        {move || {
                            let status = role().map(|r| capitalize(r.as_str())).unwrap_or_default();
                            format!("Showing {} appointments ({status} view)", visible().len())
                        }}
                    </p>
                </div>
            </div>

            <div>{detail_card}</div>
        </div>

        <Modal open=create_open title="Create New Appointment" description="Book an appointment on behalf of a patient.">
            <form class="space-y-4" on:submit=on_create>
                <BookingFields form=form doctors=doctors patients=patients />
                <div class="modal-action">
                    <button type="button" class="btn btn-ghost" on:click=move |_| create_open.set(false)>
                        "Cancel"
                    </button>
                    <button type="submit" class="btn btn-primary" disabled=move || create.is_pending()>
                        {move || if create.is_pending() { "Creating..." } else { "Create Appointment" }}
                    </button>
                </div>
            </form>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use clinic_admin::ProfileState;
    use clinic_shared::User;

    fn signed_in(id: i64, role: UserRole) -> AuthState {
        let user = User {
            id,
            full_name: "Rahim Uddin".into(),
            email: "rahim@example.com".into(),
            mobile_number: "+8801712345678".into(),
            user_type: role,
            address_division: None,
            address_district: None,
            address_thana: None,
            profile_image: None,
            license_number: None,
            experience_years: None,
            consultation_fee: None,
            available_timeslots: None,
            specialization: None,
            created_at: NaiveDate::from_ymd_opt(2025, 1, 2)
                .and_then(|d| d.and_hms_opt(10, 0, 0))
                .unwrap(),
        };
        AuthState::new(true, ProfileState::Loaded(user))
    }

    #[test]
    fn doctors_list_only_their_own_appointments() {
        let scope = ListScope::of(&signed_in(7, UserRole::Doctor), "", "");
        assert_eq!(scope, ListScope::Doctor(7));
        assert_eq!(scope.filter(), AppointmentFilter::for_doctor(7));
        assert_eq!(ListScope::of(&signed_in(1, UserRole::Admin), "", ""), ListScope::All);
    }

    #[test]
    fn both_dates_switch_to_a_date_range() {
        let scope = ListScope::of(&signed_in(7, UserRole::Doctor), "2025-03-01", "2025-03-31");
        assert_eq!(
            scope.filter(),
            AppointmentFilter::date_range("2025-03-01T00:00:00", "2025-03-31T00:00:00")
        );
        // 只填一端时不筛选日期
        assert_eq!(
            ListScope::of(&signed_in(1, UserRole::Admin), "2025-03-01", ""),
            ListScope::All
        );
    }
}
