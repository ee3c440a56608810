use clinic_admin::{ApiError, QueryOptions};
use clinic_admin::query::keys;
use clinic_shared::date::{format_date, format_time};
use clinic_shared::display::{capitalize, completion_rate, dashboard_subtitle, welcome_line};
use clinic_shared::{Appointment, AppointmentFilter, UserRole};
use leptos::prelude::*;

use crate::auth::use_auth;
use crate::components::badges::{ApiStatusIndicator, StatusBadge};
use crate::components::loading::Spinner;
use crate::hooks::use_api_query;

const RECENT_LIMIT: u32 = 10;

pub(crate) fn patient_name(appointment: &Appointment) -> String {
    appointment
        .patient
        .as_ref()
        .map(|p| p.full_name.clone())
        .unwrap_or_else(|| "Unknown Patient".to_string())
}

pub(crate) fn doctor_name(appointment: &Appointment) -> String {
    let name = appointment
        .doctor
        .as_ref()
        .map(|d| d.full_name.as_str())
        .unwrap_or("Unknown Doctor");
    format!("Dr. {name}")
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let role = move || auth.state.get().role();
    let is_admin = move || role() == Some(UserRole::Admin);
    let is_staff = move || matches!(role(), Some(UserRole::Admin | UserRole::Doctor));
    let is_patient = move || role() == Some(UserRole::Patient);

    let todays = use_api_query(
        keys::todays_appointments,
        QueryOptions::default,
        |api| async move { api.todays_appointments().await },
    );
    let total_patients = use_api_query(
        || keys::dashboard_count("totalPatients"),
        move || QueryOptions::default().enabled(is_admin()),
        |api| async move { Ok::<_, ApiError>(api.total_patients().await) },
    );
    let total_doctors = use_api_query(
        || keys::dashboard_count("totalDoctors"),
        move || QueryOptions::default().enabled(is_admin()),
        |api| async move { Ok::<_, ApiError>(api.total_doctors().await) },
    );
    let pending = use_api_query(
        || keys::dashboard_count("pendingCount"),
        move || QueryOptions::default().enabled(is_staff()),
        |api| async move { Ok::<_, ApiError>(api.pending_appointment_count().await) },
    );
    let completed = use_api_query(
        || keys::dashboard_count("completedCount"),
        move || QueryOptions::default().enabled(is_staff()),
        |api| async move { Ok::<_, ApiError>(api.completed_appointment_count().await) },
    );
    let recent = use_api_query(
        || {
            keys::appointments(&AppointmentFilter {
                limit: Some(RECENT_LIMIT),
                ..Default::default()
            })
        },
        QueryOptions::default,
        |api| async move {
            api.appointments(AppointmentFilter {
                limit: Some(RECENT_LIMIT),
                ..Default::default()
            })
            .await
        },
    );
    let stats = use_api_query(
        keys::appointment_stats,
        move || QueryOptions::default().enabled(is_staff()),
        |api| async move { api.appointment_stats().await },
    );

    let show_recent = RwSignal::new(false);

    let count = |value: Option<std::rc::Rc<u32>>| value.map(|v| *v).unwrap_or(0);
    let rate = move || completion_rate(stats.data().as_deref());
    let total_in_stats = move || stats.data().map(|s| s.total_appointments).unwrap_or(0);

    let todays_table = move || {
        if todays.is_loading() {
            return view! { <Spinner /> }.into_any();
        }
        let list = todays.data().map(|l| l.as_ref().clone()).unwrap_or_default();
        if list.is_empty() {
            return view! {
                <div class="text-center py-8 text-base-content/60">
                    "No appointments scheduled for today"
                </div>
            }
            .into_any();
        }
        let show_email = !is_patient();
        view! {
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Patient"</th>
                        <th>"Doctor"</th>
                        <th>"Time"</th>
                        <th>"Status"</th>
                        <th>"Notes"</th>
                    </tr>
                </thead>
                <tbody>
                    {list
                        .into_iter()
                        .map(|a| {
                            let email = a.patient.as_ref().map(|p| p.email.clone()).filter(|_| show_email);
                            view! {
                                <tr>
                                    <td>
                                        <div class="font-medium">{patient_name(&a)}</div>
                                        <div class="text-sm text-base-content/60">{email}</div>
                                    </td>
                                    <td>{doctor_name(&a)}</td>
                                    <td>{format_time(&a.appointment_datetime)}</td>
                                    <td><StatusBadge status=a.status /></td>
                                    <td class="max-w-xs truncate">
                                        {a.notes.clone().unwrap_or_else(|| "No notes".to_string())}
                                    </td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_any()
    };

    let recent_table = move || {
        if recent.is_loading() {
            return view! { <Spinner /> }.into_any();
        }
        let list = recent.data().map(|l| l.as_ref().clone()).unwrap_or_default();
        view! {
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Patient"</th>
                        <th>"Doctor"</th>
                        <th>"Date"</th>
                        <th>"Status"</th>
                    </tr>
                </thead>
                <tbody>
                    {list
                        .into_iter()
                        .take(RECENT_LIMIT as usize)
                        .map(|a| {
                            view! {
                                <tr>
                                    <td class="font-medium">{patient_name(&a)}</td>
                                    <td>{doctor_name(&a)}</td>
                                    <td>{format_date(&a.appointment_datetime)}</td>
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

    let stat_card = move |title: &'static str, hint: &'static str, value: Signal<String>| {
        view! {
            <div class="stat">
                <div class="stat-title">{title}</div>
                <div class="stat-value text-primary">{value}</div>
                <div class="stat-desc">{hint}</div>
            </div>
        }
    };

    let na = move |allowed: bool, value: u32| {
        if allowed { value.to_string() } else { "N/A".to_string() }
    };

    view! {
        <div class="grid gap-6 lg:grid-cols-3">
            <div class="lg:col-span-2 space-y-6">
                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title">
                            {move || welcome_line(auth.state.get().user().map(|u| u.full_name.as_str()))}
                        </h2>
                        <p class="text-base-content/70">
                            {move || role().map(dashboard_subtitle).unwrap_or_default()}
                        </p>
                    </div>
                </div>

                <div class="stats stats-vertical md:stats-horizontal shadow w-full bg-base-100">
                    <Show when=is_admin>
                        {stat_card(
                            "Total Patients",
                            "Registered in system",
                            Signal::derive(move || count(total_patients.data()).to_string()),
                        )}
                        {stat_card(
                            "Total Doctors",
                            "Medical professionals",
                            Signal::derive(move || count(total_doctors.data()).to_string()),
                        )}
                    </Show>
                    <Show when=is_staff>
                        {stat_card(
                            "Pending Appointments",
                            "Awaiting confirmation",
                            Signal::derive(move || count(pending.data()).to_string()),
                        )}
                    </Show>
                    <div class="stat">
                        <div class="stat-title">
                            {move || if is_patient() { "My Appointments" } else { "Today's Appointments" }}
                        </div>
                        <div class="stat-value text-primary">
                            {move || todays.data().map(|l| l.len()).unwrap_or(0)}
                        </div>
                        <div class="stat-desc">
                            {move || if is_patient() { "Your appointments" } else { "Scheduled for today" }}
                        </div>
                    </div>
                </div>

                <Show when=is_staff>
                    <div class="card bg-base-100 shadow">
                        <div class="card-body space-y-2">
                            <h3 class="card-title">"Appointment Completion Rate"</h3>
                            <div class="flex justify-between text-sm">
                                <span>"Completed Appointments"</span>
                                <span>
                                    {move || format!("{} / {}", count(completed.data()), total_in_stats())}
                                </span>
                            </div>
                            <progress class="progress progress-primary w-full" value=move || rate().to_string() max="100"></progress>
                            <p class="text-xs text-base-content/60">
                                {move || format!("{}% completion rate this month", rate())}
                            </p>
                        </div>
                    </div>
                </Show>

                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <div class="flex items-center justify-between">
                            <div role="tablist" class="tabs tabs-boxed">
                                <a
                                    role="tab"
                                    class=move || if show_recent.get() { "tab" } else { "tab tab-active" }
                                    on:click=move |_| show_recent.set(false)
                                >
                                    "Today's Schedule"
                                </a>
                                <a
                                    role="tab"
                                    class=move || if show_recent.get() { "tab tab-active" } else { "tab" }
                                    on:click=move |_| show_recent.set(true)
                                >
                                    "Recent Activity"
                                </a>
                            </div>
                        </div>
                        <div class="overflow-x-auto">
                            {move || if show_recent.get() { recent_table() } else { todays_table() }}
                        </div>
                    </div>
                </div>
            </div>

            <div class="space-y-6">
                <div class="card bg-base-100 shadow">
                    <div class="card-body text-sm">
                        {move || {
                            let state = auth.state.get();
                            state.user().map(|user| {
                                view! {
                                    <h3 class="card-title">{user.full_name.clone()}</h3>
                                    <p class="text-base-content/60">{user.email.clone()}</p>
                                    <span class="badge badge-outline w-fit">
                                        {capitalize(user.user_type.as_str())}
                                    </span>
                                }
                            })
                        }}
                        <div class="divider"></div>
                        <div class="font-semibold">"System Overview"</div>
                        <ul class="grid gap-2">
                            <li class="flex justify-between">
                                <span class="text-base-content/60">"Total Patients"</span>
                                <span>{move || na(is_admin(), count(total_patients.data()))}</span>
                            </li>
                            <li class="flex justify-between">
                                <span class="text-base-content/60">"Total Doctors"</span>
                                <span>{move || na(is_admin(), count(total_doctors.data()))}</span>
                            </li>
                            <li class="flex justify-between">
                                <span class="text-base-content/60">"Pending"</span>
                                <span>{move || na(is_staff(), count(pending.data()))}</span>
                            </li>
                            <li class="flex justify-between">
                                <span class="text-base-content/60">"Completed"</span>
                                <span>{move || na(is_staff(), count(completed.data()))}</span>
                            </li>
                        </ul>
                    </div>
                </div>

                <div class="card bg-base-100 shadow">
                    <div class="card-body space-y-2">
                        <h3 class="card-title">"System Health"</h3>
                        <div class="flex items-center justify-between text-sm">
                            <span>"API Status"</span>
                            <ApiStatusIndicator />
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
