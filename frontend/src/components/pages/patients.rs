use clinic_admin::QueryOptions;
use clinic_admin::query::keys;
use clinic_shared::date::{format_date, format_date_time};
use clinic_shared::{AppointmentFilter, User};
use leptos::prelude::*;

use crate::components::badges::StatusBadge;
use crate::components::loading::Spinner;
use crate::components::pages::dashboard::doctor_name;
use crate::hooks::use_api_query;

fn address(user: &User) -> String {
    let parts: Vec<&str> = [&user.address_thana, &user.address_district, &user.address_division]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        "N/A".to_string()
    } else {
        parts.join(", ")
    }
}

#[component]
pub fn PatientsPage() -> impl IntoView {
    let patients = use_api_query(keys::patients, QueryOptions::default, |api| async move {
        api.patients().await
    });

    let search = RwSignal::new(String::new());
    let selected = RwSignal::new(None::<i64>);

    let history_filter = move || AppointmentFilter::for_patient(selected.get().unwrap_or_default());
    let history = use_api_query(
        move || keys::appointments(&history_filter()),
        move || QueryOptions::default().enabled(selected.get().is_some()),
        move |api| {
            let patient_id = selected.get_untracked().unwrap_or_default();
            async move { api.appointments_for_patient(patient_id).await }
        },
    );

    let visible = move || {
        let term = search.get().trim().to_lowercase();
        patients
            .data()
            .map(|list| {
                list.iter()
                    .filter(|p| {
                        term.is_empty()
                            || p.full_name.to_lowercase().contains(&term)
                            || p.email.to_lowercase().contains(&term)
                    })
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    };

    let table = move || {
        if patients.is_loading() && patients.data().is_none() {
            return view! { <Spinner label="Loading patients..." /> }.into_any();
        }
        let list = visible();
        if list.is_empty() {
            return view! {
                <div class="text-center py-8 text-base-content/60">"No patients found"</div>
            }
            .into_any();
        }
        view! {
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Email"</th>
                        <th>"Mobile"</th>
                        <th>"Address"</th>
                        <th>"Joined"</th>
                    </tr>
                </thead>
                <tbody>
                    {list
                        .into_iter()
                        .map(|p| {
                            let id = p.id;
                            view! {
                                <tr
                                    class=move || {
                                        if selected.get() == Some(id) { "hover cursor-pointer bg-base-200" } else { "hover cursor-pointer" }
                                    }
                                    on:click=move |_| selected.set(Some(id))
                                >
                                    <td class="font-medium">{p.full_name.clone()}</td>
                                    <td>{p.email.clone()}</td>
                                    <td>{p.mobile_number.clone()}</td>
                                    <td>{address(&p)}</td>
                                    <td>{format_date(&p.created_at)}</td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_any()
    };

    let history_card = move || {
        selected.get()?;
        let body = if history.is_loading() {
            view! { <Spinner /> }.into_any()
        } else {
            let list = history.data().map(|l| l.as_ref().clone()).unwrap_or_default();
            if list.is_empty() {
                view! { <p class="text-base-content/60">"No appointments for this patient"</p> }.into_any()
            } else {
                view! {
                    <ul class="grid gap-3">
                        {list
                            .into_iter()
                            .map(|a| {
                                let when = format_date_time(&a.appointment_datetime);
                                view! {
                                    <li class="flex items-center justify-between gap-2">
                                        <div>
                                            <div class="font-medium">{doctor_name(&a)}</div>
                                            <div class="text-xs text-base-content/60">
                                                {format!("{} {}", when.date, when.time)}
                                            </div>
                                        </div>
                                        <StatusBadge status=a.status />
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                }
                .into_any()
            }
        };
        Some(view! {
            <div class="card bg-base-100 shadow">
                <div class="card-body text-sm">
                    <h3 class="card-title">"Appointment History"</h3>
                    {body}
                </div>
            </div>
        })
    };

    view! {
        <div class="grid gap-6 lg:grid-cols-3">
            <div class="lg:col-span-2 card bg-base-100 shadow">
                <div class="card-body space-y-4">
                    <div>
                        <h2 class="card-title">"Patients"</h2>
                        <p class="text-sm text-base-content/60">"Registered patients and their visit history"</p>
                    </div>
                    <input
                        type="search"
                        class="input input-bordered w-full md:w-80"
                        placeholder="Search by name or email..."
                        on:input=move |ev| search.set(event_target_value(&ev))
                        prop:value=search
                    />
                    <div class="overflow-x-auto">{table}</div>
                </div>
            </div>
            <div>{history_card}</div>
        </div>
    }
}
