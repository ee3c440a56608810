//! 患者自助预约页

use clinic_admin::query::keys;
use clinic_admin::{MutationOptions, QueryKey, QueryOptions};
use clinic_shared::date::format_date_time;
use clinic_shared::{AppointmentStatus, UserRole};
use leptos::prelude::*;

use crate::components::badges::StatusBadge;
use crate::components::forms::{BookingFields, BookingFormState};
use crate::components::loading::Spinner;
use crate::components::pages::dashboard::doctor_name;
use crate::hooks::{use_api_mutation, use_api_query};
use crate::toast::use_toasts;

#[component]
pub fn BookingPage() -> impl IntoView {
    let toasts = use_toasts();
    let form = BookingFormState::new();

    let doctors = use_api_query(keys::doctors, QueryOptions::default, |api| async move {
        api.doctors().await
    });
    let upcoming = use_api_query(keys::upcoming_appointments, QueryOptions::default, |api| async move {
        api.my_upcoming_appointments().await
    });

    let book = use_api_mutation(
        move || {
            MutationOptions::default()
                .success_message("Appointment booked successfully")
                .invalidate(keys::upcoming_appointments())
                .invalidate(QueryKey::new("appointments"))
                .on_success(move |_| form.reset())
        },
        |api, request| async move { api.create_appointment(&request).await },
    );

    let cancel = use_api_mutation(
        || {
            MutationOptions::default()
                .success_message("Appointment status updated successfully")
                .invalidate(keys::upcoming_appointments())
                .invalidate(QueryKey::new("appointments"))
        },
        |api, id: i64| async move {
            api.update_appointment_status(id, AppointmentStatus::Cancelled)
                .await
        },
    );

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if let Some(request) = form.validated(toasts, false) {
            book.mutate(request);
        }
    };

    let sidebar = move || {
        if upcoming.is_loading() && upcoming.data().is_none() {
            return view! { <Spinner /> }.into_any();
        }
        let list = upcoming.data().map(|l| l.as_ref().clone()).unwrap_or_default();
        if list.is_empty() {
            return view! {
                <div class="text-center py-8 text-base-content/60">"No appointments scheduled"</div>
            }
            .into_any();
        }
        view! {
            <div class="space-y-4">
                {list
                    .into_iter()
                    .map(|a| {
                        let id = a.id;
                        let when = format_date_time(&a.appointment_datetime);
                        let cancellable = a
                            .status
                            .transitions_for(UserRole::Patient)
                            .contains(&AppointmentStatus::Cancelled);
                        view! {
                            <div class="border border-base-300 rounded-lg p-4 space-y-2">
                                <div class="flex items-center justify-between">
                                    <div class="font-medium">{doctor_name(&a)}</div>
                                    <StatusBadge status=a.status />
                                </div>
                                <div class="text-sm text-base-content/60">
                                    <div>{when.date}</div>
                                    <div>{when.time}</div>
                                </div>
                                {a.notes.clone().map(|notes| view! {
                                    <div class="text-sm text-base-content/60">
                                        <strong>"Notes: "</strong>
                                        {notes}
                                    </div>
                                })}
                                {cancellable.then(|| view! {
                                    <button
                                        class="btn btn-xs btn-outline btn-error"
                                        disabled=move || cancel.is_pending()
                                        on:click=move |_| cancel.mutate(id)
                                    >
                                        "Cancel"
                                    </button>
                                })}
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        }
        .into_any()
    };

    view! {
        <div class="grid gap-6 lg:grid-cols-3">
            <div class="lg:col-span-2 card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">"Book New Appointment"</h2>
                    <p class="text-sm text-base-content/60">
                        "Schedule an appointment with one of our doctors"
                    </p>
                    <form class="space-y-6 mt-4" on:submit=on_submit>
                        <BookingFields form=form doctors=doctors />
                        <button type="submit" class="btn btn-primary w-full" disabled=move || book.is_pending()>
                            {move || if book.is_pending() { "Booking..." } else { "Book Appointment" }}
                        </button>
                    </form>
                </div>
            </div>

            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">"My Appointments"</h2>
                    <p class="text-sm text-base-content/60">"Your upcoming and recent appointments"</p>
                    {sidebar}
                </div>
            </div>
        </div>
    }
}
