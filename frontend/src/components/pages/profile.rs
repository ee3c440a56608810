use clinic_admin::query::keys;
use clinic_admin::{MutationOptions, Notification, Notifier, QueryOptions};
use clinic_shared::date::format_date_time;
use clinic_shared::display::{capitalize, format_currency};
use clinic_shared::validation::validate_profile_image;
use clinic_shared::{User, UserRole};
use leptos::prelude::*;
use web_sys::File;

use crate::auth::use_auth;
use crate::components::badges::StatusBadge;
use crate::components::forms::{ProfileFormState, TextField};
use crate::components::loading::{LoadingPage, Spinner};
use crate::components::pages::dashboard::doctor_name;
use crate::hooks::{use_api_mutation, use_api_query};
use crate::toast::use_toasts;
use crate::web::{read_multipart, selected_file};

/// multipart 表单中的文件字段名
const IMAGE_FIELD: &str = "file";

fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() { "U".to_string() } else { letters }
}

fn or_not_specified(value: &Option<String>) -> String {
    value
        .clone()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "Not specified".to_string())
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let user = move || auth.state.get().user().cloned();

    let editing = RwSignal::new(false);
    let show_appointments = RwSignal::new(false);
    let form = ProfileFormState::new();

    let upcoming = use_api_query(
        keys::upcoming_appointments,
        move || QueryOptions::default().enabled(show_appointments.get()),
        |api| async move { api.my_upcoming_appointments().await },
    );

    let update = use_api_mutation(
        move || {
            MutationOptions::default()
                .success_message("Profile updated successfully")
                .invalidate(keys::current_user())
                .on_success(move |_| editing.set(false))
        },
        |api, request| async move { api.update_profile(&request).await },
    );

    let upload = use_api_mutation(
        || {
            MutationOptions::default()
                .success_message("Profile image updated successfully")
                .invalidate(keys::current_user())
        },
        |api, file: File| async move {
            let part = read_multipart(IMAGE_FIELD, &file).await?;
            api.upload_profile_image(part).await
        },
    );

    let on_image = move |ev: web_sys::Event| {
        let Some(file) = selected_file(&ev) else { return };
        match validate_profile_image(file.size() as u64, &file.type_()) {
            Ok(()) => upload.mutate(file),
            Err(message) => toasts.notify(Notification::error(message)),
        }
    };

    let toggle_edit = move |_| {
        if editing.get_untracked() {
            editing.set(false);
        } else if let Some(user) = user() {
            form.fill(&user);
            editing.set(true);
        }
    };

    let header = move |user: &User| {
        let avatar = match user.profile_image.clone().filter(|src| !src.is_empty()) {
            Some(src) => view! { <img src=src alt=user.full_name.clone() /> }.into_any(),
            None => view! {
                <div class="bg-neutral text-neutral-content w-20 rounded-full flex items-center justify-center text-lg">
                    {initials(&user.full_name)}
                </div>
            }
            .into_any(),
        };
        view! {
            <div class="card bg-base-100 shadow">
                <div class="card-body flex-row items-center gap-4">
                    <div class="relative">
                        <div class="avatar">
                            <div class="w-20 rounded-full">{avatar}</div>
                        </div>
                        <label
                            for="profile-image"
                            class="btn btn-primary btn-circle btn-xs absolute bottom-0 right-0"
                            title="Change photo"
                        >
                            "+"
                        </label>
                        <input
                            id="profile-image"
                            type="file"
                            accept="image/jpeg,image/png"
                            class="hidden"
                            on:change=on_image
                        />
                    </div>
                    <div class="space-y-1">
                        <h2 class="text-2xl font-bold">{user.full_name.clone()}</h2>
                        <p class="text-base-content/60">{user.email.clone()}</p>
                        <span class="badge badge-outline">{capitalize(user.user_type.as_str())}</span>
                        <Show when=move || upload.is_pending()>
                            <Spinner label="Uploading..." />
                        </Show>
                    </div>
                </div>
            </div>
        }
    };

    let editable = move |label: &'static str, value: RwSignal<String>, shown: String| {
        if editing.get() {
            view! { <TextField label=label value=value /> }.into_any()
        } else {
            view! {
                <div class="form-control">
                    <label class="label"><span class="label-text">{label}</span></label>
                    <p class="text-sm py-2">{shown}</p>
                </div>
            }
            .into_any()
        }
    };

    let readonly = |label: &'static str, value: String| {
        view! {
            <div class="form-control">
                <label class="label"><span class="label-text">{label}</span></label>
                <p class="text-sm py-2 text-base-content/60">{format!("{value} (Cannot be changed)")}</p>
            </div>
        }
    };

    let details = move |user: User| {
        let is_doctor = user.user_type == UserRole::Doctor;
        view! {
            <div class="card bg-base-100 shadow">
                <div class="card-body space-y-6">
                    <div class="flex items-center justify-between">
                        <div>
                            <h3 class="card-title">"Personal Information"</h3>
                            <p class="text-sm text-base-content/60">
                                "Update your personal details and contact information"
                            </p>
                        </div>
                        <button
                            class=move || if editing.get() { "btn btn-outline" } else { "btn btn-primary" }
                            on:click=toggle_edit
                        >
                            {move || if editing.get() { "Cancel" } else { "Edit Profile" }}
                        </button>
                    </div>

                    <h4 class="text-lg font-medium">"Basic Information"</h4>
                    <div class="grid md:grid-cols-2 gap-4">
                        {editable("Full Name", form.full_name, user.full_name.clone())}
                        {readonly("Email", user.email.clone())}
                    </div>
                    {readonly("Mobile Number", user.mobile_number.clone())}

                    <div class="divider my-0"></div>
                    <h4 class="text-lg font-medium">"Address Information"</h4>
                    <div class="grid md:grid-cols-3 gap-4">
                        {editable("Division", form.address_division, or_not_specified(&user.address_division))}
                        {editable("District", form.address_district, or_not_specified(&user.address_district))}
                        {editable("Thana", form.address_thana, or_not_specified(&user.address_thana))}
                    </div>

                    {is_doctor.then(|| view! {
                        <div class="divider my-0"></div>
                        <h4 class="text-lg font-medium">"Professional Information"</h4>
                        <div class="grid md:grid-cols-2 gap-4">
                            {readonly("License Number", user.license_number.clone().unwrap_or_default())}
                            <div class="form-control">
                                <label class="label"><span class="label-text">"Experience"</span></label>
                                <p class="text-sm py-2">
                                    {user.experience_years.map(|y| format!("{y} years")).unwrap_or_else(|| "N/A".to_string())}
                                </p>
                            </div>
                        </div>
                        <div class="grid md:grid-cols-2 gap-4">
                            {editable("Specialization", form.specialization, or_not_specified(&user.specialization))}
                            {editable(
                                "Consultation Fee",
                                form.consultation_fee,
                                user.consultation_fee.map(format_currency).unwrap_or_else(|| "Not set".to_string()),
                            )}
                        </div>
                    })}

                    <Show when=move || editing.get()>
                        <div class="flex justify-end gap-2">
                            <button class="btn btn-outline" on:click=move |_| editing.set(false)>"Cancel"</button>
                            <button
                                class="btn btn-primary"
                                disabled=move || update.is_pending()
                                on:click=move |_| update.mutate(form.to_request())
                            >
                                {move || if update.is_pending() { "Saving..." } else { "Save Changes" }}
                            </button>
                        </div>
                    </Show>
                </div>
            </div>
        }
    };

    let appointments = move || {
        if upcoming.is_loading() && upcoming.data().is_none() {
            return view! { <Spinner /> }.into_any();
        }
        let list = upcoming.data().map(|l| l.as_ref().clone()).unwrap_or_default();
        if list.is_empty() {
            return view! {
                <div class="text-center py-8 text-base-content/60">"No upcoming appointments"</div>
            }
            .into_any();
        }
        view! {
            <div class="space-y-4">
                {list
                    .into_iter()
                    .map(|a| {
                        let when = format_date_time(&a.appointment_datetime);
                        view! {
                            <div class="flex items-center justify-between p-4 border border-base-300 rounded-lg">
                                <div>
                                    <div class="font-medium">{doctor_name(&a)}</div>
                                    <div class="text-sm text-base-content/60">
                                        {format!("{} at {}", when.date, when.time)}
                                    </div>
                                </div>
                                <StatusBadge status=a.status />
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        }
        .into_any()
    };

    view! {
        <div class="grid gap-6 max-w-4xl mx-auto">
            <div>
                <h1 class="text-3xl font-bold">"Profile"</h1>
                <p class="text-base-content/60">"Manage your account settings and preferences"</p>
            </div>

            <div role="tablist" class="tabs tabs-boxed w-fit">
                <a
                    role="tab"
                    class=move || if show_appointments.get() { "tab" } else { "tab tab-active" }
                    on:click=move |_| show_appointments.set(false)
                >
                    "Profile Information"
                </a>
                <a
                    role="tab"
                    class=move || if show_appointments.get() { "tab tab-active" } else { "tab" }
                    on:click=move |_| show_appointments.set(true)
                >
                    "My Appointments"
                </a>
            </div>

            {move || match (show_appointments.get(), user()) {
                (_, None) => view! { <LoadingPage /> }.into_any(),
                (false, Some(user)) => view! {
                    <div class="grid gap-6">
                        {header(&user)}
                        {details(user)}
                    </div>
                }
                .into_any(),
                (true, Some(_)) => view! {
                    <div class="card bg-base-100 shadow">
                        <div class="card-body">
                            <h3 class="card-title">"My Upcoming Appointments"</h3>
                            <p class="text-sm text-base-content/60">"View your scheduled appointments"</p>
                            {appointments}
                        </div>
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}
