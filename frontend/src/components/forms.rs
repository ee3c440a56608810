//! 表单状态管理模块
//!
//! 将零散的 signal 整合为结构体，负责：
//! - 数据的持有
//! - 数据的重置
//! - 数据到请求对象的转换（校验在 `clinic_shared::validation`）

use clinic_admin::{Notification, Notifier};
use clinic_shared::validation::{
    BookingForm, FieldErrors, REQUIRED_FIELDS_MESSAGE, validate_booking, validate_registration,
};
use clinic_shared::{CreateAppointmentRequest, RegisterRequest, UpdateProfileRequest, User, UserRole};
use leptos::prelude::*;

use crate::hooks::QueryHandle;
use crate::toast::ToastNotifier;

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// =========================================================
// 预约表单
// =========================================================

#[derive(Clone, Copy)]
pub struct BookingFormState {
    /// 仅管理员代客预约时使用
    pub patient_id: RwSignal<String>,
    pub doctor_id: RwSignal<String>,
    pub date: RwSignal<String>,
    pub time: RwSignal<String>,
    pub notes: RwSignal<String>,
}

impl BookingFormState {
    pub fn new() -> Self {
        Self {
            patient_id: RwSignal::new(String::new()),
            doctor_id: RwSignal::new(String::new()),
            date: RwSignal::new(String::new()),
            time: RwSignal::new(String::new()),
            notes: RwSignal::new(String::new()),
        }
    }

    pub fn reset(&self) {
        self.patient_id.set(String::new());
        self.doctor_id.set(String::new());
        self.date.set(String::new());
        self.time.set(String::new());
        self.notes.set(String::new());
    }

    pub fn to_form(&self) -> BookingForm {
        BookingForm {
            doctor_id: self.doctor_id.get_untracked(),
            date: self.date.get_untracked(),
            time: self.time.get_untracked(),
            notes: self.notes.get_untracked(),
        }
    }

    /// 校验失败时弹出第一条错误并返回 `None`
    pub fn validated(&self, toasts: ToastNotifier, require_patient: bool) -> Option<CreateAppointmentRequest> {
        if require_patient && self.patient_id.with_untracked(|id| id.trim().is_empty()) {
            toasts.notify(Notification::error(REQUIRED_FIELDS_MESSAGE));
            return None;
        }
        match validate_booking(&self.to_form()) {
            Ok(request) => Some(request),
            Err(errors) => {
                let message = errors
                    .iter()
                    .next()
                    .map(|(_, msg)| msg.to_string())
                    .unwrap_or_else(|| REQUIRED_FIELDS_MESSAGE.to_string());
                toasts.notify(Notification::error(message));
                None
            }
        }
    }
}

// =========================================================
// 用户表单（注册 / 管理员创建用户）
// =========================================================

#[derive(Clone, Copy)]
pub struct UserFormState {
    pub full_name: RwSignal<String>,
    pub email: RwSignal<String>,
    pub mobile_number: RwSignal<String>,
    pub password: RwSignal<String>,
    pub confirm_password: RwSignal<String>,
    pub user_type: RwSignal<Option<UserRole>>,
    pub address_division: RwSignal<String>,
    pub address_district: RwSignal<String>,
    pub address_thana: RwSignal<String>,
    pub license_number: RwSignal<String>,
    pub experience_years: RwSignal<String>,
    pub consultation_fee: RwSignal<String>,
    pub specialization: RwSignal<String>,
    pub errors: RwSignal<FieldErrors>,
    default_role: UserRole,
}

impl UserFormState {
    pub fn new(default_role: UserRole) -> Self {
        Self {
            full_name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            mobile_number: RwSignal::new("+88".to_string()),
            password: RwSignal::new(String::new()),
            confirm_password: RwSignal::new(String::new()),
            user_type: RwSignal::new(Some(default_role)),
            address_division: RwSignal::new(String::new()),
            address_district: RwSignal::new(String::new()),
            address_thana: RwSignal::new(String::new()),
            license_number: RwSignal::new(String::new()),
            experience_years: RwSignal::new(String::new()),
            consultation_fee: RwSignal::new(String::new()),
            specialization: RwSignal::new(String::new()),
            errors: RwSignal::new(FieldErrors::new()),
            default_role,
        }
    }

    pub fn reset(&self) {
        for field in [
            self.full_name,
            self.email,
            self.password,
            self.confirm_password,
            self.address_division,
            self.address_district,
            self.address_thana,
            self.license_number,
            self.experience_years,
            self.consultation_fee,
            self.specialization,
        ] {
            field.set(String::new());
        }
        self.mobile_number.set("+88".to_string());
        self.user_type.set(Some(self.default_role));
        self.errors.set(FieldErrors::new());
    }

    pub fn is_doctor(&self) -> bool {
        self.user_type.get() == Some(UserRole::Doctor)
    }

    fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            full_name: self.full_name.get_untracked(),
            email: self.email.get_untracked(),
            mobile_number: self.mobile_number.get_untracked(),
            password: self.password.get_untracked(),
            user_type: self.user_type.get_untracked(),
            address_division: optional(self.address_division.get_untracked()),
            address_district: optional(self.address_district.get_untracked()),
            address_thana: optional(self.address_thana.get_untracked()),
            license_number: optional(self.license_number.get_untracked()),
            experience_years: self.experience_years.get_untracked().trim().parse().ok(),
            consultation_fee: self.consultation_fee.get_untracked().trim().parse().ok(),
            specialization: optional(self.specialization.get_untracked()),
        }
    }

    /// 校验失败时把错误写入 `errors` 并返回 `None`
    pub fn validated(&self) -> Option<RegisterRequest> {
        match validate_registration(&self.to_request(), &self.confirm_password.get_untracked()) {
            Ok(request) => {
                self.errors.set(FieldErrors::new());
                Some(request)
            }
            Err(errors) => {
                tracing::debug!(fields = errors.len(), "registration form rejected");
                self.errors.set(errors);
                None
            }
        }
    }
}

// =========================================================
// 个人资料表单
// =========================================================

#[derive(Clone, Copy)]
pub struct ProfileFormState {
    pub full_name: RwSignal<String>,
    pub address_division: RwSignal<String>,
    pub address_district: RwSignal<String>,
    pub address_thana: RwSignal<String>,
    pub specialization: RwSignal<String>,
    pub consultation_fee: RwSignal<String>,
}

impl ProfileFormState {
    pub fn new() -> Self {
        Self {
            full_name: RwSignal::new(String::new()),
            address_division: RwSignal::new(String::new()),
            address_district: RwSignal::new(String::new()),
            address_thana: RwSignal::new(String::new()),
            specialization: RwSignal::new(String::new()),
            consultation_fee: RwSignal::new(String::new()),
        }
    }

    /// 用当前资料填充（进入编辑态时调用）
    pub fn fill(&self, user: &User) {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        self.full_name.set(user.full_name.clone());
        self.address_division.set(text(&user.address_division));
        self.address_district.set(text(&user.address_district));
        self.address_thana.set(text(&user.address_thana));
        self.specialization.set(text(&user.specialization));
        self.consultation_fee
            .set(user.consultation_fee.map(|f| f.to_string()).unwrap_or_default());
    }

    /// 空字段不提交
    pub fn to_request(&self) -> UpdateProfileRequest {
        UpdateProfileRequest {
            full_name: optional(self.full_name.get_untracked()),
            address_division: optional(self.address_division.get_untracked()),
            address_district: optional(self.address_district.get_untracked()),
            address_thana: optional(self.address_thana.get_untracked()),
            specialization: optional(self.specialization.get_untracked()),
            consultation_fee: self.consultation_fee.get_untracked().trim().parse().ok(),
            ..Default::default()
        }
    }
}

// =========================================================
// 通用字段组件
// =========================================================

#[component]
pub fn TextField(
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional)] placeholder: &'static str,
    /// 在 `errors` 中对应的字段名
    #[prop(optional)]
    field: &'static str,
    #[prop(optional)] errors: Option<RwSignal<FieldErrors>>,
) -> impl IntoView {
    let error = move || errors.and_then(|e| e.with(|e| e.get(field).map(str::to_string)));

    view! {
        <div class="form-control">
            <label class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                type=input_type
                placeholder=placeholder
                class=move || {
                    if error().is_some() { "input input-bordered input-error w-full" } else { "input input-bordered w-full" }
                }
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=value
            />
            {move || error().map(|msg| view! { <span class="text-sm text-error mt-1">{msg}</span> })}
        </div>
    }
}

/// 注册与创建用户共用的字段
#[component]
pub fn UserFields(
    form: UserFormState,
    /// 是否允许选择角色（注册页不允许创建管理员）
    roles: &'static [UserRole],
) -> impl IntoView {
    let errors = form.errors;

    view! {
        <div class="grid gap-4">
            <h3 class="text-lg font-medium">"Basic Information"</h3>
            <TextField label="Full Name *" value=form.full_name field="full_name" errors=errors placeholder="Enter full name" />
            <TextField label="Email *" value=form.email input_type="email" field="email" errors=errors placeholder="name@example.com" />
            <TextField label="Mobile Number *" value=form.mobile_number field="mobile_number" errors=errors placeholder="+8801XXXXXXXXX" />
            <div class="grid md:grid-cols-2 gap-4">
                <TextField label="Password *" value=form.password input_type="password" field="password" errors=errors />
                <TextField label="Confirm Password *" value=form.confirm_password input_type="password" field="confirm_password" errors=errors />
            </div>
            <div class="form-control">
                <label class="label">
                    <span class="label-text">"User Type *"</span>
                </label>
                <select
                    class="select select-bordered w-full"
                    on:change=move |ev| form.user_type.set(event_target_value(&ev).parse().ok())
                >
                    {roles
                        .iter()
                        .map(|role| {
                            let role = *role;
                            view! {
                                <option
                                    value=role.as_str()
                                    selected=move || form.user_type.get() == Some(role)
                                >
                                    {clinic_shared::display::role_label(role)}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <h3 class="text-lg font-medium">"Address"</h3>
            <div class="grid md:grid-cols-3 gap-4">
                <TextField label="Division" value=form.address_division />
                <TextField label="District" value=form.address_district />
                <TextField label="Thana" value=form.address_thana />
            </div>

            <Show when=move || form.is_doctor()>
                <h3 class="text-lg font-medium">"Professional Information"</h3>
                <TextField label="License Number *" value=form.license_number field="license_number" errors=errors />
                <TextField label="Specialization" value=form.specialization />
                <div class="grid md:grid-cols-2 gap-4">
                    <TextField label="Experience (years) *" value=form.experience_years input_type="number" field="experience_years" errors=errors />
                    <TextField label="Consultation Fee *" value=form.consultation_fee input_type="number" field="consultation_fee" errors=errors />
                </div>
            </Show>
        </div>
    }
}

/// 下拉选择一个用户，值为用户 id
#[component]
pub fn UserSelect(
    label: &'static str,
    placeholder: &'static str,
    value: RwSignal<String>,
    users: QueryHandle<Vec<User>>,
    #[prop(default = false)] doctor: bool,
) -> impl IntoView {
    let options = move || {
        users
            .data()
            .map(|list| list.as_ref().clone())
            .unwrap_or_default()
            .into_iter()
            .map(|user| {
                let id = user.id.to_string();
                let selected_id = id.clone();
                let text = match (doctor, user.specialization.as_deref()) {
                    (true, Some(specialization)) => format!("Dr. {} ({specialization})", user.full_name),
                    (true, None) => format!("Dr. {}", user.full_name),
                    (false, _) => user.full_name.clone(),
                };
                view! {
                    <option value=id selected=move || value.with(|v| *v == selected_id)>
                        {text}
                    </option>
                }
            })
            .collect_view()
    };

    view! {
        <div class="form-control">
            <label class="label">
                <span class="label-text">{label}</span>
            </label>
            <select
                class="select select-bordered w-full"
                on:change=move |ev| value.set(event_target_value(&ev))
            >
                <option value="" disabled selected=move || value.with(String::is_empty)>
                    {move || if users.is_loading() { "Loading..." } else { placeholder }}
                </option>
                {options}
            </select>
        </div>
    }
}

/// 预约表单字段；传入 `patients` 时显示患者选择（管理员代客预约）
#[component]
pub fn BookingFields(
    form: BookingFormState,
    doctors: QueryHandle<Vec<User>>,
    #[prop(optional)] patients: Option<QueryHandle<Vec<User>>>,
) -> impl IntoView {
    view! {
        <div class="grid gap-4">
            {patients.map(|patients| view! {
                <UserSelect label="Patient *" placeholder="Select a patient" value=form.patient_id users=patients />
            })}
            <UserSelect label="Doctor *" placeholder="Select a doctor" value=form.doctor_id users=doctors doctor=true />
            <div class="grid md:grid-cols-2 gap-4">
                <TextField label="Date *" value=form.date input_type="date" />
                <TextField label="Time *" value=form.time input_type="time" />
            </div>
            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Notes"</span>
                </label>
                <textarea
                    class="textarea textarea-bordered w-full"
                    placeholder="Additional notes or symptoms..."
                    on:input=move |ev| form.notes.set(event_target_value(&ev))
                    prop:value=form.notes
                ></textarea>
            </div>
        </div>
    }
}
