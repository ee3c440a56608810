//! 月度报表（仅管理员）

use chrono::Utc;
use clinic_admin::{MutationOptions, Notification, Notifier};
use clinic_shared::Report;
use clinic_shared::date::{month_label, report_period};
use clinic_shared::display::format_currency;
use clinic_shared::validation::validate_report_period;
use leptos::prelude::*;

use crate::hooks::use_api_mutation;
use crate::toast::use_toasts;

/// 年份下拉中列出的年数（含今年）
const YEAR_CHOICES: i32 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct ReportTotals {
    earnings: f64,
    appointments: u32,
    patients: u32,
}

impl ReportTotals {
    fn of(reports: &[Report]) -> Self {
        reports.iter().fold(Self::default(), |acc, r| Self {
            earnings: acc.earnings + r.total_earnings,
            appointments: acc.appointments + r.total_appointments,
            patients: acc.patients + r.total_patients,
        })
    }
}

#[component]
pub fn ReportsPage() -> impl IntoView {
    let toasts = use_toasts();
    let (this_year, this_month) = report_period(Utc::now().date_naive());

    let year = RwSignal::new(this_year);
    let month = RwSignal::new(this_month);
    let reports = RwSignal::new(Vec::<Report>::new());
    let generated_for = RwSignal::new(None::<(i32, u32)>);

    let generate = use_api_mutation(
        move || {
            MutationOptions::default()
                .success_message("Monthly report generated successfully")
                .on_success(move |data: &Vec<Report>| reports.set(data.clone()))
        },
        move |api, (y, m): (i32, u32)| {
            generated_for.set(Some((y, m)));
            async move { api.generate_report(y, m).await }
        },
    );

    let on_generate = move |_| {
        let (y, m) = (year.get_untracked(), month.get_untracked());
        match validate_report_period(y, m) {
            Ok(()) => generate.mutate((y, m)),
            Err(message) => toasts.notify(Notification::error(message)),
        }
    };

    let period = move || {
        generated_for
            .get()
            .and_then(|(y, m)| month_label(y, m))
            .unwrap_or_default()
    };
    let totals = move || reports.with(|r| ReportTotals::of(r));

    let summary = move || {
        if reports.with(Vec::is_empty) {
            if generate.is_pending() {
                return None;
            }
            return Some(
                view! {
                    <div class="card bg-base-100 shadow">
                        <div class="card-body items-center text-center py-12 text-base-content/60">
                            <h3 class="text-lg font-semibold">"No Reports Generated"</h3>
                            <p>"Select a month and year above to generate a report"</p>
                        </div>
                    </div>
                }
                .into_any(),
            );
        }

        let list = reports.get();
        Some(
            view! {
                <div class="stats stats-vertical md:stats-horizontal shadow bg-base-100 w-full">
                    <div class="stat">
                        <div class="stat-title">"Total Earnings"</div>
                        <div class="stat-value">{move || format_currency(totals().earnings)}</div>
                        <div class="stat-desc">{period}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Total Appointments"</div>
                        <div class="stat-value">{move || totals().appointments}</div>
                        <div class="stat-desc">"Completed appointments"</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Total Patients"</div>
                        <div class="stat-value">{move || totals().patients}</div>
                        <div class="stat-desc">"Unique patients served"</div>
                    </div>
                </div>

                <div class="card bg-base-100 shadow">
                    <div class="card-body space-y-4">
                        <div>
                            <h3 class="card-title">"Doctor Performance Report"</h3>
                            <p class="text-sm text-base-content/60">
                                {move || format!("{} - Detailed breakdown by doctor", period())}
                            </p>
                        </div>
                        {list
                            .into_iter()
                            .map(|r| view! {
                                <div class="border border-base-300 rounded-lg p-4">
                                    <div class="flex items-center justify-between mb-3">
                                        <div>
                                            <h4 class="font-semibold">{format!("Doctor ID: {}", r.doctor_id)}</h4>
                                            <p class="text-sm text-base-content/60">
                                                {format!("Report Period: {}", r.month)}
                                            </p>
                                        </div>
                                        <span class="badge badge-outline">
                                            {format!("{} appointments", r.total_appointments)}
                                        </span>
                                    </div>
                                    <div class="grid md:grid-cols-3 gap-4 text-center">
                                        <div class="p-3 bg-base-200 rounded">
                                            <div class="text-2xl font-bold text-info">{r.total_patients}</div>
                                            <div class="text-sm text-base-content/60">"Patients Treated"</div>
                                        </div>
                                        <div class="p-3 bg-base-200 rounded">
                                            <div class="text-2xl font-bold text-success">{r.total_appointments}</div>
                                            <div class="text-sm text-base-content/60">"Appointments Completed"</div>
                                        </div>
                                        <div class="p-3 bg-base-200 rounded">
                                            <div class="text-2xl font-bold text-secondary">
                                                {format_currency(r.total_earnings)}
                                            </div>
                                            <div class="text-sm text-base-content/60">"Total Earnings"</div>
                                        </div>
                                    </div>
                                </div>
                            })
                            .collect_view()}
                    </div>
                </div>
            }
            .into_any(),
        )
    };

    view! {
        <div class="grid gap-6 max-w-6xl mx-auto">
            <div>
                <h1 class="text-3xl font-bold">"Reports"</h1>
                <p class="text-base-content/60">
                    "Generate and view monthly reports for doctors and appointments"
                </p>
            </div>

            <div class="card bg-base-100 shadow">
                <div class="card-body space-y-4">
                    <h2 class="card-title">"Generate Monthly Report"</h2>
                    <p class="text-sm text-base-content/60">
                        "Select a month and year to generate a comprehensive report"
                    </p>
                    <div class="grid md:grid-cols-3 gap-4 items-end">
                        <div class="form-control">
                            <label class="label"><span class="label-text">"Year"</span></label>
                            <select
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    if let Ok(y) = event_target_value(&ev).parse() {
                                        year.set(y);
                                    }
                                }
                            >
                                {(0..YEAR_CHOICES)
                                    .map(|offset| {
                                        let y = this_year - offset;
                                        view! {
                                            <option value=y.to_string() selected=move || year.get() == y>
                                                {y}
                                            </option>
                                        }
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"Month"</span></label>
                            <select
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    if let Ok(m) = event_target_value(&ev).parse() {
                                        month.set(m);
                                    }
                                }
                            >
                                {(1..=12u32)
                                    .map(|m| {
                                        let name = month_label(this_year, m)
                                            .and_then(|label| label.split_whitespace().next().map(str::to_string))
                                            .unwrap_or_else(|| m.to_string());
                                        view! {
                                            <option value=m.to_string() selected=move || month.get() == m>
                                                {name}
                                            </option>
                                        }
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                        <button class="btn btn-primary w-full" disabled=move || generate.is_pending() on:click=on_generate>
                            {move || if generate.is_pending() { "Generating..." } else { "Generate Report" }}
                        </button>
                    </div>
                </div>
            </div>

            {summary}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn report(doctor_id: i64, patients: u32, appointments: u32, earnings: f64) -> Report {
        Report {
            id: doctor_id,
            doctor_id,
            month: "2025-03".to_string(),
            total_patients: patients,
            total_appointments: appointments,
            total_earnings: earnings,
            created_at: NaiveDate::from_ymd_opt(2025, 4, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap(),
        }
    }

    #[test]
    fn totals_sum_every_doctor() {
        let totals = ReportTotals::of(&[report(1, 3, 5, 150.0), report(2, 2, 4, 99.5)]);
        assert_eq!(totals.patients, 5);
        assert_eq!(totals.appointments, 9);
        assert!((totals.earnings - 249.5).abs() < f64::EPSILON);
    }

    #[test]
    fn no_reports_means_zero_totals() {
        assert_eq!(ReportTotals::of(&[]), ReportTotals::default());
    }
}
