use crate::client::ApiError;
use crate::controller::{LookupOutcome, RegistrationOutcome};
use crate::form::{
    RegistrationForm, ReportForm, AGE_MAX, LOOKUP_CODE_DIGITS, PHONE_MAX_CHARS,
    REGISTRATION_CODE_MAX_CHARS,
};
use crate::report::Gender;

use super::report::{download_link, render_report};
use super::{escape_html, page_shell, Level, Notice, View};

fn connect_failure(error: &ApiError) -> Notice {
    Notice::new(Level::Error, error.to_string())
}

fn unexpected_status(status: u16, body: &str) -> Notice {
    Notice::new(Level::Error, format!("❌ Unexpected error: HTTP {}", status)).with_detail(body)
}

fn prediction_id_notice(prediction_id: &str) -> Notice {
    Notice::new(Level::Info, format!("Using prediction_id: {}", prediction_id))
}

/// Messages for a failed registration call.
pub fn registration_error_notice(error: &ApiError) -> Notice {
    match error {
        ApiError::NotFound { message } => Notice::new(
            Level::Error,
            "❌ Prediction not found. Please check prediction date & code.",
        )
        .with_detail(message.as_str()),
        ApiError::AlreadyRegistered { message } => Notice::new(
            Level::Warning,
            "⚠️ Patient already registered for this prediction_id.",
        )
        .with_detail(message.as_str()),
        ApiError::BadRequest { message } => Notice::new(
            Level::Error,
            "❌ Bad request. Some fields may be missing or invalid.",
        )
        .with_detail(message.as_str()),
        ApiError::UnexpectedStatus { status, body } => unexpected_status(*status, body),
        ApiError::MalformedResponse { raw } => {
            Notice::new(Level::Error, "Server returned a non-JSON response.").with_detail(raw.as_str())
        }
        ApiError::UnexpectedReport { raw } => {
            Notice::new(Level::Error, "Server returned a report in an unexpected format.")
                .with_detail(raw.as_str())
        }
        ApiError::NotRegistered { message } => {
            Notice::new(Level::Warning, "🚫 Patient not registered for this prediction_id.")
                .with_detail(message.as_str())
        }
        ApiError::Transport(_) => connect_failure(error),
    }
}

/// Messages for a failed report lookup.
pub fn lookup_error_notice(error: &ApiError) -> Notice {
    match error {
        ApiError::NotFound { message } => Notice::new(
            Level::Error,
            "❌ Prediction not found. Please check date & 8-digit code.",
        )
        .with_detail(message.as_str()),
        ApiError::NotRegistered { message } => {
            Notice::new(Level::Warning, "🚫 Patient not registered for this prediction_id.")
                .with_detail(message.as_str())
        }
        ApiError::BadRequest { message } => Notice::new(
            Level::Error,
            "❌ prediction_id is required (server-side validation failed).",
        )
        .with_detail(message.as_str()),
        ApiError::UnexpectedStatus { status, body } => unexpected_status(*status, body),
        ApiError::MalformedResponse { raw } => {
            Notice::new(Level::Error, "Server returned a non-JSON response.").with_detail(raw.as_str())
        }
        ApiError::UnexpectedReport { raw } => {
            Notice::new(Level::Error, "Server returned a report in an unexpected format.")
                .with_detail(raw.as_str())
        }
        ApiError::AlreadyRegistered { message } => Notice::new(
            Level::Warning,
            "⚠️ Patient already registered for this prediction_id.",
        )
        .with_detail(message.as_str()),
        ApiError::Transport(_) => connect_failure(error),
    }
}

fn text_input(label: &str, name: &str, value: &str, placeholder: &str, max_chars: usize) -> String {
    format!(
        "<label>{label}<input type=\"text\" name=\"{name}\" value=\"{value}\" \
         placeholder=\"{placeholder}\" maxlength=\"{max}\"></label>\n",
        label = label,
        name = name,
        value = escape_html(value),
        placeholder = placeholder,
        max = max_chars
    )
}

fn date_input(value: &str) -> String {
    format!(
        "<label>Prediction Date<input type=\"date\" name=\"prediction_date\" value=\"{}\"></label>\n",
        escape_html(value)
    )
}

fn gender_select(selected: &str) -> String {
    let options: String = Gender::ALL
        .iter()
        .map(|gender| {
            let mark = if gender.code() == selected.trim() { " selected" } else { "" };
            format!("<option value=\"{0}\"{1}>{0}</option>", gender.code(), mark)
        })
        .collect();
    format!("<label>Gender<select name=\"gender\">{}</select></label>\n", options)
}

fn register_form(form: &RegistrationForm) -> String {
    let mut html = String::from("<form method=\"post\" action=\"/register\">\n<h3>Prediction Details</h3>\n");
    html.push_str(&date_input(&form.prediction_date));
    html.push_str(&text_input(
        "Prediction Unique Code",
        "unique_code",
        &form.unique_code,
        "e.g. 12345678",
        REGISTRATION_CODE_MAX_CHARS,
    ));
    html.push_str("<h3>Patient Details</h3>\n");
    html.push_str(&text_input("Full Name", "name", &form.name, "Rishabh Kumar", 200));
    html.push_str(&format!(
        "<label>Age<input type=\"number\" name=\"age\" min=\"0\" max=\"{}\" step=\"1\" value=\"{}\"></label>\n",
        AGE_MAX,
        escape_html(&form.age)
    ));
    html.push_str(&gender_select(&form.gender));
    html.push_str(&text_input(
        "Phone Number",
        "phone_no",
        &form.phone_no,
        "9876543210",
        PHONE_MAX_CHARS,
    ));
    html.push_str(&format!(
        "<label>Previous Medication<textarea name=\"previous_medication\" rows=\"4\" \
         placeholder=\"e.g. Atorvastatin 10mg, Aspirin 75mg\">{}</textarea></label>\n",
        escape_html(&form.previous_medication)
    ));
    html.push_str("<button type=\"submit\">Register Patient</button>\n</form>\n");
    html
}

fn registration_results(outcome: &RegistrationOutcome) -> String {
    match outcome {
        RegistrationOutcome::Invalid(errors) => errors
            .iter()
            .map(|e| Notice::new(Level::Error, e.to_string()).render())
            .collect(),
        RegistrationOutcome::Registered {
            prediction_id,
            record,
        } => {
            let record = serde_json::to_string_pretty(record).unwrap_or_else(|_| record.to_string());
            format!(
                "{}{}<p>Prediction ID: <strong>{}</strong></p>\n\
                 <details><summary>View saved record</summary><pre>{}</pre></details>\n",
                prediction_id_notice(prediction_id).render(),
                Notice::new(Level::Success, "✅ Patient registered successfully!").render(),
                escape_html(prediction_id),
                escape_html(&record)
            )
        }
        RegistrationOutcome::Rejected {
            prediction_id,
            error,
        } => format!(
            "{}{}",
            prediction_id_notice(prediction_id).render(),
            registration_error_notice(error).render()
        ),
    }
}

/// The "Register Patient" view, with results when a submission was made.
pub fn register_page(form: &RegistrationForm, outcome: Option<&RegistrationOutcome>) -> String {
    let mut content = String::from(
        "<h1>🫀 ECGenius - Patient Registration</h1>\n\
         <p>Register a patient for an existing prediction ID.</p>\n",
    );
    content.push_str(&register_form(form));
    if let Some(outcome) = outcome {
        content.push_str("<section class=\"results\">\n");
        content.push_str(&registration_results(outcome));
        content.push_str("</section>\n");
    }
    page_shell(View::Register, &content)
}

fn report_form(form: &ReportForm) -> String {
    let mut html = String::from("<form method=\"post\" action=\"/report\">\n<h3>Prediction Details</h3>\n");
    html.push_str(&date_input(&form.prediction_date));
    html.push_str(&text_input(
        "8-digit Prediction Code",
        "code",
        &form.code,
        "e.g. 12345678",
        LOOKUP_CODE_DIGITS,
    ));
    html.push_str("<button type=\"submit\">Fetch Report</button>\n</form>\n");
    html
}

fn lookup_results(outcome: &LookupOutcome) -> String {
    match outcome {
        LookupOutcome::Invalid(errors) => errors
            .iter()
            .map(|e| Notice::new(Level::Error, e.to_string()).render())
            .collect(),
        LookupOutcome::Found {
            prediction_id,
            report,
            pdf,
        } => {
            let mut html = prediction_id_notice(prediction_id).render();
            html.push_str(&Notice::new(Level::Success, "✅ Report fetched successfully!").render());
            html.push_str(&render_report(report));
            match pdf {
                Ok(bytes) => html.push_str(&download_link(report, bytes)),
                Err(error) => html.push_str(
                    &Notice::new(Level::Error, "Could not build the PDF report.")
                        .with_detail(error.to_string())
                        .render(),
                ),
            }
            html
        }
        LookupOutcome::Rejected {
            prediction_id,
            error,
        } => format!(
            "{}{}",
            prediction_id_notice(prediction_id).render(),
            lookup_error_notice(error).render()
        ),
    }
}

/// The "Get Report" view, with results when a submission was made.
pub fn report_page(form: &ReportForm, outcome: Option<&LookupOutcome>) -> String {
    let mut content = String::from(
        "<h1>📄 ECGenius - Get Report</h1>\n\
         <p>Enter your prediction details to view the ECGenius report.</p>\n",
    );
    content.push_str(&report_form(form));
    if let Some(outcome) = outcome {
        content.push_str("<section class=\"results\">\n");
        content.push_str(&lookup_results(outcome));
        content.push_str("</section>\n");
    }
    page_shell(View::Report, &content)
}

/// Shown when a submission could not be processed at all.
pub fn failure_page(view: View, message: &str) -> String {
    page_shell(view, &Notice::new(Level::Error, message).render())
}
