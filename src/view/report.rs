use crate::plot::{render_waveform, PlotSize};
use crate::report::Report;

use super::{data_uri, escape_html, Level, Notice};

pub const SAMPLES_UNAVAILABLE: &str = "ECG samples are not available in this report.";

/// The interactive report: summary, medication, waveform and conditions.
pub fn render_report(report: &Report) -> String {
    let mut html = String::new();

    html.push_str("<section class=\"report\">\n<h3>🧾 Report Summary</h3>\n<div class=\"columns\">\n");
    html.push_str(&format!(
        "<div><p><strong>Prediction ID:</strong> {}</p><p><strong>Timestamp:</strong> {}</p></div>\n",
        escape_html(report.prediction_id_or_na()),
        escape_html(report.timestamp_or_na()),
    ));
    html.push_str(&format!(
        "<div><p><strong>Name:</strong> {}</p><p><strong>Age:</strong> {}</p>\
         <p><strong>Gender:</strong> {}</p><p><strong>Phone:</strong> {}</p></div>\n",
        escape_html(report.name_or_na()),
        escape_html(report.age_or_na()),
        escape_html(report.gender_or_na()),
        escape_html(report.phone_or_na()),
    ));
    html.push_str("</div>\n<hr>\n");

    html.push_str("<h3>💊 Previous Medication</h3>\n");
    html.push_str(&format!(
        "<p class=\"medication\">{}</p>\n<hr>\n",
        escape_html(report.medication_text())
    ));

    html.push_str("<h3>📉 ECG Signal</h3>\n");
    html.push_str(&render_waveform_block(report));

    html.push_str("<h3>🩺 ECG Prediction Results</h3>\n<div class=\"conditions\">\n");
    for (condition, status) in report.results.statuses() {
        html.push_str(&format!(
            "<div class=\"condition\"><p><strong>{}</strong></p><p>{} {}</p></div>\n",
            escape_html(condition.label()),
            status.glyph(),
            status.text()
        ));
    }
    html.push_str("</div>\n</section>\n");

    html
}

fn render_waveform_block(report: &Report) -> String {
    let plotted = report
        .normalized_samples()
        .zip(render_waveform(report.samples.as_ref(), PlotSize::DISPLAY));

    match plotted {
        Some((samples, png)) => format!(
            "<p class=\"caption\">Plotting {} ECG samples.</p>\n\
             <img class=\"waveform\" alt=\"ECG Waveform\" src=\"{}\">\n",
            samples.len(),
            data_uri("image/png", &png)
        ),
        None => Notice::new(Level::Info, SAMPLES_UNAVAILABLE).render() + "\n",
    }
}

/// Link that downloads the PDF straight from the page.
pub fn download_link(report: &Report, pdf: &[u8]) -> String {
    format!(
        "<p><a class=\"download\" download=\"{}\" href=\"{}\">📥 Download PDF Report</a></p>\n",
        escape_html(&report.pdf_file_name()),
        data_uri("application/pdf", pdf)
    )
}
