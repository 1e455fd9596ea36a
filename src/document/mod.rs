//! PDF report document
//!
//! Lays out a report as a paginated A4 document:
//! - Header with prediction id and timestamp
//! - Patient details and medication history
//! - Condition flags
//! - ECG sample summary and waveform image
//! - Footer disclaimer

pub mod writer;

pub use writer::{FontFace, LineStyle, PageLayout, PageWriter, PdfSurface, Surface};

use thiserror::Error;

use crate::plot::{render_waveform, PlotSize};
use crate::report::Report;

pub const DOCUMENT_TITLE: &str = "ECGenius - Patient Report";

/// Medication text is chunked at this many characters per line.
pub const MEDICATION_LINE_CHARS: usize = 90;

const CONDITION_LABEL_WIDTH: usize = 35;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("PDF font error: {0}")]
    Font(String),
    #[error("PDF save error: {0}")]
    Save(String),
}

/// Build the PDF for `report` and return its bytes. Nothing is written to disk.
pub fn build_document(report: &Report) -> Result<Vec<u8>, DocumentError> {
    let layout = PageLayout::a4();
    let surface = PdfSurface::new(DOCUMENT_TITLE, &layout)?;
    let mut writer = PageWriter::new(surface, layout);
    layout_report(report, &mut writer);
    writer.into_surface().finish()
}

/// Emit every section of the report through `writer`.
pub fn layout_report<S: Surface>(report: &Report, writer: &mut PageWriter<S>) {
    let body = LineStyle::body();
    let heading = LineStyle::heading();

    // Header
    writer.line(DOCUMENT_TITLE, LineStyle::new(FontFace::Bold, 18.0, 24.0));
    writer.line(
        &format!("Prediction ID: {}", report.prediction_id_or_na()),
        body.bold().with_gap(18.0),
    );
    writer.line(
        &format!("Timestamp: {}", report.timestamp_or_na()),
        body.with_gap(18.0),
    );

    writer.blank();
    writer.line("Patient Details", heading);
    writer.line(&format!("Name      : {}", report.name_or_na()), body);
    writer.line(&format!("Age       : {}", report.age_or_na()), body);
    writer.line(&format!("Gender    : {}", report.gender_or_na()), body);
    writer.line(&format!("Phone No. : {}", report.phone_or_na()), body);

    writer.blank();
    writer.line("Previous Medication", heading);
    for chunk in chunk_chars(report.medication_text(), MEDICATION_LINE_CHARS) {
        writer.line(&chunk, body);
    }

    writer.blank();
    writer.line("ECG Prediction Results", heading);
    for (condition, status) in report.results.statuses() {
        writer.line(
            &format!(
                "{:width$}: {}",
                condition.label(),
                status,
                width = CONDITION_LABEL_WIDTH
            ),
            body,
        );
    }

    writer.blank();
    writer.line("ECG Signal", heading);
    match report.normalized_samples() {
        Some(samples) => writer.line(
            &format!("Number of samples recorded: {}", samples.len()),
            body.with_gap(18.0),
        ),
        None => writer.line(
            "ECG samples not available in this report.",
            body.with_gap(18.0),
        ),
    }

    if let Some(png) = render_waveform(report.samples.as_ref(), PlotSize::COMPACT) {
        match printpdf::image_crate::load_from_memory(&png) {
            Ok(image) => writer.image(&image),
            Err(err) => tracing::warn!(error = %err, "could not decode waveform image"),
        }
    }

    writer.blank();
    writer.line(
        "Generated by ECGenius",
        LineStyle::new(FontFace::Regular, 9.0, 12.0),
    );
    writer.line(
        "This report is for clinical review by a qualified physician.",
        LineStyle::new(FontFace::Regular, 8.0, 10.0),
    );
}

/// Split `text` into pieces of at most `width` characters, ignoring word
/// boundaries.
fn chunk_chars(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::writer::tests::RecordingSurface;
    use super::*;
    use crate::report::ConditionResults;
    use pretty_assertions::assert_eq;

    fn sample_report() -> Report {
        Report {
            prediction_id: Some("2025-11-25-12345678".to_string()),
            timestamp: Some("2025-11-25 10:00:00".to_string()),
            name: Some("Asha Rao".to_string()),
            age: Some("54".to_string()),
            gender: Some("F".to_string()),
            phone_no: Some("9876543210".to_string()),
            previous_medication: Some("Aspirin 75mg".to_string()),
            samples: None,
            results: ConditionResults {
                is_mci: Some(true),
                is_afib: Some(false),
                is_bbb: None,
                is_vfi: None,
            },
        }
    }

    fn lay_out(report: &Report) -> RecordingSurface {
        let mut writer = PageWriter::new(RecordingSurface::default(), PageLayout::a4());
        layout_report(report, &mut writer);
        writer.into_surface()
    }

    #[test]
    fn test_sections_in_order() {
        let surface = lay_out(&sample_report());
        let texts = surface.texts();
        let position = |needle: &str| texts.iter().position(|t| *t == needle).unwrap();

        assert_eq!(texts[0], DOCUMENT_TITLE);
        assert!(position("Prediction ID: 2025-11-25-12345678") < position("Patient Details"));
        assert!(position("Patient Details") < position("Previous Medication"));
        assert!(position("Previous Medication") < position("ECG Prediction Results"));
        assert!(position("ECG Prediction Results") < position("ECG Signal"));
        assert_eq!(
            texts.last().copied(),
            Some("This report is for clinical review by a qualified physician.")
        );
    }

    #[test]
    fn test_long_medication_is_chunked() {
        let medication = "Atorvastatin 10mg once daily, Aspirin 75mg after breakfast, \
                          Metoprolol 25mg twice daily, Clopidogrel 75mg at night for stent";
        assert!(medication.len() > MEDICATION_LINE_CHARS);
        let report = Report {
            previous_medication: Some(medication.to_string()),
            ..sample_report()
        };
        let surface = lay_out(&report);
        let texts = surface.texts();

        let start = texts.iter().position(|t| *t == "Previous Medication").unwrap() + 1;
        let end = texts.iter().position(|t| *t == "ECG Prediction Results").unwrap() - 1;
        let lines = &texts[start..end];

        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| line.chars().count() <= MEDICATION_LINE_CHARS));
        assert_eq!(lines.concat(), medication);
    }

    #[test]
    fn test_condition_lines() {
        let surface = lay_out(&sample_report());
        let texts = surface.texts();
        assert!(texts.contains(&"Myocardial Ischemia (MCI)          : Detected"));
        assert!(texts.contains(&"Atrial Fibrillation (AFib)         : Not Detected"));
        assert!(texts.contains(&"Bundle Branch Block (BBB)          : Unknown"));
        assert!(texts.contains(&"Ventricular Fibrillation (VFib)    : Unknown"));
    }

    #[test]
    fn test_missing_samples_show_unavailable_without_image() {
        let surface = lay_out(&sample_report());
        assert!(surface.texts().contains(&"ECG samples not available in this report."));
        assert!(!surface.has_image());
    }

    #[test]
    fn test_malformed_samples_show_unavailable_without_image() {
        let report = Report {
            samples: Some(serde_json::json!("1,2,oops")),
            ..sample_report()
        };
        let surface = lay_out(&report);
        assert!(surface.texts().contains(&"ECG samples not available in this report."));
        assert!(!surface.has_image());
    }

    #[test]
    fn test_missing_fields_render_placeholders() {
        let surface = lay_out(&Report::default());
        let texts = surface.texts();
        assert!(texts.contains(&"Prediction ID: N/A"));
        assert!(texts.contains(&"Name      : N/A"));
        assert!(texts.contains(&"Not provided"));
    }

    #[test]
    fn test_chunk_chars_counts_characters() {
        assert_eq!(chunk_chars("ééééé", 2), vec!["éé", "éé", "é"]);
        assert_eq!(chunk_chars("abc", 90), vec!["abc"]);
    }

    #[test]
    fn test_build_document_produces_pdf() {
        let bytes = build_document(&sample_report()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
