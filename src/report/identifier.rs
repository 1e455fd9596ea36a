use chrono::NaiveDate;

/// Combine a prediction date and the user-supplied code into a prediction id,
/// e.g. `2025-11-25-ABC12345`.
///
/// Registration and lookup must both go through this function so they agree
/// on the key. The code is not validated here; an empty code yields an id
/// ending in `-`.
pub fn build_prediction_id(date: NaiveDate, code: &str) -> String {
    let cleaned: String = code.trim().chars().filter(|c| *c != ' ').collect();
    format!("{}-{}", date.format("%Y-%m-%d"), cleaned)
}
