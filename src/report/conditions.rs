use serde::{Deserialize, Serialize};
use std::fmt;

/// The four conditions the prediction service flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    MyocardialIschemia,
    AtrialFibrillation,
    BundleBranchBlock,
    VentricularFibrillation,
}

impl Condition {
    /// Display order used by both the page and the document.
    pub const ALL: [Condition; 4] = [
        Condition::MyocardialIschemia,
        Condition::AtrialFibrillation,
        Condition::BundleBranchBlock,
        Condition::VentricularFibrillation,
    ];

    /// Key of the flag inside the `results` mapping
    pub fn key(&self) -> &'static str {
        match self {
            Condition::MyocardialIschemia => "is_mci",
            Condition::AtrialFibrillation => "is_afib",
            Condition::BundleBranchBlock => "is_bbb",
            Condition::VentricularFibrillation => "is_vfi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Condition::MyocardialIschemia => "Myocardial Ischemia (MCI)",
            Condition::AtrialFibrillation => "Atrial Fibrillation (AFib)",
            Condition::BundleBranchBlock => "Bundle Branch Block (BBB)",
            Condition::VentricularFibrillation => "Ventricular Fibrillation (VFib)",
        }
    }
}

/// Outcome of one condition flag. A missing or null flag is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionStatus {
    Detected,
    NotDetected,
    Unknown,
}

impl From<Option<bool>> for ConditionStatus {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => ConditionStatus::Detected,
            Some(false) => ConditionStatus::NotDetected,
            None => ConditionStatus::Unknown,
        }
    }
}

impl ConditionStatus {
    pub fn text(&self) -> &'static str {
        match self {
            ConditionStatus::Detected => "Detected",
            ConditionStatus::NotDetected => "Not Detected",
            ConditionStatus::Unknown => "Unknown",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            ConditionStatus::Detected => "⚠️",
            ConditionStatus::NotDetected => "✅",
            ConditionStatus::Unknown => "❔",
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// The `results` mapping of a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionResults {
    #[serde(default, deserialize_with = "super::lenient::flag")]
    pub is_mci: Option<bool>,
    #[serde(default, deserialize_with = "super::lenient::flag")]
    pub is_afib: Option<bool>,
    #[serde(default, deserialize_with = "super::lenient::flag")]
    pub is_bbb: Option<bool>,
    #[serde(default, deserialize_with = "super::lenient::flag")]
    pub is_vfi: Option<bool>,
}

impl ConditionResults {
    pub fn flag(&self, condition: Condition) -> Option<bool> {
        match condition {
            Condition::MyocardialIschemia => self.is_mci,
            Condition::AtrialFibrillation => self.is_afib,
            Condition::BundleBranchBlock => self.is_bbb,
            Condition::VentricularFibrillation => self.is_vfi,
        }
    }

    pub fn status(&self, condition: Condition) -> ConditionStatus {
        ConditionStatus::from(self.flag(condition))
    }

    /// Every condition paired with its status, in display order.
    pub fn statuses(&self) -> impl Iterator<Item = (Condition, ConditionStatus)> + '_ {
        Condition::ALL.into_iter().map(move |c| (c, self.status(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_tri_state_mapping() {
        assert_eq!(ConditionStatus::from(Some(true)).text(), "Detected");
        assert_eq!(ConditionStatus::from(Some(false)).text(), "Not Detected");
        assert_eq!(ConditionStatus::from(None).text(), "Unknown");
    }

    #[test]
    fn test_each_key_is_independent() {
        for target in Condition::ALL {
            for (flag, expected) in [
                (json!(true), ConditionStatus::Detected),
                (json!(false), ConditionStatus::NotDetected),
                (json!(null), ConditionStatus::Unknown),
            ] {
                let mut raw = serde_json::Map::new();
                raw.insert(target.key().to_string(), flag);
                let results: ConditionResults =
                    serde_json::from_value(serde_json::Value::Object(raw)).unwrap();

                for (condition, status) in results.statuses() {
                    if condition == target {
                        assert_eq!(status, expected);
                    } else {
                        assert_eq!(status, ConditionStatus::Unknown);
                    }
                }
            }
        }
    }

    #[test]
    fn test_labels_in_display_order() {
        let labels: Vec<&str> = Condition::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Myocardial Ischemia (MCI)",
                "Atrial Fibrillation (AFib)",
                "Bundle Branch Block (BBB)",
                "Ventricular Fibrillation (VFib)",
            ]
        );
    }
}
