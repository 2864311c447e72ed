use super::domain::{AnswerSet, AnswerValue, FactSheet};

/// Supported CV formats at the extraction boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvFormat {
    Pdf,
    Docx,
}

impl CvFormat {
    /// Derive the format from an uploaded file name; unknown extensions are
    /// unsupported and extraction is skipped.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            Some(CvFormat::Pdf)
        } else if lower.ends_with(".docx") {
            Some(CvFormat::Docx)
        } else {
            None
        }
    }
}

/// Boundary to the external text-extraction and fact-extraction machinery.
///
/// Both operations are best-effort: extraction failure yields `None`, and an
/// empty text yields the empty sheet. Nothing here may panic past the
/// boundary.
pub trait CvExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8], format: CvFormat) -> Option<String>;
    fn build_fact_sheet(&self, text: &str) -> FactSheet;
}

impl FactSheet {
    /// Project the sheet onto screening labels so extracted facts participate
    /// in criteria evaluation like submitted answers.
    pub fn as_answers(&self) -> AnswerSet {
        let mut answers = AnswerSet::new();
        if !self.skills.is_empty() {
            answers.insert(
                "skills".to_string(),
                AnswerValue::Text(self.skills.join(", ")),
            );
        }
        answers.insert(
            "experience_years".to_string(),
            AnswerValue::Number(self.experience_years as f64),
        );
        if let Some(education) = &self.education {
            answers.insert(
                "education".to_string(),
                AnswerValue::Text(education.clone()),
            );
        }
        if !self.certifications.is_empty() {
            answers.insert(
                "certifications".to_string(),
                AnswerValue::Text(self.certifications.join(", ")),
            );
        }
        if let Some(location) = &self.location {
            answers.insert("location".to_string(), AnswerValue::Text(location.clone()));
        }
        answers.insert(
            "projects_count".to_string(),
            AnswerValue::Number(self.projects_count as f64),
        );
        answers
    }
}

/// Merge CV-derived facts under the applicant's explicit answers.
///
/// On label collision the submitted answer wins; the CV only fills gaps.
pub fn merge_answers(submitted: &AnswerSet, facts: Option<&FactSheet>) -> AnswerSet {
    let mut merged = facts.map(FactSheet::as_answers).unwrap_or_default();
    for (label, value) in submitted {
        merged.insert(label.clone(), value.clone());
    }
    merged
}
