use serde::Serialize;

use crate::model::{Grade, Subject};

/// Combines the two component scores into the overall score.
///
/// `weighting` is the written score's share; the oral score carries the
/// remainder. Returns `None` when either component is absent: a meaningful
/// overall score cannot be computed from partial input, and substituting a
/// default would silently coerce missing data to zero.
///
/// The weighting is validated at the store boundary, not here; an
/// out-of-range value extrapolates linearly instead of failing.
pub fn overall_score(oral: Option<f64>, written: Option<f64>, weighting: f64) -> Option<f64> {
    match (oral, written) {
        (Some(o), Some(w)) => Some(w * weighting + o * (1.0 - weighting)),
        _ => None,
    }
}

/// Mean of the present overall scores of one subject's grades in a period.
///
/// Grades without an overall score are excluded from both sum and count;
/// `mean` is `None` when no grade is scored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    pub mean: Option<f64>,
    pub scored_count: usize,
    pub unscored_count: usize,
}

pub fn subject_summary<'a, I>(grades: I) -> SubjectSummary
where
    I: IntoIterator<Item = &'a Grade>,
{
    let mut sum = 0.0_f64;
    let mut scored_count: usize = 0;
    let mut unscored_count: usize = 0;

    for grade in grades {
        match grade.overall {
            Some(value) => {
                scored_count += 1;
                sum += value;
            }
            None => {
                unscored_count += 1;
            }
        }
    }

    let mean = if scored_count > 0 {
        Some(sum / (scored_count as f64))
    } else {
        None
    };

    SubjectSummary {
        mean,
        scored_count,
        unscored_count,
    }
}

/// One display row of the per-period summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRow {
    pub subject_id: String,
    pub name: String,
    pub teacher: Option<String>,
    pub grade_count: usize,
    pub summary: SubjectSummary,
}

/// Per-subject weighted summaries over the grades of one period.
///
/// Every known subject gets a row, in subject insertion order; subjects
/// without grades in the period report an explicit no-data summary.
pub fn period_summary(subjects: &[Subject], grades: &[Grade]) -> Vec<SubjectRow> {
    subjects
        .iter()
        .map(|subject| {
            let subject_grades: Vec<&Grade> = grades
                .iter()
                .filter(|g| g.subject_id == subject.id)
                .collect();
            SubjectRow {
                subject_id: subject.id.clone(),
                name: subject.name.clone(),
                teacher: subject.teacher.clone(),
                grade_count: subject_grades.len(),
                summary: subject_summary(subject_grades.iter().copied()),
            }
        })
        .collect()
}
