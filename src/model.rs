use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Backend-assigned opaque identifier, unique within its collection.
pub type EntityId = String;

/// An academic quarter within a grade level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub id: EntityId,
    pub quartal: i64,
    pub stufe: i64,
}

/// A course with an optional teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: EntityId,
    pub name: String,
    pub teacher: Option<String>,
}

/// A scored entry for a subject within a period.
///
/// `overall` is derived by the backend from the two component scores and the
/// weighting; it is absent whenever either component is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: EntityId,
    pub subject_id: EntityId,
    pub oral: Option<f64>,
    pub written: Option<f64>,
    pub weighting: f64,
    pub overall: Option<f64>,
}

/// The currently selected view: a period tab, the edit view, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Selection {
    #[default]
    None,
    Period(EntityId),
    EditMode,
}

/// Fields for creating or replacing a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodInput {
    pub quartal: i64,
    pub stufe: i64,
}

impl PeriodInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=4).contains(&self.quartal) {
            return Err(ValidationError::QuartalOutOfRange(self.quartal));
        }
        if self.stufe < 1 {
            return Err(ValidationError::StufeNotPositive(self.stufe));
        }
        Ok(())
    }
}

/// Fields for creating or replacing a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectInput {
    pub name: String,
    #[serde(default)]
    pub teacher: Option<String>,
}

impl SubjectInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptySubjectName);
        }
        Ok(())
    }
}

/// Fields for creating or replacing a grade. The owning period is passed
/// separately on create and is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeInput {
    pub subject_id: EntityId,
    #[serde(default)]
    pub oral: Option<f64>,
    #[serde(default)]
    pub written: Option<f64>,
    pub weighting: f64,
}

impl GradeInput {
    /// A grade submission with neither score is meaningless and is rejected
    /// before it reaches the gateway.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.oral.is_none() && self.written.is_none() {
            return Err(ValidationError::NoScore);
        }
        for (which, score) in [("oral", self.oral), ("written", self.written)] {
            if let Some(value) = score {
                if !(0.0..=15.0).contains(&value) {
                    return Err(ValidationError::ScoreOutOfRange { which, value });
                }
            }
        }
        if !(0.0..=1.0).contains(&self.weighting) {
            return Err(ValidationError::WeightingOutOfRange(self.weighting));
        }
        Ok(())
    }
}
