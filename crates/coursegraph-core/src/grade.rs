use serde::{Deserialize, Serialize};

use crate::{CourseGraphError, Result};

const PRACTICAL_WEIGHT: f64 = 0.3;
const EXAM_WEIGHT: f64 = 0.7;
const PASS_MARK: u32 = 60;
const HELP_BAND_FLOOR: u32 = 58;
// Just above 57 so the ceiling of the weighted sum lands on 58.
const HELP_BAND_TARGET: f64 = 57.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeOutcome {
    DirectPass,
    /// 58 or 59: lifted to a pass by help marks.
    HelpEligible,
    Fail,
}

impl GradeOutcome {
    pub fn is_passing(&self) -> bool {
        !matches!(self, GradeOutcome::Fail)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeInput {
    pub practical: f64,
    pub exam: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeResult {
    pub practical_part: f64,
    pub exam_part: f64,
    pub final_score: u32,
    pub outcome: GradeOutcome,
}

impl GradeInput {
    pub fn new(practical: f64, exam: f64) -> Result<Self> {
        Ok(Self {
            practical: check_mark("practical", practical)?,
            exam: check_mark("exam", exam)?,
        })
    }

    pub fn evaluate(&self) -> GradeResult {
        let practical_part = self.practical * PRACTICAL_WEIGHT;
        let exam_part = self.exam * EXAM_WEIGHT;
        let final_score = (practical_part + exam_part).ceil() as u32;

        let outcome = if final_score >= PASS_MARK {
            GradeOutcome::DirectPass
        } else if final_score >= HELP_BAND_FLOOR {
            GradeOutcome::HelpEligible
        } else {
            GradeOutcome::Fail
        };

        GradeResult {
            practical_part,
            exam_part,
            final_score,
            outcome,
        }
    }
}

/// Lowest exam mark that reaches at least the help band, given the practical
/// mark. Clamped to 0..=100.
pub fn required_exam_score(practical: f64) -> Result<u32> {
    let practical = check_mark("practical", practical)?;
    let needed = ((HELP_BAND_TARGET - practical * PRACTICAL_WEIGHT) / EXAM_WEIGHT).ceil();
    Ok(needed.clamp(0.0, 100.0) as u32)
}

fn check_mark(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(CourseGraphError::InvalidOperation(format!(
            "{} mark must be between 0 and 100, got {}",
            field, value
        )))
    }
}
