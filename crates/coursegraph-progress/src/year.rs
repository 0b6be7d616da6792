use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcademicYear {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
}

impl AcademicYear {
    pub const ALL: [AcademicYear; 5] = [
        AcademicYear::First,
        AcademicYear::Second,
        AcademicYear::Third,
        AcademicYear::Fourth,
        AcademicYear::Fifth,
    ];

    /// Credit band `[lower, upper)`; the fifth year closes at graduation.
    pub fn bounds(&self) -> (u32, u32) {
        match self {
            AcademicYear::First => (0, 40),
            AcademicYear::Second => (40, 100),
            AcademicYear::Third => (100, 160),
            AcademicYear::Fourth => (160, 220),
            AcademicYear::Fifth => (220, 300),
        }
    }

    pub fn for_credits(total_credits: u32) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|year| total_credits >= year.bounds().0)
            .unwrap_or(AcademicYear::First)
    }

    pub fn number(&self) -> u8 {
        *self as u8 + 1
    }

    pub fn label(&self) -> &'static str {
        match self {
            AcademicYear::First => "First year",
            AcademicYear::Second => "Second year",
            AcademicYear::Third => "Third year",
            AcademicYear::Fourth => "Fourth year",
            AcademicYear::Fifth => "Fifth year",
        }
    }

    pub fn arabic_label(&self) -> &'static str {
        match self {
            AcademicYear::First => "السنة الأولى",
            AcademicYear::Second => "السنة الثانية",
            AcademicYear::Third => "السنة الثالثة",
            AcademicYear::Fourth => "السنة الرابعة",
            AcademicYear::Fifth => "السنة الخامسة",
        }
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearStatus {
    pub year: AcademicYear,
    pub label: String,
    /// Progress through the current band, in `[0, 1]`.
    pub progress: f64,
    pub lower_bound: u32,
    pub next_threshold: u32,
}

impl YearStatus {
    pub fn from_credits(total_credits: u32) -> Self {
        let year = AcademicYear::for_credits(total_credits);
        let (lower, upper) = year.bounds();
        let progress = (total_credits - lower) as f64 / (upper - lower) as f64;

        Self {
            year,
            label: year.label().to_string(),
            progress: progress.clamp(0.0, 1.0),
            lower_bound: lower,
            next_threshold: upper,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn band_boundaries() {
        let status = YearStatus::from_credits(40);
        assert_eq!(status.year, AcademicYear::Second);
        assert_relative_eq!(status.progress, 0.0);

        let status = YearStatus::from_credits(99);
        assert_eq!(status.year, AcademicYear::Second);
        assert_relative_eq!(status.progress, 59.0 / 60.0);

        let status = YearStatus::from_credits(300);
        assert_eq!(status.year, AcademicYear::Fifth);
        assert_relative_eq!(status.progress, 1.0);
    }

    #[test]
    fn first_year_and_overflow() {
        let status = YearStatus::from_credits(0);
        assert_eq!(status.year, AcademicYear::First);
        assert_eq!(status.next_threshold, 40);
        assert_relative_eq!(YearStatus::from_credits(10).progress, 0.25);

        let status = YearStatus::from_credits(350);
        assert_eq!(status.year, AcademicYear::Fifth);
        assert_relative_eq!(status.progress, 1.0);
    }

    #[test]
    fn labels() {
        assert_eq!(AcademicYear::Third.number(), 3);
        assert_eq!(AcademicYear::Fourth.to_string(), "Fourth year");
        assert_eq!(AcademicYear::First.arabic_label(), "السنة الأولى");
        assert_eq!(
            serde_json::to_string(&AcademicYear::Fifth).unwrap(),
            "\"fifth\""
        );
    }
}
