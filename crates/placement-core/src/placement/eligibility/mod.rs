mod rules;

use serde::{Deserialize, Serialize};

use super::domain::{CandidateProfile, DriveRequirements};

/// Number of rules every evaluation runs.
pub const CHECK_COUNT: u8 = 5;

/// Score contributed by each passing rule.
const POINTS_PER_CHECK: u8 = 100 / CHECK_COUNT;

/// Score a candidate against a drive's requirements.
///
/// All rules run regardless of earlier failures so the explanation set is always
/// complete. The function has no error path: empty or out-of-range requirements just
/// produce failing checks.
pub fn evaluate(profile: &CandidateProfile, requirements: &DriveRequirements) -> EligibilityResult {
    let details = vec![
        rules::grade(profile, requirements),
        rules::branch(profile, requirements),
        rules::backlogs(profile, requirements),
        rules::skills(profile, requirements),
        rules::academic_year(profile, requirements),
    ];

    let passed = details.iter().filter(|detail| detail.passed).count() as u8;

    EligibilityResult {
        is_eligible: passed == CHECK_COUNT,
        score: passed * POINTS_PER_CHECK,
        details,
    }
}

/// The individual rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityCheck {
    Grade,
    Branch,
    Backlogs,
    Skills,
    AcademicYear,
}

impl EligibilityCheck {
    pub const fn ordered() -> [Self; CHECK_COUNT as usize] {
        [
            Self::Grade,
            Self::Branch,
            Self::Backlogs,
            Self::Skills,
            Self::AcademicYear,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Grade => "CGPA",
            Self::Branch => "Branch",
            Self::Backlogs => "Backlogs",
            Self::Skills => "Skills",
            Self::AcademicYear => "Academic Year",
        }
    }
}

/// Value compared by a rule, kept structured so callers can render it however they like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckValue {
    Count(u32),
    Decimal(f64),
    Text(String),
    List(Vec<String>),
}

/// Outcome of a single rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckDetail {
    pub check: EligibilityCheck,
    pub label: String,
    pub passed: bool,
    pub actual_value: CheckValue,
    pub required_value: CheckValue,
    pub message: String,
    /// Declared skills that matched a required skill; empty for other rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_skills: Vec<String>,
}

/// Evaluation output: strict eligibility plus a diagnostic score and the full rule trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub is_eligible: bool,
    /// Percentage of rules passed; always a multiple of 20.
    pub score: u8,
    pub details: Vec<CheckDetail>,
}

impl EligibilityResult {
    pub fn passed_checks(&self) -> usize {
        self.details.iter().filter(|detail| detail.passed).count()
    }

    pub fn first_failure(&self) -> Option<&CheckDetail> {
        self.details.iter().find(|detail| !detail.passed)
    }

    pub fn detail(&self, check: EligibilityCheck) -> Option<&CheckDetail> {
        self.details.iter().find(|detail| detail.check == check)
    }

    /// One-line explanation suitable for applicant listings.
    pub fn summary(&self) -> String {
        match self.first_failure() {
            None => format!("meets all benchmarks with a match score of {}%", self.score),
            Some(detail) => detail.message.clone(),
        }
    }
}
