use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for candidate profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Identifier wrapper for placement drives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DriveId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

macro_rules! display_id {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )*
    };
}

display_id!(CandidateId, DriveId, ApplicationId);

/// Academic departments recognised by the placement cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Branch {
    #[serde(rename = "CSE")]
    Cse,
    #[serde(rename = "IT")]
    It,
    #[serde(rename = "ECE")]
    Ece,
    #[serde(rename = "EEE")]
    Eee,
    Mechanical,
    Civil,
    Chemical,
}

impl Branch {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Cse,
            Self::It,
            Self::Ece,
            Self::Eee,
            Self::Mechanical,
            Self::Civil,
            Self::Chemical,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Cse => "CSE",
            Self::It => "IT",
            Self::Ece => "ECE",
            Self::Eee => "EEE",
            Self::Mechanical => "Mechanical",
            Self::Civil => "Civil",
            Self::Chemical => "Chemical",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Branch {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|branch| branch.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownBranch(trimmed.to_string()))
    }
}

/// Academic record of a candidate as maintained by the profile collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: CandidateId,
    pub name: String,
    pub roll_no: String,
    pub branch: Branch,
    pub year: u8,
    pub cgpa: f64,
    pub backlogs: u32,
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
}

impl CandidateProfile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.year == 0 {
            return Err(ValidationError::AcademicYear);
        }
        if !self.cgpa.is_finite() || self.cgpa < 0.0 {
            return Err(ValidationError::Grade(self.cgpa));
        }
        Ok(())
    }
}

/// Entry criteria declared by a drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveRequirements {
    pub min_cgpa: f64,
    pub allowed_branches: Vec<Branch>,
    pub max_backlogs: u32,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub min_year: u8,
}

impl DriveRequirements {
    /// Checks applied when a drive is published. Evaluation never calls this: an
    /// unpublishable rule set still evaluates, it just fails for everyone.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.allowed_branches.is_empty() {
            return Err(ValidationError::NoAllowedBranches);
        }
        if !self.min_cgpa.is_finite() || self.min_cgpa < 0.0 {
            return Err(ValidationError::Grade(self.min_cgpa));
        }
        if self.min_year == 0 {
            return Err(ValidationError::AcademicYear);
        }
        Ok(())
    }
}

/// Recruitment campaign run by one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementDrive {
    pub id: DriveId,
    pub company_name: String,
    pub role: String,
    pub package: String,
    pub location: String,
    pub deadline: NaiveDate,
    pub requirements: DriveRequirements,
}

/// Structural problems in a profile or drive.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("drive must allow at least one branch")]
    NoAllowedBranches,
    #[error("grade average {0} must be a finite, non-negative number")]
    Grade(f64),
    #[error("academic year must be at least 1")]
    AcademicYear,
    #[error("unknown branch '{0}'")]
    UnknownBranch(String),
    #[error("no such calendar date {year:04}-{month:02}-{day:02}")]
    CalendarDate { year: i32, month: u32, day: u32 },
}

/// Checked constructor for drive deadlines and other day-granular dates.
pub fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, ValidationError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(ValidationError::CalendarDate { year, month, day })
}
