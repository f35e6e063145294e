use super::super::domain::{CandidateProfile, DriveRequirements};
use super::{CheckDetail, CheckValue, EligibilityCheck};

fn detail(
    check: EligibilityCheck,
    passed: bool,
    actual_value: CheckValue,
    required_value: CheckValue,
    message: String,
) -> CheckDetail {
    CheckDetail {
        check,
        label: check.label().to_string(),
        passed,
        actual_value,
        required_value,
        message,
        matched_skills: Vec::new(),
    }
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}

fn normalize_skill(skill: &str) -> String {
    skill.trim().to_lowercase()
}

pub(crate) fn grade(profile: &CandidateProfile, requirements: &DriveRequirements) -> CheckDetail {
    let passed = profile.cgpa >= requirements.min_cgpa;
    let message = if passed {
        format!(
            "CGPA {} satisfies min requirement of {}",
            profile.cgpa, requirements.min_cgpa
        )
    } else {
        format!(
            "CGPA {} is below the threshold of {}",
            profile.cgpa, requirements.min_cgpa
        )
    };

    detail(
        EligibilityCheck::Grade,
        passed,
        CheckValue::Decimal(profile.cgpa),
        CheckValue::Decimal(requirements.min_cgpa),
        message,
    )
}

pub(crate) fn branch(profile: &CandidateProfile, requirements: &DriveRequirements) -> CheckDetail {
    let passed = requirements.allowed_branches.contains(&profile.branch);
    let allowed: Vec<String> = requirements
        .allowed_branches
        .iter()
        .map(|branch| branch.label().to_string())
        .collect();

    let message = if passed {
        format!(
            "Branch {} is in the allowed list: {}",
            profile.branch,
            join_or_none(&allowed)
        )
    } else {
        format!(
            "Branch {} is not in the allowed list: {}",
            profile.branch,
            join_or_none(&allowed)
        )
    };

    detail(
        EligibilityCheck::Branch,
        passed,
        CheckValue::Text(profile.branch.label().to_string()),
        CheckValue::List(allowed),
        message,
    )
}

pub(crate) fn backlogs(profile: &CandidateProfile, requirements: &DriveRequirements) -> CheckDetail {
    let passed = profile.backlogs <= requirements.max_backlogs;
    let message = if passed {
        format!(
            "{} backlog(s) is within the limit of {}",
            profile.backlogs, requirements.max_backlogs
        )
    } else {
        format!(
            "{} backlog(s) exceeds the limit of {}",
            profile.backlogs, requirements.max_backlogs
        )
    };

    detail(
        EligibilityCheck::Backlogs,
        passed,
        CheckValue::Count(profile.backlogs),
        CheckValue::Count(requirements.max_backlogs),
        message,
    )
}

/// One overlapping skill is enough to pass.
pub(crate) fn skills(profile: &CandidateProfile, requirements: &DriveRequirements) -> CheckDetail {
    let required: Vec<String> = requirements
        .required_skills
        .iter()
        .map(|skill| normalize_skill(skill))
        .collect();

    let matched: Vec<String> = profile
        .skills
        .iter()
        .filter(|skill| required.contains(&normalize_skill(skill)))
        .cloned()
        .collect();

    let passed = !matched.is_empty();
    let message = if passed {
        format!(
            "Found matching skills: {} (required any of: {})",
            matched.join(", "),
            join_or_none(&requirements.required_skills)
        )
    } else {
        format!(
            "No matching skills among {} from required: {}",
            join_or_none(&profile.skills),
            join_or_none(&requirements.required_skills)
        )
    };

    let mut detail = detail(
        EligibilityCheck::Skills,
        passed,
        CheckValue::List(profile.skills.clone()),
        CheckValue::List(requirements.required_skills.clone()),
        message,
    );
    detail.matched_skills = matched;
    detail
}

pub(crate) fn academic_year(
    profile: &CandidateProfile,
    requirements: &DriveRequirements,
) -> CheckDetail {
    let passed = profile.year >= requirements.min_year;
    let message = if passed {
        format!(
            "Year {} satisfies the minimum of year {}",
            profile.year, requirements.min_year
        )
    } else {
        format!(
            "Year {} is below the minimum of year {}",
            profile.year, requirements.min_year
        )
    };

    detail(
        EligibilityCheck::AcademicYear,
        passed,
        CheckValue::Count(u32::from(profile.year)),
        CheckValue::Count(u32::from(requirements.min_year)),
        message,
    )
}
