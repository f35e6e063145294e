use super::common::*;
use crate::placement::domain::ApplicationId;
use crate::placement::pipeline::ApplicationStatus;
use crate::placement::shortlist::{
    auto_shortlist_at, plan_shortlist, shortlist_decision, ShortlistDecision, ShortlistSkip,
};

fn ids(raw: &[&str]) -> Vec<ApplicationId> {
    raw.iter().map(|id| ApplicationId(id.to_string())).collect()
}

#[test]
fn shortlists_exactly_the_eligible_applied_candidates() {
    let profiles = profiles(vec![
        student(),
        candidate("s2", 9.1, &["Node.js"]),
        candidate("s3", 6.5, &["React"]),
    ]);
    let mut applications = vec![
        application("app-1", "s1", "d1"),
        application("app-2", "s2", "d1"),
        application("app-3", "s3", "d1"),
    ];

    let shortlisted = auto_shortlist_at(&mut applications, &profiles, &stellar_drive(), later());

    assert_eq!(shortlisted, ids(&["app-1", "app-2"]));
    assert_eq!(applications[0].status, ApplicationStatus::Shortlisted);
    assert_eq!(applications[1].status, ApplicationStatus::Shortlisted);
    assert_eq!(applications[2].status, ApplicationStatus::Applied);
    assert_eq!(applications[0].last_updated, later());
    assert_eq!(applications[2].last_updated, applied_at());
}

#[test]
fn outcome_does_not_depend_on_input_order() {
    let profiles = profiles(vec![
        student(),
        candidate("s2", 9.1, &["Node.js"]),
        candidate("s3", 6.5, &["React"]),
    ]);
    let mut forward = vec![
        application("app-1", "s1", "d1"),
        application("app-2", "s2", "d1"),
        application("app-3", "s3", "d1"),
    ];
    let mut backward: Vec<_> = forward.iter().rev().cloned().collect();

    let mut first = auto_shortlist_at(&mut forward, &profiles, &stellar_drive(), later());
    let mut second = auto_shortlist_at(&mut backward, &profiles, &stellar_drive(), later());
    first.sort();
    second.sort();

    assert_eq!(first, second);
}

#[test]
fn leaves_advanced_and_terminal_applications_alone() {
    let profiles = profiles(vec![student()]);
    let mut applications = vec![
        application_in(ApplicationStatus::Round1),
        application_in(ApplicationStatus::Rejected),
    ];

    let shortlisted = auto_shortlist_at(&mut applications, &profiles, &stellar_drive(), later());

    assert!(shortlisted.is_empty());
    assert_eq!(applications[0].status, ApplicationStatus::Round1);
    assert_eq!(applications[1].status, ApplicationStatus::Rejected);
}

#[test]
fn second_pass_is_a_noop() {
    let profiles = profiles(vec![student()]);
    let mut applications = vec![application("app-1", "s1", "d1")];

    let first = auto_shortlist_at(&mut applications, &profiles, &stellar_drive(), later());
    let second = auto_shortlist_at(&mut applications, &profiles, &stellar_drive(), later());

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(applications[0].status, ApplicationStatus::Shortlisted);
}

#[test]
fn skips_other_drives_and_unknown_candidates() {
    let profiles = profiles(vec![student()]);
    let drive = stellar_drive();

    assert_eq!(
        shortlist_decision(&application("app-9", "s1", "d2"), &profiles, &drive),
        ShortlistDecision::Skip(ShortlistSkip::OtherDrive)
    );
    assert_eq!(
        shortlist_decision(&application("app-8", "ghost", "d1"), &profiles, &drive),
        ShortlistDecision::Skip(ShortlistSkip::MissingProfile)
    );

    let mut applications = vec![application("app-8", "ghost", "d1")];
    assert!(auto_shortlist_at(&mut applications, &profiles, &drive, later()).is_empty());
    assert_eq!(applications[0].status, ApplicationStatus::Applied);
}

#[test]
fn plan_does_not_mutate() {
    let profiles = profiles(vec![student(), candidate("s3", 6.5, &["React"])]);
    let applications = vec![
        application("app-1", "s1", "d1"),
        application("app-3", "s3", "d1"),
    ];

    let plan = plan_shortlist(&applications, &profiles, &stellar_drive());

    assert_eq!(plan, ids(&["app-1"]));
    assert!(applications
        .iter()
        .all(|application| application.status == ApplicationStatus::Applied));
}
