use super::common::*;
use crate::placement::pipeline::{
    advance_at, is_advanceable, reject_at, transition_at, ApplicationStatus, Transition,
};

#[test]
fn advance_walks_the_chain_then_refuses() {
    let mut application = application("app-1", "s1", "d1");
    let mut visited = Vec::new();

    for _ in 0..5 {
        application = advance_at(&application, later()).expect("advanceable");
        visited.push(application.status);
    }

    assert_eq!(
        visited,
        vec![
            ApplicationStatus::Shortlisted,
            ApplicationStatus::Round1,
            ApplicationStatus::Round2,
            ApplicationStatus::HrInterview,
            ApplicationStatus::Selected,
        ]
    );

    let err = advance_at(&application, later()).expect_err("selected is terminal");
    assert_eq!(err.from, ApplicationStatus::Selected);
    assert_eq!(err.transition, Transition::Advance);
    assert_eq!(err.application_id, application.id);
}

#[test]
fn advance_is_a_step_not_a_set() {
    let first = advance_at(&application("app-1", "s1", "d1"), later()).expect("advance");
    let second = advance_at(&first, later()).expect("advance");

    assert_ne!(first.status, second.status);
    assert_eq!(second.status, ApplicationStatus::Round1);
}

#[test]
fn transitions_stamp_last_updated_only() {
    let original = application("app-1", "s1", "d1");

    let moved = advance_at(&original, later()).expect("advance");

    assert_eq!(moved.applied_date, applied_at());
    assert_eq!(moved.last_updated, later());
    assert_eq!(moved.id, original.id);
    assert_eq!(original.status, ApplicationStatus::Applied);
}

#[test]
fn reject_is_allowed_from_every_non_terminal_stage() {
    for status in ApplicationStatus::ordered() {
        if status == ApplicationStatus::Selected {
            continue;
        }
        let rejected = reject_at(&application_in(status), later()).expect("rejectable");
        assert_eq!(rejected.status, ApplicationStatus::Rejected);
        assert_eq!(rejected.last_updated, later());
    }
}

#[test]
fn reject_refuses_selected_candidates() {
    let selected = application_in(ApplicationStatus::Selected);

    let err = reject_at(&selected, later()).expect_err("selected is final");

    assert_eq!(err.from, ApplicationStatus::Selected);
    assert_eq!(err.transition, Transition::Reject);
    assert!(err.to_string().contains("cannot reject"));
}

#[test]
fn rejected_is_absorbing() {
    let rejected = application_in(ApplicationStatus::Rejected);

    assert!(advance_at(&rejected, later()).is_err());
    assert!(reject_at(&rejected, later()).is_err());
    assert!(transition_at(&rejected, Transition::Advance, later()).is_err());
}

#[test]
fn only_terminal_states_are_not_advanceable() {
    for status in ApplicationStatus::all() {
        assert_eq!(is_advanceable(status), !status.is_terminal());
        assert_eq!(status.can_reject(), !status.is_terminal());
    }
}

#[test]
fn progress_tracks_position_in_chain() {
    let progress: Vec<u8> = ApplicationStatus::ordered()
        .into_iter()
        .map(ApplicationStatus::progress_percent)
        .collect();

    assert_eq!(progress, vec![16, 33, 50, 66, 83, 100]);
    assert_eq!(ApplicationStatus::Rejected.progress_percent(), 100);
    assert_eq!(ApplicationStatus::Rejected.stage_index(), None);
}

#[test]
fn status_labels_match_round_names() {
    assert_eq!(ApplicationStatus::Round1.label(), "Round 1 (Aptitude)");
    assert_eq!(ApplicationStatus::HrInterview.key(), "hr_interview");
    let encoded = serde_json::to_string(&ApplicationStatus::HrInterview).expect("encode");
    assert_eq!(encoded, "\"hr_interview\"");
}
