use super::common::*;
use crate::workflows::appraisal::domain::{AssignmentId, StaffId, OVERALL_COMMENT_KEY};
use crate::workflows::appraisal::repository::{
    AppraisalStatistics, AssignmentRepository, RepositoryError,
};
use crate::workflows::appraisal::service::AppraisalError;
use crate::workflows::appraisal::status::AssignmentStatus;

fn dispatched_assignment() -> (std::sync::Arc<super::common::TestService>, AssignmentId) {
    let (service, _, _) = build_service();
    let template = create_template(&service);
    let outcome = service
        .dispatch(dispatch_request(&template, &["s-001"], Some("m-001")))
        .expect("dispatch succeeds");
    let id = outcome.created[0].assignment_id.clone();
    (service, id)
}

#[test]
fn self_submission_requires_the_subject_identity() {
    let (service, id) = dispatched_assignment();

    match service.submit_self(
        &id,
        &StaffId("s-002".to_string()),
        submission(&[("job-knowledge-1", 4)], None),
    ) {
        Err(AppraisalError::Authorization { role, .. }) => assert_eq!(role, "subject"),
        other => panic!("expected authorization error, got {other:?}"),
    }
}

#[test]
fn reviewer_submission_requires_the_reviewer_identity() {
    let (service, id) = dispatched_assignment();

    match service.submit_reviewer(
        &id,
        &StaffId("s-001".to_string()),
        submission(&[("job-knowledge-1", 4)], None),
    ) {
        Err(AppraisalError::Authorization { role, .. }) => assert_eq!(role, "reviewer"),
        other => panic!("expected authorization error, got {other:?}"),
    }
}

#[test]
fn self_submission_stores_ratings_score_and_timestamp() {
    let (service, id) = dispatched_assignment();

    let stored = service
        .submit_self(
            &id,
            &StaffId("s-001".to_string()),
            submission(
                &[("job-knowledge-1", 4), ("job-knowledge-2", 5), ("job-knowledge-3", 3)],
                Some("Solid quarter overall."),
            ),
        )
        .expect("submission accepted");

    assert_eq!(stored.percentage_score, Some(80.0));
    assert!(stored.self_submitted_at.is_some());
    assert_eq!(
        stored.self_comments.get(OVERALL_COMMENT_KEY).map(String::as_str),
        Some("Solid quarter overall.")
    );
    assert_eq!(
        AssignmentStatus::resolve(&stored),
        AssignmentStatus::AwaitingManager
    );
}

#[test]
fn reviewer_submission_never_touches_the_stored_score() {
    let (service, id) = dispatched_assignment();

    let stored = service
        .submit_reviewer(
            &id,
            &StaffId("m-001".to_string()),
            submission(&[("job-knowledge-1", 1), ("job-knowledge-2", 1)], None),
        )
        .expect("submission accepted");

    assert_eq!(stored.percentage_score, None);
    assert!(stored.reviewer_submitted_at.is_some());
    assert_eq!(
        AssignmentStatus::resolve(&stored),
        AssignmentStatus::AwaitingStaff
    );

    let completed = service
        .submit_self(
            &id,
            &StaffId("s-001".to_string()),
            submission(&[("job-knowledge-1", 5)], None),
        )
        .expect("self submission accepted");

    // Self side alone feeds the persisted score.
    assert_eq!(completed.percentage_score, Some(100.0));
    assert_eq!(
        AssignmentStatus::resolve(&completed),
        AssignmentStatus::Completed
    );
}

#[test]
fn resubmission_overwrites_and_recomputes_last_write_wins() {
    let (service, id) = dispatched_assignment();
    let subject = StaffId("s-001".to_string());

    service
        .submit_self(&id, &subject, submission(&[("job-knowledge-1", 2)], Some("first")))
        .expect("first submission");

    let second = service
        .submit_self(
            &id,
            &subject,
            submission(&[("job-knowledge-1", 5), ("job-knowledge-2", 5)], Some("second")),
        )
        .expect("second submission");

    assert_eq!(second.percentage_score, Some(100.0));
    assert_eq!(second.self_ratings.len(), 2);
    assert_eq!(
        second.self_comments.get(OVERALL_COMMENT_KEY).map(String::as_str),
        Some("second")
    );
}

#[test]
fn resubmission_after_completion_is_not_locked() {
    let (service, id) = dispatched_assignment();
    let subject = StaffId("s-001".to_string());
    let reviewer = StaffId("m-001".to_string());

    service
        .submit_self(&id, &subject, submission(&[("job-knowledge-1", 4)], None))
        .expect("self submission");
    service
        .submit_reviewer(&id, &reviewer, submission(&[("job-knowledge-1", 3)], None))
        .expect("reviewer submission");

    let reopened = service
        .submit_self(&id, &subject, submission(&[("job-knowledge-1", 2)], None))
        .expect("post-completion overwrite allowed");
    assert_eq!(reopened.percentage_score, Some(40.0));
    assert_eq!(
        AssignmentStatus::resolve(&reopened),
        AssignmentStatus::Completed
    );
}

#[test]
fn unknown_assignment_is_not_found() {
    let (service, _, _) = build_service();

    match service.submit_self(
        &AssignmentId("asg-missing".to_string()),
        &StaffId("s-001".to_string()),
        submission(&[("job-knowledge-1", 4)], None),
    ) {
        Err(AppraisalError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn listing_and_statistics_cover_subject_and_reviewer_views() {
    let (service, _, assignments) = build_service();
    let template = create_template(&service);

    let outcome = service
        .dispatch(dispatch_request(
            &template,
            &["s-001", "s-002", "s-003"],
            Some("m-001"),
        ))
        .expect("dispatch succeeds");
    assert_eq!(outcome.created.len(), 3);

    let first = &outcome.created[0].assignment_id;
    service
        .submit_self(
            first,
            &StaffId("s-001".to_string()),
            submission(&[("job-knowledge-1", 4), ("job-knowledge-2", 5), ("job-knowledge-3", 3)], None),
        )
        .expect("self submission");
    service
        .submit_reviewer(
            first,
            &StaffId("m-001".to_string()),
            submission(&[("job-knowledge-1", 4)], None),
        )
        .expect("reviewer submission");

    let for_reviewer = service
        .assignments_for_reviewer(&StaffId("m-001".to_string()))
        .expect("reviewer listing");
    assert_eq!(for_reviewer.len(), 3);

    let for_subject = service
        .assignments_for_subject(&StaffId("s-002".to_string()))
        .expect("subject listing");
    assert_eq!(for_subject.len(), 1);

    let statistics = AppraisalStatistics::for_assignments(&for_reviewer);
    assert_eq!(statistics.total, 3);
    assert_eq!(statistics.completed, 1);
    assert_eq!(statistics.pending, 2);
    assert_eq!(statistics.average_score, Some(80.0));

    // Hard delete leaves the remaining rows untouched.
    service
        .delete_assignment(first)
        .expect("assignment deleted");
    assert!(assignments
        .fetch(first)
        .expect("fetch succeeds")
        .is_none());
}
