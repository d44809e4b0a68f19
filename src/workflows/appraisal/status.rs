use serde::{Deserialize, Serialize};

use super::domain::Assignment;

/// Lifecycle state derived from which sides of an assignment have
/// submitted ratings. Never stored; always recomputed on read so the
/// status cannot drift from the underlying maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Pending,
    AwaitingManager,
    AwaitingStaff,
    Completed,
}

impl AssignmentStatus {
    /// Total derivation over the two rating maps.
    pub fn resolve(assignment: &Assignment) -> Self {
        match (
            assignment.self_ratings.is_empty(),
            assignment.reviewer_ratings.is_empty(),
        ) {
            (true, true) => Self::Pending,
            (false, true) => Self::AwaitingManager,
            (true, false) => Self::AwaitingStaff,
            (false, false) => Self::Completed,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::AwaitingManager => "awaiting_manager",
            AssignmentStatus::AwaitingStaff => "awaiting_staff",
            AssignmentStatus::Completed => "completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::appraisal::domain::{
        AssignmentId, QuestionId, Rating, StaffId, TemplateId,
    };
    use chrono::Utc;

    fn assignment() -> Assignment {
        Assignment::pending(
            AssignmentId("asg-1".to_string()),
            TemplateId("tpl-1".to_string()),
            StaffId("s-001".to_string()),
            StaffId("m-001".to_string()),
            Utc::now(),
        )
    }

    fn rate(assignment: &mut Assignment, side: &str) {
        let rating = Rating::new(4).expect("valid rating");
        let question = QuestionId("q1".to_string());
        match side {
            "self" => assignment.self_ratings.insert(question, rating),
            _ => assignment.reviewer_ratings.insert(question, rating),
        };
    }

    #[test]
    fn both_sides_empty_is_pending() {
        assert_eq!(AssignmentStatus::resolve(&assignment()), AssignmentStatus::Pending);
    }

    #[test]
    fn self_only_awaits_the_manager() {
        let mut assignment = assignment();
        rate(&mut assignment, "self");
        assert_eq!(
            AssignmentStatus::resolve(&assignment),
            AssignmentStatus::AwaitingManager
        );
    }

    #[test]
    fn reviewer_only_awaits_the_staff() {
        let mut assignment = assignment();
        rate(&mut assignment, "reviewer");
        assert_eq!(
            AssignmentStatus::resolve(&assignment),
            AssignmentStatus::AwaitingStaff
        );
    }

    #[test]
    fn both_sides_complete_the_assignment() {
        let mut assignment = assignment();
        rate(&mut assignment, "self");
        rate(&mut assignment, "reviewer");
        assert_eq!(
            AssignmentStatus::resolve(&assignment),
            AssignmentStatus::Completed
        );
    }
}
