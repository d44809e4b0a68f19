use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Assignment, AssignmentId, StaffId, Template, TemplateId};
use super::score;
use super::status::AssignmentStatus;

/// Storage abstraction over the tenant-scoped record store so the service
/// module can be exercised in isolation.
pub trait TemplateRepository: Send + Sync {
    fn insert(&self, template: Template) -> Result<Template, RepositoryError>;
    fn fetch(&self, id: &TemplateId) -> Result<Option<Template>, RepositoryError>;
    fn list(&self) -> Result<Vec<Template>, RepositoryError>;
    fn delete(&self, id: &TemplateId) -> Result<(), RepositoryError>;
}

/// Assignment persistence. Deletes are hard; there is no soft-delete or
/// archival tier.
pub trait AssignmentRepository: Send + Sync {
    fn insert(&self, assignment: Assignment) -> Result<Assignment, RepositoryError>;
    fn update(&self, assignment: Assignment) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AssignmentId) -> Result<Option<Assignment>, RepositoryError>;
    fn for_subject(&self, subject: &StaffId) -> Result<Vec<Assignment>, RepositoryError>;
    fn for_reviewer(&self, reviewer: &StaffId) -> Result<Vec<Assignment>, RepositoryError>;
    fn delete(&self, id: &AssignmentId) -> Result<(), RepositoryError>;
}

/// Error enumeration for record-store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized assignment snapshot for listing screens: derived status plus
/// display-rounded score and band.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentView {
    pub assignment_id: AssignmentId,
    pub template_id: TemplateId,
    pub subject_id: StaffId,
    pub reviewer_id: StaffId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_submitted_at: Option<DateTime<Utc>>,
}

impl AssignmentView {
    pub fn of(assignment: &Assignment) -> Self {
        let score = assignment.percentage_score.map(score::display_rounded);
        Self {
            assignment_id: assignment.id.clone(),
            template_id: assignment.template_id.clone(),
            subject_id: assignment.subject_id.clone(),
            reviewer_id: assignment.reviewer_id.clone(),
            status: AssignmentStatus::resolve(assignment).label(),
            percentage_score: score,
            band: score.map(|value| score::PerformanceBand::from_score(value).label()),
            self_submitted_at: assignment.self_submitted_at,
            reviewer_submitted_at: assignment.reviewer_submitted_at,
        }
    }
}

/// Aggregate figures for a collection of assignments, as consumed by the
/// statistics screens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppraisalStatistics {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Average percentage score among completed assignments, rounded for
    /// display. Absent when nothing has completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
}

impl AppraisalStatistics {
    pub fn for_assignments(assignments: &[Assignment]) -> Self {
        let mut completed = 0usize;
        let mut pending = 0usize;
        let mut score_sum = 0.0f64;
        let mut scored = 0usize;

        for assignment in assignments {
            match AssignmentStatus::resolve(assignment) {
                AssignmentStatus::Completed => {
                    completed += 1;
                    if let Some(score) = assignment.percentage_score {
                        score_sum += score;
                        scored += 1;
                    }
                }
                AssignmentStatus::Pending => pending += 1,
                AssignmentStatus::AwaitingManager | AssignmentStatus::AwaitingStaff => {}
            }
        }

        let average_score = if scored > 0 {
            Some(score::display_rounded(score_sum / scored as f64))
        } else {
            None
        };

        Self {
            total: assignments.len(),
            completed,
            pending,
            average_score,
        }
    }
}
