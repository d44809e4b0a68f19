use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::directory::StaffDirectory;
use super::dispatch::{
    DispatchError, DispatchFailure, DispatchOutcome, DispatchPlanner, DispatchReceipt,
};
use super::domain::{
    Assignment, AssignmentId, DepartmentId, RatingMap, StaffId, StaffLevel, Template,
    TemplateDefinition, TemplateId, ValidationError, OVERALL_COMMENT_KEY,
};
use super::repository::{AssignmentRepository, RepositoryError, TemplateRepository};
use super::score;

/// Service composing the template store, assignment store, and staff
/// directory behind the public appraisal operations.
pub struct AppraisalService<T, A, D> {
    templates: Arc<T>,
    assignments: Arc<A>,
    directory: Arc<D>,
}

static TEMPLATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ASSIGNMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_template_id() -> TemplateId {
    let id = TEMPLATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TemplateId(format!("tpl-{id:06}"))
}

fn next_assignment_id() -> AssignmentId {
    let id = ASSIGNMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssignmentId(format!("asg-{id:06}"))
}

/// Fan-out request: one template, many subjects, one shared reviewer,
/// optionally scoped to a department selection.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchRequest {
    pub template_id: TemplateId,
    #[serde(default)]
    pub department_ids: Vec<DepartmentId>,
    pub subject_ids: Vec<StaffId>,
    pub reviewer_id: Option<StaffId>,
    #[serde(default = "default_subject_level")]
    pub subject_level: StaffLevel,
    #[serde(default = "default_reviewer_level")]
    pub reviewer_level: StaffLevel,
}

fn default_subject_level() -> StaffLevel {
    StaffLevel::Staff
}

fn default_reviewer_level() -> StaffLevel {
    StaffLevel::HodManager
}

/// One side's submission: per-question ratings, per-question comments, and
/// an optional overall remark. Completeness against the template is a
/// caller-side concern and is not re-checked here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatingSubmission {
    pub ratings: RatingMap,
    #[serde(default)]
    pub comments: BTreeMap<String, String>,
    #[serde(default)]
    pub overall_comment: Option<String>,
}

impl RatingSubmission {
    fn comment_map(&self) -> BTreeMap<String, String> {
        let mut comments = self.comments.clone();
        if let Some(overall) = &self.overall_comment {
            comments.insert(OVERALL_COMMENT_KEY.to_string(), overall.clone());
        }
        comments
    }
}

impl<T, A, D> AppraisalService<T, A, D>
where
    T: TemplateRepository + 'static,
    A: AssignmentRepository + 'static,
    D: StaffDirectory + 'static,
{
    pub fn new(templates: Arc<T>, assignments: Arc<A>, directory: Arc<D>) -> Self {
        Self {
            templates,
            assignments,
            directory,
        }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Persist a validated template body with a fresh id and timestamp.
    pub fn create_template(
        &self,
        definition: TemplateDefinition,
    ) -> Result<Template, AppraisalError> {
        let template = Template {
            id: next_template_id(),
            title: definition.title,
            cycle: definition.cycle,
            questions: definition.questions,
            created_at: Utc::now(),
        };

        let stored = self.templates.insert(template)?;
        info!(template_id = %stored.id.0, questions = stored.questions.len(), "template created");
        Ok(stored)
    }

    pub fn template(&self, id: &TemplateId) -> Result<Template, AppraisalError> {
        let template = self.templates.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(template)
    }

    pub fn templates(&self) -> Result<Vec<Template>, AppraisalError> {
        Ok(self.templates.list()?)
    }

    /// Hard delete. Assignments referencing the template are left in
    /// place; deletion cascades are not guaranteed.
    pub fn delete_template(&self, id: &TemplateId) -> Result<(), AppraisalError> {
        self.templates.delete(id)?;
        Ok(())
    }

    /// Fan the template out to every subject with one shared reviewer.
    /// Each row is created independently; subjects that fail validation or
    /// insertion are reported in the outcome, and rows already created are
    /// kept as-is.
    pub fn dispatch(&self, request: DispatchRequest) -> Result<DispatchOutcome, AppraisalError> {
        if request.subject_ids.is_empty() {
            return Err(ValidationError::NoSubjects.into());
        }
        let reviewer_id = request
            .reviewer_id
            .as_ref()
            .ok_or(ValidationError::MissingReviewer)?;

        let template = self.template(&request.template_id)?;

        let mut planner = DispatchPlanner::new(self.directory.as_ref());
        planner.select_departments(request.department_ids.clone());

        let reviewer = planner.select_reviewer(reviewer_id, request.reviewer_level)?;

        let mut outcome = DispatchOutcome::default();
        for subject_id in &request.subject_ids {
            let subject = match planner.select_staff(
                std::slice::from_ref(subject_id),
                request.subject_level,
            ) {
                Ok(mut records) => records.remove(0),
                Err(error) => {
                    outcome.failures.push(DispatchFailure {
                        subject_id: subject_id.clone(),
                        reason: error.to_string(),
                    });
                    continue;
                }
            };

            let assignment = Assignment::pending(
                next_assignment_id(),
                template.id.clone(),
                subject.id.clone(),
                reviewer.id.clone(),
                Utc::now(),
            );

            match self.assignments.insert(assignment) {
                Ok(stored) => outcome.created.push(DispatchReceipt {
                    subject_id: subject.id,
                    assignment_id: stored.id,
                }),
                Err(error) => outcome.failures.push(DispatchFailure {
                    subject_id: subject.id,
                    reason: error.to_string(),
                }),
            }
        }

        info!(
            template_id = %template.id.0,
            created = outcome.created.len(),
            failed = outcome.failures.len(),
            "appraisal dispatch completed"
        );
        Ok(outcome)
    }

    /// Record the subject's side of an assignment. Overwrites any prior
    /// submission (last write wins) and recomputes the stored percentage
    /// score from the new ratings.
    pub fn submit_self(
        &self,
        assignment_id: &AssignmentId,
        caller: &StaffId,
        submission: RatingSubmission,
    ) -> Result<Assignment, AppraisalError> {
        let mut assignment = self.fetch_assignment(assignment_id)?;

        if &assignment.subject_id != caller {
            return Err(AppraisalError::Authorization {
                assignment: assignment_id.clone(),
                caller: caller.clone(),
                role: "subject",
            });
        }

        assignment.self_comments = submission.comment_map();
        assignment.percentage_score = if submission.ratings.is_empty() {
            None
        } else {
            Some(score::percentage(&submission.ratings))
        };
        assignment.self_ratings = submission.ratings;
        assignment.self_submitted_at = Some(Utc::now());

        self.assignments.update(assignment.clone())?;
        Ok(assignment)
    }

    /// Record the reviewer's side. Reviewer ratings are retained for
    /// comparison but never feed the stored percentage score.
    pub fn submit_reviewer(
        &self,
        assignment_id: &AssignmentId,
        caller: &StaffId,
        submission: RatingSubmission,
    ) -> Result<Assignment, AppraisalError> {
        let mut assignment = self.fetch_assignment(assignment_id)?;

        if &assignment.reviewer_id != caller {
            return Err(AppraisalError::Authorization {
                assignment: assignment_id.clone(),
                caller: caller.clone(),
                role: "reviewer",
            });
        }

        assignment.reviewer_comments = submission.comment_map();
        assignment.reviewer_ratings = submission.ratings;
        assignment.reviewer_submitted_at = Some(Utc::now());

        self.assignments.update(assignment.clone())?;
        Ok(assignment)
    }

    pub fn assignment(&self, id: &AssignmentId) -> Result<Assignment, AppraisalError> {
        self.fetch_assignment(id)
    }

    pub fn assignments_for_subject(
        &self,
        subject: &StaffId,
    ) -> Result<Vec<Assignment>, AppraisalError> {
        Ok(self.assignments.for_subject(subject)?)
    }

    pub fn assignments_for_reviewer(
        &self,
        reviewer: &StaffId,
    ) -> Result<Vec<Assignment>, AppraisalError> {
        Ok(self.assignments.for_reviewer(reviewer)?)
    }

    pub fn delete_assignment(&self, id: &AssignmentId) -> Result<(), AppraisalError> {
        self.assignments.delete(id)?;
        Ok(())
    }

    fn fetch_assignment(&self, id: &AssignmentId) -> Result<Assignment, AppraisalError> {
        let assignment = self
            .assignments
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(assignment)
    }
}

/// Error raised by the appraisal service.
#[derive(Debug, thiserror::Error)]
pub enum AppraisalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(
        "staff member '{}' is not the {} for assignment '{}'",
        .caller.0,
        .role,
        .assignment.0
    )]
    Authorization {
        assignment: AssignmentId,
        caller: StaffId,
        role: &'static str,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
