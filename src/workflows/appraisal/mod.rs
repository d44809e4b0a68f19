//! Performance-appraisal core: template composition from level-keyed
//! question libraries, assignment fan-out to subjects paired with a
//! reviewer, independent self/reviewer submissions, derived lifecycle
//! status, and normalized scoring.

pub mod builder;
pub mod catalog;
pub mod directory;
pub mod dispatch;
pub mod domain;
pub mod memory;
pub mod repository;
pub mod router;
pub mod score;
pub mod service;
pub mod status;

#[cfg(test)]
mod tests;

pub use builder::{finalize, TemplateDraft};
pub use catalog::{category, question_library, CatalogQuestion, QuestionCategory};
pub use directory::{
    Department, DepartmentMembership, InMemoryDirectory, StaffDirectory, StaffRecord,
};
pub use dispatch::{
    DispatchError, DispatchFailure, DispatchOutcome, DispatchPlanner, DispatchReceipt,
};
pub use domain::{
    Assignment, AssignmentId, CommentMap, CycleType, DepartmentId, Question, QuestionId,
    QuestionKind, Rating, RatingMap, StaffId, StaffLevel, Template, TemplateDefinition,
    TemplateId, ValidationError, CUSTOM_QUESTION_PREFIX, OVERALL_COMMENT_KEY,
};
pub use memory::{InMemoryAssignmentStore, InMemoryTemplateStore};
pub use repository::{
    AppraisalStatistics, AssignmentRepository, AssignmentView, RepositoryError, TemplateRepository,
};
pub use router::appraisal_router;
pub use score::{display_rounded, percentage, PerformanceBand};
pub use service::{AppraisalError, AppraisalService, DispatchRequest, RatingSubmission};
pub use status::AssignmentStatus;
