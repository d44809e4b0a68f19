use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for questions inside a template.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub String);

/// Identifier wrapper for persisted templates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub String);

/// Identifier wrapper for dispatched assignments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentId(pub String);

/// Identifier wrapper for staff directory entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StaffId(pub String);

/// Identifier wrapper for departments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DepartmentId(pub String);

/// Reserved comment-map key holding the free-form overall remark.
pub const OVERALL_COMMENT_KEY: &str = "overall";

/// Id prefix distinguishing ad-hoc custom questions from catalog entries.
pub const CUSTOM_QUESTION_PREFIX: &str = "custom-";

/// A single 1..=5 score; out-of-range values are rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::RatingOutOfRange(value))
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// Map of per-question scores keyed by question id.
pub type RatingMap = BTreeMap<QuestionId, Rating>;

/// Map of per-question comments; the `"overall"` key is reserved for the
/// free-form summary remark.
pub type CommentMap = BTreeMap<String, String>;

/// Supported answer formats for template questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Rating,
    CheckboxList,
    FreeText,
}

impl QuestionKind {
    pub const fn label(self) -> &'static str {
        match self {
            QuestionKind::Rating => "rating",
            QuestionKind::CheckboxList => "checkbox_list",
            QuestionKind::FreeText => "free_text",
        }
    }
}

/// One question inside a template; `options` is populated for checkbox
/// lists only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub category: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Question {
    pub fn is_custom(&self) -> bool {
        self.id.0.starts_with(CUSTOM_QUESTION_PREFIX)
    }
}

/// How often a template is expected to be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CycleType {
    Quarter,
    HalfYear,
    Yearly,
}

impl CycleType {
    /// Parse the wire spelling; anything outside the three recognized
    /// values is a validation failure.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "quarter" => Ok(Self::Quarter),
            "half-year" => Ok(Self::HalfYear),
            "yearly" => Ok(Self::Yearly),
            other => Err(ValidationError::UnknownCycle(other.to_string())),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CycleType::Quarter => "quarter",
            CycleType::HalfYear => "half-year",
            CycleType::Yearly => "yearly",
        }
    }
}

/// Seniority tier used to key the question libraries and to filter
/// dispatch candidate pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffLevel {
    Staff,
    HodManager,
    CSuite,
}

impl StaffLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "staff" => Some(Self::Staff),
            "hod/manager" | "hod-manager" | "hod_manager" | "manager" => Some(Self::HodManager),
            "c-suite" | "c_suite" | "csuite" => Some(Self::CSuite),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            StaffLevel::Staff => "Staff",
            StaffLevel::HodManager => "HOD/Manager",
            StaffLevel::CSuite => "C-Suite",
        }
    }
}

/// A validated template body awaiting persistence; the service stamps the
/// id and created timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDefinition {
    pub title: String,
    pub cycle: CycleType,
    pub questions: Vec<Question>,
}

/// Reusable evaluation definition composed from the catalog plus custom
/// questions. Question identity is immutable once assignments reference
/// the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub title: String,
    pub cycle: CycleType,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

/// One instantiated evaluation linking a template to a subject and a
/// reviewer. The self and reviewer sides are written independently and in
/// either order; duplicate assignments for the same (template, subject)
/// pair are permitted, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub template_id: TemplateId,
    pub subject_id: StaffId,
    pub reviewer_id: StaffId,
    #[serde(default)]
    pub self_ratings: RatingMap,
    #[serde(default)]
    pub self_comments: CommentMap,
    #[serde(default)]
    pub reviewer_ratings: RatingMap,
    #[serde(default)]
    pub reviewer_comments: CommentMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_submitted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    /// Fresh assignment as produced by dispatch fan-out: empty maps, no
    /// timestamps, no score.
    pub fn pending(
        id: AssignmentId,
        template_id: TemplateId,
        subject_id: StaffId,
        reviewer_id: StaffId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            template_id,
            subject_id,
            reviewer_id,
            self_ratings: RatingMap::new(),
            self_comments: CommentMap::new(),
            reviewer_ratings: RatingMap::new(),
            reviewer_comments: CommentMap::new(),
            percentage_score: None,
            self_submitted_at: None,
            reviewer_submitted_at: None,
            created_at,
        }
    }
}

/// Input validation failures surfaced synchronously to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("template title must not be empty")]
    EmptyTitle,
    #[error("template requires at least one question")]
    NoQuestions,
    #[error("unrecognized cycle type '{0}'")]
    UnknownCycle(String),
    #[error("rating {0} is outside the 1-5 scale")]
    RatingOutOfRange(u8),
    #[error("unknown question category '{0}'")]
    UnknownCategory(String),
    #[error("custom questions support rating and free-text formats, not {}", .0.label())]
    UnsupportedCustomKind(QuestionKind),
    #[error("no question '{}' in the working set", .0 .0)]
    UnknownQuestion(QuestionId),
    #[error("dispatch requires at least one subject")]
    NoSubjects,
    #[error("dispatch requires a reviewer")]
    MissingReviewer,
}
