use std::sync::OnceLock;

use serde::Serialize;

use super::domain::{Question, QuestionId, QuestionKind, StaffLevel};

/// Named bundle of related questions selectable as a unit in the builder.
#[derive(Debug, Serialize)]
pub struct QuestionCategory {
    pub id: &'static str,
    pub label: &'static str,
    pub questions: Vec<CatalogQuestion>,
}

/// Library entry; converted into an owned [`Question`] when a draft
/// flattens its selected categories.
#[derive(Debug, Serialize)]
pub struct CatalogQuestion {
    pub id: &'static str,
    pub prompt: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub kind: QuestionKind,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub options: &'static [&'static str],
}

impl CatalogQuestion {
    pub fn to_question(&self, category_label: &str) -> Question {
        Question {
            id: QuestionId(self.id.to_string()),
            category: category_label.to_string(),
            prompt: self.prompt.to_string(),
            description: self.description.map(str::to_string),
            kind: self.kind,
            options: self.options.iter().map(|option| option.to_string()).collect(),
        }
    }
}

/// The category library for a staff level. HOD/Manager and C-Suite share
/// the leadership-oriented set; everyone else receives the staff set.
/// Loaded once, never mutated at runtime.
pub fn question_library(level: StaffLevel) -> &'static [QuestionCategory] {
    match level {
        StaffLevel::HodManager | StaffLevel::CSuite => manager_library(),
        StaffLevel::Staff => staff_library(),
    }
}

/// Look up a category by id within the library for the given level.
pub fn category(level: StaffLevel, id: &str) -> Option<&'static QuestionCategory> {
    question_library(level)
        .iter()
        .find(|category| category.id == id)
}

fn staff_library() -> &'static [QuestionCategory] {
    static LIBRARY: OnceLock<Vec<QuestionCategory>> = OnceLock::new();
    LIBRARY.get_or_init(staff_categories)
}

fn manager_library() -> &'static [QuestionCategory] {
    static LIBRARY: OnceLock<Vec<QuestionCategory>> = OnceLock::new();
    LIBRARY.get_or_init(manager_categories)
}

fn staff_categories() -> Vec<QuestionCategory> {
    vec![
        QuestionCategory {
            id: "job-knowledge",
            label: "Job Knowledge",
            questions: vec![
                CatalogQuestion {
                    id: "job-knowledge-1",
                    prompt: "Demonstrates the technical skills required for the role",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "job-knowledge-2",
                    prompt: "Keeps knowledge of tools and procedures current",
                    description: Some("Consider trainings completed during the review window."),
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "job-knowledge-3",
                    prompt: "Applies company policies correctly in day-to-day work",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
            ],
        },
        QuestionCategory {
            id: "quality-of-work",
            label: "Quality of Work",
            questions: vec![
                CatalogQuestion {
                    id: "quality-of-work-1",
                    prompt: "Delivers accurate work with minimal rework",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "quality-of-work-2",
                    prompt: "Meets deadlines on assigned deliverables",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "quality-of-work-3",
                    prompt: "Which quality practices were applied consistently?",
                    description: None,
                    kind: QuestionKind::CheckboxList,
                    options: &[
                        "Peer review",
                        "Self-checklist",
                        "Documentation updates",
                        "Root-cause follow-up",
                    ],
                },
            ],
        },
        QuestionCategory {
            id: "communication",
            label: "Communication",
            questions: vec![
                CatalogQuestion {
                    id: "communication-1",
                    prompt: "Communicates status and blockers proactively",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "communication-2",
                    prompt: "Writes clearly for the intended audience",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "communication-3",
                    prompt: "Describe one interaction that worked well this cycle",
                    description: None,
                    kind: QuestionKind::FreeText,
                    options: &[],
                },
            ],
        },
        QuestionCategory {
            id: "teamwork",
            label: "Teamwork & Collaboration",
            questions: vec![
                CatalogQuestion {
                    id: "teamwork-1",
                    prompt: "Supports colleagues and shares knowledge willingly",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "teamwork-2",
                    prompt: "Handles disagreement constructively",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "teamwork-3",
                    prompt: "Contributes to cross-department initiatives",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
            ],
        },
        QuestionCategory {
            id: "reliability",
            label: "Reliability & Attendance",
            questions: vec![
                CatalogQuestion {
                    id: "reliability-1",
                    prompt: "Maintains dependable attendance and punctuality",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "reliability-2",
                    prompt: "Follows through on commitments without reminders",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
            ],
        },
    ]
}

fn manager_categories() -> Vec<QuestionCategory> {
    vec![
        QuestionCategory {
            id: "leadership",
            label: "Leadership",
            questions: vec![
                CatalogQuestion {
                    id: "leadership-1",
                    prompt: "Sets clear expectations and holds the team accountable",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "leadership-2",
                    prompt: "Models the behavior expected of the team",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "leadership-3",
                    prompt: "Recognizes and rewards strong performance",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
            ],
        },
        QuestionCategory {
            id: "strategic-planning",
            label: "Strategic Planning",
            questions: vec![
                CatalogQuestion {
                    id: "strategic-planning-1",
                    prompt: "Translates company goals into an actionable department plan",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "strategic-planning-2",
                    prompt: "Anticipates risks and prepares contingencies",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "strategic-planning-3",
                    prompt: "Allocates budget and headcount against priorities",
                    description: Some("Consider the most recent planning cycle."),
                    kind: QuestionKind::Rating,
                    options: &[],
                },
            ],
        },
        QuestionCategory {
            id: "decision-making",
            label: "Decision Making",
            questions: vec![
                CatalogQuestion {
                    id: "decision-making-1",
                    prompt: "Makes timely decisions with incomplete information",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "decision-making-2",
                    prompt: "Weighs stakeholder input before committing",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
            ],
        },
        QuestionCategory {
            id: "people-development",
            label: "People Development",
            questions: vec![
                CatalogQuestion {
                    id: "people-development-1",
                    prompt: "Coaches direct reports toward their growth goals",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "people-development-2",
                    prompt: "Delegates work that stretches the team",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "people-development-3",
                    prompt: "Summarize succession readiness within the department",
                    description: None,
                    kind: QuestionKind::FreeText,
                    options: &[],
                },
            ],
        },
        QuestionCategory {
            id: "communication",
            label: "Communication",
            questions: vec![
                CatalogQuestion {
                    id: "communication-1",
                    prompt: "Keeps leadership and the team informed of direction changes",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
                CatalogQuestion {
                    id: "communication-2",
                    prompt: "Represents the department effectively in cross-functional forums",
                    description: None,
                    kind: QuestionKind::Rating,
                    options: &[],
                },
            ],
        },
    ]
}
