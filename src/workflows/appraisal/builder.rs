use std::collections::BTreeSet;

use super::catalog::{self, QuestionCategory};
use super::domain::{
    CycleType, Question, QuestionId, QuestionKind, StaffLevel, TemplateDefinition,
    ValidationError, CUSTOM_QUESTION_PREFIX,
};

/// Working state for composing a template: a category selection over one
/// level-keyed library plus ad-hoc custom questions. Custom questions
/// survive category toggling.
#[derive(Debug)]
pub struct TemplateDraft {
    level: StaffLevel,
    selected: BTreeSet<String>,
    custom: Vec<Question>,
    next_custom: u64,
}

impl TemplateDraft {
    pub fn new(level: StaffLevel) -> Self {
        Self {
            level,
            selected: BTreeSet::new(),
            custom: Vec::new(),
            next_custom: 1,
        }
    }

    pub fn level(&self) -> StaffLevel {
        self.level
    }

    /// Add the category to the selection, or remove it when already
    /// selected. Applying the same id twice restores the prior state.
    pub fn toggle_category(&mut self, category_id: &str) -> Result<(), ValidationError> {
        if catalog::category(self.level, category_id).is_none() {
            return Err(ValidationError::UnknownCategory(category_id.to_string()));
        }

        if !self.selected.remove(category_id) {
            self.selected.insert(category_id.to_string());
        }
        Ok(())
    }

    /// Selected categories in library order, so the flattened question
    /// list is deterministic regardless of toggle order.
    pub fn selected_categories(&self) -> Vec<&'static QuestionCategory> {
        catalog::question_library(self.level)
            .iter()
            .filter(|category| self.selected.contains(category.id))
            .collect()
    }

    /// The current working set: flattened selected categories followed by
    /// custom questions.
    pub fn questions(&self) -> Vec<Question> {
        let mut questions: Vec<Question> = self
            .selected_categories()
            .into_iter()
            .flat_map(|category| {
                category
                    .questions
                    .iter()
                    .map(|question| question.to_question(category.label))
            })
            .collect();
        questions.extend(self.custom.iter().cloned());
        questions
    }

    /// Append an ad-hoc question with a freshly generated id. Checkbox
    /// lists are catalog-only; custom entries accept rating and free-text.
    pub fn add_custom_question(
        &mut self,
        category: &str,
        prompt: &str,
        description: Option<String>,
        kind: QuestionKind,
    ) -> Result<QuestionId, ValidationError> {
        if kind == QuestionKind::CheckboxList {
            return Err(ValidationError::UnsupportedCustomKind(kind));
        }

        let id = QuestionId(format!("{CUSTOM_QUESTION_PREFIX}{}", self.next_custom));
        self.next_custom += 1;

        self.custom.push(Question {
            id: id.clone(),
            category: category.to_string(),
            prompt: prompt.to_string(),
            description,
            kind,
            options: Vec::new(),
        });

        Ok(id)
    }

    /// Drop a custom question from the working set.
    pub fn remove_question(&mut self, id: &QuestionId) -> Result<(), ValidationError> {
        let before = self.custom.len();
        self.custom.retain(|question| &question.id != id);
        if self.custom.len() == before {
            return Err(ValidationError::UnknownQuestion(id.clone()));
        }
        Ok(())
    }

    /// Validate the draft against a title and cycle spelling.
    pub fn finalize(&self, title: &str, cycle: &str) -> Result<TemplateDefinition, ValidationError> {
        finalize(title, cycle, self.questions())
    }
}

/// Validate and assemble a template body. Fails on an empty title, an
/// unrecognized cycle spelling, or an empty question list.
pub fn finalize(
    title: &str,
    cycle: &str,
    questions: Vec<Question>,
) -> Result<TemplateDefinition, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    let cycle = CycleType::parse(cycle)?;

    if questions.is_empty() {
        return Err(ValidationError::NoQuestions);
    }

    Ok(TemplateDefinition {
        title: title.to_string(),
        cycle,
        questions,
    })
}
