use std::collections::HashMap;
use std::sync::Mutex;

use super::domain::{Assignment, AssignmentId, StaffId, Template, TemplateId};
use super::repository::{AssignmentRepository, RepositoryError, TemplateRepository};

/// Template store backed by process memory. The production deployment
/// plugs the tenant record store in behind the same trait.
#[derive(Debug, Default)]
pub struct InMemoryTemplateStore {
    records: Mutex<HashMap<TemplateId, Template>>,
}

impl TemplateRepository for InMemoryTemplateStore {
    fn insert(&self, template: Template) -> Result<Template, RepositoryError> {
        let mut guard = self.records.lock().expect("template mutex poisoned");
        if guard.contains_key(&template.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(template.id.clone(), template.clone());
        Ok(template)
    }

    fn fetch(&self, id: &TemplateId) -> Result<Option<Template>, RepositoryError> {
        let guard = self.records.lock().expect("template mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Template>, RepositoryError> {
        let guard = self.records.lock().expect("template mutex poisoned");
        let mut templates: Vec<Template> = guard.values().cloned().collect();
        templates.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(templates)
    }

    fn delete(&self, id: &TemplateId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("template mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

/// Assignment store backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryAssignmentStore {
    records: Mutex<HashMap<AssignmentId, Assignment>>,
}

impl AssignmentRepository for InMemoryAssignmentStore {
    fn insert(&self, assignment: Assignment) -> Result<Assignment, RepositoryError> {
        let mut guard = self.records.lock().expect("assignment mutex poisoned");
        if guard.contains_key(&assignment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assignment.id.clone(), assignment.clone());
        Ok(assignment)
    }

    fn update(&self, assignment: Assignment) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("assignment mutex poisoned");
        if !guard.contains_key(&assignment.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(assignment.id.clone(), assignment);
        Ok(())
    }

    fn fetch(&self, id: &AssignmentId) -> Result<Option<Assignment>, RepositoryError> {
        let guard = self.records.lock().expect("assignment mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_subject(&self, subject: &StaffId) -> Result<Vec<Assignment>, RepositoryError> {
        Ok(self.filter(|assignment| &assignment.subject_id == subject))
    }

    fn for_reviewer(&self, reviewer: &StaffId) -> Result<Vec<Assignment>, RepositoryError> {
        Ok(self.filter(|assignment| &assignment.reviewer_id == reviewer))
    }

    fn delete(&self, id: &AssignmentId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("assignment mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

impl InMemoryAssignmentStore {
    fn filter<F: Fn(&Assignment) -> bool>(&self, predicate: F) -> Vec<Assignment> {
        let guard = self.records.lock().expect("assignment mutex poisoned");
        let mut matches: Vec<Assignment> = guard
            .values()
            .filter(|assignment| predicate(assignment))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.0.cmp(&b.id.0)));
        matches
    }
}
