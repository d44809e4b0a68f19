use serde::{Deserialize, Serialize};

use super::directory::{StaffDirectory, StaffRecord};
use super::domain::{AssignmentId, DepartmentId, StaffId, StaffLevel};

/// Scopes candidate pools by department and level before fan-out. With no
/// departments selected the whole directory is in scope.
pub struct DispatchPlanner<'a, D: StaffDirectory + ?Sized> {
    directory: &'a D,
    departments: Vec<DepartmentId>,
}

impl<'a, D: StaffDirectory + ?Sized> DispatchPlanner<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self {
            directory,
            departments: Vec::new(),
        }
    }

    /// Restrict subsequent candidate pools to staff belonging to these
    /// departments.
    pub fn select_departments(&mut self, ids: Vec<DepartmentId>) -> &mut Self {
        self.departments = ids;
        self
    }

    /// Staff in scope at the requested level, for selector screens.
    pub fn candidates(&self, level: StaffLevel) -> Vec<StaffRecord> {
        let pool = if self.departments.is_empty() {
            self.directory.members_of(&self.all_department_ids())
        } else {
            self.directory.members_of(&self.departments)
        };
        pool.into_iter()
            .filter(|record| record.level == level)
            .collect()
    }

    /// Validate a set of evaluation subjects against the scoped pool.
    pub fn select_staff(
        &self,
        ids: &[StaffId],
        level: StaffLevel,
    ) -> Result<Vec<StaffRecord>, DispatchError> {
        ids.iter().map(|id| self.validate(id, level)).collect()
    }

    /// Validate the shared reviewer against the scoped pool.
    pub fn select_reviewer(
        &self,
        id: &StaffId,
        level: StaffLevel,
    ) -> Result<StaffRecord, DispatchError> {
        self.validate(id, level)
    }

    fn validate(&self, id: &StaffId, level: StaffLevel) -> Result<StaffRecord, DispatchError> {
        let record = self
            .directory
            .staff(id)
            .ok_or_else(|| DispatchError::UnknownStaff(id.clone()))?;

        if !self.departments.is_empty() && !record.belongs_to_any(&self.departments) {
            return Err(DispatchError::OutsideDepartments(id.clone()));
        }

        if record.level != level {
            return Err(DispatchError::LevelMismatch {
                staff: id.clone(),
                expected: level,
                actual: record.level,
            });
        }

        Ok(record)
    }

    fn all_department_ids(&self) -> Vec<DepartmentId> {
        self.directory
            .departments()
            .into_iter()
            .map(|department| department.id)
            .collect()
    }
}

/// Candidate validation failures during dispatch planning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("no staff member '{}' in the directory", .0 .0)]
    UnknownStaff(StaffId),
    #[error("staff member '{}' is outside the selected departments", .0 .0)]
    OutsideDepartments(StaffId),
    #[error(
        "staff member '{}' is {} but the selector requires {}",
        .staff.0,
        .actual.label(),
        .expected.label()
    )]
    LevelMismatch {
        staff: StaffId,
        expected: StaffLevel,
        actual: StaffLevel,
    },
}

/// Per-subject batch result for a fan-out. Rows created before a failure
/// stay in place; partial success is surfaced here rather than rolled
/// back or silently dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub created: Vec<DispatchReceipt>,
    pub failures: Vec<DispatchFailure>,
}

impl DispatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    pub subject_id: StaffId,
    pub assignment_id: AssignmentId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchFailure {
    pub subject_id: StaffId,
    pub reason: String,
}
