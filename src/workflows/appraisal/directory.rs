use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::domain::{DepartmentId, StaffId, StaffLevel};

/// Directory entry consumed when building dispatch candidate pools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRecord {
    pub id: StaffId,
    pub name: String,
    pub level: StaffLevel,
    pub memberships: Vec<DepartmentMembership>,
}

impl StaffRecord {
    pub fn belongs_to_any(&self, departments: &[DepartmentId]) -> bool {
        self.memberships
            .iter()
            .any(|membership| departments.contains(&membership.department))
    }

    pub fn primary_department(&self) -> Option<&DepartmentId> {
        self.memberships
            .iter()
            .find(|membership| membership.primary)
            .map(|membership| &membership.department)
    }
}

/// A staff member's link to one department; at most one membership is
/// marked primary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentMembership {
    pub department: DepartmentId,
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
}

/// Read-only staff and department lookup, treated as an external
/// collaborator. Only used to populate selector candidate pools.
pub trait StaffDirectory: Send + Sync {
    fn staff(&self, id: &StaffId) -> Option<StaffRecord>;
    fn members_of(&self, departments: &[DepartmentId]) -> Vec<StaffRecord>;
    fn departments(&self) -> Vec<Department>;
}

/// Directory backed by process memory; populated by the roster importer
/// or directly in tests.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    inner: Mutex<DirectoryState>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    staff: BTreeMap<StaffId, StaffRecord>,
    departments: BTreeMap<DepartmentId, Department>,
}

impl InMemoryDirectory {
    /// Insert or replace a staff record, registering any departments it
    /// references.
    pub fn upsert_staff(&self, record: StaffRecord) {
        let mut state = self.inner.lock().expect("directory mutex poisoned");
        for membership in &record.memberships {
            state
                .departments
                .entry(membership.department.clone())
                .or_insert_with(|| Department {
                    id: membership.department.clone(),
                    name: membership.department.0.clone(),
                });
        }
        state.staff.insert(record.id.clone(), record);
    }

    pub fn upsert_department(&self, department: Department) {
        let mut state = self.inner.lock().expect("directory mutex poisoned");
        state.departments.insert(department.id.clone(), department);
    }

    pub fn staff_count(&self) -> usize {
        self.inner
            .lock()
            .expect("directory mutex poisoned")
            .staff
            .len()
    }
}

impl StaffDirectory for InMemoryDirectory {
    fn staff(&self, id: &StaffId) -> Option<StaffRecord> {
        self.inner
            .lock()
            .expect("directory mutex poisoned")
            .staff
            .get(id)
            .cloned()
    }

    fn members_of(&self, departments: &[DepartmentId]) -> Vec<StaffRecord> {
        self.inner
            .lock()
            .expect("directory mutex poisoned")
            .staff
            .values()
            .filter(|record| record.belongs_to_any(departments))
            .cloned()
            .collect()
    }

    fn departments(&self) -> Vec<Department> {
        self.inner
            .lock()
            .expect("directory mutex poisoned")
            .departments
            .values()
            .cloned()
            .collect()
    }
}
