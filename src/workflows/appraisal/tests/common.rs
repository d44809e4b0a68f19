use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::appraisal::directory::{
    DepartmentMembership, InMemoryDirectory, StaffRecord,
};
use crate::workflows::appraisal::domain::{
    DepartmentId, QuestionId, Rating, RatingMap, StaffId, StaffLevel, Template,
};
use crate::workflows::appraisal::memory::{InMemoryAssignmentStore, InMemoryTemplateStore};
use crate::workflows::appraisal::service::{AppraisalService, DispatchRequest, RatingSubmission};
use crate::workflows::appraisal::{appraisal_router, TemplateDraft};

pub(super) type TestService =
    AppraisalService<InMemoryTemplateStore, InMemoryAssignmentStore, InMemoryDirectory>;

pub(super) fn staff(id: &str, name: &str, level: StaffLevel, department: &str) -> StaffRecord {
    StaffRecord {
        id: StaffId(id.to_string()),
        name: name.to_string(),
        level,
        memberships: vec![DepartmentMembership {
            department: DepartmentId(department.to_string()),
            primary: true,
        }],
    }
}

pub(super) fn sample_directory() -> InMemoryDirectory {
    let directory = InMemoryDirectory::default();
    directory.upsert_staff(staff("s-001", "Amara Obi", StaffLevel::Staff, "engineering"));
    directory.upsert_staff(staff("s-002", "Ben Osei", StaffLevel::Staff, "engineering"));
    directory.upsert_staff(staff("s-003", "Chidi Eze", StaffLevel::Staff, "sales"));
    directory.upsert_staff(staff(
        "m-001",
        "Dana Mensah",
        StaffLevel::HodManager,
        "engineering",
    ));
    directory.upsert_staff(staff("c-001", "Efe Adeyemi", StaffLevel::CSuite, "executive"));
    directory
}

pub(super) fn build_service() -> (
    Arc<TestService>,
    Arc<InMemoryTemplateStore>,
    Arc<InMemoryAssignmentStore>,
) {
    let templates = Arc::new(InMemoryTemplateStore::default());
    let assignments = Arc::new(InMemoryAssignmentStore::default());
    let service = Arc::new(AppraisalService::new(
        templates.clone(),
        assignments.clone(),
        Arc::new(sample_directory()),
    ));
    (service, templates, assignments)
}

pub(super) fn staff_draft() -> TemplateDraft {
    let mut draft = TemplateDraft::new(StaffLevel::Staff);
    draft
        .toggle_category("job-knowledge")
        .expect("category exists");
    draft
        .toggle_category("communication")
        .expect("category exists");
    draft
}

pub(super) fn create_template(service: &TestService) -> Template {
    let definition = staff_draft()
        .finalize("Quarterly Review", "quarter")
        .expect("draft finalizes");
    service
        .create_template(definition)
        .expect("template persists")
}

pub(super) fn dispatch_request(
    template: &Template,
    subjects: &[&str],
    reviewer: Option<&str>,
) -> DispatchRequest {
    DispatchRequest {
        template_id: template.id.clone(),
        department_ids: Vec::new(),
        subject_ids: subjects
            .iter()
            .map(|id| StaffId((*id).to_string()))
            .collect(),
        reviewer_id: reviewer.map(|id| StaffId(id.to_string())),
        subject_level: StaffLevel::Staff,
        reviewer_level: StaffLevel::HodManager,
    }
}

pub(super) fn ratings(values: &[(&str, u8)]) -> RatingMap {
    values
        .iter()
        .map(|(id, value)| {
            (
                QuestionId((*id).to_string()),
                Rating::new(*value).expect("valid rating"),
            )
        })
        .collect()
}

pub(super) fn submission(values: &[(&str, u8)], overall: Option<&str>) -> RatingSubmission {
    RatingSubmission {
        ratings: ratings(values),
        comments: Default::default(),
        overall_comment: overall.map(str::to_string),
    }
}

pub(super) fn router_with_service(service: Arc<TestService>) -> axum::Router {
    appraisal_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
