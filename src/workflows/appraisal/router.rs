use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::builder::TemplateDraft;
use super::catalog;
use super::directory::StaffDirectory;
use super::dispatch::DispatchError;
use super::domain::{AssignmentId, QuestionKind, StaffId, StaffLevel, TemplateId};
use super::repository::{
    AppraisalStatistics, AssignmentRepository, AssignmentView, RepositoryError, TemplateRepository,
};
use super::service::{AppraisalError, AppraisalService, DispatchRequest, RatingSubmission};

/// Router builder exposing the appraisal endpoints: catalog lookup,
/// template CRUD, dispatch fan-out, submissions, and assignment listings.
pub fn appraisal_router<T, A, D>(service: Arc<AppraisalService<T, A, D>>) -> Router
where
    T: TemplateRepository + 'static,
    A: AssignmentRepository + 'static,
    D: StaffDirectory + 'static,
{
    Router::new()
        .route("/api/v1/appraisals/catalog/:level", get(catalog_handler::<T, A, D>))
        .route(
            "/api/v1/appraisals/templates",
            post(create_template_handler::<T, A, D>).get(list_templates_handler::<T, A, D>),
        )
        .route(
            "/api/v1/appraisals/templates/:template_id",
            get(get_template_handler::<T, A, D>).delete(delete_template_handler::<T, A, D>),
        )
        .route("/api/v1/appraisals/dispatch", post(dispatch_handler::<T, A, D>))
        .route(
            "/api/v1/appraisals/assignments",
            get(list_assignments_handler::<T, A, D>),
        )
        .route(
            "/api/v1/appraisals/assignments/:assignment_id/self",
            post(submit_self_handler::<T, A, D>),
        )
        .route(
            "/api/v1/appraisals/assignments/:assignment_id/reviewer",
            post(submit_reviewer_handler::<T, A, D>),
        )
        .with_state(service)
}

/// Template creation payload: selected categories from the level's
/// library plus optional custom questions, assembled through the builder.
#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub title: String,
    pub cycle: String,
    pub level: StaffLevel,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub custom_questions: Vec<CustomQuestionRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CustomQuestionRequest {
    pub category: String,
    pub prompt: String,
    #[serde(default)]
    pub description: Option<String>,
    pub kind: QuestionKind,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionRequest {
    pub caller_id: StaffId,
    #[serde(flatten)]
    pub submission: RatingSubmission,
}

#[derive(Debug, Deserialize)]
pub struct AssignmentListQuery {
    #[serde(default)]
    pub subject: Option<StaffId>,
    #[serde(default)]
    pub reviewer: Option<StaffId>,
}

#[derive(Debug, Serialize)]
struct AssignmentListResponse {
    assignments: Vec<AssignmentView>,
    statistics: AppraisalStatistics,
}

async fn catalog_handler<T, A, D>(
    State(_service): State<Arc<AppraisalService<T, A, D>>>,
    Path(level): Path<String>,
) -> Response
where
    T: TemplateRepository + 'static,
    A: AssignmentRepository + 'static,
    D: StaffDirectory + 'static,
{
    match StaffLevel::parse(&level) {
        Some(level) => {
            let library = catalog::question_library(level);
            (StatusCode::OK, axum::Json(library)).into_response()
        }
        None => {
            let payload = json!({ "error": format!("unknown staff level '{level}'") });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

async fn create_template_handler<T, A, D>(
    State(service): State<Arc<AppraisalService<T, A, D>>>,
    axum::Json(request): axum::Json<CreateTemplateRequest>,
) -> Response
where
    T: TemplateRepository + 'static,
    A: AssignmentRepository + 'static,
    D: StaffDirectory + 'static,
{
    let mut draft = TemplateDraft::new(request.level);
    for category_id in &request.category_ids {
        if let Err(error) = draft.toggle_category(category_id) {
            return error_response(error.into());
        }
    }
    for custom in &request.custom_questions {
        if let Err(error) = draft.add_custom_question(
            &custom.category,
            &custom.prompt,
            custom.description.clone(),
            custom.kind,
        ) {
            return error_response(error.into());
        }
    }

    let definition = match draft.finalize(&request.title, &request.cycle) {
        Ok(definition) => definition,
        Err(error) => return error_response(error.into()),
    };

    match service.create_template(definition) {
        Ok(template) => (StatusCode::CREATED, axum::Json(template)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn list_templates_handler<T, A, D>(
    State(service): State<Arc<AppraisalService<T, A, D>>>,
) -> Response
where
    T: TemplateRepository + 'static,
    A: AssignmentRepository + 'static,
    D: StaffDirectory + 'static,
{
    match service.templates() {
        Ok(templates) => (StatusCode::OK, axum::Json(templates)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn get_template_handler<T, A, D>(
    State(service): State<Arc<AppraisalService<T, A, D>>>,
    Path(template_id): Path<String>,
) -> Response
where
    T: TemplateRepository + 'static,
    A: AssignmentRepository + 'static,
    D: StaffDirectory + 'static,
{
    match service.template(&TemplateId(template_id)) {
        Ok(template) => (StatusCode::OK, axum::Json(template)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn delete_template_handler<T, A, D>(
    State(service): State<Arc<AppraisalService<T, A, D>>>,
    Path(template_id): Path<String>,
) -> Response
where
    T: TemplateRepository + 'static,
    A: AssignmentRepository + 'static,
    D: StaffDirectory + 'static,
{
    match service.delete_template(&TemplateId(template_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

async fn dispatch_handler<T, A, D>(
    State(service): State<Arc<AppraisalService<T, A, D>>>,
    axum::Json(request): axum::Json<DispatchRequest>,
) -> Response
where
    T: TemplateRepository + 'static,
    A: AssignmentRepository + 'static,
    D: StaffDirectory + 'static,
{
    match service.dispatch(request) {
        Ok(outcome) => (StatusCode::ACCEPTED, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn submit_self_handler<T, A, D>(
    State(service): State<Arc<AppraisalService<T, A, D>>>,
    Path(assignment_id): Path<String>,
    axum::Json(request): axum::Json<SubmissionRequest>,
) -> Response
where
    T: TemplateRepository + 'static,
    A: AssignmentRepository + 'static,
    D: StaffDirectory + 'static,
{
    let id = AssignmentId(assignment_id);
    match service.submit_self(&id, &request.caller_id, request.submission) {
        Ok(assignment) => {
            (StatusCode::OK, axum::Json(AssignmentView::of(&assignment))).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn submit_reviewer_handler<T, A, D>(
    State(service): State<Arc<AppraisalService<T, A, D>>>,
    Path(assignment_id): Path<String>,
    axum::Json(request): axum::Json<SubmissionRequest>,
) -> Response
where
    T: TemplateRepository + 'static,
    A: AssignmentRepository + 'static,
    D: StaffDirectory + 'static,
{
    let id = AssignmentId(assignment_id);
    match service.submit_reviewer(&id, &request.caller_id, request.submission) {
        Ok(assignment) => {
            (StatusCode::OK, axum::Json(AssignmentView::of(&assignment))).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn list_assignments_handler<T, A, D>(
    State(service): State<Arc<AppraisalService<T, A, D>>>,
    Query(query): Query<AssignmentListQuery>,
) -> Response
where
    T: TemplateRepository + 'static,
    A: AssignmentRepository + 'static,
    D: StaffDirectory + 'static,
{
    let result = match (&query.subject, &query.reviewer) {
        (Some(subject), None) => service.assignments_for_subject(subject),
        (None, Some(reviewer)) => service.assignments_for_reviewer(reviewer),
        _ => {
            let payload =
                json!({ "error": "provide exactly one of 'subject' or 'reviewer'" });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match result {
        Ok(assignments) => {
            let statistics = AppraisalStatistics::for_assignments(&assignments);
            let views = assignments.iter().map(AssignmentView::of).collect();
            let body = AssignmentListResponse {
                assignments: views,
                statistics,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: AppraisalError) -> Response {
    let status = match &error {
        AppraisalError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppraisalError::Dispatch(DispatchError::UnknownStaff(_)) => StatusCode::NOT_FOUND,
        AppraisalError::Dispatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppraisalError::Authorization { .. } => StatusCode::FORBIDDEN,
        AppraisalError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AppraisalError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AppraisalError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
