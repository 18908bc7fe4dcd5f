use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    Dependent, EmployeeDocument, EmployeeId, Evaluation, HistoryEventId, Inspection, NewEmployee,
    Sanction, SanctionKind,
};
use super::history::HistoryEntryRequest;
use super::lifecycle::StatusRequest;
use super::repository::{AlertPublisher, EmployeeRepository, RecordRepository, RepositoryError};
use super::service::{EmployeeService, EmployeeServiceError};
use super::validation::ValidationError;

/// Router builder exposing the employee lifecycle over HTTP.
pub fn employee_router<R, A>(service: Arc<EmployeeService<R, A>>) -> Router
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/employees",
            post(create_handler::<R, A>).get(list_handler::<R, A>),
        )
        .route(
            "/api/v1/employees/:employee_id",
            get(profile_handler::<R, A>).delete(delete_handler::<R, A>),
        )
        .route(
            "/api/v1/employees/:employee_id/status",
            post(status_handler::<R, A>),
        )
        .route(
            "/api/v1/employees/:employee_id/highlight-eligibility",
            get(eligibility_handler::<R, A>),
        )
        .route(
            "/api/v1/employees/:employee_id/history",
            post(history_handler::<R, A>),
        )
        .route(
            "/api/v1/employees/:employee_id/sanctions",
            post(sanction_handler::<R, A>),
        )
        .route(
            "/api/v1/employees/:employee_id/evaluations",
            post(evaluation_handler::<R, A>),
        )
        .route(
            "/api/v1/employees/:employee_id/inspections",
            post(inspection_handler::<R, A>),
        )
        .route(
            "/api/v1/employees/:employee_id/dependents",
            post(add_dependent_handler::<R, A>).get(dependents_handler::<R, A>),
        )
        .route(
            "/api/v1/employees/:employee_id/documents",
            post(add_document_handler::<R, A>).get(documents_handler::<R, A>),
        )
        .route(
            "/api/v1/history/:history_id",
            delete(remove_history_handler::<R, A>),
        )
        .route("/api/v1/alerts", get(alerts_handler::<R, A>))
        .route("/api/v1/alerts/dispatch", post(dispatch_handler::<R, A>))
        .with_state(service)
}

type SharedService<R, A> = State<Arc<EmployeeService<R, A>>>;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SanctionRequest {
    kind: String,
    #[serde(default)]
    applied_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RatingRequest {
    #[serde(default)]
    score: Option<i32>,
    #[serde(default)]
    date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DependentRequest {
    name: String,
    #[serde(default)]
    kinship: String,
    #[serde(default)]
    birth_date: Option<NaiveDate>,
    #[serde(default)]
    tax_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentRequest {
    title: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    file_reference: Option<String>,
}

pub(crate) fn error_response(error: EmployeeServiceError) -> Response {
    let (status, payload) = match &error {
        EmployeeServiceError::Validation(ValidationError::MissingRequirement {
            requirement, ..
        }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": error.to_string(), "pending_requirement": requirement }),
        ),
        EmployeeServiceError::Validation(
            ValidationError::NotEligible(_) | ValidationError::DuplicateName(_),
        ) => (StatusCode::CONFLICT, json!({ "error": error.to_string() })),
        EmployeeServiceError::Validation(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": error.to_string() }),
        ),
        EmployeeServiceError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, json!({ "error": error.to_string() }))
        }
        EmployeeServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, json!({ "error": error.to_string() }))
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": error.to_string() }),
        ),
    };
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn create_handler<R, A>(
    State(service): SharedService<R, A>,
    axum::Json(new_employee): axum::Json<NewEmployee>,
) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.create(new_employee) {
        Ok(employee) => (StatusCode::CREATED, axum::Json(employee)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, A>(
    State(service): SharedService<R, A>,
    Query(params): Query<SearchParams>,
) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.search(params.q.as_deref()) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn profile_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(employee_id): Path<String>,
) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.profile(&EmployeeId(employee_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(employee_id): Path<String>,
) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.delete(&EmployeeId(employee_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(employee_id): Path<String>,
    axum::Json(request): axum::Json<StatusRequest>,
) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.change_status(&EmployeeId(employee_id), request) {
        Ok(employee) => (StatusCode::OK, axum::Json(employee)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligibility_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(employee_id): Path<String>,
) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.highlight_eligibility(&EmployeeId(employee_id)) {
        Ok(eligibility) => (StatusCode::OK, axum::Json(eligibility)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(employee_id): Path<String>,
    axum::Json(request): axum::Json<HistoryEntryRequest>,
) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.record_history(&EmployeeId(employee_id), request) {
        Ok(outcome) => (StatusCode::CREATED, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_history_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(history_id): Path<String>,
) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.remove_history(&HistoryEventId(history_id)) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn sanction_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(employee_id): Path<String>,
    axum::Json(request): axum::Json<SanctionRequest>,
) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    let sanction = Sanction {
        employee_id: EmployeeId(employee_id),
        kind: SanctionKind::parse(&request.kind),
        applied_on: request.applied_on,
    };
    match service.add_sanction(sanction) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evaluation_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(employee_id): Path<String>,
    axum::Json(request): axum::Json<RatingRequest>,
) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    let evaluation = Evaluation {
        employee_id: EmployeeId(employee_id),
        score: request.score,
        date: request.date,
    };
    match service.add_evaluation(evaluation) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn inspection_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(employee_id): Path<String>,
    axum::Json(request): axum::Json<RatingRequest>,
) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    let inspection = Inspection {
        employee_id: EmployeeId(employee_id),
        score: request.score,
        date: request.date,
    };
    match service.add_inspection(inspection) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_dependent_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(employee_id): Path<String>,
    axum::Json(request): axum::Json<DependentRequest>,
) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    let dependent = Dependent {
        employee_id: EmployeeId(employee_id),
        name: request.name,
        kinship: request.kinship,
        birth_date: request.birth_date,
        tax_id: request.tax_id,
    };
    match service.add_dependent(dependent) {
        Ok(dependent) => (StatusCode::CREATED, axum::Json(dependent)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dependents_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(employee_id): Path<String>,
) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.dependents(&EmployeeId(employee_id)) {
        Ok(dependents) => (StatusCode::OK, axum::Json(dependents)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_document_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(employee_id): Path<String>,
    axum::Json(request): axum::Json<DocumentRequest>,
) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    let document = EmployeeDocument {
        employee_id: EmployeeId(employee_id),
        title: request.title,
        category: request.category,
        file_reference: request.file_reference,
    };
    match service.add_document(document) {
        Ok(document) => (StatusCode::CREATED, axum::Json(document)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn documents_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(employee_id): Path<String>,
) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.documents(&EmployeeId(employee_id)) {
        Ok(documents) => (StatusCode::OK, axum::Json(documents)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn alerts_handler<R, A>(State(service): SharedService<R, A>) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.due_alerts() {
        Ok(alerts) => (StatusCode::OK, axum::Json(alerts)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dispatch_handler<R, A>(State(service): SharedService<R, A>) -> Response
where
    R: EmployeeRepository + RecordRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.dispatch_alerts() {
        Ok(dispatched) => {
            (StatusCode::OK, axum::Json(json!({ "dispatched": dispatched }))).into_response()
        }
        Err(error) => error_response(error),
    }
}
