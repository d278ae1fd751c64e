use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use contracts::domain::a003_field::aggregate::FieldId;
use contracts::domain::a004_task::aggregate::{
    CreateTaskDto, Task, TaskId, TaskResource, UpdateTaskDto,
};
use contracts::shared::validation::ValidationErrors;
use serde::Deserialize;

use super::{deleted, found, pick_filter};
use crate::domain::a004_task::service::{self, TaskFilter};
use crate::shared::error::ServiceError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    pub field_id: Option<i64>,
}

impl TaskQuery {
    fn into_filter(self) -> Result<TaskFilter, ValidationErrors> {
        pick_filter(
            TaskFilter::All,
            [self.field_id.map(|id| TaskFilter::FieldId(FieldId(id)))],
        )
    }
}

fn resources(tasks: &[Task]) -> Vec<TaskResource> {
    tasks.iter().map(TaskResource::from).collect()
}

/// POST /api/v1/tasks
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateTaskDto>,
) -> Result<(StatusCode, Json<TaskResource>), ServiceError> {
    let task = service::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(TaskResource::from(&task))))
}

/// GET /api/v1/tasks[?fieldId=]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> Result<Json<Vec<TaskResource>>, ServiceError> {
    let tasks = service::list(&state.db, query.into_filter()?).await?;
    Ok(Json(resources(&tasks)))
}

/// GET /api/v1/tasks/upcoming
pub async fn upcoming(State(state): State<AppState>) -> Result<Json<Vec<TaskResource>>, ServiceError> {
    let tasks = service::upcoming(&state.db).await?;
    Ok(Json(resources(&tasks)))
}

/// GET /api/v1/tasks/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let task = service::get_by_id(&state.db, TaskId(id)).await?;
    Ok(found(task.as_ref().map(TaskResource::from)))
}

/// PUT /api/v1/tasks/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateTaskDto>,
) -> Result<Response, ServiceError> {
    let task = service::update(&state.db, TaskId(id), dto).await?;
    Ok(found(task.as_ref().map(TaskResource::from)))
}

/// PATCH /api/v1/tasks/:id/complete
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let task = service::mark_completed(&state.db, TaskId(id)).await?;
    Ok(found(task.as_ref().map(TaskResource::from)))
}

/// DELETE /api/v1/tasks/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    Ok(deleted(service::delete(&state.db, TaskId(id)).await?))
}
