use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::NaiveDate;
use contracts::domain::a003_field::aggregate::{Field, FieldDto, FieldId, FieldResource};
use contracts::shared::validation::ValidationErrors;
use serde::Deserialize;

use super::{deleted, found, pick_filter, SearchQuery, StatusQuery};
use crate::domain::a003_field::service::{self, FieldFilter};
use crate::shared::error::ServiceError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldQuery {
    pub name: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub crop: Option<String>,
    pub product: Option<String>,
    pub soil_type: Option<String>,
    pub planted_after: Option<NaiveDate>,
    pub harvest_before: Option<NaiveDate>,
    pub min_days: Option<i32>,
    pub max_days: Option<i32>,
}

impl FieldQuery {
    fn into_filter(self) -> Result<FieldFilter, ValidationErrors> {
        pick_filter(
            FieldFilter::All,
            [
                self.name.map(FieldFilter::Name),
                self.status.map(FieldFilter::Status),
                self.location.map(FieldFilter::Location),
                self.crop.map(FieldFilter::Crop),
                self.product.map(FieldFilter::Product),
                self.soil_type.map(FieldFilter::SoilType),
                self.planted_after.map(FieldFilter::PlantedAfter),
                self.harvest_before.map(FieldFilter::HarvestBefore),
                self.min_days.map(FieldFilter::MinDays),
                self.max_days.map(FieldFilter::MaxDays),
            ],
        )
    }
}

fn resources(fields: &[Field]) -> Vec<FieldResource> {
    fields.iter().map(FieldResource::from).collect()
}

/// POST /api/v1/fields
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<FieldDto>,
) -> Result<(StatusCode, Json<FieldResource>), ServiceError> {
    let field = service::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(FieldResource::from(&field))))
}

/// GET /api/v1/fields with at most one filter parameter
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<FieldQuery>,
) -> Result<Json<Vec<FieldResource>>, ServiceError> {
    let fields = service::list(&state.db, query.into_filter()?).await?;
    Ok(Json(resources(&fields)))
}

/// GET /api/v1/fields/search?keyword=
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<FieldResource>>, ServiceError> {
    let fields = service::list(&state.db, FieldFilter::NameContaining(query.keyword)).await?;
    Ok(Json(resources(&fields)))
}

/// GET /api/v1/fields/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let field = service::get_by_id(&state.db, FieldId(id)).await?;
    Ok(found(field.as_ref().map(FieldResource::from)))
}

/// PUT /api/v1/fields/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<FieldDto>,
) -> Result<Response, ServiceError> {
    let field = service::update(&state.db, FieldId(id), dto).await?;
    Ok(found(field.as_ref().map(FieldResource::from)))
}

/// PATCH /api/v1/fields/:id/status?status=
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<StatusQuery>,
) -> Result<Response, ServiceError> {
    let field = service::update_status(&state.db, FieldId(id), query.status).await?;
    Ok(found(field.as_ref().map(FieldResource::from)))
}

/// DELETE /api/v1/fields/:id, tasks of the field go with it
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    Ok(deleted(service::delete(&state.db, FieldId(id)).await?))
}
