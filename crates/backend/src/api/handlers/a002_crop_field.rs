use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::NaiveDate;
use contracts::domain::a002_crop_field::aggregate::{CropField, CropFieldDto, CropFieldId, CropFieldResource};
use contracts::shared::validation::ValidationErrors;
use serde::Deserialize;

use super::{deleted, found, pick_filter, SearchQuery, StatusQuery};
use crate::domain::a002_crop_field::service::{self, CropFieldFilter};
use crate::shared::error::ServiceError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropFieldQuery {
    pub title: Option<String>,
    pub status: Option<String>,
    pub field: Option<String>,
    pub planted_after: Option<NaiveDate>,
    pub harvest_before: Option<NaiveDate>,
}

impl CropFieldQuery {
    fn into_filter(self) -> Result<CropFieldFilter, ValidationErrors> {
        pick_filter(
            CropFieldFilter::All,
            [
                self.title.map(CropFieldFilter::Title),
                self.status.map(CropFieldFilter::Status),
                self.field.map(CropFieldFilter::Field),
                self.planted_after.map(CropFieldFilter::PlantedAfter),
                self.harvest_before.map(CropFieldFilter::HarvestBefore),
            ],
        )
    }
}

fn resources(crops: &[CropField]) -> Vec<CropFieldResource> {
    crops.iter().map(CropFieldResource::from).collect()
}

/// POST /api/v1/crop-fields
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CropFieldDto>,
) -> Result<(StatusCode, Json<CropFieldResource>), ServiceError> {
    let crop = service::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(CropFieldResource::from(&crop))))
}

/// GET /api/v1/crop-fields[?title=|status=|field=|plantedAfter=|harvestBefore=]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CropFieldQuery>,
) -> Result<Json<Vec<CropFieldResource>>, ServiceError> {
    let crops = service::list(&state.db, query.into_filter()?).await?;
    Ok(Json(resources(&crops)))
}

/// GET /api/v1/crop-fields/search?keyword=
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CropFieldResource>>, ServiceError> {
    let crops = service::list(&state.db, CropFieldFilter::TitleContaining(query.keyword)).await?;
    Ok(Json(resources(&crops)))
}

/// GET /api/v1/crop-fields/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let crop = service::get_by_id(&state.db, CropFieldId(id)).await?;
    Ok(found(crop.as_ref().map(CropFieldResource::from)))
}

/// PUT /api/v1/crop-fields/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<CropFieldDto>,
) -> Result<Response, ServiceError> {
    let crop = service::update(&state.db, CropFieldId(id), dto).await?;
    Ok(found(crop.as_ref().map(CropFieldResource::from)))
}

/// PATCH /api/v1/crop-fields/:id/status?status=
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<StatusQuery>,
) -> Result<Response, ServiceError> {
    let crop = service::update_status(&state.db, CropFieldId(id), query.status).await?;
    Ok(found(crop.as_ref().map(CropFieldResource::from)))
}

/// DELETE /api/v1/crop-fields/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    Ok(deleted(service::delete(&state.db, CropFieldId(id)).await?))
}
