// Aggregate handlers (a001-a004)
pub mod a001_community_post;
pub mod a002_crop_field;
pub mod a003_field;
pub mod a004_task;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::validation::ValidationErrors;
use serde::{Deserialize, Serialize};

/// `?keyword=` of the `/search` endpoints
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: String,
}

/// `?status=` of the status PATCH endpoints
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

/// Reduce the optional filter parameters of a list request to one filter.
/// No parameter means `all`; two or more is a validation failure.
pub(crate) fn pick_filter<F>(
    all: F,
    candidates: impl IntoIterator<Item = Option<F>>,
) -> Result<F, ValidationErrors> {
    let mut chosen: Vec<F> = candidates.into_iter().flatten().collect();
    match chosen.len() {
        0 => Ok(all),
        1 => Ok(chosen.remove(0)),
        _ => Err(ValidationErrors::single(
            "query",
            "Only one filter parameter is allowed per request",
        )),
    }
}

/// 200 with the body, or 404 with an empty body
pub(crate) fn found<T: Serialize>(value: Option<T>) -> Response {
    match value {
        Some(v) => Json(v).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// 204 when something was deleted, 404 otherwise
pub(crate) fn deleted(removed: bool) -> StatusCode {
    if removed {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_filter_allows_at_most_one() {
        assert_eq!(pick_filter(0, [None, None]).unwrap(), 0);
        assert_eq!(pick_filter(0, [None, Some(7)]).unwrap(), 7);

        let err = pick_filter(0, [Some(1), Some(2)]).unwrap_err();
        assert_eq!(err.fields[0].field, "query");
    }

    #[test]
    fn deleted_maps_to_status() {
        assert_eq!(deleted(true), StatusCode::NO_CONTENT);
        assert_eq!(deleted(false), StatusCode::NOT_FOUND);
    }
}
