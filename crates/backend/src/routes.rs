use axum::{
    routing::{get, patch},
    Router,
};

use crate::api::handlers;
use crate::state::AppState;
use crate::system;

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    Router::new()
        // ========================================
        // A001 COMMUNITY POSTS
        // ========================================
        .route(
            "/api/v1/community/posts",
            get(handlers::a001_community_post::list).post(handlers::a001_community_post::create),
        )
        .route(
            "/api/v1/community/posts/search",
            get(handlers::a001_community_post::search),
        )
        .route(
            "/api/v1/community/posts/:id",
            get(handlers::a001_community_post::get_by_id)
                .put(handlers::a001_community_post::update)
                .delete(handlers::a001_community_post::delete),
        )
        // ========================================
        // A002 CROP FIELDS
        // ========================================
        .route(
            "/api/v1/crop-fields",
            get(handlers::a002_crop_field::list).post(handlers::a002_crop_field::create),
        )
        .route(
            "/api/v1/crop-fields/search",
            get(handlers::a002_crop_field::search),
        )
        .route(
            "/api/v1/crop-fields/:id",
            get(handlers::a002_crop_field::get_by_id)
                .put(handlers::a002_crop_field::update)
                .delete(handlers::a002_crop_field::delete),
        )
        .route(
            "/api/v1/crop-fields/:id/status",
            patch(handlers::a002_crop_field::update_status),
        )
        // ========================================
        // A003 FIELDS
        // ========================================
        .route(
            "/api/v1/fields",
            get(handlers::a003_field::list).post(handlers::a003_field::create),
        )
        .route("/api/v1/fields/search", get(handlers::a003_field::search))
        .route(
            "/api/v1/fields/:id",
            get(handlers::a003_field::get_by_id)
                .put(handlers::a003_field::update)
                .delete(handlers::a003_field::delete),
        )
        .route(
            "/api/v1/fields/:id/status",
            patch(handlers::a003_field::update_status),
        )
        // ========================================
        // A004 TASKS
        // ========================================
        .route(
            "/api/v1/tasks",
            get(handlers::a004_task::list).post(handlers::a004_task::create),
        )
        .route("/api/v1/tasks/upcoming", get(handlers::a004_task::upcoming))
        .route(
            "/api/v1/tasks/:id",
            get(handlers::a004_task::get_by_id)
                .put(handlers::a004_task::update)
                .delete(handlers::a004_task::delete),
        )
        .route(
            "/api/v1/tasks/:id/complete",
            patch(handlers::a004_task::complete),
        )
        // ========================================
        // SYSTEM: HEALTH, AUTH, USERS, PROFILES
        // ========================================
        .merge(system::api::routes::configure_system_routes(state.clone()))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a003_field::service::tests::field_dto;
    use crate::shared::config::AuthConfig;
    use crate::shared::data::db::connect_in_memory;
    use crate::system::auth::jwt::JwtSettings;
    use crate::system::users;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> Router {
        let db = connect_in_memory().await.unwrap();
        configure_routes(AppState::new(db, JwtSettings::new("route-tests", 24)))
    }

    /// Router over a database holding the configured bootstrap admin
    async fn app_with_admin() -> Router {
        let db = connect_in_memory().await.unwrap();
        let auth = AuthConfig {
            bootstrap_admin_email: Some("root@agro.pe".into()),
            bootstrap_admin_password: Some("admin123".into()),
            ..AuthConfig::default()
        };
        users::service::ensure_bootstrap_admin(&db, &auth).await.unwrap();
        configure_routes(AppState::new(db, JwtSettings::new("route-tests", 24)))
    }

    async fn login(app: &Router, email: &str, password: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/profile/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    fn field_json(name: &str, status: &str, days: i32) -> Value {
        serde_json::to_value(field_dto(name, status, days)).unwrap()
    }

    async fn signup(app: &Router, email: &str, dni: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/profile/auth/signup",
            None,
            Some(json!({
                "firstName": "Ana",
                "lastName": "Quispe",
                "email": email,
                "password": "secret1",
                "dni": dni,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health() {
        let app = app().await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn field_lifecycle() {
        let app = app().await;

        let (status, created) =
            send(&app, Method::POST, "/api/v1/fields", None, Some(field_json("North", "Healthy", 10))).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["version"], 0);
        assert_eq!(created["daysSincePlanting"], 10);

        let (status, fetched) = send(&app, Method::GET, &format!("/api/v1/fields/{}", id), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "North");

        let (status, body) = send(&app, Method::GET, "/api/v1/fields/999", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, Value::Null);

        let (status, patched) = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/fields/{}/status?status=Stressed", id),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["status"], "Stressed");

        let uri = format!("/api/v1/fields/{}", id);
        let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn field_filters_and_search() {
        let app = app().await;
        for (name, status, days) in [("North", "Healthy", 10), ("South", "Healthy", 40), ("East", "Stressed", 70)] {
            send(&app, Method::POST, "/api/v1/fields", None, Some(field_json(name, status, days))).await;
        }

        let (_, healthy) = send(&app, Method::GET, "/api/v1/fields?status=Healthy", None, None).await;
        assert_eq!(healthy.as_array().unwrap().len(), 2);

        let (_, older) = send(&app, Method::GET, "/api/v1/fields?minDays=30", None, None).await;
        let names: Vec<&str> = older
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["South", "East"]);

        let (_, found) = send(&app, Method::GET, "/api/v1/fields/search?keyword=orth", None, None).await;
        assert_eq!(found.as_array().unwrap().len(), 1);

        let (status, body) =
            send(&app, Method::GET, "/api/v1/fields?status=Healthy&crop=Trigo", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_failed");
    }

    #[tokio::test]
    async fn validation_and_version_conflict() {
        let app = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/community/posts",
            None,
            Some(json!({ "user": "ana", "description": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"][0]["field"], "description");

        let (_, post) = send(
            &app,
            Method::POST,
            "/api/v1/community/posts",
            None,
            Some(json!({ "user": "ana", "description": "Rain tomorrow" })),
        )
        .await;
        let uri = format!("/api/v1/community/posts/{}", post["id"]);

        let (status, updated) =
            send(&app, Method::PUT, &uri, None, Some(json!({ "description": "Sun", "version": 0 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["version"], 1);

        let (status, body) =
            send(&app, Method::PUT, &uri, None, Some(json!({ "description": "Hail", "version": 0 }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "version_conflict");
    }

    #[tokio::test]
    async fn tasks_require_existing_field() {
        let app = app().await;

        let task = json!({ "fieldId": 42, "date": "2030-01-01", "name": "Irrigate", "description": "North" });
        let (status, body) = send(&app, Method::POST, "/api/v1/tasks", None, Some(task)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"][0]["field"], "fieldId");

        let (_, field) =
            send(&app, Method::POST, "/api/v1/fields", None, Some(field_json("North", "Healthy", 10))).await;
        let task = json!({ "fieldId": field["id"], "date": "2030-01-01", "name": "Irrigate", "description": "North" });
        let (status, created) = send(&app, Method::POST, "/api/v1/tasks", None, Some(task)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["completed"], false);

        let (_, upcoming) = send(&app, Method::GET, "/api/v1/tasks/upcoming", None, None).await;
        assert_eq!(upcoming.as_array().unwrap().len(), 1);

        let (status, done) = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/tasks/{}/complete", created["id"]),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(done["completed"], true);

        let (_, by_field) = send(
            &app,
            Method::GET,
            &format!("/api/v1/tasks?fieldId={}", field["id"]),
            None,
            None,
        )
        .await;
        assert_eq!(by_field.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn profile_endpoints_enforce_ownership() {
        let app = app_with_admin().await;
        let ana = signup(&app, "ana@agro.pe", "11111111").await;
        let admin = login(&app, "root@agro.pe", "admin123").await;
        signup(&app, "luis@agro.pe", "33333333").await;

        let (status, _) = send(&app, Method::GET, "/api/profile/auth/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, me) = send(&app, Method::GET, "/api/profile/auth/me", Some(&ana), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["email"], "ana@agro.pe");
        assert!(me.get("passwordHash").is_none());

        let (status, profile) = send(&app, Method::GET, "/api/profile/ana@agro.pe", Some(&ana), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["language"], "es");

        let (status, _) = send(&app, Method::GET, "/api/profile/luis@agro.pe", Some(&ana), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, Method::GET, "/api/profile/luis@agro.pe", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/profile/settings/reset/ana@agro.pe",
            Some(&ana),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/profile/auth/login",
            None,
            Some(json!({ "email": "ana@agro.pe", "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid_credentials");
    }

    #[tokio::test]
    async fn signup_as_admin_is_refused() {
        let app = app().await;
        let victim = signup(&app, "victim@agro.pe", "11111111").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/profile/auth/signup",
            None,
            Some(json!({
                "firstName": "Eve",
                "lastName": "Rojas",
                "email": "evil@agro.pe",
                "password": "secret1",
                "dni": "22222222",
                "role": "ADMIN",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"][0]["field"], "role");

        let evil = signup(&app, "evil@agro.pe", "22222222").await;
        let (status, _) = send(
            &app,
            Method::DELETE,
            "/api/profile/user/victim@agro.pe",
            Some(&evil),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, Method::GET, "/api/profile/auth/me", Some(&victim), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn old_token_does_not_follow_a_reused_email() {
        let app = app().await;
        let first = signup(&app, "a@agro.pe", "11111111").await;

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/profile/user/a@agro.pe",
            Some(&first),
            Some(json!({ "email": "a2@agro.pe" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        signup(&app, "a@agro.pe", "22222222").await;

        let (status, _) = send(&app, Method::GET, "/api/profile/user/a@agro.pe", Some(&first), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, me) = send(&app, Method::GET, "/api/profile/user/a2@agro.pe", Some(&first), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["dni"], "11111111");
    }
}
