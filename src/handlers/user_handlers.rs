use crate::error::{AppError, Result};
use crate::models::user::{CreateUserRequest, NewUser, User};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use validator::Validate;

/// GET /api/users
///
/// Returns every user ordered by username. An empty table is a `200` with
/// an empty array.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = state.user_repository.list_users().await?;
    tracing::debug!(count = users.len(), "Listed users");
    Ok(Json(users))
}

/// POST /api/users
///
/// ## Request Body (JSON)
/// ```json
/// { "username": "alice", "email": "alice@example.com" }
/// ```
///
/// ## Response (201 CREATED)
/// The created user, with `Location: /api/users/{id}`.
///
/// ## Errors
/// - 400 Bad Request: null or undecodable body, validation failure, duplicate email
/// - 500 Internal Server Error: database failure
pub async fn create_user(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Option<CreateUserRequest>>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload?;
    let request =
        payload.ok_or_else(|| AppError::BadRequest("User data cannot be null.".to_string()))?;

    request.validate()?;

    let user = state
        .user_repository
        .create_user(&NewUser::from(request))
        .await
        .inspect_err(|e| tracing::warn!("Failed to create user: {}", e))?;

    tracing::info!(user_id = user.id, "Created user");

    let location = format!("/api/users/{}", user.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(user)).into_response())
}

/// GET /api/users/{id}
pub async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<User>> {
    state
        .user_repository
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(AppError::UserNotFound)
}

#[cfg(test)]
mod tests {
    use crate::repositories::{user_repository::MockUserRepository, RepositoryError};
    use crate::{app, models::user::User, AppState};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use chrono::Utc;
    use mockall::predicate::*;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router(mock_repo: MockUserRepository) -> Router {
        app::api_routes().with_state(AppState::new(Arc::new(mock_repo)))
    }

    fn sample_user(id: i64) -> User {
        User {
            id,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            created_at: Utc::now(),
        }
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_list_users_database_failure_is_500() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_list_users()
            .times(1)
            .returning(|| {
                Box::pin(async { Err(RepositoryError::Database(sqlx::Error::PoolTimedOut)) })
            });

        let response = router(mock_repo)
            .oneshot(Request::get("/api/users").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("internal server error"));
    }

    #[tokio::test]
    async fn test_create_user_conflict_is_400() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_create_user()
            .withf(|new_user| new_user.email == "alice@example.com")
            .times(1)
            .returning(|_| {
                Box::pin(async { Err(RepositoryError::Conflict { field: "email" }) })
            });

        let response = router(mock_repo)
            .oneshot(post_json(
                r#"{"username": "alice", "email": "alice@example.com"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "A user with this email already exists.");
    }

    #[tokio::test]
    async fn test_create_user_infrastructure_failure_is_500() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_create_user()
            .times(1)
            .returning(|_| {
                Box::pin(async { Err(RepositoryError::Database(sqlx::Error::PoolClosed)) })
            });

        let response = router(mock_repo)
            .oneshot(post_json(r#"{"username": "bob", "email": "bob@example.com"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_create_user_repository_validation_is_400() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_create_user()
            .times(1)
            .returning(|_| {
                Box::pin(async { Err(RepositoryError::Validation(vec!["username"])) })
            });

        // Passes shape validation but trims to empty in the repository
        let response = router(mock_repo)
            .oneshot(post_json(r#"{"username": "   ", "email": "bob@example.com"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["errors"]["username"].is_array());
    }

    #[tokio::test]
    async fn test_create_user_null_body_never_reaches_repository() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_create_user().never();

        let response = router(mock_repo).oneshot(post_json("null")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "User data cannot be null.");
    }

    #[tokio::test]
    async fn test_create_user_success_sets_location() {
        let mut mock_repo = MockUserRepository::new();
        let user = sample_user(7);
        let user_clone = user.clone();
        mock_repo
            .expect_create_user()
            .times(1)
            .returning(move |_| {
                let user = user_clone.clone();
                Box::pin(async move { Ok(user) })
            });

        let response = router(mock_repo)
            .oneshot(post_json(
                r#"{"username": "alice", "email": "alice@example.com"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/api/users/7"
        );
        let body = body_json(response).await;
        assert_eq!(body["id"], 7);
        assert_eq!(body["username"], user.username);
    }

    #[tokio::test]
    async fn test_get_user_not_found_is_404() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_id()
            .with(eq(42))
            .times(1)
            .returning(|_| Box::pin(async { Ok(None) }));

        let response = router(mock_repo)
            .oneshot(Request::get("/api/users/42").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_user_database_failure_is_500() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| {
                Box::pin(async { Err(RepositoryError::Database(sqlx::Error::PoolTimedOut)) })
            });

        let response = router(mock_repo)
            .oneshot(Request::get("/api/users/1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_user_non_integer_id_is_rejected() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_find_by_id().never();

        let response = router(mock_repo)
            .oneshot(Request::get("/api/users/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
