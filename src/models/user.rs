use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Body accepted by `POST /api/users`.
///
/// Both fields are optional at the serde level so that a missing field is
/// reported as a validation message instead of a decoder failure. Emptiness
/// after trimming is checked by the repository. Extra fields such as `id`
/// or `createdAt` are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(required(message = "The username field is required."))]
    pub username: Option<String>,

    #[validate(required(message = "The email field is required."))]
    pub email: Option<String>,
}

/// Candidate user handed to the repository. `id` and `created_at` are
/// assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        NewUser {
            username: request.username.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
        }
    }
}
