pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_repository: Arc<dyn repositories::UserRepository>,
}

impl AppState {
    pub fn new(user_repository: Arc<dyn repositories::UserRepository>) -> Self {
        Self { user_repository }
    }
}
