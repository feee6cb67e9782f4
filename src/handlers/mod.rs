pub mod user_handlers;

pub use user_handlers::{create_user, get_user, list_users};
