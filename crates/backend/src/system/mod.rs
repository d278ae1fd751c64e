pub mod api;
pub mod auth;
pub mod middleware;
pub mod profiles;
pub mod tracing;
pub mod users;
