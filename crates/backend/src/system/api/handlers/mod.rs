pub mod auth;
pub mod profiles;
pub mod users;
