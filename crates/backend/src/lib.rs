pub mod api;
pub mod domain;
pub mod routes;
pub mod shared;
pub mod state;
pub mod system;
