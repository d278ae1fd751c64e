pub mod responses;
pub mod validation;
