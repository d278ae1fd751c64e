//! Wire and domain types shared between the AgroApp backend and its clients.

pub mod domain;
pub mod shared;
pub mod system;
