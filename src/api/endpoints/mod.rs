//! API endpoint handlers.

pub mod formats;
pub mod health;
pub mod process;
