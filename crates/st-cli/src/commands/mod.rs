//! CLI command implementations

pub mod common;
pub mod current;
pub mod downgrade;
pub mod history;
pub mod upgrade;
pub mod verify;

#[cfg(feature = "serve")]
pub mod serve;
