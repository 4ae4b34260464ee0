//! CLI command implementations
//!
//! - `check`: Rule analysis and display commands
//! - `schema`: JSON schema output
//! - `util`: Shared utility functions

pub mod check;
pub mod schema;
pub mod util;

pub use check::{cmd_check, cmd_show};
pub use schema::cmd_schema;
