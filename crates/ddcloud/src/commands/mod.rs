//! Command handlers.

pub mod rule;
pub mod schema;
pub mod util;
