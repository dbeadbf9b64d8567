//! Shared catalog model for Quest Chronicles content.

pub mod defs;
pub mod parse;
pub mod validate;

pub use defs::*;
pub use parse::{ParseError, parse_items, parse_quests};
pub use validate::{ValidationError, validate_catalog};
